mod subscriber;

pub use subscriber::{env_filter, init_subscriber, TelemetryConfig};
