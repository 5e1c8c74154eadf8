//! Context error types

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("invalid context configuration: {0}")]
    InvalidConfig(String),
}
