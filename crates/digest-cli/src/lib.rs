//! Digest CLI - Command-line interface
//!
//! This crate provides the `digest` binary:
//! - `summarize`: summarize an article or transcript file
//! - `prepare`: show the context a chat turn would submit
//! - `chat`: answer questions about a summary, one per stdin line
//! - `models`: list known models and their context windows

pub mod commands;

pub use commands::{Cli, Commands, ContentArgs};
