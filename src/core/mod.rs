//! Core logger types

pub mod buffer;
pub mod caller;
pub mod config;
pub mod error;
pub mod logger;
pub mod severity;

pub use buffer::RecordBuffer;
pub use caller::{Frame, MAX_CALL_DEPTH};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder, Values};
pub use severity::{Prefix, Severity};
