//! # Color Logger
//!
//! A leveled, colorized console logger that can mirror every record to a
//! plain-text log file.
//!
//! ## Features
//!
//! - **Low allocation**: records are formatted into a reused byte buffer
//! - **Caller locations**: ERROR, FATAL and DEBUG records name the calling
//!   function, file and line; TRACE records carry a bounded call-stack dump
//! - **Dual destinations**: colored console output plus an uncolored log file
//! - **Thread safe**: every record reaches each destination in one write

pub mod core;
pub mod destination;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Frame, Logger, LoggerBuilder, LoggerConfig, LoggerError, Prefix, RecordBuffer, Result,
        Severity, Values, MAX_CALL_DEPTH,
    };
    pub use crate::destination::{Destination, SharedBuffer};
}

pub use core::{
    Frame, Logger, LoggerBuilder, LoggerConfig, LoggerError, Prefix, RecordBuffer, Result,
    Severity, Values, MAX_CALL_DEPTH,
};
pub use destination::{Destination, SharedBuffer};
