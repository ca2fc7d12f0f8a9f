//! Logging macros for ergonomic log message formatting.
//!
//! These macros expand to the formatted (`...f`) logger methods, so the
//! reported caller location is the line of the macro invocation.
//!
//! # Examples
//!
//! ```
//! use color_logger::prelude::*;
//! use color_logger::info;
//!
//! let logger = Logger::builder(SharedBuffer::new()).build();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//! ```

/// Log a message at a runtime-selected severity.
///
/// # Examples
///
/// ```
/// # use color_logger::prelude::*;
/// # let logger = Logger::builder(SharedBuffer::new()).build();
/// use color_logger::log;
/// log!(logger, Severity::Info, "Simple message").unwrap();
/// log!(logger, Severity::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.logf($severity, format_args!($($arg)+))
    };
}

/// Log a fatal message and exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use color_logger::prelude::*;
/// # let logger = Logger::stderr();
/// use color_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(format_args!($($arg)+))
    };
}

/// Log an error message with its caller location.
///
/// # Examples
///
/// ```
/// # use color_logger::prelude::*;
/// # let logger = Logger::builder(SharedBuffer::new()).build();
/// use color_logger::error;
/// error!(logger, "Failed to connect to database").unwrap();
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(format_args!($($arg)+))
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(format_args!($($arg)+))
    };
}

/// Log an informational message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(format_args!($($arg)+))
    };
}

/// Log a debug message; dropped unless debug output is on.
///
/// # Examples
///
/// ```
/// # use color_logger::prelude::*;
/// # let logger = Logger::builder(SharedBuffer::new()).debug(true).build();
/// use color_logger::debug;
/// debug!(logger, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(format_args!($($arg)+))
    };
}

/// Log a trace message with a call-stack dump; dropped unless debug output is on.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.tracef(format_args!($($arg)+))
    };
}
