//! Optional process-wide default logger
//!
//! Nothing in the crate reads the default logger on its own; it exists for
//! applications that prefer not to pass a `Logger` around. It must be
//! installed explicitly and should be shut down explicitly so the log file
//! is closed before the process exits.

use crate::core::{Logger, Result};
use parking_lot::RwLock;
use std::sync::Arc;

static DEFAULT_LOGGER: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

/// Install `logger` as the process-wide default, returning the previous one
pub fn install(logger: Logger) -> Option<Arc<Logger>> {
    DEFAULT_LOGGER.write().replace(Arc::new(logger))
}

/// The installed default logger, if any
pub fn default_logger() -> Option<Arc<Logger>> {
    DEFAULT_LOGGER.read().clone()
}

/// Remove the default logger and close it
///
/// Clones handed out by [`default_logger`] stay usable; their log file is
/// already closed, so they only write to the primary destination.
pub fn shutdown() -> Result<()> {
    let logger = DEFAULT_LOGGER.write().take();
    match logger {
        Some(logger) => logger.close(),
        None => Ok(()),
    }
}
