//! Log file destination

use super::Destination;
use crate::core::{LoggerError, RecordBuffer, Result};
use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

impl Destination for File {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

/// Open `path` for appending, creating it with owner-only permissions
pub fn open_log_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .map_err(|e| LoggerError::file_destination(path.display().to_string(), e.to_string()))
}

/// Secondary destination: an open log file plus the buffer its records are
/// formatted into. Owned by exactly one logger.
pub(crate) struct FileSink {
    pub(crate) path: PathBuf,
    pub(crate) file: File,
    pub(crate) buf: RecordBuffer,
}

impl FileSink {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_log_file(&path)?;
        Ok(Self {
            path,
            file,
            buf: RecordBuffer::new(),
        })
    }

    /// Write the formatted record currently held in `buf`
    pub(crate) fn flush_record(&mut self) -> Result<()> {
        self.file.write_all(self.buf.bytes()).map_err(|e| {
            LoggerError::io_operation("writing record", self.path.display().to_string(), e)
        })
    }

    /// Flush the file and release the handle
    pub(crate) fn close(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all().map_err(|e| {
            LoggerError::io_operation("closing log file", self.path.display().to_string(), e)
        })
    }
}
