//! In-memory destination

use super::Destination;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Cloneable in-memory sink; every clone sees the same bytes
///
/// Useful for capturing output in tests or for forwarding records to a
/// component that is not a byte stream.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Captured>>,
    terminal: bool,
}

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    writes: usize,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that reports itself as an interactive terminal
    pub fn terminal() -> Self {
        Self {
            terminal: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().bytes.clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().bytes).into_owned()
    }

    /// Number of `write` calls received
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.bytes.clear();
        inner.writes = 0;
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        inner.bytes.extend_from_slice(buf);
        inner.writes += 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Destination for SharedBuffer {
    fn is_terminal(&self) -> bool {
        self.terminal
    }
}
