//! Destinations that formatted records are written to

pub mod console;
pub mod file;
pub mod memory;

pub use memory::SharedBuffer;

use std::io::Write;

/// A sink accepting whole formatted records
///
/// Each record is handed over in a single `write_all` call. The terminal
/// query is only consulted to pick the default color setting.
pub trait Destination: Write + Send + Sync {
    fn is_terminal(&self) -> bool {
        false
    }
}
