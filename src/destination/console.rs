//! Console destinations

use super::Destination;
use std::io::{IsTerminal, Stderr, Stdout};

impl Destination for Stdout {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}

impl Destination for Stderr {
    fn is_terminal(&self) -> bool {
        IsTerminal::is_terminal(self)
    }
}
