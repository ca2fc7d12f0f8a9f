//! Severity definitions, their line prefixes and the color palette

use super::buffer::COLOR_RESET;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// 256-color orange used for WARN and for caller locations
///
/// Written out literally: it must not depend on the terminal's advertised
/// truecolor support.
pub const ORANGE: &[u8] = b"\x1b[38;5;208m";

/// Foreground escape sequence of a basic ANSI color
fn foreground(color: Color) -> Vec<u8> {
    let mut escape = Vec::with_capacity(8);
    escape.extend_from_slice(b"\x1b[");
    escape.extend_from_slice(color.to_fg_str().as_bytes());
    escape.push(b'm');
    escape
}

/// Every escape sequence a record can contain, computed once per process
#[derive(Debug)]
pub struct Palette {
    pub timestamp: Vec<u8>,
    pub location: Vec<u8>,
    pub stack_frame: Vec<u8>,
    prefixes: [Prefix; 6],
}

impl Palette {
    fn build() -> Self {
        Self {
            timestamp: foreground(Color::Blue),
            location: ORANGE.to_vec(),
            stack_frame: foreground(Color::BrightBlack),
            prefixes: Severity::ALL.map(Prefix::build),
        }
    }
}

pub fn palette() -> &'static Palette {
    static PALETTE: OnceLock<Palette> = OnceLock::new();
    PALETTE.get_or_init(Palette::build)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// Foreground escape sequence of the severity's label
    pub fn escape(&self) -> Vec<u8> {
        match self {
            Severity::Fatal | Severity::Error => foreground(Color::Red),
            Severity::Warn => ORANGE.to_vec(),
            Severity::Info => foreground(Color::Green),
            Severity::Debug => foreground(Color::Magenta),
            Severity::Trace => foreground(Color::Cyan),
        }
    }

    /// DEBUG and TRACE are only emitted when the logger has debug output on
    pub fn is_debug_gated(&self) -> bool {
        matches!(self, Severity::Debug | Severity::Trace)
    }

    pub fn prefix(&self) -> &'static Prefix {
        &palette().prefixes[*self as usize]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FATAL" => Ok(Severity::Fatal),
            "ERROR" => Ok(Severity::Error),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "INFO" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            "TRACE" => Ok(Severity::Trace),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

/// Immutable line prefix of a severity
///
/// `plain` is the bracketed label padded to eight bytes; `colored` is the
/// same label wrapped in the severity's ANSI color and a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub severity: Severity,
    pub plain: Vec<u8>,
    pub colored: Vec<u8>,
    pub includes_caller_location: bool,
    pub includes_call_stack: bool,
}

/// Width of the bracketed label including trailing padding
const PREFIX_WIDTH: usize = 8;

impl Prefix {
    fn build(severity: Severity) -> Self {
        let plain = format!("{:<width$}", format!("[{}]", severity), width = PREFIX_WIDTH);

        let mut colored = Vec::with_capacity(PREFIX_WIDTH + 24);
        colored.extend_from_slice(&severity.escape());
        colored.extend_from_slice(plain.as_bytes());
        colored.extend_from_slice(COLOR_RESET);

        Self {
            severity,
            plain: plain.into_bytes(),
            colored,
            includes_caller_location: matches!(
                severity,
                Severity::Fatal | Severity::Error | Severity::Debug
            ),
            includes_call_stack: severity == Severity::Trace,
        }
    }

    #[inline]
    pub fn bytes(&self, colored: bool) -> &[u8] {
        if colored {
            &self.colored
        } else {
            &self.plain
        }
    }
}
