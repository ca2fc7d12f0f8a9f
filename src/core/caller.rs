//! Caller-frame resolution and bounded call-stack walking

use std::borrow::Cow;
use std::panic::Location;
use std::path::Path;

pub const UNKNOWN_FILE: &str = "<unknown file>";
pub const UNKNOWN_FUNCTION: &str = "<unknown function>";

/// Upper bound on the number of frames in a call-stack dump
pub const MAX_CALL_DEPTH: usize = 50;

/// Symbol prefixes of the frames that sit between a public severity method
/// and the stack walk itself. Leading frames matching any of these are
/// skipped before `depth` is applied, so depth 0 names the code that called
/// the logger.
pub const PIPELINE_FRAME_PREFIXES: &[&str] = &[
    "backtrace::",
    "_Unwind_",
    WALK_FRAME_PREFIX,
    RESOLVE_FRAME_PREFIX,
    super::logger::PIPELINE_FRAME_PREFIX,
];

const WALK_FRAME_PREFIX: &str = concat!(module_path!(), "::walk");
const RESOLVE_FRAME_PREFIX: &str = concat!(module_path!(), "::resolve");

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: Cow<'static, str>,
    /// Base name of the source file, directory stripped
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Frame {
    pub fn unknown() -> Self {
        Self {
            function: Cow::Borrowed(UNKNOWN_FUNCTION),
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: 0,
        }
    }

    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        Self {
            function: match symbol.name() {
                Some(name) => Cow::Owned(format!("{:#}", name)),
                None => Cow::Borrowed(UNKNOWN_FUNCTION),
            },
            file: match symbol.filename() {
                Some(path) => Cow::Owned(base_name(path)),
                None => Cow::Borrowed(UNKNOWN_FILE),
            },
            line: symbol.lineno().unwrap_or(0),
        }
    }

    /// Whether debug info supplied both the file and the line
    fn has_source(&self) -> bool {
        self.file != UNKNOWN_FILE && self.line != 0
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_FILE.to_string())
}

fn location_base_name(location: &'static Location<'static>) -> &'static str {
    let file: &'static str = location.file();
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

fn is_pipeline_frame(function: &str) -> bool {
    let name = function.trim_start_matches('<');
    PIPELINE_FRAME_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Walk the current stack and return up to `limit` logical frames, starting
/// `skip` frames above the first frame outside the logging pipeline.
///
/// Inlined frames are reported individually. The walk stops early when the
/// stack runs out.
pub fn walk(skip: usize, limit: usize) -> Vec<Frame> {
    let mut frames = Vec::new();
    if limit == 0 {
        return frames;
    }

    let mut in_pipeline = true;
    let mut skipped = 0;
    backtrace::trace(|raw| {
        backtrace::resolve_frame(raw, |symbol| {
            if frames.len() >= limit {
                return;
            }
            let frame = Frame::from_symbol(symbol);
            if in_pipeline {
                if is_pipeline_frame(&frame.function) {
                    return;
                }
                in_pipeline = false;
            }
            if skipped < skip {
                skipped += 1;
                return;
            }
            frames.push(frame);
        });
        frames.len() < limit
    });
    frames
}

/// Resolve the frame `depth` levels above the code that called the logger
///
/// With `depth == 0` the file and line come from the `#[track_caller]`
/// location, which stays exact even when debug info is missing. Resolution
/// never fails: unavailable parts are replaced by placeholders.
pub fn resolve(depth: usize, location: &'static Location<'static>) -> Frame {
    let walked = walk(depth, 1).pop();
    if depth == 0 {
        at_location(walked, location)
    } else {
        with_source_or_unknown(walked)
    }
}

/// The call site named by `location`, with the walked function name only
/// when the walked frame is that same call site
///
/// Without debug info the walk can land on an unrelated frame (an inlined
/// caller's parent, a runtime shim), so its name is not trusted unless its
/// file and line agree with `location`.
fn at_location(walked: Option<Frame>, location: &'static Location<'static>) -> Frame {
    let file = location_base_name(location);
    let function = match walked {
        Some(frame) if frame.file == file && frame.line == location.line() => frame.function,
        _ => Cow::Borrowed(UNKNOWN_FUNCTION),
    };
    Frame {
        function,
        file: Cow::Borrowed(file),
        line: location.line(),
    }
}

/// A frame reached by a nonzero depth is reported only if debug info located it
fn with_source_or_unknown(walked: Option<Frame>) -> Frame {
    match walked {
        Some(frame) if frame.has_source() => frame,
        _ => Frame::unknown(),
    }
}
