//! Main logger implementation

use super::{
    buffer::RecordBuffer,
    caller::{self, Frame, MAX_CALL_DEPTH},
    config::{LoggerConfig, Settings},
    error::Result,
    severity::{palette, Prefix, Severity},
};
use crate::destination::{file::FileSink, Destination};
use chrono::{DateTime, Datelike, Local, Timelike};
use parking_lot::{Mutex, RwLock};
use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Symbol prefix shared by every `Logger` method, used by the caller
/// resolver to skip the emission pipeline's own frames.
pub const PIPELINE_FRAME_PREFIX: &str = concat!(module_path!(), "::Logger");

/// Initial capacity of the primary record buffer
const INITIAL_BUFFER_CAPACITY: usize = 256;

thread_local! {
    // Message text of the record being emitted on this thread. A log call
    // nested inside a Display impl finds it taken and starts a fresh one.
    static MESSAGE_SCRATCH: Cell<String> = const { Cell::new(String::new()) };
}

/// Leveled, colorized logger writing to a primary destination and,
/// optionally, mirroring every record to a plain-text log file.
///
/// Configuration and the primary record buffer live behind one reader-writer
/// lock. The log file and its own buffer live behind a second, independent
/// lock, so the file pass never contends with the primary buffer.
///
/// # Example
///
/// ```
/// use color_logger::{Logger, SharedBuffer};
///
/// let out = SharedBuffer::new();
/// let logger = Logger::new(out.clone());
/// logger.without_timestamp().without_color();
///
/// logger.info(&[&"hello"]).unwrap();
/// assert_eq!(out.contents_string(), "[INFO]  hello\n");
/// ```
///
/// The log file is released by [`Logger::close`] (also called on drop).
/// A logger leaked with `std::mem::forget` keeps its file handle open.
pub struct Logger {
    primary: RwLock<Primary>,
    file: Mutex<Option<FileSink>>,
}

struct Primary {
    settings: Settings,
    out: Box<dyn Destination>,
    buf: RecordBuffer,
}

/// One logical event, captured once and formatted once per destination
struct Record<'a> {
    prefix: &'static Prefix,
    timestamp: Option<DateTime<Local>>,
    caller: Option<Frame>,
    stack: Vec<Frame>,
    message: &'a str,
}

impl Record<'_> {
    /// Render the record into `buf`, replacing whatever it held
    fn format_into(&self, buf: &mut RecordBuffer, color: bool) {
        let palette = palette();
        buf.reset();
        buf.append_bytes(self.prefix.bytes(color));

        if let Some(ref now) = self.timestamp {
            if color {
                buf.append_color(&palette.timestamp);
            }
            buf.append_int(now.year().max(0) as u32, 4);
            buf.append_byte(b'/');
            buf.append_int(now.month(), 2);
            buf.append_byte(b'/');
            buf.append_int(now.day(), 2);
            buf.append_byte(b' ');
            buf.append_int(now.hour(), 2);
            buf.append_byte(b':');
            buf.append_int(now.minute(), 2);
            buf.append_byte(b':');
            buf.append_int(now.second(), 2);
            buf.append_byte(b' ');
            if color {
                buf.append_color_reset();
            }
        }

        if let Some(ref frame) = self.caller {
            if color {
                buf.append_color(&palette.location);
            }
            append_frame(buf, frame);
            buf.append_byte(b' ');
            if color {
                buf.append_color_reset();
            }
        }

        buf.append_bytes(self.message.as_bytes());
        if !self.message.ends_with('\n') {
            buf.append_byte(b'\n');
        }

        for frame in &self.stack {
            if color {
                buf.append_color(&palette.stack_frame);
            }
            buf.append_byte(b'\t');
            append_frame(buf, frame);
            if color {
                buf.append_color_reset();
            }
            buf.append_byte(b'\n');
        }
    }
}

fn append_frame(buf: &mut RecordBuffer, frame: &Frame) {
    buf.append_bytes(frame.function.as_bytes());
    buf.append_byte(b':');
    buf.append_bytes(frame.file.as_bytes());
    buf.append_byte(b':');
    buf.append_int(frame.line, 0);
}

/// Display adapter joining values with single spaces and ending with a newline
///
/// ```
/// use color_logger::Values;
///
/// assert_eq!(Values(&[&"failed:", &42]).to_string(), "failed: 42\n");
/// ```
pub struct Values<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("\n")
    }
}

impl Logger {
    /// Create a logger writing to `out`
    ///
    /// Color is on only when `out` reports an interactive terminal.
    /// Timestamps are on, debug output and quiet mode are off.
    pub fn new(out: impl Destination + 'static) -> Self {
        let color = out.is_terminal();
        Self {
            primary: RwLock::new(Primary {
                settings: Settings {
                    color,
                    debug: false,
                    timestamp: true,
                    quiet: false,
                    depth: 0,
                },
                out: Box::new(out),
                buf: RecordBuffer::with_capacity(INITIAL_BUFFER_CAPACITY),
            }),
            file: Mutex::new(None),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    #[must_use]
    pub fn builder(out: impl Destination + 'static) -> LoggerBuilder {
        LoggerBuilder::new(out)
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) -> &Self {
        apply(&mut self.primary.write().settings);
        self
    }

    fn settings(&self) -> Settings {
        self.primary.read().settings
    }

    /// Turn on ANSI colors on the primary destination
    pub fn with_color(&self) -> &Self {
        self.update(|s| s.color = true)
    }

    pub fn without_color(&self) -> &Self {
        self.update(|s| s.color = false)
    }

    /// Skip `depth` extra frames when resolving the caller, for wrapper functions
    pub fn with_depth(&self, depth: usize) -> &Self {
        self.update(|s| s.depth = depth)
    }

    /// Reveal DEBUG and TRACE output
    pub fn with_debug(&self) -> &Self {
        self.update(|s| s.debug = true)
    }

    pub fn without_debug(&self) -> &Self {
        self.update(|s| s.debug = false)
    }

    pub fn with_timestamp(&self) -> &Self {
        self.update(|s| s.timestamp = true)
    }

    pub fn without_timestamp(&self) -> &Self {
        self.update(|s| s.timestamp = false)
    }

    /// Suppress all output
    pub fn quiet(&self) -> &Self {
        self.update(|s| s.quiet = true)
    }

    pub fn no_quiet(&self) -> &Self {
        self.update(|s| s.quiet = false)
    }

    /// Mirror every record, without colors, to the file at `path`
    ///
    /// The file is opened in append mode and created with owner-only
    /// permissions, then replaces any previously attached file, which is
    /// closed. Either failure is logged at ERROR level: if the file cannot be
    /// opened the logger carries on with the previous file, if the previous
    /// file cannot be closed the new one is already in place.
    #[track_caller]
    pub fn with_log_file(&self, path: impl AsRef<Path>) -> &Self {
        let path = path.as_ref();
        let location = Location::caller();
        let sink = match FileSink::open(path) {
            Ok(sink) => sink,
            Err(err) => {
                let _ = self.output(
                    Severity::Error,
                    location,
                    format_args!(
                        "{}",
                        Values(&[&"could not open log file", &path.display(), &err])
                    ),
                );
                return self;
            }
        };

        let previous = self.file.lock().replace(sink);
        if let Some(previous) = previous {
            let previous_path = previous.path.clone();
            if let Err(err) = previous.close() {
                let _ = self.output(
                    Severity::Error,
                    location,
                    format_args!(
                        "{}",
                        Values(&[
                            &"could not close previous log file",
                            &previous_path.display(),
                            &err
                        ])
                    ),
                );
            }
        }
        self
    }

    /// Fallible counterpart of [`Logger::with_log_file`]
    ///
    /// An open failure leaves the previous file attached. A close failure of
    /// the previous file is returned after the new file was attached.
    pub fn attach_log_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let sink = FileSink::open(path.as_ref())?;
        let previous = self.file.lock().replace(sink);
        match previous {
            Some(previous) => previous.close(),
            None => Ok(()),
        }
    }

    pub fn is_colored(&self) -> bool {
        self.settings().color
    }

    pub fn is_debug(&self) -> bool {
        self.settings().debug
    }

    pub fn is_timestamp(&self) -> bool {
        self.settings().timestamp
    }

    pub fn is_quiet(&self) -> bool {
        self.settings().quiet
    }

    pub fn depth(&self) -> usize {
        self.settings().depth
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.file.lock().as_ref().map(|sink| sink.path.clone())
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        let settings = self.settings();
        LoggerConfig {
            color: Some(settings.color),
            debug: settings.debug,
            timestamp: settings.timestamp,
            quiet: settings.quiet,
            depth: settings.depth,
            log_file: self.log_file_path(),
        }
    }

    /// Flush the primary destination and close the log file
    ///
    /// The file is closed exactly once; later calls only flush the primary
    /// destination. Both steps are attempted even if the first fails.
    pub fn close(&self) -> Result<()> {
        let flushed = self.primary.write().out.flush();
        let closed = match self.file.lock().take() {
            Some(sink) => sink.close(),
            None => Ok(()),
        };
        flushed?;
        closed
    }

    /// Capture the parts of a record shared by both destinations
    ///
    /// Runs inside the `Logger` impl so the caller resolver treats it as a
    /// pipeline frame; combinators taking closures are avoided for the same
    /// reason.
    fn capture<'a>(
        prefix: &'static Prefix,
        settings: &Settings,
        location: &'static Location<'static>,
        message: &'a str,
    ) -> Record<'a> {
        let caller = if prefix.includes_caller_location {
            Some(caller::resolve(settings.depth, location))
        } else {
            None
        };

        // The dump starts one frame beyond a printed caller location
        let stack = if prefix.includes_call_stack {
            let skip = settings.depth + usize::from(prefix.includes_caller_location);
            caller::walk(skip, MAX_CALL_DEPTH)
        } else {
            Vec::new()
        };

        Record {
            prefix,
            timestamp: if settings.timestamp { Some(Local::now()) } else { None },
            caller,
            stack,
            message,
        }
    }

    /// Capture one record and write it to every configured destination
    fn output(
        &self,
        severity: Severity,
        location: &'static Location<'static>,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        let settings = self.settings();
        if settings.quiet {
            return Ok(());
        }

        let mut message = MESSAGE_SCRATCH.take();
        message.clear();
        // A failing Display impl leaves the message truncated
        let _ = fmt::Write::write_fmt(&mut message, args);

        let result = self.emit(&Self::capture(severity.prefix(), &settings, location, &message));
        MESSAGE_SCRATCH.set(message);
        result
    }

    /// Format `record` once per destination and write it
    ///
    /// Returns the first write error after both destinations were attempted.
    fn emit(&self, record: &Record<'_>) -> Result<()> {
        let mut primary = self.primary.write();
        let Primary { settings, out, buf } = &mut *primary;
        record.format_into(buf, settings.color);
        let written = out.write_all(buf.bytes());

        let mirrored = match self.file.lock().as_mut() {
            Some(sink) => {
                record.format_into(&mut sink.buf, false);
                sink.flush_record()
            }
            None => Ok(()),
        };

        written?;
        mirrored
    }

    /// Log at `severity` with a pre-built message
    ///
    /// DEBUG and TRACE are dropped unless debug output is on. FATAL exits
    /// the process after the write attempt.
    #[track_caller]
    pub fn logf(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<()> {
        if severity.is_debug_gated() && !self.is_debug() {
            return Ok(());
        }
        let result = self.output(severity, Location::caller(), args);
        if severity == Severity::Fatal {
            Self::exit_after(result);
        }
        result
    }

    fn exit_after(result: Result<()>) -> ! {
        if let Err(e) = result {
            eprintln!("[LOGGER ERROR] Failed to write fatal record: {}", e);
        }
        std::process::exit(1)
    }

    /// Log values at FATAL, then exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, values: &[&dyn fmt::Display]) -> ! {
        let result = self.output(
            Severity::Fatal,
            Location::caller(),
            format_args!("{}", Values(values)),
        );
        Self::exit_after(result)
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        let result = self.output(Severity::Fatal, Location::caller(), args);
        Self::exit_after(result)
    }

    #[track_caller]
    pub fn error(&self, values: &[&dyn fmt::Display]) -> Result<()> {
        self.output(Severity::Error, Location::caller(), format_args!("{}", Values(values)))
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.output(Severity::Error, Location::caller(), args)
    }

    #[track_caller]
    pub fn warn(&self, values: &[&dyn fmt::Display]) -> Result<()> {
        self.output(Severity::Warn, Location::caller(), format_args!("{}", Values(values)))
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.output(Severity::Warn, Location::caller(), args)
    }

    #[track_caller]
    pub fn info(&self, values: &[&dyn fmt::Display]) -> Result<()> {
        self.output(Severity::Info, Location::caller(), format_args!("{}", Values(values)))
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) -> Result<()> {
        self.output(Severity::Info, Location::caller(), args)
    }

    /// Log values at DEBUG; a no-op unless debug output is on
    #[track_caller]
    pub fn debug(&self, values: &[&dyn fmt::Display]) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }
        self.output(Severity::Debug, Location::caller(), format_args!("{}", Values(values)))
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }
        self.output(Severity::Debug, Location::caller(), args)
    }

    /// Log values at TRACE followed by a call-stack dump; a no-op unless
    /// debug output is on
    #[track_caller]
    pub fn trace(&self, values: &[&dyn fmt::Display]) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }
        self.output(Severity::Trace, Location::caller(), format_args!("{}", Values(values)))
    }

    #[track_caller]
    pub fn tracef(&self, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }
        self.output(Severity::Trace, Location::caller(), args)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close logger: {}", e);
        }
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use color_logger::{Logger, SharedBuffer};
///
/// let out = SharedBuffer::new();
/// let logger = Logger::builder(out.clone())
///     .color(false)
///     .timestamp(false)
///     .debug(true)
///     .build();
///
/// logger.debugf(format_args!("{} items", 3)).unwrap();
/// assert!(out.contents_string().starts_with("[DEBUG] "));
/// ```
pub struct LoggerBuilder {
    out: Box<dyn Destination>,
    config: LoggerConfig,
}

impl LoggerBuilder {
    pub fn new(out: impl Destination + 'static) -> Self {
        Self {
            out: Box::new(out),
            config: LoggerConfig::default(),
        }
    }

    /// Replace every setting with `config`
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Force color on or off instead of detecting a terminal
    #[must_use = "builder methods return a new value"]
    pub fn color(mut self, enabled: bool) -> Self {
        self.config.color = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, enabled: bool) -> Self {
        self.config.timestamp = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.config.quiet = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn depth(mut self, depth: usize) -> Self {
        self.config.depth = depth;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    /// Build the Logger
    ///
    /// A log file that cannot be opened is reported on the primary
    /// destination, as with [`Logger::with_log_file`].
    #[track_caller]
    pub fn build(self) -> Logger {
        let LoggerBuilder { out, config } = self;
        let color = config.color.unwrap_or_else(|| out.is_terminal());
        let logger = Logger {
            primary: RwLock::new(Primary {
                settings: Settings {
                    color,
                    debug: config.debug,
                    timestamp: config.timestamp,
                    quiet: config.quiet,
                    depth: config.depth,
                },
                out,
                buf: RecordBuffer::with_capacity(INITIAL_BUFFER_CAPACITY),
            }),
            file: Mutex::new(None),
        };
        if let Some(ref path) = config.log_file {
            logger.with_log_file(path);
        }
        logger
    }
}
