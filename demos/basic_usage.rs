//! Basic logger usage example
//!
//! Demonstrates console logging at every severity, caller locations, and
//! mirroring to a plain-text log file.
//!
//! Run with: cargo run --example basic_usage

use color_logger::prelude::*;
use color_logger::{error, info};

fn handle_request(logger: &Logger, id: u32) -> Result<()> {
    info!(logger, "handling request {}", id)?;
    if id % 2 == 1 {
        error!(logger, "request {} failed validation", id)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    println!("=== Color Logger - Basic Usage Example ===\n");

    let logger = Logger::stdout();

    println!("1. Logging at different severities:");
    logger.info(&[&"This is an info message"])?;
    logger.warn(&[&"This is a warning message"])?;
    logger.error(&[&"This is an error message with code", &500])?;
    logger.debug(&[&"Debug output is off, so this is hidden"])?;

    println!("\n2. Debug and trace output:");
    logger.with_debug();
    logger.debugf(format_args!("{} workers ready", 4))?;
    logger.trace(&[&"Where did this come from?"])?;

    println!("\n3. Mirroring to a log file:");
    let log_path = std::env::temp_dir().join("color_logger_demo.log");
    logger.without_debug().with_log_file(&log_path);
    for id in 0..3 {
        handle_request(&logger, id)?;
    }
    logger.close()?;
    println!("   Plain copy written to {}", log_path.display());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
