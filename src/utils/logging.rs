use crate::error::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level is `warn`, or
/// `debug` when `verbose` is on. Logs go to stderr unless `log_file` is given.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    // A subscriber may already be installed (tests, embedding binaries).
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_line_number(verbose)
        .try_init();

    Ok(())
}
