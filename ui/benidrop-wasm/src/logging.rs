//! Browser console logging for `tracing`.
//!
//! A `tracing-subscriber` fmt layer whose writer buffers one formatted event
//! and hands it to the matching `console.*` method when dropped. No timer:
//! `SystemTime` is not available on `wasm32-unknown-unknown`.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::DEFAULT_LOG_FILTER;

pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf).trim_end().to_owned();
        if self.level == Level::ERROR {
            gloo_console::error!(line);
        } else if self.level == Level::WARN {
            gloo_console::warn!(line);
        } else if self.level == Level::INFO {
            gloo_console::info!(line);
        } else {
            gloo_console::debug!(line);
        }
    }
}

pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        gloo_console::warn!(format!(
            "invalid log filter {:?} ({}); using {:?}",
            directive, e, DEFAULT_LOG_FILTER
        ));
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(MakeConsoleWriter)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
