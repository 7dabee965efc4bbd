//! Log output for programs that own the terminal.
//!
//! The chart draws on the whole screen, so log lines go to a file and, for
//! in-app display, to a small in-memory ring of recent lines.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use eyre::WrapErr;
use parking_lot::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::MakeWriter;

/// Lines kept by [`LogBuffer::default`].
pub const DEFAULT_CAPACITY: usize = 1_000;

/// Keeps the most recent formatted log lines.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    fn push(&self, line: &str) {
        let mut lines = self.lines.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line.to_string());
    }

    /// Stored lines, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

/// Collects one event's output and stores it when dropped.
pub struct LogBufferWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines().filter(|l| !l.is_empty()) {
            self.buffer.push(line);
        }
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// Installs a global subscriber writing to `path` (appending) and to the
/// returned buffer.
pub fn init_file_logging(path: impl AsRef<Path>, level: Level) -> eyre::Result<LogBuffer> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let buffer = LogBuffer::default();

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file).and(buffer.clone()))
        .with_ansi(false)
        .with_thread_names(true)
        .with_max_level(level)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to install log subscriber: {e}"))?;

    Ok(buffer)
}
