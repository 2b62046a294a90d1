//! Output sinks shared by loggers.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Where a logger writes its records.
///
/// Cloning is cheap and every clone targets the same underlying stream.
/// A record is always handed over with a single `write_all` while the stream
/// lock is held, so records written from different threads never interleave
/// within a line.
#[derive(Clone)]
pub struct LogWriter {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
    is_stderr: bool,
}

impl LogWriter {
    /// Wrap any writable stream.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
            is_stderr: false,
        }
    }

    /// Standard error (the default sink).
    pub fn stderr() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(io::stderr()))),
            is_stderr: true,
        }
    }

    /// Standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Whether this sink is the process's standard error.
    pub(crate) const fn is_stderr(&self) -> bool {
        self.is_stderr
    }

    /// Write one encoded record. Failures are dropped: logging must never be
    /// the reason an application fails.
    pub(crate) fn write_record(&self, line: &[u8]) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = guard.write_all(line);
        let _ = guard.flush();
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogWriter")
            .field("stderr", &self.is_stderr)
            .finish_non_exhaustive()
    }
}

impl From<SharedBuffer> for LogWriter {
    fn from(buffer: SharedBuffer) -> Self {
        Self::new(buffer)
    }
}

/// In-memory sink whose clones all append to the same buffer.
///
/// Handy for capturing output:
///
/// ```
/// use cartolog::{Logger, SharedBuffer};
///
/// let buf = SharedBuffer::new();
/// Logger::new(buf.clone()).info().msg("hello");
/// assert!(buf.contents().contains("hello"));
/// ```
#[derive(Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let guard = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }

    /// Non-empty lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer").finish_non_exhaustive()
    }
}
