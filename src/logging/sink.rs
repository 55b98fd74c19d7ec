// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output sinks for rendered log lines

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for rendered log lines
///
/// Each call to [`write_line`](LogSink::write_line) receives one complete
/// record, terminator included.
pub trait LogSink: Send {
    /// Write one rendered record
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Sinks that can push buffered output further down (stdio buffers,
    /// page cache) expose it here. Checked after every write.
    fn as_flushable(&mut self) -> Option<&mut dyn Flushable> {
        None
    }
}

/// Explicit flush capability of a sink
pub trait Flushable {
    fn flush_now(&mut self) -> io::Result<()>;
}

/// Standard error sink
pub struct StderrSink {
    stderr: io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            stderr: io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StderrSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.stderr.write_all(line)
    }

    fn as_flushable(&mut self) -> Option<&mut dyn Flushable> {
        Some(self)
    }
}

impl Flushable for StderrSink {
    fn flush_now(&mut self) -> io::Result<()> {
        self.stderr.flush()
    }
}

/// Standard output sink
pub struct StdoutSink {
    stdout: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.stdout.write_all(line)
    }

    fn as_flushable(&mut self) -> Option<&mut dyn Flushable> {
        Some(self)
    }
}

impl Flushable for StdoutSink {
    fn flush_now(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Append-only file sink; every record is synced to disk
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.write_all(line)
    }

    fn as_flushable(&mut self) -> Option<&mut dyn Flushable> {
        Some(self)
    }
}

impl Flushable for FileSink {
    fn flush_now(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }
}

/// Sink that forwards every record to each of its members in order
///
/// A write error from one member stops the fan-out and is returned.
pub struct TeeSink {
    sinks: Vec<Box<dyn LogSink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Box<dyn LogSink>>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for TeeSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.write_line(line)?;
        }
        Ok(())
    }

    fn as_flushable(&mut self) -> Option<&mut dyn Flushable> {
        Some(self)
    }
}

impl Flushable for TeeSink {
    /// Flush every member that can be flushed; report the first failure
    fn flush_now(&mut self) -> io::Result<()> {
        let mut result = Ok(());
        for sink in &mut self.sinks {
            if let Some(flushable) = sink.as_flushable() {
                if let Err(e) = flushable.flush_now() {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
            }
        }
        result
    }
}

/// In-memory sink that keeps each record as a separate chunk
///
/// Clones share the same storage, so a test can hand one clone to a
/// [`Context`](super::Context) and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySink {
    chunks: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written so far, one chunk per write
    pub fn chunks(&self) -> Vec<Vec<u8>> {
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records decoded as UTF-8 (lossy)
    pub fn lines(&self) -> Vec<String> {
        self.chunks()
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    }

    /// Concatenation of every record
    pub fn contents(&self) -> String {
        self.lines().concat()
    }

    pub fn len(&self) -> usize {
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_vec());
        Ok(())
    }
}
