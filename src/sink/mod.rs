use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for finalized recognized text.
///
/// Exactly one session owns the sink at a time, so implementations do not
/// need internal locking. Each `append` must be independently durable:
/// text handed to the sink is observable on disk (or wherever the sink
/// points) once the call returns.
pub trait TranscriptSink: Send {
    fn append(&mut self, text: &str) -> io::Result<()>;
}

/// Appends one newline-terminated utterance per call to a text file.
/// Pre-existing content is preserved; the file is created if absent.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        info!("Transcript sink: {}", path.display());

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptSink for FileSink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }
}

/// Mutex-guarded shared sink, for callers that need to observe the sink
/// after handing it to a session. The base design runs one session at a
/// time, so contention is nil.
impl<S: TranscriptSink> TranscriptSink for std::sync::Arc<std::sync::Mutex<S>> {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "sink mutex poisoned"))?
            .append(text)
    }
}

/// Collects appended lines in memory. Test double for the coordinator's
/// ordering guarantees.
#[derive(Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl TranscriptSink for MemorySink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }
}
