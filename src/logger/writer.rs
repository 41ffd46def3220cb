//! Plain file writer for the logger

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;

/// Shared handle to the log file. Each event locks the file for the
/// duration of one formatted record, so lines never interleave.
#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<Mutex<LineWriter<File>>>,
}

impl LogFileWriter {
    /// Open the configured file, creating parent directories as needed.
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;

        Ok(Self {
            file: Arc::new(Mutex::new(LineWriter::new(file))),
        })
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A poisoned lock only means another thread panicked mid-write
        let file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        LogFileGuard { file }
    }
}

pub struct LogFileGuard<'a> {
    file: MutexGuard<'a, LineWriter<File>>,
}

impl Write for LogFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
}
