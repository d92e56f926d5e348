//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes formatted lines to a
//! size-rotated set of files and keeps the most recent lines in memory.
//! Records emitted through the `log` facade are captured as well.

use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 5;
const DEFAULT_BUFFER_LINES: usize = 500;

static SINK: OnceLock<LogSink> = OnceLock::new();

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
    Subscriber(String),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
            LoggerError::Subscriber(msg) => write!(f, "Failed to install subscriber: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory holding the log files
    pub dir: PathBuf,
    /// File stem, e.g. "ShoppingList" -> ShoppingList.log
    pub app_name: String,
    /// Rotate once the active file would grow past this size
    pub max_file_bytes: u64,
    /// Active file plus rotated files kept on disk
    pub max_files: usize,
    /// Lines kept in the in-memory ring
    pub buffer_lines: usize,
    pub max_level: tracing::Level,
}

impl LoggerConfig {
    pub fn new(dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            max_level: tracing::Level::INFO,
        }
    }
}

// ========================
// Rotating file
// ========================

/// Size-rotated log file: `<app>.log`, `<app>.1.log`, ... `<app>.<max_files-1>.log`
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    max_file_bytes: u64,
    max_files: usize,
    file: Option<File>,
    written: u64,
}

impl RollingFile {
    pub fn open(config: &LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.dir)?;
        let mut rolling = Self {
            dir: config.dir.clone(),
            app_name: config.app_name.clone(),
            max_file_bytes: config.max_file_bytes.max(1),
            max_files: config.max_files.max(1),
            file: None,
            written: 0,
        };
        let path = rolling.current_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        rolling.written = file.metadata()?.len();
        rolling.file = Some(file);
        Ok(rolling)
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    fn rotated_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.app_name, n))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;

        if self.max_files > 1 {
            let oldest = self.rotated_path(self.max_files - 1);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for n in (1..self.max_files - 1).rev() {
                let from = self.rotated_path(n);
                if from.exists() {
                    fs::rename(&from, self.rotated_path(n + 1))?;
                }
            }
            fs::rename(self.current_path(), self.rotated_path(1))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.current_path())?;
        self.file = Some(file);
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_file_bytes {
            self.rotate()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file closed"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

// ========================
// Circular line buffer
// ========================

/// Fixed-capacity ring of the most recent log lines
pub struct LineBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Up to `n` most recent lines, oldest first
    pub fn recent(&self, n: usize) -> Vec<String> {
        let lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ========================
// Subscriber plumbing
// ========================

/// Shared destination for formatted records: rotating file + line ring
#[derive(Clone)]
pub struct LogSink {
    file: Arc<Mutex<RollingFile>>,
    buffer: Arc<LineBuffer>,
}

impl LogSink {
    pub fn new(config: &LoggerConfig) -> io::Result<Self> {
        Ok(Self {
            file: Arc::new(Mutex::new(RollingFile::open(config)?)),
            buffer: Arc::new(LineBuffer::new(config.buffer_lines)),
        })
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.file.lock().ok().map(|f| f.current_path())
    }
}

/// Per-record writer handed out to the fmt layer
pub struct SinkWriter {
    sink: LogSink,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = self
                .sink
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_all(buf)?;
        }
        for line in String::from_utf8_lossy(buf).lines() {
            if !line.trim().is_empty() {
                self.sink.buffer.push(line.trim_end().to_string());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter { sink: self.clone() }
    }
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger with default rotation settings
pub fn init_logger(dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_with(LoggerConfig::new(dir.as_ref(), app_name))
}

/// Initialize the global logger
pub fn init_with(config: LoggerConfig) -> Result<(), LoggerError> {
    if SINK.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let sink = LogSink::new(&config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(sink.clone())
                .with_ansi(false)
                .with_timer(LocalTime)
                .with_target(true),
        )
        .with(LevelFilter::from_level(config.max_level))
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    SINK.set(sink).map_err(|_| LoggerError::AlreadyInitialized)?;
    tracing::info!(app = %config.app_name, dir = %config.dir.display(), "rolling logger started");
    Ok(())
}

pub fn is_initialized() -> bool {
    SINK.get().is_some()
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    if !is_initialized() {
        return Err(LoggerError::NotInitialized);
    }
    log::info!(target: "rolling_logger", "{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    if !is_initialized() {
        return Err(LoggerError::NotInitialized);
    }
    log::error!(target: "rolling_logger", "{}", msg);
    Ok(())
}

/// Most recent formatted lines, oldest first. Empty before initialization.
pub fn recent_lines(n: usize) -> Vec<String> {
    SINK.get().map(|s| s.buffer().recent(n)).unwrap_or_default()
}

/// Path of the active log file, if initialized
pub fn current_log_file() -> Option<PathBuf> {
    SINK.get().and_then(|s| s.current_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(dir: &Path) -> LoggerConfig {
        LoggerConfig {
            max_file_bytes: 32,
            max_files: 3,
            buffer_lines: 4,
            ..LoggerConfig::new(dir, "test")
        }
    }

    #[test]
    fn test_line_buffer_evicts_oldest() {
        let buffer = LineBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.recent(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.recent(1), vec!["line 4"]);
    }

    #[test]
    fn test_zero_capacity_buffer_stays_empty() {
        let buffer = LineBuffer::new(0);
        buffer.push("dropped".to_string());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_rolling_file_rotates_and_bounds_file_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let mut file = RollingFile::open(&config).unwrap();

        for i in 0..10 {
            file.write_all(format!("record number {:02}\n", i).as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert!(dir.path().join("test.log").exists());
        assert!(dir.path().join("test.1.log").exists());
        assert!(dir.path().join("test.2.log").exists());
        assert!(!dir.path().join("test.3.log").exists());

        let current = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert!(current.contains("record number 09"));
        let previous = fs::read_to_string(dir.path().join("test.1.log")).unwrap();
        assert!(previous.contains("record number 08"));
    }

    #[test]
    fn test_rolling_file_appends_to_existing() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig::new(dir.path(), "append");
        {
            let mut file = RollingFile::open(&config).unwrap();
            file.write_all(b"first\n").unwrap();
        }
        let mut file = RollingFile::open(&config).unwrap();
        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("append.log")).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_sink_writer_feeds_file_and_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(&LoggerConfig::new(dir.path(), "sink")).unwrap();
        let mut writer = sink.make_writer();
        writer.write_all(b"alpha\nbeta\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(sink.buffer().recent(5), vec!["alpha", "beta"]);
        let content = fs::read_to_string(sink.current_path().unwrap()).unwrap();
        assert_eq!(content, "alpha\nbeta\n");
    }

    #[test]
    fn test_global_init_captures_log_records() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(info("too early"), Err(LoggerError::NotInitialized)));

        init_logger(dir.path(), "global").unwrap();
        assert!(is_initialized());
        assert!(matches!(
            init_logger(dir.path(), "global"),
            Err(LoggerError::AlreadyInitialized)
        ));

        info("hello from log facade").unwrap();
        error("something failed").unwrap();

        let lines = recent_lines(10);
        assert!(lines.iter().any(|l| l.contains("hello from log facade")));
        assert!(lines.iter().any(|l| l.contains("something failed") && l.contains("ERROR")));
        assert_eq!(current_log_file(), Some(dir.path().join("global.log")));
    }
}
