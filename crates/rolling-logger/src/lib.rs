//! Rolling File Logger
//!
//! Installs a `tracing` subscriber that writes to size-rolled log files and
//! keeps the most recent lines in a circular buffer for in-app viewing.
//! Records emitted through the `log` facade are captured by the subscriber's
//! log bridge, so callers may use either API.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Rolling and buffering limits
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Roll to a new file once the current one would exceed this size
    pub max_file_bytes: u64,
    /// Number of log files kept on disk (oldest removed first)
    pub max_files: usize,
    /// Capacity of the in-memory line buffer
    pub buffer_lines: usize,
    /// Minimum level written
    pub level: log::LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            level: log::LevelFilter::Info,
        }
    }
}

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Initialize the global logger with default limits
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

/// Initialize the global logger
///
/// Fails if a logger (or any other global `tracing` subscriber) is already
/// installed.
pub fn init_logger_with(log_dir: PathBuf, app_name: &str, config: LoggerConfig) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Err("Logger already initialized".to_string());
    }

    let level = to_tracing_level(config.level);
    let writer = RollingWriter::open(log_dir, app_name, config)
        .map_err(|e| format!("Failed to open log directory: {}", e))?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    let _ = LOGGER.set(writer);
    Ok(())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|w| w.recent_lines()).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    Ok(())
}

fn to_tracing_level(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

/// Size-rolled file sink with a circular line buffer
///
/// Cheap to clone; all clones share the same file and buffer.
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingState>>,
}

struct RollingState {
    dir: PathBuf,
    app_name: String,
    config: LoggerConfig,
    file: Option<File>,
    written: u64,
    sequence: u32,
    ring: VecDeque<String>,
    pending: String,
}

impl RollingWriter {
    pub fn open(dir: impl Into<PathBuf>, app_name: &str, config: LoggerConfig) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let state = RollingState {
            dir,
            app_name: app_name.to_string(),
            ring: VecDeque::with_capacity(config.buffer_lines),
            config,
            file: None,
            written: 0,
            sequence: 0,
            pending: String::new(),
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
        })
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(state) => state.ring.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Log files currently on disk, oldest first
    pub fn log_files(&self) -> io::Result<Vec<PathBuf>> {
        let state = self.lock()?;
        list_log_files(&state.dir, &state.app_name)
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        self.lock()?.append(buf)
    }

    fn flush(&self) -> io::Result<()> {
        let mut state = self.lock()?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, RollingState>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "logger state poisoned"))
    }
}

impl RollingState {
    fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        let would_overflow = self.written > 0
            && self.written + buf.len() as u64 > self.config.max_file_bytes;
        if self.file.is_none() || would_overflow {
            self.roll()?;
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        self.written += buf.len() as u64;
        self.buffer(buf);
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        self.sequence += 1;
        let name = format!(
            "{}.{}-{:06}.log",
            self.app_name,
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            self.sequence
        );
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(name))?;

        self.file = Some(file);
        self.written = 0;
        self.prune()
    }

    fn prune(&self) -> io::Result<()> {
        let mut files = list_log_files(&self.dir, &self.app_name)?;
        let keep = self.config.max_files.max(1);
        while files.len() > keep {
            let oldest = files.remove(0);
            fs::remove_file(oldest)?;
        }
        Ok(())
    }

    fn buffer(&mut self, buf: &[u8]) {
        if self.config.buffer_lines == 0 {
            return;
        }
        self.pending.push_str(&String::from_utf8_lossy(buf));

        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
            if self.ring.len() == self.config.buffer_lines {
                self.ring.pop_front();
            }
            self.ring.push_back(line);
        }
    }
}

fn list_log_files(dir: &Path, app_name: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", app_name);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();
    files.sort_by_cached_key(|path| roll_order(path, &prefix));
    Ok(files)
}

/// Order by timestamp, then by the numeric roll sequence
///
/// Comparing names alone breaks once a sequence outgrows its zero padding.
fn roll_order(path: &Path, prefix: &str) -> (String, u64) {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix(prefix))
        .and_then(|n| n.strip_suffix(".log"))
        .unwrap_or_default();
    match stem.rsplit_once('-') {
        Some((stamp, seq)) => match seq.parse() {
            Ok(seq) => (stamp.to_string(), seq),
            Err(_) => (stem.to_string(), 0),
        },
        None => (stem.to_string(), 0),
    }
}

/// Per-event handle handed to the fmt layer
pub struct RollingHandle {
    writer: RollingWriter,
}

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle {
            writer: self.clone(),
        }
    }
}
