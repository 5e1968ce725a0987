use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity.
///
/// Setting a log level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages including debug output
///
/// The level can be set via the `LOG_LEVEL` environment variable or at runtime
/// using `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Rotates log files, keeping only the last 5 log files
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        Ok(false) | Err(_) => return Ok(()),
    }

    let modified = std::fs::metadata(log_file)?.modified()?;
    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));
    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with("log.") && name.ends_with(".txt") && name != "log.txt")
        })
        .collect();

    // Sorting by filename sorts by datetime
    log_files.sort();

    if log_files.len() > 5 {
        for file in &log_files[0..log_files.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    /// Only set when `LOG_DIR` is given
    log_file: Option<PathBuf>,
    disable_log: bool,
    enable_print_log: bool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let log_file = match std::env::var("LOG_DIR") {
            Ok(dir) if !dir.is_empty() => {
                let dir = PathBuf::from(dir);
                std::fs::create_dir_all(&dir)?;
                let log_file = dir.join("log.txt");

                // Rotate existing log file before creating a new one
                if let Err(e) = rotate_log_files(&log_file) {
                    eprintln!("Failed to rotate log files: {}", e);
                }
                Some(log_file)
            }
            _ => None,
        };

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        Ok(Logger {
            log_file,
            disable_log: env_flag("DISABLE_LOG"),
            // Without a log file, printing is the only output
            enable_print_log: env_flag("ENABLE_PRINT_LOG") || std::env::var("LOG_DIR").is_err(),
            level: Arc::new(Mutex::new(level)),
        })
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str, start_new: bool) -> Result<(), Box<dyn std::error::Error>> {
        if self.disable_log {
            return Ok(());
        }
        let Some(log_file) = &self.log_file else {
            return Ok(());
        };

        let mut file = if start_new {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(log_file)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?
        };

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        let log_line = format!("[{}] {}\n", timestamp, message);

        file.write_all(log_line.as_bytes())?;

        Ok(())
    }

    fn enabled(&self, level: Level) -> bool {
        self.level.lock().map(|current| *current >= level).unwrap_or(true)
    }

    fn log(&self, level: Level, msg: &str, start_new: bool) {
        if level == Level::Silent || !self.enabled(level) {
            return;
        }

        if self.enable_print_log && !self.disable_log {
            match level {
                Level::Error => tracing::error!("{}", msg),
                Level::Warn => tracing::warn!("{}", msg),
                Level::Info => tracing::info!("{}", msg),
                Level::Debug => tracing::debug!("{}", msg),
                Level::Silent => {}
            }
        }

        let formatted_msg = format!("{}: {}", level.as_str().to_uppercase(), msg);
        if let Err(e) = self.write_to_file(&formatted_msg, start_new) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn debug(&self, msg: &str, start_new: bool) {
        self.log(Level::Debug, msg, start_new);
    }

    pub fn info(&self, msg: &str, start_new: bool) {
        self.log(Level::Info, msg, start_new);
    }

    pub fn warn(&self, msg: &str, start_new: bool) {
        self.log(Level::Warn, msg, start_new);
    }

    pub fn error(&self, msg: &str, start_new: bool) {
        self.log(Level::Error, msg, start_new);
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the tracing subscriber once. Library diagnostics emitted with the
/// `tracing` macros go through it.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    init_tracing();

    let logger = LOGGER.get_or_init(|| match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            Logger {
                log_file: None,
                disable_log: true,
                enable_print_log: false,
                level: Arc::new(Mutex::new(Level::Info)),
            }
        }
    });

    f(logger)
}

pub fn info(msg: &str) {
    info_with_options(msg, false);
}

pub fn info_with_options(msg: &str, start_new: bool) {
    with_logger(|logger| logger.info(msg, start_new));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg, false));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg, false));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg, false));
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Set the log level from a string (case insensitive).
///
/// Returns false if the string is not a valid level.
pub fn set_log_level_str(level_str: &str) -> bool {
    match Level::from_str(level_str) {
        Some(level) => {
            set_log_level(level);
            true
        }
        None => false,
    }
}

/// Format a duration as HH:MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
