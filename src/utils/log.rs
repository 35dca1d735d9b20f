use std::fs::{self, File};
use std::io::stderr;
use std::path::PathBuf;
use std::sync::{LazyLock, Mutex};

use chrono::Local;
use miette::{Context, IntoDiagnostic};
use tracing::level_filters::LevelFilter;
use tracing::{Level, info, warn};
use tracing_appender::non_blocking;
use tracing_subscriber::reload;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, reload::Handle, util::SubscriberInitExt,
};

pub trait LogHandle: Send + Sync {
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()>;
}

impl<S> LogHandle for Handle<EnvFilter, S>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    fn set_filter(&self, new_filter: EnvFilter) -> miette::Result<()> {
        self.modify(|current| *current = new_filter)
            .into_diagnostic()
    }
}

pub struct LogHandles {
    console_handle: Mutex<Box<dyn LogHandle>>,
    file_handle: Mutex<Box<dyn LogHandle>>,
    log_file: Option<PathBuf>,
}

/// `<tmp>/minimax_chess_logs`
pub fn log_dir() -> PathBuf {
    std::env::temp_dir().join("minimax_chess_logs")
}

fn open_log_file() -> std::io::Result<(PathBuf, File)> {
    let dir = log_dir();
    fs::create_dir_all(&dir)?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("minimax_chess_{timestamp}.log"));
    let file = File::create(&path)?;
    Ok((path, file))
}

static LOG_HANDLES: LazyLock<LogHandles> = LazyLock::new(|| {
    #[cfg(feature = "dev-tools")]
    color_backtrace::install();

    // Console Layer with its own reloadable filter
    let console_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let (console_filter, console_handle) = reload::Layer::new(console_filter);
    let console_layer = fmt::layer()
        .without_time()
        .with_writer(stderr)
        .with_filter(console_filter);

    // File Layer with its own reloadable filter (initially off)
    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .from_env_lossy();
    let (file_filter, file_handle) = reload::Layer::new(file_filter);

    // Console logging still works if the file can't be created
    let (log_file, file_layer) = match open_log_file() {
        Ok((path, file)) => {
            let (writer, guard) = non_blocking(file);
            std::mem::forget(guard); // Keep the guard alive.
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false) // No colors in file
                .with_filter(file_filter);
            (Some(path), Some(layer))
        }
        Err(e) => {
            eprintln!("File logging unavailable: {e}");
            (None, None)
        }
    };

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
    if let Err(e) = installed {
        eprintln!("Tracing subscriber already installed: {e}");
    }

    LogHandles {
        console_handle: Mutex::new(Box::new(console_handle)),
        file_handle: Mutex::new(Box::new(file_handle)),
        log_file,
    }
});

pub fn set_log_level(level: Level) -> miette::Result<()> {
    let new_filter = EnvFilter::new(level.to_string());

    LOG_HANDLES
        .console_handle
        .lock()
        .map_err(|e| miette::miette!("Log handle poisoned: {e}"))?
        .set_filter(new_filter)
        .with_context(|| format!("Failed to modify log filter to level: {level}"))
}

pub fn toggle_file_logging(enable: bool) -> miette::Result<()> {
    let new_filter = if enable {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("off")
    };

    let handles = &*LOG_HANDLES;
    match (&handles.log_file, enable) {
        (Some(path), true) => info!("Logging to {}", path.display()),
        (None, true) => warn!("File logging requested but no log file is open"),
        _ => {}
    }

    handles
        .file_handle
        .lock()
        .map_err(|e| miette::miette!("Log handle poisoned: {e}"))?
        .set_filter(new_filter)
        .context("Failed to modify log filter")
}

/// Path of this run's log file, if one could be created
pub fn log_file() -> Option<PathBuf> {
    LOG_HANDLES.log_file.clone()
}

/// Initialize tracing and backtrace. Safe to call more than once.
pub fn init() {
    LazyLock::force(&LOG_HANDLES);
}
