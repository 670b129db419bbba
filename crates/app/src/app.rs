use chrono::{DateTime, Local};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Holds version info and the logging infrastructure. Keep it alive for the
/// whole run of the program.
pub struct AppContext {
    app_id: &'static str,
    version: &'static str,
    log_file: PathBuf,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.app_id
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "chicken105";
    const PROJECT_ID: &'static str = "style_switch";
}

/// Builder for application bootstrap (log directory + tracing subscriber).
pub struct AppBuilder<A: Application> {
    version: &'static str,
    log_root: Option<PathBuf>,
    level: LevelFilter,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Self {
        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;

        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        Self {
            version,
            log_root: None,
            level,
            _marker: PhantomData,
        }
    }

    /// Write log files below `root` instead of the platform directory.
    pub fn with_log_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.log_root = Some(root.into());
        self
    }

    pub fn with_max_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn max_level(&self) -> LevelFilter {
        self.level
    }

    /// Directory the log file will be written to.
    pub fn log_dir(&self) -> PathBuf {
        let root = self.log_root.clone().unwrap_or_else(default_log_root);
        root.join(A::STUDIO)
            .join(A::PROJECT_ID)
            .join(A::APP_ID)
            .join("logs")
    }

    /// Create the log directory and install the global subscriber
    /// (file + console).
    pub fn build(self) -> Result<AppContext, BoxError> {
        let log_dir = self.log_dir();
        std::fs::create_dir_all(&log_dir)?;

        let log_filename = log_file_name(A::APP_ID, Local::now());
        let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let level = self.level;

        // Separate layer: file (non-blocking) + console (stdout)
        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        Ok(AppContext {
            app_id: A::APP_ID,
            version: self.version,
            log_file: log_dir.join(log_filename),
            _log_guard: guard,
        })
    }
}

fn default_log_root() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".out")
    }
    #[cfg(not(debug_assertions))]
    {
        dirs::data_local_dir().unwrap_or_else(std::env::temp_dir)
    }
}

/// Timestamped log file name, e.g. `switch_demo_2025-01-31_12-00-00.log`.
pub fn log_file_name(app_id: &str, now: DateTime<Local>) -> String {
    format!("{app_id}_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}
