use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Log target for the freecam session core (controller, store, guard).
pub const LOG_FREECAM: &str = "freecam";
/// Log target for the console host that drives the core.
pub const LOG_HOST: &str = "freecam/host";
/// Log target for outbound camera packets.
pub const LOG_PROTOCOL: &str = "freecam/protocol";

/// Application infrastructure context.
///
/// Holds version info and the logging infrastructure. Every binary keeps one
/// of these alive for its whole runtime.
pub struct AppContext {
    pub version: &'static str,
    log_file: PathBuf,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Path of the log file written by this run.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "freecam";
}

/// Logging options handed to [`AppBuilder::new`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: LevelFilter,
    /// Directory for log files. `None` uses [`default_log_dir`].
    pub directory: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

/// Default level: chatty in debug builds, quiet in release builds.
pub fn default_level() -> LevelFilter {
    #[cfg(debug_assertions)]
    {
        LevelFilter::INFO
    }
    #[cfg(not(debug_assertions))]
    {
        LevelFilter::WARN
    }
}

/// Default log directory for an application.
///
/// Debug builds log into `<workspace>/.out/<studio>/<app>/logs`, release builds
/// into the platform's local data directory.
pub fn default_log_dir<A: Application>() -> PathBuf {
    #[cfg(debug_assertions)]
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(".out");
    #[cfg(not(debug_assertions))]
    let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);

    base.join(A::STUDIO).join(A::APP_ID).join("logs")
}

/// File name of a log file started now, e.g. `freecam_host_2026-10-16_12-30-01.log`.
pub fn log_file_name(app_id: &str) -> String {
    format!(
        "{}_{}.log",
        app_id,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Ensures the log directory exists
    /// - Initializes logging (file + console)
    pub fn new(version: &'static str, options: LogOptions) -> Result<Self, BoxError> {
        let log_dir = options
            .directory
            .unwrap_or_else(default_log_dir::<A>);
        fs::create_dir_all(&log_dir)?;

        let log_filename = log_file_name(A::APP_ID);
        let log_file = log_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let level = options.level;

        // Separate layer: file (non-blocking) + console (stdout)
        let file_layer = fmt::Layer::default()
            .with_target(true)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        let console_layer = fmt::Layer::default()
            .with_target(true)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        tracing::info!(
            target: LOG_HOST,
            "{} {} logging to {}",
            A::APP_ID,
            version,
            log_file.display()
        );

        Ok(Self {
            context: AppContext {
                version,
                log_file,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Build a simple application. Returns the `AppContext`.
    pub fn build(self) -> AppContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestApp;

    impl Application for TestApp {
        const APP_ID: &'static str = "freecam_test";
    }

    #[test]
    fn test_log_file_name_has_app_prefix() {
        let name = log_file_name("freecam_host");
        assert!(name.starts_with("freecam_host_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_default_log_dir_is_app_scoped() {
        let dir = default_log_dir::<TestApp>();
        assert!(dir.ends_with("freecam/freecam_test/logs"));
    }

    #[test]
    fn test_builder_creates_log_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("nested").join("logs");
        let ctx = AppBuilder::<TestApp>::new(
            "0.0.0",
            LogOptions {
                level: LevelFilter::DEBUG,
                directory: Some(dir.clone()),
            },
        )
        .expect("builder")
        .build();

        assert!(dir.is_dir());
        assert_eq!(ctx.log_file().parent(), Some(dir.as_path()));
        assert_eq!(ctx.version(), "0.0.0");
    }
}
