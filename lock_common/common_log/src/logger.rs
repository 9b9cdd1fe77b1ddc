use crate::config::{LogConfig, LoggerConfig};
use chrono::{DateTime, Local};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use std::env;
use std::path::{Path, PathBuf};

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const ROOT_APPENDER: &str = "root_appender";

pub struct Logger {
    handle: Handle,
}

impl Logger {
    pub fn new_from_yaml(config_path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = LogConfig::from_yaml(config_path)?;
        Self::new_from_config(config)
    }

    pub fn new_from_config(config: LogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let final_config = Self::build_config(&config, &log_output_dir())?;
        let handle = log4rs::init_config(final_config)?;
        Ok(Self { handle })
    }

    /// Single console appender on the root logger, for interactive tools.
    pub fn new_console(level: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let handle = log4rs::init_config(Self::console_config(level)?)?;
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn console_config(level: &str) -> Result<Config, Box<dyn std::error::Error>> {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("console", Box::new(stdout)))
            .build(Root::builder().appender("console").build(parse_level(level)))?;
        Ok(config)
    }

    /// Builds the log4rs configuration with every file placed under `base_dir`.
    pub(crate) fn build_config(config: &LogConfig, base_dir: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        let mut log4rs_config = Config::builder();

        // One appender per non-root logger, non-additive so lines are not duplicated into root
        for logger_config in config.loggers.iter().filter(|l| l.path_prefix != "root") {
            let appender = create_appender(logger_config, base_dir)?;
            let appender_name = format!("{}_appender", logger_config.path_prefix);
            log4rs_config = log4rs_config
                .appender(Appender::builder().build(&appender_name, Box::new(appender)));

            let logger = log4rs::config::Logger::builder()
                .appender(appender_name)
                .additive(false)
                .build(
                    logger_config.path_prefix.clone(),
                    parse_level(&logger_config.level),
                );
            log4rs_config = log4rs_config.logger(logger);
        }

        let root = match config.get_root_config() {
            Some(root_config) => {
                let root_appender = create_appender(root_config, base_dir)?;
                log4rs_config = log4rs_config
                    .appender(Appender::builder().build(ROOT_APPENDER, Box::new(root_appender)));
                Root::builder()
                    .appender(ROOT_APPENDER)
                    .build(parse_level(&root_config.level))
            }
            None => Root::builder().build(LevelFilter::Info),
        };
        Ok(log4rs_config.build(root)?)
    }
}

/// Base directory for log files, `LOG_OUTPUT_DIR` or the working directory.
fn log_output_dir() -> PathBuf {
    if let Ok(path) = dotenv::dotenv() {
        log::debug!("load .env file: {}", path.display());
    }
    env::var("LOG_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn create_appender(
    config: &LoggerConfig,
    base_dir: &Path,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let log_directory = base_dir.join(&config.log_directory);
    std::fs::create_dir_all(&log_directory)?;

    let now: DateTime<Local> = Local::now();
    let formatted_time = now.format("%Y%m%d%H%M%S%3f").to_string();

    let log_file = log_directory.join(&config.log_file_name);
    let archived_log_pattern = format!(
        "{}/{}-{{}}-{}.gz",
        log_directory.display(),
        config.log_file_name,
        formatted_time
    );

    let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
    let roller = FixedWindowRoller::builder().build(&archived_log_pattern, config.max_zip_count)?;
    let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file, Box::new(compound_policy))?;

    Ok(appender)
}

pub(crate) fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
