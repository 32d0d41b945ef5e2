use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Log targets muted below TRACE. Matching is by prefix, so none of these may
/// be a prefix of a workspace crate's target.
const FILTERED_MODULES: &[&str] = &["hyper", "h2", "reqwest", "rustls", "tower", "axum"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// Fails if a global logger has already been installed; the caller decides
    /// whether to carry on without one.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        simplelog::TermLogger::init(
            config.log_level_filter,
            Self::build_log_config(config.log_level_filter),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    /// Lists the targets muted at `level`. Everything is shown at TRACE.
    fn muted_targets(level: LevelFilter) -> &'static [&'static str] {
        match level {
            LevelFilter::Trace => &[],
            _ => FILTERED_MODULES,
        }
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        for module in Self::muted_targets(level) {
            builder.add_filter_ignore_str(module);
        }
        builder.build()
    }
}
