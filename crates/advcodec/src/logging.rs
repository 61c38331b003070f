use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Crates whose events follow `--log-level`.
const CODEC_TARGETS: [&str; 3] = ["advcodec", "advcodec_wire", "advcodec_profile"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Codec crates log at `level`; anything else is capped at `warn`.
pub fn targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    CODEC_TARGETS.iter().fold(
        Targets::new().with_default(level.min(LevelFilter::WARN)),
        |filter, target| filter.with_target(*target, level),
    )
}

/// Route events to stderr so stdout stays machine-readable.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = targets(level);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn codec_targets_follow_level() {
        let filter = targets(LogLevel::Debug);
        assert!(filter.would_enable("advcodec_wire", &Level::DEBUG));
        assert!(filter.would_enable("advcodec_profile::group", &Level::DEBUG));
        assert!(!filter.would_enable("advcodec_wire::codec", &Level::TRACE));
    }

    #[test]
    fn other_targets_capped_at_warn() {
        let filter = targets(LogLevel::Trace);
        assert!(filter.would_enable("some_dependency", &Level::WARN));
        assert!(!filter.would_enable("some_dependency", &Level::INFO));

        let quiet = targets(LogLevel::Error);
        assert!(!quiet.would_enable("some_dependency", &Level::WARN));
        assert!(!quiet.would_enable("advcodec_wire", &Level::WARN));
        assert!(quiet.would_enable("advcodec_wire", &Level::ERROR));
    }
}
