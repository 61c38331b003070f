mod cmd;
mod exit;
mod logging;
mod output;

use advcodec_profile::{GroupConfig, SensorGroup};
use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "advcodec", version, about = "Advertising payload codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Group for sensors whose name matches no keyword.
    #[arg(
        long,
        value_name = "GROUP",
        env = "ADVCODEC_UNMATCHED_GROUP",
        default_value = "environmental",
        global = true
    )]
    unmatched_group: SensorGroup,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = GroupConfig {
        unmatched: cli.unmatched_group,
    };
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from([
            "advcodec",
            "decode",
            "01 10 57 09 29",
            "--profile",
            "Environmental Sensing",
        ])
        .expect("decode args should parse");

        assert!(matches!(cli.command, Command::Decode(_)));
        assert_eq!(cli.unmatched_group, SensorGroup::Environmental);
    }

    #[test]
    fn rejects_conflicting_selectors() {
        let err = Cli::try_parse_from([
            "advcodec",
            "decode",
            "0110",
            "--profile",
            "Motion_Sensors",
            "--group",
            "motion",
        ])
        .expect_err("conflicting selectors should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_unmatched_group() {
        let cli = Cli::try_parse_from([
            "advcodec",
            "--unmatched-group",
            "unknown",
            "classify",
            "mystery_probe",
        ])
        .expect("classify args should parse");

        assert_eq!(cli.unmatched_group, SensorGroup::Unknown);
        assert!(matches!(cli.command, Command::Classify(_)));
    }

    #[test]
    fn rejects_unknown_group() {
        let err = Cli::try_parse_from(["advcodec", "profiles", "--group", "weather"])
            .expect_err("unknown group should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn encode_requires_values() {
        let err = Cli::try_parse_from(["advcodec", "encode", "--group", "motion"])
            .expect_err("encode without values should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
