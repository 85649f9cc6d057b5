use clap::Parser;
use std::path::PathBuf;

use crate::models::{DuplicatePolicy, OutputFormat};

/// Path understood as "read from standard input".
pub const STDIN_SOURCE: &str = "-";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise half-hour traffic counts: totals, busiest intervals and the
/// quietest 90 minutes
#[derive(Parser, Debug, Clone)]
#[command(
    name = "traffic-monitor",
    about = "Summarise half-hour traffic counts",
    version
)]
pub struct Settings {
    /// Input file of `<timestamp> <count>` lines (`-` for stdin)
    #[arg(default_value = "traffic.txt")]
    pub input: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// How to treat a timestamp that appears more than once
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Overwrite)]
    pub duplicates: DuplicatePolicy,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (logs go to stderr otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `true` when the input should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_SOURCE
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::from_args(["traffic-monitor"]).unwrap();

        assert_eq!(settings.input, PathBuf::from("traffic.txt"));
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.duplicates, DuplicatePolicy::Overwrite);
        assert_eq!(settings.log_level, "WARNING");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.reads_stdin());
    }

    #[test]
    fn test_settings_cli_input_path() {
        let settings = Settings::from_args(["traffic-monitor", "/data/counts.txt"]).unwrap();
        assert_eq!(settings.input, PathBuf::from("/data/counts.txt"));
    }

    #[test]
    fn test_settings_cli_stdin() {
        let settings = Settings::from_args(["traffic-monitor", "-"]).unwrap();
        assert!(settings.reads_stdin());
    }

    #[test]
    fn test_settings_cli_json_format() {
        let settings = Settings::from_args(["traffic-monitor", "--format", "json"]).unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_settings_cli_reject_duplicates() {
        let settings =
            Settings::from_args(["traffic-monitor", "--duplicates", "reject"]).unwrap();
        assert_eq!(settings.duplicates, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_settings_cli_unknown_format_rejected() {
        assert!(Settings::from_args(["traffic-monitor", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_settings_cli_unknown_log_level_rejected() {
        assert!(Settings::from_args(["traffic-monitor", "--log-level", "TRACE"]).is_err());
    }

    #[test]
    fn test_settings_cli_log_file() {
        let settings =
            Settings::from_args(["traffic-monitor", "--log-file", "/tmp/traffic.log"]).unwrap();
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/traffic.log")));
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings =
            Settings::from_args(["traffic-monitor", "--log-level", "ERROR", "--debug"]).unwrap();
        assert_eq!(settings.log_level, "DEBUG");
    }
}
