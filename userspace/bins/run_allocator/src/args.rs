//! Command line argument handling
//!
//! The harness takes its arguments as `key=value` pairs in any order:
//!
//! - `log_level=<off|error|warn|info|debug|trace>` sets how verbose the log output on stderr is.
//! - `input=<path>` reads the request script from a file instead of stdin.
//! - `manifest=<path>` loads defaults for the other settings from an ini manifest.

use crate::error::HarnessError;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

/// Arguments given to the harness packed into a struct
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct HarnessArgs {
    /// Maximum level of log messages that are written to stderr.
    pub log_level: Option<LevelFilter>,

    /// File from which the request script is read.
    pub input: Option<PathBuf>,

    /// Ini manifest which supplies values that are not given on the command line.
    pub manifest: Option<PathBuf>,
}

impl HarnessArgs {
    /// Parse a semantic `HarnessArgs` struct from an iterator over raw arguments
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self, HarnessError> {
        log::trace!("parsing command line arguments");

        let mut result = Self::default();
        for arg in args {
            if let Some(level) = arg.strip_prefix("log_level=") {
                result.log_level = Some(parse_log_level(level)?);
            } else if let Some(path) = arg.strip_prefix("input=") {
                result.input = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("manifest=") {
                result.manifest = Some(PathBuf::from(path));
            } else {
                log::warn!("ignoring unknown argument {:?}", arg);
            }
        }

        Ok(result)
    }
}

/// Parse a log level name like `debug` case-insensitively
pub fn parse_log_level(value: &str) -> Result<LevelFilter, HarnessError> {
    LevelFilter::from_str(value.trim()).map_err(|_| HarnessError::InvalidLogLevel {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            HarnessArgs::from_args(args(&[])).unwrap(),
            HarnessArgs::default()
        );
    }

    #[test]
    fn test_all_args() {
        let parsed = HarnessArgs::from_args(args(&[
            "manifest=harness.ini",
            "log_level=DEBUG",
            "input=cases.txt",
        ]))
        .unwrap();

        assert_eq!(parsed.log_level, Some(LevelFilter::Debug));
        assert_eq!(parsed.input, Some(PathBuf::from("cases.txt")));
        assert_eq!(parsed.manifest, Some(PathBuf::from("harness.ini")));
    }

    #[test]
    fn test_unknown_args_are_ignored() {
        let parsed = HarnessArgs::from_args(args(&["--verbose", "input=a.txt"])).unwrap();
        assert_eq!(parsed.input, Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn test_invalid_log_level() {
        assert_eq!(
            HarnessArgs::from_args(args(&["log_level=loud"])).unwrap_err(),
            HarnessError::InvalidLogLevel {
                value: "loud".to_string()
            }
        );
    }
}
