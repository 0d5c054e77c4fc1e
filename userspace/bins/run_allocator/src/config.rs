//! The effective harness configuration, merged from command line arguments, an optional manifest and defaults.

use crate::args::{parse_log_level, HarnessArgs};
use crate::error::HarnessError;
use crate::manifest::HarnessManifest;
use log::LevelFilter;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the request script is read from
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Read the complete script into memory.
    pub fn read(&self) -> Result<String, HarnessError> {
        match self {
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| HarnessError::Read {
                        path: "<stdin>".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(buf)
            }
            InputSource::File(path) => read_file(path),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Config {
    pub log_level: LevelFilter,
    pub input: InputSource,
}

impl Config {
    pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

    /// Merge arguments and manifest; arguments take precedence over the manifest.
    pub fn resolve(args: &HarnessArgs, manifest_src: Option<&str>) -> Result<Self, HarnessError> {
        let manifest = manifest_src.map(HarnessManifest::from);

        let log_level = match (
            args.log_level,
            manifest
                .as_ref()
                .and_then(|m| m.logging())
                .and_then(|logging| logging.level()),
        ) {
            (Some(level), _) => level,
            (None, Some(level)) => parse_log_level(level)?,
            (None, None) => Self::DEFAULT_LOG_LEVEL,
        };

        let input = match (
            &args.input,
            manifest
                .as_ref()
                .and_then(|m| m.input())
                .and_then(|input| input.path()),
        ) {
            (Some(path), _) => InputSource::File(path.clone()),
            (None, Some(path)) => InputSource::File(PathBuf::from(path)),
            (None, None) => {
                log::info!("no input= argument or manifest input given; reading requests from stdin");
                InputSource::Stdin
            }
        };

        Ok(Self { log_level, input })
    }
}

pub fn read_file(path: &Path) -> Result<String, HarnessError> {
    std::fs::read_to_string(path).map_err(|e| HarnessError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const MANIFEST: &str = "
[logging]
level=trace

[input]
path=from_manifest.txt
";

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&HarnessArgs::default(), None).unwrap();
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.input, InputSource::Stdin);
    }

    #[test]
    fn test_manifest_values() {
        let config = Config::resolve(&HarnessArgs::default(), Some(MANIFEST)).unwrap();
        assert_eq!(config.log_level, LevelFilter::Trace);
        assert_eq!(
            config.input,
            InputSource::File(PathBuf::from("from_manifest.txt"))
        );
    }

    #[test]
    fn test_args_override_manifest() {
        let args = HarnessArgs {
            log_level: Some(LevelFilter::Error),
            input: Some(PathBuf::from("from_args.txt")),
            manifest: None,
        };
        let config = Config::resolve(&args, Some(MANIFEST)).unwrap();
        assert_eq!(config.log_level, LevelFilter::Error);
        assert_eq!(config.input, InputSource::File(PathBuf::from("from_args.txt")));
    }

    #[test]
    fn test_invalid_manifest_level() {
        let err = Config::resolve(&HarnessArgs::default(), Some("[logging]\nlevel=chatty\n"))
            .unwrap_err();
        assert_eq!(
            err,
            HarnessError::InvalidLogLevel {
                value: "chatty".to_string()
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_file(Path::new("/nonexistent/run_allocator/input.txt")).unwrap_err();
        assert!(matches!(err, HarnessError::Read { .. }));
    }
}
