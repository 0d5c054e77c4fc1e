use thiserror_no_std::Error;

/// Everything that stops the harness from producing output
#[derive(Debug, Error, Eq, PartialEq)]
pub enum HarnessError {
    #[error("the input does not start with a test case count")]
    MissingCaseCount,
    #[error("{line:?} is not a valid test case count")]
    InvalidCaseCount { line: String },
    #[error("{value:?} is not a log level (expected one of off, error, warn, info, debug, trace)")]
    InvalidLogLevel { value: String },
    #[error("could not read {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("could not set up the allocator: {reason}")]
    Setup { reason: String },
    #[error("could not write output: {reason}")]
    Write { reason: String },
}
