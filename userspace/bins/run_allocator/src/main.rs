//! Replays allocation request scripts against a [`SentinelAllocator`](sentinel_alloc::SentinelAllocator)
//!
//! For every test case in the script, a fresh allocator with a 1000 byte arena is created, the requests are applied
//! and the header sentinels of the resulting blocks are printed on one line of stdout.
//! Diagnostics go to stderr.
//!
//! ```text
//! $ printf '1\n\n2\n3\n-1\n' | run_allocator log_level=info
//! 16 -24 936
//! ```

mod args;
mod config;
mod error;
mod logging;
mod manifest;
mod requests;
mod runner;

use crate::args::HarnessArgs;
use crate::config::{read_file, Config};
use crate::error::HarnessError;
use crate::logging::HarnessLogger;
use log::Level;
use std::process::ExitCode;

static LOGGER: HarnessLogger = HarnessLogger::new(Level::Warn);

fn main() -> ExitCode {
    LOGGER.install().expect("Could not install logger");

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), HarnessError> {
    let args = HarnessArgs::from_args(std::env::args().skip(1))?;
    let manifest_src = args.manifest.as_deref().map(read_file).transpose()?;
    let config = Config::resolve(&args, manifest_src.as_deref())?;
    LOGGER.update_log_level(config.log_level);
    log::debug!("using {:?}", config);

    let script = config.input.read()?;
    runner::run(&script, &mut std::io::stdout().lock())
}
