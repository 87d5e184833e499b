//! Build coordinator for the Ledgerly distributable.
//!
//! Runs the backend and frontend builds side by side, streams their output
//! through one printer that only prints a header when the source changes,
//! and publishes the frontend bundle to `.output/dist` once both succeed.
//!
//! # Modules
//!
//! - `config` - Steps, directories and the default command
//! - `source` - Output line sources and headers
//! - `grouping` - Header suppression for consecutive lines of one source
//! - `runner` - Concurrent supervision with cross-kill on failure
//! - `artifacts` - Replacing the output directory

pub mod artifacts;
pub mod config;
pub mod error;
pub mod grouping;
pub mod runner;
pub mod source;

pub use config::{BuildConfig, BuildStep};
pub use error::BuildError;
pub use runner::{BuildReport, StepOutcome, run};
