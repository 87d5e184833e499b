//! Build coordinator errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A step has no program to run.
    #[error("Step '{0}' has an empty command")]
    EmptyCommand(String),

    /// A step's process could not be started.
    #[error("Failed to start {label}: {source}")]
    Spawn {
        /// Step label.
        label: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// At least one step exited unsuccessfully.
    #[error("Build failed: {}", .failed.join(", "))]
    StepsFailed {
        /// Labels of the failed steps, in configuration order.
        failed: Vec<String>,
    },

    /// A filesystem operation on the output failed.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Filesystem {
        /// What was being done.
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Walking the artifact directory failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Writing console output failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl BuildError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem {
            action,
            path,
            source,
        }
    }
}
