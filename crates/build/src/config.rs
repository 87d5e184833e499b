//! What to build and where.

use std::path::{Path, PathBuf};

use crate::BuildError;

/// Directory holding the backend project.
pub const BACKEND_DIR: &str = "backend";

/// Directory holding the frontend project.
pub const FRONTEND_DIR: &str = "frontend";

/// Directory the distributable is published to.
pub const OUTPUT_DIR: &str = ".output";

/// Frontend build output, copied into [`OUTPUT_DIR`].
pub const ARTIFACT_DIR: &str = "dist";

/// Command run in each project directory.
pub const DEFAULT_COMMAND: &str = "npm run build";

/// One build subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    /// Label used in output headers, e.g. `Backend`.
    pub label: String,
    /// Name used in the failure message, e.g. `Server`.
    pub role: String,
    /// Working directory.
    pub dir: PathBuf,
    /// Executable.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl BuildStep {
    /// Builds a step from a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyCommand`] if `command` has no words.
    pub fn from_command(
        label: impl Into<String>,
        role: impl Into<String>,
        dir: impl Into<PathBuf>,
        command: &str,
    ) -> Result<Self, BuildError> {
        let label = label.into();
        let mut words = command.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            return Err(BuildError::EmptyCommand(label));
        };
        Ok(Self {
            label,
            role: role.into(),
            dir: dir.into(),
            program,
            args: words.collect(),
        })
    }
}

/// A complete build: the steps plus where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Project root.
    pub root: PathBuf,
    /// Published output, replaced wholesale on success.
    pub output_dir: PathBuf,
    /// Directory copied to `output_dir/dist`.
    pub artifact_dir: PathBuf,
    /// Steps, all started at once.
    pub steps: Vec<BuildStep>,
}

impl BuildConfig {
    /// The backend and frontend builds under `root`, both running `command`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyCommand`] if `command` is blank.
    pub fn standard(root: impl AsRef<Path>, command: &str) -> Result<Self, BuildError> {
        let root = root.as_ref();
        Ok(Self {
            root: root.to_path_buf(),
            output_dir: root.join(OUTPUT_DIR),
            artifact_dir: root.join(FRONTEND_DIR).join(ARTIFACT_DIR),
            steps: vec![
                BuildStep::from_command("Backend", "Server", root.join(BACKEND_DIR), command)?,
                BuildStep::from_command("Frontend", "Client", root.join(FRONTEND_DIR), command)?,
            ],
        })
    }

    /// Where the artifact lands inside the output directory.
    #[must_use]
    pub fn published_dir(&self) -> PathBuf {
        self.output_dir.join(ARTIFACT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let config = BuildConfig::standard("/srv/app", DEFAULT_COMMAND).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/srv/app/.output"));
        assert_eq!(config.artifact_dir, PathBuf::from("/srv/app/frontend/dist"));
        assert_eq!(config.published_dir(), PathBuf::from("/srv/app/.output/dist"));

        let backend = &config.steps[0];
        assert_eq!(backend.label, "Backend");
        assert_eq!(backend.dir, PathBuf::from("/srv/app/backend"));
        assert_eq!(backend.program, "npm");
        assert_eq!(backend.args, ["run", "build"]);
        assert_eq!(config.steps[1].role, "Client");
    }

    #[test]
    fn test_blank_command_is_rejected() {
        assert!(matches!(
            BuildConfig::standard("/srv/app", "   "),
            Err(BuildError::EmptyCommand(label)) if label == "Backend"
        ));
    }
}
