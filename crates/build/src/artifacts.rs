//! Publishing the build result.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::{BuildConfig, BuildError};

/// Replaces the output directory with a fresh copy of the artifact.
///
/// Any previous output is removed first; a missing output directory is not
/// an error.
///
/// # Errors
///
/// Returns [`BuildError::Filesystem`] or [`BuildError::Walk`] if removing,
/// creating or copying fails.
pub fn publish(config: &BuildConfig) -> Result<u64, BuildError> {
    match fs::remove_dir_all(&config.output_dir) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            return Err(BuildError::fs("remove", &config.output_dir)(err));
        }
        _ => {}
    }
    fs::create_dir_all(&config.output_dir).map_err(BuildError::fs("create", &config.output_dir))?;

    let copied = copy_tree(&config.artifact_dir, &config.published_dir())?;
    tracing::info!(files = copied, output = %config.output_dir.display(), "artifact published");
    Ok(copied)
}

/// Recursively copies `from` into `to`, returning the number of files.
///
/// # Errors
///
/// Returns [`BuildError::Walk`] if `from` cannot be read.
pub fn copy_tree(from: &Path, to: &Path) -> Result<u64, BuildError> {
    let mut files = 0;
    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(BuildError::fs("create", &target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(BuildError::fs("copy", entry.path()))?;
            files += 1;
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMMAND;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_publish_replaces_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let config = BuildConfig::standard(root.path(), DEFAULT_COMMAND).unwrap();

        write(&config.artifact_dir.join("index.html"), "<html>");
        write(&config.artifact_dir.join("assets/app.js"), "app");
        write(&config.output_dir.join("stale.txt"), "old");

        let copied = publish(&config).unwrap();

        assert_eq!(copied, 2);
        assert!(!config.output_dir.join("stale.txt").exists());
        assert_eq!(
            fs::read_to_string(config.published_dir().join("assets/app.js")).unwrap(),
            "app"
        );
    }

    #[test]
    fn test_publish_without_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let config = BuildConfig::standard(root.path(), DEFAULT_COMMAND).unwrap();
        write(&config.artifact_dir.join("index.html"), "<html>");

        assert_eq!(publish(&config).unwrap(), 1);
        assert!(config.published_dir().join("index.html").is_file());
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let config = BuildConfig::standard(root.path(), DEFAULT_COMMAND).unwrap();

        assert!(matches!(publish(&config), Err(BuildError::Walk(_))));
    }
}
