//! Concurrent supervision of the build steps.
//!
//! Every step starts immediately. Output lines from all steps flow through
//! one channel into a single printer, which owns the [`Grouper`]. When a step
//! fails, a shared [`CancellationToken`] tells the others to kill their
//! process; killing a process that already exited is a no-op.

use std::io::Write;
use std::process::{ExitStatus, Stdio};

use futures::future::join_all;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::artifacts;
use crate::grouping::Grouper;
use crate::source::{OutputLine, Source};
use crate::{BuildConfig, BuildError, BuildStep};

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Exited with status 0.
    Succeeded,
    /// Exited unsuccessfully on its own.
    Failed(ExitStatus),
    /// Killed because another step failed.
    Killed,
}

impl StepOutcome {
    /// Returns true for [`StepOutcome::Succeeded`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Outcome per step, in configuration order.
    pub outcomes: Vec<(String, StepOutcome)>,
    /// Files copied to the output directory.
    pub files_published: u64,
}

/// Runs every step, writes their output to `out`, and publishes the
/// artifact if all of them succeed.
///
/// # Errors
///
/// - [`BuildError::Spawn`] if a step cannot be started (started steps are killed)
/// - [`BuildError::StepsFailed`] if any step fails; nothing is published
/// - [`BuildError::Filesystem`] / [`BuildError::Walk`] if publishing fails
pub async fn run<W>(config: &BuildConfig, out: W) -> Result<BuildReport, BuildError>
where
    W: Write + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_lines(rx, out));
    let cancel = CancellationToken::new();

    let mut children = Vec::with_capacity(config.steps.len());
    let mut readers = Vec::with_capacity(config.steps.len());
    for step in &config.steps {
        match spawn_step(step, &tx) {
            Ok((child, handles)) => {
                children.push((step, child));
                readers.push(handles);
            }
            Err(err) => {
                tracing::error!(step = %step.label, "Aborting all active operations!");
                for (_, mut child) in children {
                    // Already-exited children report an error here; nothing to do.
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                }
                return Err(err);
            }
        }
    }
    drop(tx);

    let outcomes = join_all(
        children
            .into_iter()
            .map(|(step, child)| supervise(step, child, cancel.clone())),
    )
    .await;

    // Grandchildren of a killed step may still hold its pipes open.
    for (outcome, handles) in outcomes.iter().zip(&readers) {
        if *outcome == StepOutcome::Killed {
            handles.iter().for_each(JoinHandle::abort);
        }
    }

    match printer.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => return Err(BuildError::Output(err)),
        Err(join) => return Err(BuildError::Output(std::io::Error::other(join))),
    }

    let outcomes: Vec<(String, StepOutcome)> = config
        .steps
        .iter()
        .map(|step| step.label.clone())
        .zip(outcomes)
        .collect();

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|(_, outcome)| !outcome.is_success())
        .map(|(label, _)| label.clone())
        .collect();
    if !failed.is_empty() {
        return Err(BuildError::StepsFailed { failed });
    }

    let files_published = artifacts::publish(config)?;
    Ok(BuildReport {
        outcomes,
        files_published,
    })
}

fn spawn_step(
    step: &BuildStep,
    tx: &mpsc::UnboundedSender<OutputLine>,
) -> Result<(Child, Vec<JoinHandle<()>>), BuildError> {
    let mut child = Command::new(&step.program)
        .args(&step.args)
        .current_dir(&step.dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BuildError::Spawn {
            label: step.label.clone(),
            source,
        })?;

    tracing::info!(step = %step.label, pid = ?child.id(), "{} Started Successfully", step.label);

    let mut handles = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        handles.push(forward(stdout, Source::stdout(step.label.clone()), tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        handles.push(forward(stderr, Source::stderr(step.label.clone()), tx.clone()));
    }
    Ok((child, handles))
}

/// Reads `reader` line by line into the printer channel.
fn forward<R>(reader: R, source: Source, tx: mpsc::UnboundedSender<OutputLine>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(text)) => {
                    let line = OutputLine {
                        source: source.clone(),
                        text,
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(source = %source.label, error = %err, "output stream closed");
                    break;
                }
            }
        }
    })
}

/// Waits for `child`, killing it if another step fails first.
async fn supervise(step: &BuildStep, mut child: Child, cancel: CancellationToken) -> StepOutcome {
    let status = tokio::select! {
        status = child.wait() => status,
        () = cancel.cancelled() => {
            if let Err(err) = child.start_kill() {
                tracing::debug!(step = %step.label, error = %err, "process already exited");
            }
            match child.wait().await {
                Ok(status) if status.success() => return StepOutcome::Succeeded,
                _ => return StepOutcome::Killed,
            }
        }
    };

    match status {
        Ok(status) if status.success() => StepOutcome::Succeeded,
        Ok(status) => {
            tracing::error!(step = %step.label, %status, "{} Build Failed", step.role);
            tracing::error!("Aborting all active operations!");
            cancel.cancel();
            StepOutcome::Failed(status)
        }
        Err(err) => {
            tracing::error!(step = %step.label, error = %err, "{} Build Failed", step.role);
            cancel.cancel();
            StepOutcome::Killed
        }
    }
}

/// Drains the channel into `out` until every sender is gone.
async fn print_lines<W: Write>(
    mut rx: mpsc::UnboundedReceiver<OutputLine>,
    mut out: W,
) -> std::io::Result<()> {
    let mut grouper = Grouper::new();
    while let Some(line) = rx.recv().await {
        grouper.write_line(&mut out, &line)?;
    }
    out.flush()
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::config::{ARTIFACT_DIR, BACKEND_DIR, FRONTEND_DIR};

    /// A `Write` handle whose bytes can be read after the run.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn shell(label: &str, role: &str, dir: &Path, script: &str) -> BuildStep {
        BuildStep {
            label: label.to_string(),
            role: role.to_string(),
            dir: dir.to_path_buf(),
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    fn project(root: &Path, backend: &str, frontend: &str) -> BuildConfig {
        let backend_dir = root.join(BACKEND_DIR);
        let frontend_dir = root.join(FRONTEND_DIR);
        fs::create_dir_all(&backend_dir).unwrap();
        fs::create_dir_all(&frontend_dir).unwrap();
        BuildConfig {
            root: root.to_path_buf(),
            output_dir: root.join(".output"),
            artifact_dir: frontend_dir.join(ARTIFACT_DIR),
            steps: vec![
                shell("Backend", "Server", &backend_dir, backend),
                shell("Frontend", "Client", &frontend_dir, frontend),
            ],
        }
    }

    #[tokio::test]
    async fn test_failing_backend_kills_frontend_and_publishes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let config = project(
            root.path(),
            "echo compiling; exit 1",
            "sleep 30; mkdir -p dist; echo late > dist/index.html",
        );

        let started = Instant::now();
        let err = run(&config, Captured::default()).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(20));
        match err {
            BuildError::StepsFailed { failed } => assert_eq!(failed, ["Backend", "Frontend"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!config.output_dir.exists());
        assert!(!config.artifact_dir.exists());
    }

    #[tokio::test]
    async fn test_both_failing_is_not_a_panic() {
        let root = tempfile::tempdir().unwrap();
        let config = project(root.path(), "exit 2", "exit 3");

        let err = run(&config, Captured::default()).await.unwrap_err();
        assert!(matches!(err, BuildError::StepsFailed { .. }));
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_success_publishes_only_frontend_files() {
        let root = tempfile::tempdir().unwrap();
        let config = project(
            root.path(),
            "mkdir -p dist && echo server > dist/server.js",
            "mkdir -p dist/assets && echo page > dist/index.html && echo js > dist/assets/app.js",
        );

        let report = run(&config, Captured::default()).await.unwrap();

        assert_eq!(report.files_published, 2);
        assert!(report.outcomes.iter().all(|(_, o)| o.is_success()));
        let published = config.published_dir();
        assert_eq!(fs::read_to_string(published.join("index.html")).unwrap(), "page\n");
        assert!(published.join("assets/app.js").is_file());
        assert!(!published.join("server.js").exists());
    }

    #[tokio::test]
    async fn test_output_is_grouped_by_source() {
        let root = tempfile::tempdir().unwrap();
        let config = project(
            root.path(),
            "echo one; echo two; sleep 0.5; echo oops >&2; exit 1",
            "exit 0",
        );
        let captured = Captured::default();

        run(&config, captured.clone()).await.unwrap_err();

        let text = captured.text();
        assert_eq!(text.matches("--------------Backend-------------------").count(), 1);
        assert_eq!(text.matches("--------------Error - Backend-------------------").count(), 1);
        assert!(text.contains("one\ntwo\n"));
        assert!(text.contains("oops"));
    }

    #[tokio::test]
    async fn test_missing_program_kills_started_steps() {
        let root = tempfile::tempdir().unwrap();
        let mut config = project(root.path(), "sleep 30", "exit 0");
        config.steps[1].program = "definitely-not-a-real-program".to_string();

        let started = Instant::now();
        let err = run(&config, Captured::default()).await.unwrap_err();

        assert!(matches!(err, BuildError::Spawn { ref label, .. } if label == "Frontend"));
        assert!(started.elapsed() < Duration::from_secs(20));
    }
}
