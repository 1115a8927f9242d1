use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::StagingError;
use crate::report::RunStatus;

/// Default module name generated tests import the subject from.
pub const IMPL_MODULE: &str = "impl_under_test";
pub const DEFAULT_IMPL_FILE: &str = "impl_under_test.py";
pub const DEFAULT_TESTS_FILE: &str = "test_generated.py";
pub const DEFAULT_TEST_CMD: &str = "python3 -m pytest -q -p no:cacheprovider";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Runner output kept per run, from the end of the stream.
const OUTPUT_TAIL_BYTES: u64 = 4096;

/// File names used inside every staging area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingLayout {
    #[serde(default = "default_impl_file")]
    pub impl_file: String,
    #[serde(default = "default_tests_file")]
    pub tests_file: String,
}

fn default_impl_file() -> String {
    DEFAULT_IMPL_FILE.to_string()
}

fn default_tests_file() -> String {
    DEFAULT_TESTS_FILE.to_string()
}

impl Default for StagingLayout {
    fn default() -> Self {
        Self {
            impl_file: default_impl_file(),
            tests_file: default_tests_file(),
        }
    }
}

impl StagingLayout {
    /// Extension of the tests file, used to locate pre-generated suites.
    pub fn tests_extension(&self) -> &str {
        Path::new(&self.tests_file)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }

    /// Module name the staged implementation is importable as: the stem of
    /// `impl_file`.
    pub fn impl_module(&self) -> &str {
        Path::new(&self.impl_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(IMPL_MODULE)
    }
}

/// A disposable directory holding one implementation file and one tests file.
/// The directory is removed when the value is dropped.
pub struct StagingArea {
    dir: tempfile::TempDir,
    impl_path: PathBuf,
    tests_path: PathBuf,
    tests_file: String,
}

impl StagingArea {
    pub fn create(layout: &StagingLayout, session: &str, task: &str) -> Result<Self, StagingError> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("spec2test-{}-{}-", sanitize(session), sanitize(task)))
            .tempdir()
            .map_err(StagingError::Create)?;
        let impl_path = dir.path().join(&layout.impl_file);
        let tests_path = dir.path().join(&layout.tests_file);
        Ok(Self {
            dir,
            impl_path,
            tests_path,
            tests_file: layout.tests_file.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn impl_path(&self) -> &Path {
        &self.impl_path
    }

    pub fn tests_path(&self) -> &Path {
        &self.tests_path
    }

    /// Tests file name relative to [`root`](Self::root).
    pub fn tests_file(&self) -> &str {
        &self.tests_file
    }

    pub fn stage_tests(&self, source: &str) -> Result<(), StagingError> {
        write_file(&self.tests_path, source)
    }

    /// Replace the implementation under test. The write is complete before
    /// this returns, so the next run always sees the new subject.
    pub fn stage_implementation(&self, source: &str) -> Result<(), StagingError> {
        write_file(&self.impl_path, source)?;
        clear_pycache(&self.impl_path);
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), StagingError> {
    std::fs::write(path, contents).map_err(|source| StagingError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Remove compiled bytecode for `source_file` so the next import re-reads it.
/// Mutants are often the same size and written within the same second as the
/// previous subject, which defeats the mtime check.
pub fn clear_pycache(source_file: &Path) {
    let (Some(parent), Some(stem)) = (source_file.parent(), source_file.file_stem()) else {
        return;
    };
    let cache_dir = parent.join("__pycache__");
    let Ok(entries) = std::fs::read_dir(&cache_dir) else {
        return;
    };
    let stem = stem.to_string_lossy();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&*stem) && name.ends_with(".pyc") {
            let _ = std::fs::remove_file(entry.path());
        }
    }
}

pub fn parse_test_cmd(cmd: &str) -> (String, Vec<String>) {
    let mut parts = cmd.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

/// Outcome of one execution of the test runner.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub status: RunStatus,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub output: String,
}

impl RunRecord {
    pub fn passed(&self) -> bool {
        self.status.passed()
    }
}

/// External test-execution command, run with the staging area as its
/// working directory and the tests file as its last argument.
#[derive(Debug, Clone)]
pub struct TestRunner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::from_command(DEFAULT_TEST_CMD, DEFAULT_TIMEOUT)
    }
}

impl TestRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            poll_interval: Duration::from_millis(10),
        }
    }

    pub fn from_command(cmd: &str, timeout: Duration) -> Self {
        let (program, args) = parse_test_cmd(cmd);
        Self::new(program, args, timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the tests staged in `staging`, blocking until the child exits or the
    /// time budget runs out. A child still running at the deadline is killed.
    pub fn run(&self, staging: &StagingArea) -> RunRecord {
        let start = Instant::now();

        // Captured in a temp file, not a pipe: nothing drains a pipe while we poll.
        let capture = tempfile::tempfile().ok();
        let (stdout, stderr) = match capture.as_ref().map(|f| (f.try_clone(), f.try_clone())) {
            Some((Ok(out), Ok(err))) => (Stdio::from(out), Stdio::from(err)),
            _ => (Stdio::null(), Stdio::null()),
        };

        let mut command = Command::new(&self.program);
        // Own process group, so a timeout also takes down anything the tests forked.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let child = command
            .args(&self.args)
            .arg(staging.tests_file())
            .current_dir(staging.root())
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn();

        let mut child = match child {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "failed to spawn test runner");
                return RunRecord {
                    status: RunStatus::SpawnError,
                    exit_code: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                    output: format!("Failed to run {}: {}", self.program, e),
                };
            }
        };

        let (status, exit_code) = loop {
            match child.try_wait() {
                Ok(Some(exit)) => {
                    kill_process_group(&child);
                    let status = if exit.success() { RunStatus::Passed } else { RunStatus::Failed };
                    break (status, exit.code());
                }
                Ok(None) => {
                    if start.elapsed() >= self.timeout {
                        terminate(&mut child);
                        tracing::warn!(
                            staging = %staging.root().display(),
                            timeout_ms = self.timeout.as_millis() as u64,
                            "test run timed out"
                        );
                        break (RunStatus::TimedOut, None);
                    }
                    std::thread::sleep(self.poll_interval);
                }
                Err(e) => {
                    terminate(&mut child);
                    tracing::warn!(error = %e, "failed to wait for test runner");
                    break (RunStatus::SpawnError, None);
                }
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let output = capture.map(read_tail).unwrap_or_default();
        tracing::debug!(?status, ?exit_code, duration_ms, "test run finished");

        RunRecord {
            status,
            exit_code,
            duration_ms,
            output,
        }
    }
}

fn terminate(child: &mut Child) {
    kill_process_group(child);
    let _ = child.kill();
    let _ = child.wait();
}

/// Stragglers left by a finished run must not touch the staging area while
/// the next subject is being tested.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let _ = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL);
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

fn read_tail(mut file: File) -> String {
    let Ok(len) = file.seek(SeekFrom::End(0)) else {
        return String::new();
    };
    let from = len.saturating_sub(OUTPUT_TAIL_BYTES);
    if file.seek(SeekFrom::Start(from)).is_err() {
        return String::new();
    }
    let mut buf = Vec::new();
    if file.read_to_end(&mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
