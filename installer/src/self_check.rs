//! Post-install smoke test of the `basecut` executable.
//!
//! The installed binary is run with `--help`; it must exit successfully and
//! describe itself as a database subsetting tool. Commands run through the
//! [`CommandExecutor`] seam so tests never execute real binaries.

use crate::error::{InstallerError, Result};
use crate::install::InstallTarget;
use camino::Utf8Path;
use log::debug;
use std::io::{self, Read};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Flag passed to the installed binary.
pub const HELP_FLAG: &str = "--help";

/// Text the help output must contain.
pub const EXPECTED_HELP_TEXT: &str = "Database subsetting";

/// How long the installed binary may take to print its help.
const SELF_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Abstraction for running the installed executable.
pub trait CommandExecutor {
    /// Runs `program` with `args` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned, does not finish
    /// in time, or its output cannot be collected.
    fn run(&self, program: &Utf8Path, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system with a timeout.
///
/// # Examples
///
/// ```no_run
/// use basecut_installer::self_check::{CommandExecutor, SystemCommandExecutor};
/// use camino::Utf8Path;
///
/// let output = SystemCommandExecutor.run(Utf8Path::new("/usr/local/bin/basecut"), &["--help"])?;
/// assert!(output.status.success());
/// # Ok::<(), basecut_installer::error::InstallerError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &Utf8Path, args: &[&str]) -> Result<Output> {
        let mut child = Command::new(program.as_std_path())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Pipes are drained while waiting so a chatty child never blocks on
        // a full pipe buffer.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        match child.wait_timeout(SELF_CHECK_TIMEOUT)? {
            Some(status) => Ok(Output {
                status,
                stdout: collect(stdout)?,
                stderr: collect(stderr)?,
            }),
            None => {
                if child.kill().is_err() {
                    debug!("{program} exited before it could be killed");
                }
                if child.wait().is_err() {
                    debug!("could not reap {program} after timeout");
                }
                Err(InstallerError::VerificationFailed {
                    path: program.to_owned(),
                    reason: format!(
                        "timed out after {} seconds",
                        SELF_CHECK_TIMEOUT.as_secs()
                    ),
                })
            }
        }
    }
}

/// Read `pipe` to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut reader) = pipe {
            reader.read_to_end(&mut bytes)?;
        }
        Ok(bytes)
    })
}

fn collect(reader: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    let bytes = reader
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(bytes)
}

/// Run the installed executable with `--help` and check its output.
///
/// # Errors
///
/// Returns [`InstallerError::VerificationFailed`] if the binary cannot be
/// run, exits unsuccessfully, or its stdout lacks [`EXPECTED_HELP_TEXT`].
pub fn self_check(executor: &dyn CommandExecutor, target: &InstallTarget) -> Result<()> {
    let path = target.path();
    let fail = |reason: String| InstallerError::VerificationFailed {
        path: path.to_owned(),
        reason,
    };

    let output = executor.run(path, &[HELP_FLAG]).map_err(|e| match e {
        err @ InstallerError::VerificationFailed { .. } => err,
        other => fail(format!("could not run `{path} {HELP_FLAG}`: {other}")),
    })?;

    if !output.status.success() {
        return Err(fail(format!(
            "`{path} {HELP_FLAG}` exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains(EXPECTED_HELP_TEXT) {
        return Err(fail(format!(
            "`{path} {HELP_FLAG}` output did not mention \"{EXPECTED_HELP_TEXT}\""
        )));
    }

    debug!("self-check of {path} passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::Installer;
    use crate::release::sha256_digest::Sha256Digest;
    use crate::test_utils::{ExpectedCall, StubExecutor, exit_status, help_output};
    use crate::verification::verify;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn installed(temp: &TempDir) -> InstallTarget {
        let bin = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let content = b"binary".to_vec();
        let artefact = verify(content, &Sha256Digest::of_bytes(b"binary")).expect("verified");
        Installer::new(bin).install(&artefact).expect("install")
    }

    fn expect_help(target: &InstallTarget, result: Result<Output>) -> StubExecutor {
        StubExecutor::new(vec![ExpectedCall {
            program: target.path().to_owned(),
            args: vec![HELP_FLAG],
            result,
        }])
    }

    #[test]
    fn passes_when_help_mentions_subsetting() {
        let temp = TempDir::new().expect("temp dir");
        let target = installed(&temp);
        let executor = expect_help(
            &target,
            Ok(help_output(0, "basecut - Database subsetting and sanitization")),
        );

        self_check(&executor, &target).expect("self-check passes");
        executor.assert_finished();
    }

    #[test]
    fn fails_on_non_zero_exit() {
        let temp = TempDir::new().expect("temp dir");
        let target = installed(&temp);
        let executor = expect_help(&target, Ok(help_output(2, "Database subsetting")));

        let err = self_check(&executor, &target).expect_err("non-zero exit");
        assert!(matches!(err, InstallerError::VerificationFailed { .. }));
        assert!(err.to_string().contains("exited"));
    }

    #[test]
    fn fails_when_expected_text_missing() {
        let temp = TempDir::new().expect("temp dir");
        let target = installed(&temp);
        let executor = expect_help(&target, Ok(help_output(0, "usage: something-else")));

        let err = self_check(&executor, &target).expect_err("missing text");
        assert!(err.to_string().contains(EXPECTED_HELP_TEXT));
    }

    #[test]
    fn expected_text_on_stderr_only_is_not_enough() {
        let temp = TempDir::new().expect("temp dir");
        let target = installed(&temp);
        let output = Output {
            status: exit_status(0),
            stdout: Vec::new(),
            stderr: EXPECTED_HELP_TEXT.as_bytes().to_vec(),
        };
        let executor = expect_help(&target, Ok(output));

        assert!(self_check(&executor, &target).is_err());
    }

    #[test]
    fn spawn_failure_becomes_verification_failure() {
        let temp = TempDir::new().expect("temp dir");
        let target = installed(&temp);
        let executor = expect_help(
            &target,
            Err(InstallerError::Io(std::io::Error::other("exec format error"))),
        );

        let err = self_check(&executor, &target).expect_err("spawn failure");
        assert!(matches!(err, InstallerError::VerificationFailed { .. }));
        assert!(err.to_string().contains("exec format error"));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_captures_stdout() {
        let output = SystemCommandExecutor
            .run(
                Utf8Path::new("/bin/sh"),
                &["-c", "echo 'Database subsetting and sanitization'"],
            )
            .expect("shell runs");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains(EXPECTED_HELP_TEXT));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_drains_output_larger_than_a_pipe_buffer() {
        let output = SystemCommandExecutor
            .run(
                Utf8Path::new("/bin/sh"),
                &[
                    "-c",
                    "head -c 200000 /dev/zero | tr '\\0' x; echo; echo 'Database subsetting'",
                ],
            )
            .expect("shell runs");
        assert!(output.status.success());
        assert!(output.stdout.len() > 200_000);
        assert!(String::from_utf8_lossy(&output.stdout).contains(EXPECTED_HELP_TEXT));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_keeps_non_utf8_output() {
        let output = SystemCommandExecutor
            .run(
                Utf8Path::new("/bin/sh"),
                &["-c", "printf '\\377'; echo 'Database subsetting'"],
            )
            .expect("shell runs");
        assert_eq!(output.stdout.first(), Some(&0xff));
        assert!(String::from_utf8_lossy(&output.stdout).contains(EXPECTED_HELP_TEXT));
    }

    #[cfg(unix)]
    #[test]
    fn self_check_passes_for_installed_script_with_long_help() {
        let temp = TempDir::new().expect("temp dir");
        let bin = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let script = b"#!/bin/sh\nhead -c 200000 /dev/zero | tr '\\0' x\necho\necho 'basecut - Database subsetting'\n";
        let artefact = verify(script.to_vec(), &Sha256Digest::of_bytes(script)).expect("verified");
        let target = Installer::new(bin).install(&artefact).expect("install");

        self_check(&SystemCommandExecutor, &target).expect("self-check passes");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_reports_missing_program() {
        let result = SystemCommandExecutor.run(Utf8Path::new("/nonexistent/basecut"), &[HELP_FLAG]);
        assert!(matches!(result, Err(InstallerError::Io(_))));
    }
}
