//! Shared test utilities for the installer crate.

use crate::download::{ArtefactDownloader, DownloadError};
use crate::error::{InstallerError, Result};
use crate::release::sha256_digest::Sha256Digest;
use crate::self_check::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::process::{ExitStatus, Output};

/// Help text printed by a healthy `basecut --help`.
pub const HEALTHY_HELP: &str =
    "basecut - Database subsetting and sanitization for realistic dev environments\n";

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a command `Output` with the given exit code and stdout.
pub fn help_output(code: i32, stdout: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Returns the lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of_bytes(bytes).into_inner()
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute.
    pub program: Utf8PathBuf,
    /// The arguments to pass to the program.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    calls: RefCell<usize>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            calls: RefCell::new(0),
        }
    }

    /// Creates a stub that answers any single `--help` call with `output`.
    pub fn answering(program: Utf8PathBuf, output: Output) -> Self {
        Self::new(vec![ExpectedCall {
            program,
            args: vec![crate::self_check::HELP_FLAG],
            result: Ok(output),
        }])
    }

    /// Returns how many invocations the stub has received.
    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, program: &Utf8Path, args: &[&str]) -> Result<Output> {
        *self.calls.borrow_mut() += 1;
        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(InstallerError::StubMismatch {
                message: format!("unexpected invocation of {program} {args:?}"),
            });
        };

        if call.program.as_path() != program || call.args.as_slice() != args {
            return Err(InstallerError::StubMismatch {
                message: format!(
                    "expected {} {:?}, got {program} {args:?}",
                    call.program, call.args
                ),
            });
        }

        call.result
    }
}

/// Canned response served by [`StubDownloader`].
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Serve these bytes.
    Bytes(Vec<u8>),
    /// Fail with HTTP 404.
    NotFound,
    /// Fail with a transport error carrying this reason.
    Network(String),
}

/// A downloader that serves a canned response and records requested URLs.
#[derive(Debug)]
pub struct StubDownloader {
    response: StubResponse,
    requests: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Creates a stub that answers every request with `response`.
    pub fn new(response: StubResponse) -> Self {
        Self {
            response,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Creates a stub serving `bytes`.
    pub fn serving(bytes: &[u8]) -> Self {
        Self::new(StubResponse::Bytes(bytes.to_vec()))
    }

    /// Returns the URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtefactDownloader for StubDownloader {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        match &self.response {
            StubResponse::Bytes(bytes) => Ok(bytes.clone()),
            StubResponse::NotFound => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
            StubResponse::Network(reason) => Err(DownloadError::HttpError {
                url: url.to_owned(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Runs `f` with `PATH` set to exactly `entries`, restoring it afterwards.
pub fn with_path<R>(entries: &[&Utf8Path], f: impl FnOnce() -> R) -> R {
    let joined: OsString = std::env::join_paths(entries.iter().map(|p| p.as_std_path()))
        .unwrap_or_default();
    temp_env::with_var("PATH", Some(joined), f)
}
