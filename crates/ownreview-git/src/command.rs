//! Git command construction and execution

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;

use ownreview_domain::Repository;

use crate::GitError;

/// Environment variable that redirects git to an alternate index file
pub const GIT_INDEX_FILE: &str = "GIT_INDEX_FILE";

/// A git subcommand with arguments and extra environment
///
/// # Examples
///
/// ```
/// use ownreview_git::GitCommand;
///
/// let cmd = GitCommand::new("check-attr").args(["--cached", "owners", "--", "a.txt"]);
/// assert_eq!(cmd.to_string(), "git check-attr --cached owners -- a.txt");
/// ```
#[derive(Debug, Clone)]
pub struct GitCommand {
    subcommand: String,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl GitCommand {
    /// Start building `git <subcommand>`
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Set an environment variable for this invocation only
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// The git subcommand (e.g. `read-tree`)
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Arguments following the subcommand
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Value of an environment override, if set
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Environment overrides in insertion order
    pub fn envs(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.subcommand)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Captured output of a finished git command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Raw standard output
    pub stdout: Vec<u8>,

    /// Standard error, lossily decoded
    pub stderr: String,
}

impl GitOutput {
    /// Output with the given stdout and empty stderr
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// First line of stdout without its terminator, if any
    pub fn single_line(&self) -> Option<String> {
        String::from_utf8_lossy(&self.stdout)
            .lines()
            .next()
            .map(str::to_string)
    }
}

/// Capability to execute git against a repository
///
/// Implemented by [`SystemGit`]; tests substitute recording fakes.
pub trait GitRunner {
    /// Run a command to completion and capture its output
    ///
    /// A non-zero exit status is reported as [`GitError::CommandFailed`].
    fn run(&self, repository: &Repository, command: &GitCommand) -> Result<GitOutput, GitError>;

    /// Run a command and hand each NUL-terminated stdout record to `on_record`
    /// as soon as it is read
    ///
    /// When the callback breaks, the process is terminated and
    /// `ControlFlow::Break(())` is returned.
    fn stream(
        &self,
        repository: &Repository,
        command: &GitCommand,
        on_record: &mut dyn FnMut(&[u8]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, GitError>;
}

impl<T: GitRunner + ?Sized> GitRunner for &T {
    fn run(&self, repository: &Repository, command: &GitCommand) -> Result<GitOutput, GitError> {
        (**self).run(repository, command)
    }

    fn stream(
        &self,
        repository: &Repository,
        command: &GitCommand,
        on_record: &mut dyn FnMut(&[u8]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, GitError> {
        (**self).stream(repository, command, on_record)
    }
}

impl<T: GitRunner + ?Sized> GitRunner for Arc<T> {
    fn run(&self, repository: &Repository, command: &GitCommand) -> Result<GitOutput, GitError> {
        (**self).run(repository, command)
    }

    fn stream(
        &self,
        repository: &Repository,
        command: &GitCommand,
        on_record: &mut dyn FnMut(&[u8]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, GitError> {
        (**self).stream(repository, command, on_record)
    }
}

/// Runs git as a child process
#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: PathBuf,
}

impl SystemGit {
    /// Use the given git executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the git executable
    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    fn command(&self, repository: &Repository, command: &GitCommand) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-C")
            .arg(&repository.path)
            .arg(command.subcommand())
            .args(command.arguments())
            .envs(command.envs())
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner for SystemGit {
    fn run(&self, repository: &Repository, command: &GitCommand) -> Result<GitOutput, GitError> {
        tracing::debug!("Running {} in {}", command, repository.path.display());

        let output = self
            .command(repository, command)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(GitOutput {
            stdout: output.stdout,
            stderr,
        })
    }

    fn stream(
        &self,
        repository: &Repository,
        command: &GitCommand,
        on_record: &mut dyn FnMut(&[u8]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, GitError> {
        tracing::debug!("Streaming {} in {}", command, repository.path.display());

        let mut child = self
            .command(repository, command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // Drained on its own thread so a chatty stderr cannot block stdout.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GitError::InvalidOutput("stdout was not captured".to_string()))?;

        let mut flow = ControlFlow::Continue(());
        for record in BufReader::new(stdout).split(b'\0') {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Io(e));
                }
            };
            if record.is_empty() {
                continue;
            }
            if on_record(&record).is_break() {
                flow = ControlFlow::Break(());
                break;
            }
        }

        if flow.is_break() {
            // The consumer is done; the rest of the output is not wanted.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(flow);
        }

        let status = child.wait()?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(GitError::CommandFailed {
                command: command.to_string(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(flow)
    }
}
