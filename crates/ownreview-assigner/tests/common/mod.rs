//! In-memory stand-ins for git and the review host

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ownreview_domain::traits::{ChangeSource, ReviewerStore, SecurityService, UserDirectory};
use ownreview_domain::{
    ChangeSummary, ChangedFile, Permission, Proposal, Repository, ReviewerAddition, UserAccount,
};
use ownreview_git::{GitCommand, GitError, GitOutput, GitRunner, GIT_INDEX_FILE};

/// Answers `read-tree` and `check-attr` from fixed tables
#[derive(Default)]
pub struct FakeGit {
    pub owners: HashMap<String, String>,
    pub broken_paths: HashSet<String>,
    pub fail_read_tree: bool,
    pub commands: RefCell<Vec<String>>,
    /// Whether the snapshot directory existed at each attribute query
    pub snapshot_alive: RefCell<Vec<bool>>,
}

impl FakeGit {
    pub fn with_owners(entries: &[(&str, &str)]) -> Self {
        Self {
            owners: entries
                .iter()
                .map(|(path, value)| (path.to_string(), value.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn attribute_queries(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|c| c.starts_with("git check-attr"))
            .count()
    }
}

impl GitRunner for FakeGit {
    fn run(&self, _repository: &Repository, command: &GitCommand) -> Result<GitOutput, GitError> {
        self.commands.borrow_mut().push(command.to_string());
        let index = command
            .env_value(GIT_INDEX_FILE)
            .map(PathBuf::from)
            .expect("every command targets a snapshot index");

        match command.subcommand() {
            "read-tree" if self.fail_read_tree => Err(GitError::CommandFailed {
                command: command.to_string(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: Not a valid object name".to_string(),
            }),
            "read-tree" => Ok(GitOutput::default()),
            "check-attr" => {
                let alive = index.parent().map(|dir| dir.exists()).unwrap_or(false);
                self.snapshot_alive.borrow_mut().push(alive);

                let path = command
                    .arguments()
                    .last()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if self.broken_paths.contains(&path) {
                    return Err(GitError::CommandFailed {
                        command: command.to_string(),
                        status: "exit status: 1".to_string(),
                        stderr: "fatal: unable to read index".to_string(),
                    });
                }
                let value = self
                    .owners
                    .get(&path)
                    .cloned()
                    .unwrap_or_else(|| "unspecified".to_string());
                Ok(GitOutput::from_stdout(format!("{}\0owners\0{}\0", path, value)))
            }
            other => panic!("unexpected git subcommand {}", other),
        }
    }

    fn stream(
        &self,
        _repository: &Repository,
        _command: &GitCommand,
        _on_record: &mut dyn FnMut(&[u8]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, GitError> {
        panic!("changes come from FakeChanges")
    }
}

/// Fixed list of changed files
#[derive(Default)]
pub struct FakeChanges {
    pub paths: Vec<String>,
    pub fail: bool,
}

impl FakeChanges {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            fail: false,
        }
    }
}

impl ChangeSource for FakeChanges {
    type Error = String;

    fn stream_changes(
        &self,
        _proposal: &Proposal,
        on_change: &mut dyn FnMut(&ChangedFile) -> ControlFlow<()>,
    ) -> Result<ChangeSummary, String> {
        if self.fail {
            return Err("diff service unavailable".to_string());
        }
        let mut summary = ChangeSummary::default();
        for path in &self.paths {
            summary.delivered += 1;
            if on_change(&ChangedFile::new(path.clone())).is_break() {
                summary.stopped_early = true;
                break;
            }
        }
        Ok(summary)
    }
}

/// User directory that only answers inside an elevated scope
pub struct FakeDirectory {
    pub accounts: Vec<UserAccount>,
    pub unavailable_for: HashSet<String>,
    pub elevated: Cell<bool>,
    pub lookups: RefCell<Vec<String>>,
}

impl FakeDirectory {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self {
            accounts,
            unavailable_for: HashSet::new(),
            elevated: Cell::new(false),
            lookups: RefCell::new(Vec::new()),
        }
    }
}

impl UserDirectory for FakeDirectory {
    type Error = String;

    fn find_by_name_or_email(&self, name_or_email: &str) -> Result<Option<UserAccount>, String> {
        if !self.elevated.get() {
            return Err("permission denied: lookup requires repo_admin".to_string());
        }
        self.lookups.borrow_mut().push(name_or_email.to_string());
        if self.unavailable_for.contains(name_or_email) {
            return Err("directory unavailable".to_string());
        }
        Ok(self
            .accounts
            .iter()
            .find(|a| a.matches(name_or_email))
            .cloned())
    }
}

/// Security service that flips the directory into elevated mode for one call
pub struct FakeSecurity<'a> {
    pub directory: &'a FakeDirectory,
    pub elevations: RefCell<Vec<Permission>>,
}

impl<'a> FakeSecurity<'a> {
    pub fn new(directory: &'a FakeDirectory) -> Self {
        Self {
            directory,
            elevations: RefCell::new(Vec::new()),
        }
    }
}

impl SecurityService for FakeSecurity<'_> {
    type Error = String;

    fn with_permission<T, F>(&self, permission: Permission, _reason: &str, op: F) -> Result<T, String>
    where
        F: FnOnce() -> T,
    {
        assert!(!self.directory.elevated.get(), "elevations must not nest");
        self.elevations.borrow_mut().push(permission);
        self.directory.elevated.set(true);
        let result = op();
        self.directory.elevated.set(false);
        Ok(result)
    }
}

/// Reviewer storage with the host's author and idempotency rules
pub struct FakeReviewers {
    pub author: String,
    pub reviewers: RefCell<Vec<String>>,
    pub calls: RefCell<Vec<String>>,
    /// Number of storage failures left per user
    pub failures: RefCell<HashMap<String, u32>>,
}

impl FakeReviewers {
    pub fn new(author: &str) -> Self {
        Self {
            author: author.to_string(),
            reviewers: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(HashMap::new()),
        }
    }

    pub fn fail(self, user: &str, times: u32) -> Self {
        self.failures.borrow_mut().insert(user.to_string(), times);
        self
    }

    pub fn reviewer_names(&self) -> Vec<String> {
        self.reviewers.borrow().clone()
    }
}

impl ReviewerStore for FakeReviewers {
    type Error = String;

    fn add_reviewer(
        &self,
        _repository_id: u64,
        _proposal_id: u64,
        user_name: &str,
    ) -> Result<ReviewerAddition, String> {
        self.calls.borrow_mut().push(user_name.to_string());

        if let Some(left) = self.failures.borrow_mut().get_mut(user_name) {
            if *left > 0 {
                *left -= 1;
                return Err("storage busy".to_string());
            }
        }
        if user_name == self.author {
            return Ok(ReviewerAddition::AuthorConflict);
        }
        let mut reviewers = self.reviewers.borrow_mut();
        if reviewers.iter().any(|r| r == user_name) {
            return Ok(ReviewerAddition::AlreadyPresent);
        }
        reviewers.push(user_name.to_string());
        Ok(ReviewerAddition::Added)
    }
}

pub fn accounts() -> Vec<UserAccount> {
    vec![
        UserAccount::new("alice").with_email("alice@example.com"),
        UserAccount::new("bob").with_email("bob@example.com"),
        UserAccount::new("carol").with_email("carol@example.com"),
    ]
}

pub fn proposal() -> Proposal {
    let repo = Repository::new(11, "proj/repo", "/srv/git/repo.git");
    Proposal::new(5, repo, "main", "f00dfeed", "carol")
}

/// Collects formatted log output for a block of code
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Run `f` with a `fmt` subscriber writing into this capture
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.0.lock().unwrap();
        String::from_utf8_lossy(&buffer).lines().map(str::to_string).collect()
    }

    /// Whether some line at `level` mentions `needle`
    pub fn logged(&self, level: &str, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|line| line.contains(level) && line.contains(needle))
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
