//! Changed-file enumeration backed by `git diff`

use std::ops::ControlFlow;
use std::path::PathBuf;

use ownreview_domain::traits::ChangeSource;
use ownreview_domain::{ChangeSummary, ChangedFile, Proposal};

use crate::{GitCommand, GitError, GitRunner};

/// Streams the paths a proposal changes, straight from git
///
/// Compares the merge base of the target and source revisions with the
/// source revision (`target...source`), the same range a pull request shows.
#[derive(Debug, Clone)]
pub struct GitDiffChanges<G> {
    git: G,
}

impl<G: GitRunner> GitDiffChanges<G> {
    /// Create a change source over `git`
    pub fn new(git: G) -> Self {
        Self { git }
    }

    fn command(proposal: &Proposal) -> GitCommand {
        GitCommand::new("diff")
            .args(["--name-only", "-z", "--no-color", "--no-ext-diff"])
            .arg(format!(
                "{}...{}",
                proposal.target_revision, proposal.source_revision
            ))
            .arg("--")
    }
}

impl<G: GitRunner> ChangeSource for GitDiffChanges<G> {
    type Error = GitError;

    fn stream_changes(
        &self,
        proposal: &Proposal,
        on_change: &mut dyn FnMut(&ChangedFile) -> ControlFlow<()>,
    ) -> Result<ChangeSummary, Self::Error> {
        let mut summary = ChangeSummary::default();
        let command = Self::command(proposal);

        let flow = self.git.stream(&proposal.repository, &command, &mut |record| {
            let file = ChangedFile::new(record_path(record));
            summary.delivered += 1;
            on_change(&file)
        })?;

        summary.stopped_early = flow.is_break();
        Ok(summary)
    }
}

/// Path of one `-z` record, byte for byte
#[cfg(unix)]
fn record_path(record: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(record))
}

/// Path of one `-z` record; git emits UTF-8 paths on these platforms
#[cfg(not(unix))]
fn record_path(record: &[u8]) -> PathBuf {
    let path = String::from_utf8_lossy(record);
    if let std::borrow::Cow::Owned(_) = path {
        tracing::warn!("Changed path {} is not valid UTF-8", path);
    }
    PathBuf::from(path.into_owned())
}
