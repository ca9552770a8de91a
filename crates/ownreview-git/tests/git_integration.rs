//! Integration tests for ownreview-git
//!
//! These tests drive a real `git` binary against a throwaway repository and
//! return early when git is not installed.

use std::ops::ControlFlow;
use std::path::Path;
use std::process::Command;

use ownreview_domain::traits::ChangeSource;
use ownreview_domain::{OwnerDeclaration, Proposal, Repository};
use ownreview_git::{AttributeQuery, GitDiffChanges, GitError, SnapshotManager, SystemGit};

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// main: a.txt, b.txt, README.md with owners rules
/// feature: edits a.txt and b.txt, adds notes.md
fn fixture(dir: &Path) -> (String, String) {
    git(dir, &["init", "-q"]);
    write(dir, ".gitattributes", "a.txt owners=alice,bob@example.com\n*.md owners=docs\n");
    write(dir, "a.txt", "a\n");
    write(dir, "b.txt", "b\n");
    write(dir, "README.md", "readme\n");
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", "initial"]);
    let main = git(dir, &["rev-parse", "HEAD"]);

    git(dir, &["checkout", "-q", "-b", "feature"]);
    write(dir, "a.txt", "a2\n");
    write(dir, "b.txt", "b2\n");
    write(dir, "notes.md", "notes\n");
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", "feature work"]);
    let feature = git(dir, &["rev-parse", "HEAD"]);

    (main, feature)
}

#[test]
fn test_owners_read_from_snapshot() {
    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    let (_, feature) = fixture(work.path());
    let repo = Repository::new(1, "proj/repo", work.path());

    let scratch = tempfile::tempdir().unwrap();
    let snapshots = SnapshotManager::new(SystemGit::default()).with_dir(scratch.path());
    let attributes = AttributeQuery::new(SystemGit::default(), "owners");

    let snapshot = snapshots.acquire(&repo, &feature).unwrap();
    assert!(snapshot.index_path().exists());

    let owners = attributes.owners_for(&repo, &snapshot, "a.txt").unwrap();
    assert_eq!(owners, OwnerDeclaration::parse_list("alice bob@example.com"));

    let owners = attributes.owners_for(&repo, &snapshot, "b.txt").unwrap();
    assert!(owners.is_empty());

    let owners = attributes.owners_for(&repo, &snapshot, "notes.md").unwrap();
    assert_eq!(owners, vec![OwnerDeclaration::new("docs")]);

    snapshot.release();
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_snapshot_leaves_repository_index_alone() {
    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    let (main, _) = fixture(work.path());
    let repo = Repository::new(1, "proj/repo", work.path());
    let index = work.path().join(".git").join("index");
    let before = std::fs::read(&index).unwrap();

    let snapshot = SnapshotManager::new(SystemGit::default())
        .acquire(&repo, &main)
        .unwrap();
    snapshot.release();

    assert_eq!(std::fs::read(&index).unwrap(), before);
}

#[test]
fn test_invalid_revision_fails_snapshot() {
    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    fixture(work.path());
    let repo = Repository::new(1, "proj/repo", work.path());

    let scratch = tempfile::tempdir().unwrap();
    let result = SnapshotManager::new(SystemGit::default())
        .with_dir(scratch.path())
        .acquire(&repo, "0000000000000000000000000000000000000000");

    assert!(matches!(result, Err(GitError::SnapshotCreation { .. })));
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_diff_lists_changed_files() {
    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    let (main, feature) = fixture(work.path());
    let repo = Repository::new(1, "proj/repo", work.path());
    let proposal = Proposal::new(1, repo, main, feature, "carol");

    let changes = GitDiffChanges::new(SystemGit::default());
    let mut paths = Vec::new();
    let summary = changes
        .stream_changes(&proposal, &mut |file| {
            paths.push(file.to_string());
            ControlFlow::Continue(())
        })
        .unwrap();

    paths.sort();
    assert_eq!(paths, vec!["a.txt", "b.txt", "notes.md"]);
    assert_eq!(summary.delivered, 3);
    assert!(!summary.stopped_early);
}

#[test]
fn test_diff_stops_when_asked() {
    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    let (main, feature) = fixture(work.path());
    let repo = Repository::new(1, "proj/repo", work.path());
    let proposal = Proposal::new(1, repo, main, feature, "carol");

    let changes = GitDiffChanges::new(SystemGit::default());
    let summary = changes
        .stream_changes(&proposal, &mut |_| ControlFlow::Break(()))
        .unwrap();

    assert_eq!(summary.delivered, 1);
    assert!(summary.stopped_early);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_path_matches_its_exact_rule() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    if !git_available() {
        return;
    }
    let work = tempfile::tempdir().unwrap();
    let dir = work.path();
    git(dir, &["init", "-q"]);
    std::fs::write(dir.join(".gitattributes"), b"caf\xe9.txt owners=dana\n").unwrap();
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", "rules"]);
    let base = git(dir, &["rev-parse", "HEAD"]);
    std::fs::write(dir.join(OsStr::from_bytes(b"caf\xe9.txt")), "menu\n").unwrap();
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", "menu"]);
    let tip = git(dir, &["rev-parse", "HEAD"]);

    let repo = Repository::new(1, "proj/repo", dir);
    let proposal = Proposal::new(1, repo.clone(), base, tip.clone(), "carol");
    let mut files = Vec::new();
    GitDiffChanges::new(SystemGit::default())
        .stream_changes(&proposal, &mut |file| {
            files.push(file.clone());
            ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path.as_os_str().as_bytes(), b"caf\xe9.txt");

    let scratch = tempfile::tempdir().unwrap();
    let snapshot = SnapshotManager::new(SystemGit::default())
        .with_dir(scratch.path())
        .acquire(&repo, &tip)
        .unwrap();
    let owners = AttributeQuery::new(SystemGit::default(), "owners")
        .owners_for(&repo, &snapshot, &files[0].path)
        .unwrap();
    snapshot.release();

    assert_eq!(owners, vec![OwnerDeclaration::new("dana")]);
}
