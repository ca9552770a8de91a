//! Per-check report of what the assigner did

use ownreview_domain::{CheckId, Proposal, ReviewerAddition};
use serde::Serialize;

/// What happened when an account was offered as reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// The account became a reviewer
    Added,

    /// The account already was a reviewer
    AlreadyPresent,

    /// The account is the author; the host refused and the refusal was ignored
    AuthorConflict,

    /// Storage failed; the message is the last error seen
    Failed(String),

    /// Dry run: the account would have been offered
    Skipped,
}

impl From<ReviewerAddition> for AssignmentOutcome {
    fn from(addition: ReviewerAddition) -> Self {
        match addition {
            ReviewerAddition::Added => AssignmentOutcome::Added,
            ReviewerAddition::AlreadyPresent => AssignmentOutcome::AlreadyPresent,
            ReviewerAddition::AuthorConflict => AssignmentOutcome::AuthorConflict,
        }
    }
}

/// One account offered as reviewer during a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerRecord {
    /// Account name
    pub user: String,

    /// Outcome of the offer
    #[serde(flatten)]
    pub outcome: AssignmentOutcome,
}

/// Report of one check invocation
///
/// Hosts that only care about the side effects can ignore it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Identifier of the check, as used in log spans
    pub check_id: String,

    /// Repository id of the proposal
    pub repository_id: u64,

    /// Proposal id
    pub proposal_id: u64,

    /// Changed files whose owners were queried
    pub files_examined: usize,

    /// Changed files that declared at least one owner
    pub files_with_owners: usize,

    /// Paths whose attribute query failed
    pub query_failures: Vec<String>,

    /// Owner tokens that did not resolve to an account
    pub unresolved: Vec<String>,

    /// Accounts offered as reviewers, in order
    pub reviewers: Vec<ReviewerRecord>,

    /// Enumeration ended before the diff was exhausted
    pub stopped_early: bool,

    /// Why the check ended early, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,

    /// Wall-clock runtime in milliseconds
    pub runtime_ms: u64,
}

impl CheckReport {
    /// Empty report for a check of `proposal`
    pub fn new(check_id: CheckId, proposal: &Proposal) -> Self {
        Self {
            check_id: check_id.to_string(),
            repository_id: proposal.repository.id,
            proposal_id: proposal.id,
            files_examined: 0,
            files_with_owners: 0,
            query_failures: Vec::new(),
            unresolved: Vec::new(),
            reviewers: Vec::new(),
            stopped_early: false,
            aborted: None,
            runtime_ms: 0,
        }
    }

    /// Account names whose offer ended with `outcome`
    pub fn users_with(&self, outcome: &AssignmentOutcome) -> Vec<&str> {
        self.reviewers
            .iter()
            .filter(|r| &r.outcome == outcome)
            .map(|r| r.user.as_str())
            .collect()
    }

    /// Accounts that were newly added as reviewers
    pub fn added(&self) -> Vec<&str> {
        self.users_with(&AssignmentOutcome::Added)
    }

    /// Number of offers that failed in storage
    pub fn failed_count(&self) -> usize {
        self.reviewers
            .iter()
            .filter(|r| matches!(r.outcome, AssignmentOutcome::Failed(_)))
            .count()
    }

    /// Whether the check ran to the end without aborting
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "Check {} (repository {}, proposal {})",
                self.check_id, self.repository_id, self.proposal_id
            ),
            "=".repeat(40),
        ];

        if let Some(reason) = &self.aborted {
            lines.push(format!("Aborted: {}", reason));
        }

        lines.push(format!(
            "Files examined: {}{}",
            self.files_examined,
            if self.stopped_early { " (stopped early)" } else { "" }
        ));
        lines.push(format!("Files with owners: {}", self.files_with_owners));

        if !self.query_failures.is_empty() {
            lines.push(format!("Query failures: {}", self.query_failures.join(", ")));
        }
        if !self.unresolved.is_empty() {
            lines.push(format!("Unresolved owners: {}", self.unresolved.join(", ")));
        }

        if self.reviewers.is_empty() {
            lines.push("Reviewers: none".to_string());
        } else {
            lines.push("Reviewers:".to_string());
            for record in &self.reviewers {
                let outcome = match &record.outcome {
                    AssignmentOutcome::Added => "added".to_string(),
                    AssignmentOutcome::AlreadyPresent => "already a reviewer".to_string(),
                    AssignmentOutcome::AuthorConflict => "author, skipped".to_string(),
                    AssignmentOutcome::Failed(reason) => format!("failed: {}", reason),
                    AssignmentOutcome::Skipped => "dry run".to_string(),
                };
                lines.push(format!("  {}: {}", record.user, outcome));
            }
        }

        lines.push(format!("Runtime: {} ms", self.runtime_ms));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownreview_domain::Repository;

    fn report() -> CheckReport {
        let repo = Repository::new(4, "proj/repo", "/srv/git/repo.git");
        let proposal = Proposal::new(9, repo, "main", "feature", "carol");
        CheckReport::new(CheckId::from_value(1), &proposal)
    }

    fn record(user: &str, outcome: AssignmentOutcome) -> ReviewerRecord {
        ReviewerRecord { user: user.to_string(), outcome }
    }

    #[test]
    fn test_new_report_is_empty() {
        let report = report();
        assert_eq!(report.repository_id, 4);
        assert_eq!(report.proposal_id, 9);
        assert!(report.is_complete());
        assert!(report.added().is_empty());
        assert!(report.summary().contains("Reviewers: none"));
    }

    #[test]
    fn test_outcome_queries() {
        let mut report = report();
        report.reviewers.push(record("alice", AssignmentOutcome::Added));
        report.reviewers.push(record("carol", AssignmentOutcome::AuthorConflict));
        report.reviewers.push(record("dave", AssignmentOutcome::Failed("db locked".to_string())));

        assert_eq!(report.added(), vec!["alice"]);
        assert_eq!(report.users_with(&AssignmentOutcome::AuthorConflict), vec!["carol"]);
        assert_eq!(report.failed_count(), 1);

        let summary = report.summary();
        assert!(summary.contains("alice: added"));
        assert!(summary.contains("dave: failed: db locked"));
    }

    #[test]
    fn test_json_shape() {
        let mut report = report();
        report.reviewers.push(record("alice", AssignmentOutcome::Added));
        report.reviewers.push(record("dave", AssignmentOutcome::Failed("db locked".to_string())));

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["reviewers"][0]["user"], "alice");
        assert_eq!(value["reviewers"][0]["outcome"], "added");
        assert_eq!(value["reviewers"][1]["outcome"], "failed");
        assert_eq!(value["reviewers"][1]["reason"], "db locked");
        assert!(value.get("aborted").is_none());
    }

    #[test]
    fn test_from_reviewer_addition() {
        assert_eq!(AssignmentOutcome::from(ReviewerAddition::Added), AssignmentOutcome::Added);
        assert_eq!(
            AssignmentOutcome::from(ReviewerAddition::AuthorConflict),
            AssignmentOutcome::AuthorConflict
        );
    }
}
