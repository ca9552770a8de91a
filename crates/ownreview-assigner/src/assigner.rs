//! Reviewer assignment engine

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::ops::ControlFlow;
use std::time::Instant;

use ownreview_domain::traits::{ChangeSource, ReviewerStore, SecurityService, UserDirectory};
use ownreview_domain::{ChangedFile, CheckId, OwnerDeclaration, Proposal, UserAccount};
use ownreview_git::{AttributeQuery, GitRunner, IndexSnapshot, SnapshotManager};

use crate::{
    AssignerConfig, AssignerError, AssignmentOutcome, CheckReport, IdentityResolver,
    ReviewerRecord,
};

/// Adds the declared owners of changed files as reviewers of a proposal
///
/// Each [`check`](ReviewerAssigner::check) is independent: it takes a private
/// snapshot of the source revision, walks the proposal's changed files, and
/// offers every resolved owner to the reviewer store. Only a failed snapshot
/// (or a failed diff) ends a check early; every other failure is logged and
/// skipped.
///
/// # Examples
///
/// ```no_run
/// # use ownreview_assigner::{AssignerConfig, ReviewerAssigner};
/// # use ownreview_domain::{Proposal, Repository};
/// # use ownreview_git::{GitDiffChanges, SystemGit};
/// # fn host<U, S, R>(users: U, security: S, reviewers: R) -> Result<(), Box<dyn std::error::Error>>
/// # where
/// #     U: ownreview_domain::traits::UserDirectory, U::Error: std::fmt::Display,
/// #     S: ownreview_domain::traits::SecurityService, S::Error: std::fmt::Display,
/// #     R: ownreview_domain::traits::ReviewerStore, R::Error: std::fmt::Display,
/// # {
/// let git = SystemGit::default();
/// let assigner = ReviewerAssigner::new(
///     AssignerConfig::default(),
///     git.clone(),
///     GitDiffChanges::new(git),
///     users,
///     security,
///     reviewers,
/// )?;
///
/// let repo = Repository::new(1, "proj/repo", "/srv/git/repo.git");
/// let proposal = Proposal::new(42, repo, "main", "4f2c1e0", "carol");
/// let report = assigner.check(&proposal);
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct ReviewerAssigner<G, C, U, S, R> {
    config: AssignerConfig,
    snapshots: SnapshotManager<G>,
    attributes: AttributeQuery<G>,
    changes: C,
    resolver: IdentityResolver<U, S>,
    reviewers: R,
}

/// Per-check memory so repeated owners cost one lookup and one successful offer
#[derive(Default)]
struct CheckState {
    resolved: HashMap<OwnerDeclaration, Option<UserAccount>>,
    offered: HashSet<String>,
}

impl<G, C, U, S, R> ReviewerAssigner<G, C, U, S, R>
where
    G: GitRunner + Clone,
    C: ChangeSource,
    C::Error: Display,
    U: UserDirectory,
    U::Error: Display,
    S: SecurityService,
    S::Error: Display,
    R: ReviewerStore,
    R::Error: Display,
{
    /// Create an assigner from a validated configuration and its collaborators
    pub fn new(
        config: AssignerConfig,
        git: G,
        changes: C,
        users: U,
        security: S,
        reviewers: R,
    ) -> Result<Self, AssignerError> {
        config.validate()?;
        let permission = config.permission()?;

        let mut snapshots =
            SnapshotManager::new(git.clone()).with_prefix(config.snapshot_prefix.clone());
        if let Some(dir) = &config.snapshot_dir {
            snapshots = snapshots.with_dir(dir.clone());
        }
        let attributes = AttributeQuery::new(git, config.attribute_name.clone());
        let resolver =
            IdentityResolver::new(users, security, permission, config.lookup_reason.clone());

        Ok(Self {
            config,
            snapshots,
            attributes,
            changes,
            resolver,
            reviewers,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AssignerConfig {
        &self.config
    }

    /// Run one check of `proposal`
    ///
    /// Never fails: problems are logged and reflected in the returned report.
    pub fn check(&self, proposal: &Proposal) -> CheckReport {
        let check_id = CheckId::new();
        let span = tracing::info_span!(
            "check",
            check_id = %check_id,
            repository = %proposal.repository.slug,
            proposal = proposal.id
        );
        let _entered = span.enter();
        let start = Instant::now();

        tracing::info!(
            "Checking owners for proposal {} ({}...{})",
            proposal.id,
            proposal.target_revision,
            proposal.source_revision
        );

        let mut report = CheckReport::new(check_id, proposal);
        if let Err(e) = self.run(proposal, &mut report) {
            tracing::error!("Check aborted: {}", e);
            report.aborted = Some(e.to_string());
        }
        report.runtime_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Check finished: {} files examined, {} reviewers added, {} owners unresolved",
            report.files_examined,
            report.added().len(),
            report.unresolved.len()
        );

        report
    }

    fn run(&self, proposal: &Proposal, report: &mut CheckReport) -> Result<(), AssignerError> {
        let snapshot = self
            .snapshots
            .acquire(&proposal.repository, &proposal.source_revision)?;

        let mut state = CheckState::default();
        let streamed = self.changes.stream_changes(proposal, &mut |file| {
            if let Some(max) = self.config.max_changed_files {
                if report.files_examined >= max {
                    tracing::info!("Reached max_changed_files ({}), stopping", max);
                    return ControlFlow::Break(());
                }
            }
            self.process_file(proposal, &snapshot, file, &mut state, report);
            ControlFlow::Continue(())
        });

        snapshot.release();

        let summary = streamed.map_err(|e| AssignerError::Changes(e.to_string()))?;
        report.stopped_early = summary.stopped_early;
        Ok(())
    }

    fn process_file(
        &self,
        proposal: &Proposal,
        snapshot: &IndexSnapshot,
        file: &ChangedFile,
        state: &mut CheckState,
        report: &mut CheckReport,
    ) {
        report.files_examined += 1;

        let owners = match self
            .attributes
            .owners_for(&proposal.repository, snapshot, &file.path)
        {
            Ok(owners) => owners,
            Err(e) => {
                tracing::error!("{}", e);
                report.query_failures.push(file.to_string());
                return;
            }
        };

        if owners.is_empty() {
            tracing::debug!("{} declares no owners", file);
            return;
        }
        report.files_with_owners += 1;
        tracing::debug!("{} declares {} owner(s)", file, owners.len());

        for owner in owners {
            let account = match state.resolved.get(&owner) {
                Some(cached) => cached.clone(),
                None => {
                    let account = self.resolver.resolve(&owner);
                    if account.is_none() {
                        report.unresolved.push(owner.to_string());
                    }
                    state.resolved.insert(owner, account.clone());
                    account
                }
            };

            let Some(account) = account else {
                continue;
            };
            if state.offered.contains(&account.name) {
                continue;
            }

            let outcome = self.assign(proposal, &account.name);
            // A failed addition stays eligible for the owner's next file
            if !matches!(outcome, AssignmentOutcome::Failed(_)) {
                state.offered.insert(account.name.clone());
            }
            match report.reviewers.iter().position(|r| r.user == account.name) {
                Some(index) => report.reviewers[index].outcome = outcome,
                None => report.reviewers.push(ReviewerRecord {
                    user: account.name,
                    outcome,
                }),
            }
        }
    }

    fn assign(&self, proposal: &Proposal, user: &str) -> AssignmentOutcome {
        if self.config.dry_run {
            tracing::info!("DRY RUN: Would add {} as reviewer", user);
            return AssignmentOutcome::Skipped;
        }

        let attempts = self.config.assignment_retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self
                .reviewers
                .add_reviewer(proposal.repository.id, proposal.id, user)
            {
                Ok(addition) => {
                    let outcome = AssignmentOutcome::from(addition);
                    match outcome {
                        AssignmentOutcome::Added => tracing::info!("Added {} as reviewer", user),
                        AssignmentOutcome::AuthorConflict => {
                            tracing::debug!("{} is the author, not added", user)
                        }
                        _ => tracing::debug!("{} is already a reviewer", user),
                    }
                    return outcome;
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < attempts {
                        tracing::warn!(
                            "Failed to add reviewer {} (attempt {}/{}): {}",
                            user,
                            attempt,
                            attempts,
                            last_error
                        );
                    }
                }
            }
        }

        tracing::error!("Failed to add reviewer {}: {}", user, last_error);
        AssignmentOutcome::Failed(last_error)
    }
}
