//! Check command implementation.

use ownreview_assigner::{AssignerConfig, CheckReport, ReviewerAssigner};
use ownreview_domain::{Proposal, Repository};
use ownreview_git::{GitDiffChanges, SystemGit};

use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use crate::host::{LocalDirectory, LocalSecurity, MemoryReviewers};
use crate::output::Formatter;

/// Execute the check command.
pub fn execute_check(args: CheckArgs, config: AssignerConfig, formatter: &Formatter) -> Result<()> {
    let (report, reviewers) = run_check(args, config)?;
    println!("{}", formatter.format_report(&report, &reviewers)?);

    match report.aborted {
        Some(reason) => Err(CliError::Aborted(reason)),
        None => Ok(()),
    }
}

/// Run one check with local host services; returns the report and the
/// proposal's reviewers afterwards.
pub fn run_check(
    args: CheckArgs,
    mut config: AssignerConfig,
) -> Result<(CheckReport, Vec<String>)> {
    if args.dry_run {
        config.dry_run = true;
    }

    let directory = LocalDirectory::from_file(&args.users)?;
    if directory.is_empty() {
        tracing::warn!("No users in {}; no owner will resolve", args.users.display());
    }

    let slug = args
        .repo
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| args.repo.display().to_string());
    let repository = Repository::new(0, slug, args.repo.clone());
    let proposal = Proposal::new(
        args.proposal_id,
        repository,
        args.target,
        args.source,
        args.author.clone(),
    );

    let security = LocalSecurity;
    let reviewers = MemoryReviewers::new(args.author);
    let git = SystemGit::default();
    let assigner = ReviewerAssigner::new(
        config,
        git.clone(),
        GitDiffChanges::new(git),
        &directory,
        &security,
        &reviewers,
    )?;

    let report = assigner.check(&proposal);
    Ok((report, reviewers.reviewers()))
}
