//! Owners command implementation.

use ownreview_assigner::AssignerConfig;
use ownreview_domain::Repository;
use ownreview_git::{AttributeQuery, SnapshotManager, SystemGit};

use crate::cli::OwnersArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the owners command.
pub fn execute_owners(
    args: OwnersArgs,
    config: &AssignerConfig,
    formatter: &Formatter,
) -> Result<()> {
    let repository = Repository::new(0, args.repo.display().to_string(), args.repo.clone());
    let git = SystemGit::default();

    let mut snapshots =
        SnapshotManager::new(git.clone()).with_prefix(config.snapshot_prefix.clone());
    if let Some(dir) = &config.snapshot_dir {
        snapshots = snapshots.with_dir(dir.clone());
    }
    let attributes = AttributeQuery::new(git, config.attribute_name.clone());

    let snapshot = snapshots.acquire(&repository, &args.rev)?;
    let mut owners = Vec::with_capacity(args.paths.len());
    for path in args.paths {
        match attributes.owners_for(&repository, &snapshot, &path) {
            Ok(declared) => owners.push((path, declared)),
            Err(e) => {
                snapshot.release();
                return Err(CliError::Git(e));
            }
        }
    }
    snapshot.release();

    println!("{}", formatter.format_owners(&owners)?);
    Ok(())
}
