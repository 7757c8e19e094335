//! The `unlink` command: remove links previously created by `link`,
//! leaving foreign content untouched.
use anyhow::Result;

use crate::cli::{GlobalOpts, UnlinkOpts};
use crate::commands::CommandSetup;
use crate::linker::{LinkState, Linker, UnlinkOutcome, classify};
use crate::logging::Log;

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if setup fails or any removal failed.
pub fn run(global: &GlobalOpts, _opts: &UnlinkOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let requests = setup.requests(log);

    if global.dry_run {
        log.stage("Previewing removals");
        let mut would_remove = 0u32;
        for request in &requests {
            if classify(request) == LinkState::Correct {
                log.dry_run(&format!("would remove {}", request.dest.display()));
                would_remove += 1;
            }
        }
        log.info(&format!("{would_remove} would be removed (dry run)"));
        return Ok(());
    }

    log.stage("Removing links");
    let linker = Linker::new(setup.home, log);
    let outcomes = linker.unapply(&requests);

    let removed = outcomes
        .iter()
        .filter(|o| matches!(o, UnlinkOutcome::Removed))
        .count();
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, UnlinkOutcome::Failed(_)))
        .count();
    log.info(&format!("{removed} removed"));

    if failed > 0 {
        anyhow::bail!("{failed} removal(s) failed");
    }
    Ok(())
}
