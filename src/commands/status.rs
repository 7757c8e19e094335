//! The `status` command: read-only classification of every declared link.
use anyhow::Result;

use crate::cli::{GlobalOpts, StatusOpts};
use crate::commands::CommandSetup;
use crate::linker::{LinkState, classify};
use crate::logging::Log;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if setup fails.  A dirty status is not an error; the
/// summary tells the user what `link` would touch.
pub fn run(global: &GlobalOpts, _opts: &StatusOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let requests = setup.requests(log);

    log.stage("Checking links");
    let mut linked = 0u32;
    let mut missing = 0u32;
    let mut occupied = 0u32;
    for request in &requests {
        match classify(request) {
            LinkState::Correct => {
                log.debug(&format!("linked: {}", request.description()));
                linked += 1;
            }
            LinkState::Missing => {
                log.info(&format!("missing: {}", request.dest.display()));
                missing += 1;
            }
            LinkState::Occupied(occupant) => {
                log.info(&format!(
                    "occupied: {} is {occupant}",
                    request.dest.display()
                ));
                occupied += 1;
            }
        }
    }

    log.info(&format!(
        "{linked} linked, {missing} missing, {occupied} occupied"
    ));
    Ok(())
}
