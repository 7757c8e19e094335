//! The `link` command: apply every declared link, backing up anything in
//! the way after confirmation.
use anyhow::Result;

use crate::cli::{GlobalOpts, LinkOpts};
use crate::commands::CommandSetup;
use crate::confirm::{Confirm, Preset, StdinConfirm};
use crate::linker::{LinkOutcome, LinkRequest, Linker};
use crate::logging::Log;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails or any request failed, so the process
/// exits non-zero.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let requests = filter_requests(setup.requests(log), opts);

    if requests.is_empty() {
        log.info("nothing to link");
        return Ok(());
    }

    let linker = Linker::new(setup.home.clone(), log);

    if global.dry_run {
        log.stage("Previewing links");
        let stats = linker.plan(&requests);
        log.info(&format!("{} (dry run)", stats.summary()));
        return Ok(());
    }

    log.stage("Installing links");
    let assume_yes = Preset::yes();
    let interactive = StdinConfirm;
    let confirm: &dyn Confirm = if global.yes { &assume_yes } else { &interactive };
    let report = linker.apply(&requests, confirm);

    for outcome in &report.outcomes {
        if let LinkOutcome::Failed(failure) = outcome {
            log.debug(&format!("failure detail: {failure}"));
        }
    }

    if let Some(ref backup_dir) = report.backup_dir {
        log.info(&format!(
            "displaced originals are in {}",
            backup_dir.display()
        ));
    }
    log.info(&report.stats().summary());

    if report.has_failures() {
        anyhow::bail!("{} link(s) failed", report.stats().failed);
    }
    Ok(())
}

/// Apply the `--only` / `--skip` source-path filters.
fn filter_requests(requests: Vec<LinkRequest>, opts: &LinkOpts) -> Vec<LinkRequest> {
    requests
        .into_iter()
        .filter(|request| {
            let source = request.source.to_string_lossy().to_lowercase();
            if !opts.only.is_empty() {
                return opts
                    .only
                    .iter()
                    .any(|o| source.contains(&o.to_lowercase()));
            }
            if !opts.skip.is_empty() {
                return !opts.skip.iter().any(|s| source.contains(&s.to_lowercase()));
            }
            true
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request(source: &str) -> LinkRequest {
        LinkRequest::new(PathBuf::from(source), PathBuf::from("/home/test/.x"))
    }

    fn opts(only: &[&str], skip: &[&str]) -> LinkOpts {
        LinkOpts {
            only: only.iter().map(ToString::to_string).collect(),
            skip: skip.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn no_filters_keeps_everything() {
        let requests = vec![request("/repo/links/bashrc"), request("/repo/links/zshrc")];
        let kept = filter_requests(requests, &opts(&[], &[]));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn only_filter_selects_matching_sources() {
        let requests = vec![request("/repo/links/bashrc"), request("/repo/links/zshrc")];
        let kept = filter_requests(requests, &opts(&["bash"], &[]));
        assert_eq!(kept.len(), 1);
        assert!(kept[0].source.to_string_lossy().contains("bashrc"));
    }

    #[test]
    fn skip_filter_drops_matching_sources() {
        let requests = vec![request("/repo/links/bashrc"), request("/repo/links/zshrc")];
        let kept = filter_requests(requests, &opts(&[], &["zsh"]));
        assert_eq!(kept.len(), 1);
        assert!(kept[0].source.to_string_lossy().contains("bashrc"));
    }

    #[test]
    fn only_takes_precedence_over_skip() {
        let requests = vec![request("/repo/links/bashrc"), request("/repo/links/zshrc")];
        let kept = filter_requests(requests, &opts(&["zsh"], &["zsh"]));
        assert_eq!(kept.len(), 1);
        assert!(kept[0].source.to_string_lossy().contains("zshrc"));
    }

    #[test]
    fn filters_are_case_insensitive() {
        let requests = vec![request("/repo/links/Bashrc")];
        let kept = filter_requests(requests, &opts(&["bASH"], &[]));
        assert_eq!(kept.len(), 1);
    }
}
