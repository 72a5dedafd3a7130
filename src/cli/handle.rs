//! Handle command - run the merge orchestrator on a saved payload

use crate::cli::context::command_context;
use crate::cli::style::Stylize;
use anstream::println;
use shipit::error::Result;
use shipit::event::MergeEvent;
use shipit::merge::{ActionStatus, MergeOutcome, merge_and_label};
use std::io::Read;
use std::path::Path;

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read(path)?)
}

/// Run the handle command
pub async fn run_handle(config_path: Option<&Path>, event_name: &str, payload: &Path) -> Result<()> {
    let event = MergeEvent::from_payload(event_name, &read_payload(payload)?)?;
    let ctx = command_context(config_path).await?;

    let outcome = merge_and_label(&ctx, &event).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &MergeOutcome) {
    let sha = outcome.merge.sha.as_deref().unwrap_or("(no sha)");
    println!(
        "{} {} {}",
        "Merged".success(),
        outcome.request.reference().accent(),
        sha.muted()
    );

    for report in &outcome.actions {
        match &report.status {
            ActionStatus::Done => println!("  {} {}", "✓".success(), report.action),
            ActionStatus::Skipped(reason) => {
                println!("  {} {} {}", "-".muted(), report.action, reason.muted());
            }
            ActionStatus::Failed(reason) => {
                println!("  {} {} {}", "✗".warn(), report.action, reason.warn());
            }
        }
    }
}
