//! Clear command - delete every saved list

use anyhow::Result;
use bazar_core::services::LogEvent;
use colored::Colorize;
use dialoguer::Confirm;

use super::{friendly_message, get_context, get_logger, log_event, reason_code};
use crate::output;

pub fn run(force: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let bar = super::spinner("Fetching lists...");
    let result = ctx.refresh_history();
    bar.finish_and_clear();

    if let Err(e) = result {
        output::error(&friendly_message(&e));
        std::process::exit(1);
    }

    let count = ctx.history.len()?;
    if count == 0 {
        println!("No saved lists to delete.");
        return Ok(());
    }

    if !force {
        println!(
            "\n{}",
            format!("This will permanently delete all {} saved list(s).", count).yellow()
        );
        println!("{}\n", "This action cannot be undone.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let bar = super::spinner("Deleting lists...");
    let result = ctx.clear_history();
    bar.finish_and_clear();

    match result {
        Ok(()) => {
            output::success(&format!("Deleted {} saved list(s).", count));
            log_event(&logger, LogEvent::new("history_cleared").with_command("clear"));
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("clear_failed")
                    .with_command("clear")
                    .with_reason(reason_code(&e)),
            );
            output::error(&friendly_message(&e));
            std::process::exit(1);
        }
    }
}
