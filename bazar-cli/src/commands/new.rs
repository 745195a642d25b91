//! New command - interactive list creation wizard
//!
//! Drives the core creation workflow: a details step (name and date),
//! then an item step where items are added, checked off with prices,
//! and finally saved. Validation failures are shown and the wizard
//! stays where it is; a failed save keeps the draft so the user can
//! retry or cancel.

use anyhow::Result;
use bazar_core::domain::format_money;
use bazar_core::services::LogEvent;
use bazar_core::workflow::{CreationWorkflow, Step};
use bazar_core::{BazarContext, Item, Unit};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use uuid::Uuid;

use super::{friendly_message, get_context, get_logger, log_event, reason_code};
use crate::output;

pub fn run() -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        output::error("'bz new' needs an interactive terminal.");
        std::process::exit(1);
    }

    let logger = get_logger();
    let ctx = get_context()?;

    let user = match ctx.require_user() {
        Ok(user) => user,
        Err(e) => {
            output::error(&friendly_message(&e));
            std::process::exit(1);
        }
    };

    println!("Creating a new bazar for {}.", user.name_for_lists().bold());

    let mut wf = ctx.new_workflow();
    loop {
        match wf.step() {
            Step::Details => details_step(&mut wf)?,
            Step::List => {
                if !list_step(&mut wf, &ctx, &logger)? {
                    output::info("Cancelled. Nothing was saved.");
                    return Ok(());
                }
            }
            Step::Done => break,
            // Saves complete within list_step; we never observe this
            Step::Saving => unreachable!(),
        }
    }

    Ok(())
}

/// Collect the optional name and the required trip date
fn details_step(wf: &mut CreationWorkflow) -> Result<()> {
    let name: String = Input::new()
        .with_prompt("List name (blank for a default)")
        .allow_empty(true)
        .with_initial_text(wf.name().to_string())
        .interact_text()?;
    if let Err(e) = wf.set_name(&name) {
        output::error(&friendly_message(&e));
        return Ok(());
    }

    loop {
        let default_date = wf
            .date()
            .unwrap_or_else(|| chrono::Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();
        let raw: String = Input::new()
            .with_prompt("Bazar date (YYYY-MM-DD)")
            .default(default_date)
            .interact_text()?;

        let date = match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                output::error("Enter a date as YYYY-MM-DD.");
                continue;
            }
        };
        match wf.set_date(date) {
            Ok(()) => break,
            Err(e) => output::error(&friendly_message(&e)),
        }
    }

    // Date is set, so this cannot fail
    if let Err(e) = wf.advance() {
        output::error(&friendly_message(&e));
    }
    Ok(())
}

/// One round of the item step. Returns false when the user cancels.
fn list_step(
    wf: &mut CreationWorkflow,
    ctx: &BazarContext,
    logger: &Option<bazar_core::services::LoggingService>,
) -> Result<bool> {
    render_items(wf);

    let actions = [
        "Add item",
        "Check off item",
        "Uncheck item",
        "Remove item",
        "Edit name/date",
        "Save list",
        "Cancel",
    ];
    let choice = Select::new()
        .with_prompt("What next?")
        .items(&actions)
        .default(0)
        .interact()?;

    match choice {
        0 => add_item(wf)?,
        1 => check_item(wf)?,
        2 => uncheck_item(wf)?,
        3 => remove_item(wf)?,
        4 => {
            // Name, date, and items are all preserved across this
            if let Err(e) = wf.back() {
                output::error(&friendly_message(&e));
            }
        }
        5 => save(wf, ctx, logger)?,
        _ => {
            if Confirm::new()
                .with_prompt("Discard this list?")
                .default(false)
                .interact()?
            {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn render_items(wf: &CreationWorkflow) {
    println!();
    if wf.items().is_empty() {
        println!("{}", "No items yet.".dimmed());
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["", "Item", "Amount", "Price"]);
    for item in wf.items() {
        let mark = if item.is_checked {
            "x".green().to_string()
        } else {
            String::new()
        };
        let price = item
            .price
            .map(format_money)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            mark,
            item.name.clone(),
            format!("{} {}", item.amount, item.unit),
            price,
        ]);
    }
    println!("{}", table);
    println!("Total spent: {}", format_money(wf.total()).bold());
}

fn add_item(wf: &mut CreationWorkflow) -> Result<()> {
    let name: String = Input::new().with_prompt("Item name").interact_text()?;
    let amount: String = Input::new().with_prompt("Amount").interact_text()?;

    let unit_labels: Vec<&str> = Unit::ALL.iter().map(|u| u.as_str()).collect();
    let unit_index = Select::new()
        .with_prompt("Unit")
        .items(&unit_labels)
        .default(0)
        .interact()?;
    let unit = Unit::ALL[unit_index];

    if let Err(e) = wf.add_item(&name, &amount, unit) {
        output::error(&friendly_message(&e));
    }
    Ok(())
}

fn check_item(wf: &mut CreationWorkflow) -> Result<()> {
    let Some(id) = pick_item(wf.items(), |item| !item.is_checked, "Check off which item?")?
    else {
        output::info("Every item is already checked.");
        return Ok(());
    };

    let price: String = Input::new().with_prompt("Price paid").interact_text()?;
    if let Err(e) = wf.check_item(id, &price) {
        output::error(&friendly_message(&e));
    }
    Ok(())
}

fn uncheck_item(wf: &mut CreationWorkflow) -> Result<()> {
    let Some(id) = pick_item(wf.items(), |item| item.is_checked, "Uncheck which item?")? else {
        output::info("No checked items.");
        return Ok(());
    };

    if let Err(e) = wf.uncheck_item(id) {
        output::error(&friendly_message(&e));
    }
    Ok(())
}

fn remove_item(wf: &mut CreationWorkflow) -> Result<()> {
    let Some(id) = pick_item(wf.items(), |_| true, "Remove which item?")? else {
        output::info("No items to remove.");
        return Ok(());
    };

    if let Err(e) = wf.remove_item(id) {
        output::error(&friendly_message(&e));
    }
    Ok(())
}

/// Select one item matching `filter`, or None when nothing matches
fn pick_item(
    items: &[Item],
    filter: impl Fn(&Item) -> bool,
    prompt: &str,
) -> Result<Option<Uuid>> {
    let candidates: Vec<&Item> = items.iter().filter(|item| filter(item)).collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|item| format!("{} ({} {})", item.name, item.amount, item.unit))
        .collect();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(Some(candidates[index].id))
}

fn save(
    wf: &mut CreationWorkflow,
    ctx: &BazarContext,
    logger: &Option<bazar_core::services::LoggingService>,
) -> Result<()> {
    let bar = super::spinner("Saving list...");
    let result = ctx.save_list(wf);
    bar.finish_and_clear();

    match result {
        Ok(list) => {
            output::success(&format!(
                "Saved '{}' with {} item(s). Total spent: {}.",
                list.name,
                list.item_count(),
                format_money(list.total())
            ));
            log_event(logger, LogEvent::new("list_saved").with_command("new"));
        }
        Err(e) => {
            // The draft is intact; the wizard stays on the item step
            log_event(
                logger,
                LogEvent::new("save_failed")
                    .with_command("new")
                    .with_reason(reason_code(&e)),
            );
            output::error(&friendly_message(&e));
        }
    }
    Ok(())
}
