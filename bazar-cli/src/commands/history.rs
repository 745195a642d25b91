//! History command - show saved lists

use anyhow::Result;
use bazar_core::domain::{format_long_date, format_money};
use colored::Colorize;
use rust_decimal::Decimal;

use super::{friendly_message, get_context, get_logger, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let bar = super::spinner("Fetching lists...");
    let result = ctx.refresh_history();
    bar.finish_and_clear();

    if let Err(e) = result {
        output::error(&friendly_message(&e));
        std::process::exit(1);
    }

    let lists = ctx.history.lists_sorted()?;
    log_event(
        &logger,
        bazar_core::services::LogEvent::new("history_viewed").with_command("history"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }

    if lists.is_empty() {
        println!("No saved lists yet. Create one with 'bz new'.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Date", "Name", "Items", "Total"]);
    for list in &lists {
        let checked = list.items.iter().filter(|item| item.is_checked).count();
        table.add_row(vec![
            list.id.to_string(),
            format_long_date(list.date),
            list.name.clone(),
            format!("{}/{} checked", checked, list.item_count()),
            format_money(list.total()),
        ]);
    }
    println!("{}", table);
    println!();

    let grand_total: Decimal = lists.iter().map(|list| list.total()).sum();
    println!(
        "{} saved list(s), {} spent in total. Use {} for details.",
        lists.len(),
        format_money(grand_total),
        "bz show <id>".bold()
    );

    Ok(())
}
