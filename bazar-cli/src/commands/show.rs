//! Show command - one saved list in detail

use anyhow::Result;
use bazar_core::domain::{format_long_date, format_money};
use colored::Colorize;
use uuid::Uuid;

use super::{friendly_message, get_context};
use crate::output;

pub fn run(id: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let id: Uuid = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            output::error(&format!("'{}' is not a valid list id.", id));
            std::process::exit(1);
        }
    };

    let bar = super::spinner("Fetching lists...");
    let result = ctx.refresh_history();
    bar.finish_and_clear();

    if let Err(e) = result {
        output::error(&friendly_message(&e));
        std::process::exit(1);
    }

    let Some(list) = ctx.history.get(id)? else {
        output::error("No saved list with that id.");
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", list.name.bold());
    println!(
        "{} by {}",
        format_long_date(list.date),
        list.user_name
    );
    println!();

    if list.items.is_empty() {
        println!("{}", "This list has no items.".dimmed());
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["", "Item", "Amount", "Price"]);
        for item in &list.items {
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
    }

    println!();
    println!("Total spent: {}", format_money(list.total()).bold());

    Ok(())
}
