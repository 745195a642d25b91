//! Status command - session and storage summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use super::{get_bazar_dir, get_context};

#[derive(Serialize)]
struct StatusSummary {
    mode: &'static str,
    bazar_dir: String,
    signed_in: bool,
    email: Option<String>,
    saved_lists: Option<usize>,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let bazar_dir = get_bazar_dir();

    let mode = if ctx.config.is_local() { "local" } else { "remote" };
    let user = ctx.session.current_user();

    // List count is best-effort; an unreachable store should not break status
    let list_count = match &user {
        Some(u) => ctx
            .history
            .refresh(u)
            .and_then(|_| ctx.history.len())
            .ok(),
        None => None,
    };

    if json {
        let summary = StatusSummary {
            mode,
            bazar_dir: bazar_dir.to_string_lossy().into_owned(),
            signed_in: user.is_some(),
            email: user.as_ref().map(|u| u.email.clone()),
            saved_lists: list_count,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Bazar Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Mode", mode]);
    table.add_row(vec!["Directory", &bazar_dir.to_string_lossy()]);
    match &user {
        Some(u) => {
            table.add_row(vec!["Signed in as", &u.email]);
            table.add_row(vec![
                "Saved lists",
                &list_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "unavailable".to_string()),
            ]);
        }
        None => {
            table.add_row(vec!["Signed in as", "-"]);
        }
    }
    println!("{}", table);

    if user.is_none() {
        println!();
        println!("Sign in with 'bz login' or create an account with 'bz signup'.");
    }

    Ok(())
}
