//! Conversion history command.

use anyhow::{Context, Result};

use crate::cli::{AppContext, HistoryArgs};

pub async fn run(args: HistoryArgs, ctx: &AppContext) -> Result<()> {
    if args.clear {
        ctx.preferences
            .clear_history()
            .context("Failed to clear history")?;
        println!("History cleared.");
        return Ok(());
    }

    let history = ctx.preferences.load().history;
    if history.is_empty() {
        println!("No conversions yet.");
        return Ok(());
    }

    let limit = args.limit.unwrap_or(history.len());
    println!("Recent Conversions");
    println!("═══════════════════════════════════════════════════════════");
    for conv in history.iter().take(limit) {
        println!(
            "  {}  {} {} = {} {}  (rate {:.4})",
            conv.timestamp.format("%Y-%m-%d %H:%M"),
            conv.amount,
            conv.from,
            conv.result,
            conv.to,
            conv.rate
        );
    }
    Ok(())
}
