//! List currencies command.

use anyhow::Result;

use crate::cli::{AppContext, CurrenciesArgs};

pub async fn run(args: CurrenciesArgs, ctx: &AppContext) -> Result<()> {
    let currencies = ctx.service.currencies().await;
    if currencies.is_empty() {
        println!("Currency list is unavailable.");
        return Ok(());
    }

    let needle = args.filter.unwrap_or_default().trim().to_lowercase();
    let favorites = ctx.preferences.load().favorites;

    println!("Supported Currencies");
    println!("═══════════════════════════════════════════");
    let mut shown = 0;
    for (code, name) in &currencies {
        if !needle.is_empty()
            && !code.as_str().to_lowercase().contains(&needle)
            && !name.to_lowercase().contains(&needle)
        {
            continue;
        }
        let star = if favorites.contains(code) { "*" } else { " " };
        println!("  {} {}  {}", star, code, name);
        shown += 1;
    }

    println!();
    println!("{} of {} currencies shown. * marks favorites.", shown, currencies.len());
    Ok(())
}
