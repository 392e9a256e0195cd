//! Favorite currencies command.

use anyhow::{Context, Result};
use fxdash_core::types::CurrencyCode;

use crate::cli::{AppContext, FavoritesAction, FavoritesArgs};

pub async fn run(args: FavoritesArgs, ctx: &AppContext) -> Result<()> {
    match args.action.unwrap_or(FavoritesAction::List) {
        FavoritesAction::List => list(ctx).await,
        FavoritesAction::Add { code } => {
            let code = parse(&code)?;
            let added = ctx
                .preferences
                .add_favorite(code)
                .context("Failed to save favorites")?;
            if added {
                println!("Added {} to favorites.", code);
            } else {
                println!(
                    "{} not added: already a favorite or the list is full ({} max).",
                    code, ctx.config.preferences.favorites_limit
                );
            }
            Ok(())
        }
        FavoritesAction::Remove { code } => {
            let code = parse(&code)?;
            let removed = ctx
                .preferences
                .remove_favorite(code)
                .context("Failed to save favorites")?;
            if removed {
                println!("Removed {} from favorites.", code);
            } else {
                println!("{} is not a favorite.", code);
            }
            Ok(())
        }
    }
}

/// Favorites are stored, so reject bad codes instead of substituting a default.
fn parse(input: &str) -> Result<CurrencyCode> {
    Ok(input.trim().to_ascii_uppercase().parse::<CurrencyCode>()?)
}

async fn list(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.preferences.load().favorites;
    if favorites.is_empty() {
        println!("No favorites yet. Add one with `fxdash favorites add <CODE>`.");
        return Ok(());
    }

    let base = ctx.config.dashboard.base();
    let point = ctx.service.latest(base, &favorites).await;

    println!("Favorites (1 {})", base);
    println!("═══════════════════════════════");
    for code in favorites {
        let rate = point
            .rate(code)
            .filter(|_| point.base == base)
            .map(|r| format!("{:.4}", r))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<5} {:>14}", code, rate);
    }
    Ok(())
}
