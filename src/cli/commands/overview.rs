//! Market overview command.

use anyhow::Result;
use chrono::Utc;
use fxdash_analytics::rank_by_strength;
use tracing::info;

use super::pct;
use crate::cli::{AppContext, OutputFormat, OverviewArgs};

pub async fn run(args: OverviewArgs, ctx: &AppContext) -> Result<()> {
    let (base, symbols) = ctx.market(&args.market);
    info!("Building overview for {}", base);

    let mut snapshot = ctx
        .service
        .overview(base, &symbols, Utc::now().date_naive())
        .await;
    if args.rank {
        rank_by_strength(&mut snapshot.rows);
    }

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No rates available for {}.", base);
        return Ok(());
    }

    let date = snapshot.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    println!("Market overview for {} ({})", snapshot.base, date);
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  {:<5} {:>12} {:>9} {:>9} {:>9} {:>9}  {:<9} {:<7}",
        "Code", "Rate", "24h", "7d", "30d", "Strength", "Class", "Trend"
    );
    for row in &snapshot.rows {
        let (score, class) = match row.strength {
            Some(s) => (format!("{:+.2}", s.score), s.class.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let trend = row
            .metrics
            .and_then(|m| m.trend)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<5} {:>12.4} {:>9} {:>9} {:>9} {:>9}  {:<9} {:<7}",
            row.code.to_string(),
            row.rate,
            pct(row.change_percent_24h()),
            pct(row.change_7d),
            pct(row.change_30d),
            score,
            class,
            trend
        );
    }

    Ok(())
}
