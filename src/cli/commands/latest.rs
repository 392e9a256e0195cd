//! Latest rates command.

use anyhow::Result;
use tracing::info;

use crate::cli::{AppContext, LatestArgs, OutputFormat};

pub async fn run(args: LatestArgs, ctx: &AppContext) -> Result<()> {
    let (base, symbols) = ctx.market(&args.market);
    info!("Fetching latest rates for {}", base);

    let point = ctx.service.latest(base, &symbols).await;

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&point)?);
        return Ok(());
    }

    if point.is_empty() {
        println!("No rates available for {}.", base);
        return Ok(());
    }

    let date = point.date.map(|d| d.to_string()).unwrap_or_else(|| "latest".to_string());
    println!("Rates for 1 {} ({})", point.base, date);
    println!("═══════════════════════════════");
    for (code, rate) in point.iter() {
        println!("  {:<5} {:>14.4}", code, rate);
    }

    Ok(())
}
