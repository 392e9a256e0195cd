//! Currency conversion command.

use anyhow::Result;
use fxdash_core::sanitize::sanitize_amount;
use fxdash_data::conversion::DEFAULT_AMOUNT;
use tracing::{info, warn};

use crate::cli::{AppContext, ConvertArgs};

pub async fn run(args: ConvertArgs, ctx: &AppContext) -> Result<()> {
    let from = ctx.base(Some(&args.from));
    let to = ctx.base(Some(&args.to));
    if sanitize_amount(args.amount, DEFAULT_AMOUNT) != args.amount {
        warn!(amount = args.amount, "invalid amount, converting {} instead", DEFAULT_AMOUNT);
    }

    let conversion = ctx.service.convert(args.amount, from, to).await?;

    println!(
        "{} {} = {} {}",
        conversion.amount, conversion.from, conversion.result, conversion.to
    );
    println!("Rate: 1 {} = {:.4} {}", conversion.from, conversion.rate, conversion.to);

    if !args.no_save {
        // History is best effort
        match ctx.preferences.record_conversion(conversion) {
            Ok(_) => info!("Conversion saved to history"),
            Err(e) => warn!(error = %e, "failed to save conversion history"),
        }
    }

    Ok(())
}
