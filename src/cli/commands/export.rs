//! Export command.

use anyhow::{Context, Result};
use chrono::Utc;
use fxdash_data::export::{export_rows, filter_rows, to_csv, to_json};
use tracing::info;

use crate::cli::{AppContext, ExportArgs, ExportFormat};

pub async fn run(args: ExportArgs, ctx: &AppContext) -> Result<()> {
    let (base, symbols) = ctx.market(&args.market);

    let today = Utc::now().date_naive();
    let (snapshot, names) = tokio::join!(
        ctx.service.overview(base, &symbols, today),
        ctx.service.currencies()
    );

    let rows = export_rows(&snapshot.rows, &names);
    let rows = filter_rows(rows, args.filter.as_deref().unwrap_or_default());

    let rendered = match args.format {
        ExportFormat::Csv => to_csv(&rows)?,
        ExportFormat::Json => to_json(&rows)?,
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Exported {} rows to {:?}", rows.len(), path);
            println!("Exported {} rows to {}", rows.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
