//! Time series command with moving averages and metrics.

use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use fxdash_analytics::{ExponentialMovingAverage, MovingAverage, SeriesMetrics};
use fxdash_core::sanitize::sanitize_date;
use fxdash_core::traits::Indicator;
use fxdash_core::types::CurrencyCode;
use serde::Serialize;
use tracing::info;

use crate::cli::{AppContext, OutputFormat, SeriesArgs};

#[derive(Serialize)]
struct SeriesRow {
    date: NaiveDate,
    rate: Option<f64>,
    ma: Option<f64>,
    ema: Option<f64>,
}

#[derive(Serialize)]
struct SeriesReport {
    base: CurrencyCode,
    symbol: CurrencyCode,
    start: NaiveDate,
    end: NaiveDate,
    ma_period: usize,
    ema_period: usize,
    rows: Vec<SeriesRow>,
    metrics: Option<SeriesMetrics>,
}

fn four_dp(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

pub async fn run(args: SeriesArgs, ctx: &AppContext) -> Result<()> {
    let base = ctx.base(args.base.as_deref());
    let symbol = ctx.base(Some(&args.symbol));
    if symbol == base {
        anyhow::bail!("Quoted currency must differ from the base ({})", base);
    }

    let today = Utc::now().date_naive();
    let end = args
        .end
        .as_deref()
        .map_or(today, |s| sanitize_date(s, today, today));
    let default_start = end.checked_sub_days(Days::new(args.days)).unwrap_or(end);
    let start = args
        .start
        .as_deref()
        .map_or(default_start, |s| sanitize_date(s, default_start, today));

    info!("Fetching {}/{} from {} to {}", base, symbol, start, end);
    let series = ctx.service.time_series(start, end, today, base, &[symbol]).await;

    let ma = MovingAverage::new(args.ma_period.unwrap_or(ctx.config.dashboard.ma_period));
    let ema = ExponentialMovingAverage::new(args.ema_period.unwrap_or(ctx.config.dashboard.ema_period));

    let values = series.values_for(symbol);
    let ma_values = ma.calculate(&values);
    let ema_values = ema.calculate(&values);

    let rows: Vec<SeriesRow> = series
        .dates()
        .into_iter()
        .zip(values.iter())
        .zip(ma_values.into_iter().zip(ema_values))
        .map(|((date, rate), (ma, ema))| SeriesRow {
            date,
            rate: rate.is_finite().then_some(*rate),
            ma,
            ema,
        })
        .collect();

    let report = SeriesReport {
        base,
        symbol,
        start: series.start_date,
        end: series.end_date,
        ma_period: ma.period(),
        ema_period: ema.period(),
        metrics: SeriesMetrics::from_series(&values),
        rows,
    };

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.rows.is_empty() {
        println!("No rates available for {}/{} between {} and {}.", base, symbol, start, end);
        return Ok(());
    }

    println!("{}/{}  {} .. {}", base, symbol, report.start, report.end);
    println!("═══════════════════════════════════════════════════════");
    println!(
        "  {:<12} {:>12} {:>12} {:>12}",
        "Date",
        "Rate",
        format!("MA({})", report.ma_period),
        format!("EMA({})", report.ema_period)
    );
    for row in &report.rows {
        println!(
            "  {:<12} {:>12} {:>12} {:>12}",
            row.date.to_string(),
            four_dp(row.rate),
            four_dp(row.ma),
            four_dp(row.ema)
        );
    }

    if let Some(m) = report.metrics {
        println!();
        println!("  High:       {:.4}", m.high);
        println!("  Low:        {:.4}", m.low);
        println!("  Average:    {:.4}", m.average);
        println!("  Change:     {:+.4} ({:+.2}%)", m.change, m.change_percent);
        println!(
            "  Volatility: {}",
            m.volatility.map(|v| format!("{:.2}%", v)).unwrap_or_else(|| "-".to_string())
        );
        println!(
            "  Trend:      {}",
            m.trend.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
        );
    }

    Ok(())
}
