//! CSV and JSON export of overview rows.

use csv::{QuoteStyle, WriterBuilder};
use fxdash_analytics::{CurrencyOverview, StrengthClass, Trend};
use fxdash_core::error::ExportError;
use fxdash_core::types::{Currencies, CurrencyCode};
use serde::Serialize;

const CSV_HEADER: [&str; 10] = [
    "code",
    "name",
    "rate",
    "change_24h_pct",
    "change_7d_pct",
    "change_30d_pct",
    "strength",
    "class",
    "volatility_pct",
    "trend",
];

/// Flattened overview row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub code: CurrencyCode,
    pub name: String,
    pub rate: f64,
    pub change_24h_pct: Option<f64>,
    pub change_7d_pct: Option<f64>,
    pub change_30d_pct: Option<f64>,
    pub strength: Option<f64>,
    pub class: Option<StrengthClass>,
    pub volatility_pct: Option<f64>,
    pub trend: Option<Trend>,
}

impl ExportRow {
    /// Flatten `row`, naming it from `names` when known.
    pub fn from_overview(row: &CurrencyOverview, names: &Currencies) -> Self {
        let metrics = row.metrics.as_ref();
        Self {
            code: row.code,
            name: names.get(&row.code).cloned().unwrap_or_default(),
            rate: row.rate,
            change_24h_pct: row.change_percent_24h(),
            change_7d_pct: row.change_7d,
            change_30d_pct: row.change_30d,
            strength: row.strength.map(|s| s.score),
            class: row.strength.map(|s| s.class),
            volatility_pct: metrics.and_then(|m| m.volatility),
            trend: metrics.and_then(|m| m.trend),
        }
    }
}

/// Build export rows for every overview row.
pub fn export_rows(rows: &[CurrencyOverview], names: &Currencies) -> Vec<ExportRow> {
    rows.iter().map(|r| ExportRow::from_overview(r, names)).collect()
}

/// Keep rows whose code or name contains `filter`, ignoring case.
/// A blank filter keeps everything.
pub fn filter_rows(rows: Vec<ExportRow>, filter: &str) -> Vec<ExportRow> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|r| {
            r.code.as_str().to_lowercase().contains(&needle) || r.name.to_lowercase().contains(&needle)
        })
        .collect()
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => String::new(),
    }
}

/// Render rows as CSV with every field quoted.
///
/// Rates carry 4 decimals, percentages and scores 2. Absent values are empty.
pub fn to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.code.to_string(),
                row.name.clone(),
                fixed(Some(row.rate), 4),
                fixed(row.change_24h_pct, 2),
                fixed(row.change_7d_pct, 2),
                fixed(row.change_30d_pct, 2),
                fixed(row.strength, 2),
                row.class.map(|c| c.to_string()).unwrap_or_default(),
                fixed(row.volatility_pct, 2),
                row.trend.map(|t| t.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Render rows as pretty-printed JSON.
pub fn to_json(rows: &[ExportRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxdash_analytics::{strength_score, RateChange};

    fn overview(code: CurrencyCode, rate: f64) -> CurrencyOverview {
        CurrencyOverview {
            code,
            rate,
            change_24h: Some(RateChange::new(rate, 1.0)),
            change_7d: None,
            change_30d: Some(-1.23456),
            strength: strength_score(Some(10.0), None, None),
            metrics: None,
        }
    }

    fn names() -> Currencies {
        Currencies::from([
            (CurrencyCode::USD, "United States Dollar".to_string()),
            (CurrencyCode::GBP, "British Pound".to_string()),
        ])
    }

    #[test]
    fn test_csv_format() {
        let rows = export_rows(&[overview(CurrencyCode::USD, 1.1)], &names());
        let csv = to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            r#""code","name","rate","change_24h_pct","change_7d_pct","change_30d_pct","strength","class","volatility_pct","trend""#
        );
        assert_eq!(
            lines[1],
            r#""USD","United States Dollar","1.1000","10.00","","-1.23","5.00","strong","","""#
        );
    }

    #[test]
    fn test_json_is_pretty() {
        let rows = export_rows(&[overview(CurrencyCode::GBP, 0.86)], &names());
        let json = to_json(&rows).unwrap();
        assert!(json.contains("\n  {"));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["code"], "GBP");
        assert_eq!(parsed[0]["name"], "British Pound");
        assert!(parsed[0]["change_7d_pct"].is_null());
    }

    #[test]
    fn test_filter_matches_code_or_name() {
        let rows = export_rows(
            &[overview(CurrencyCode::USD, 1.1), overview(CurrencyCode::GBP, 0.86)],
            &names(),
        );

        assert_eq!(filter_rows(rows.clone(), "usd").len(), 1);
        assert_eq!(filter_rows(rows.clone(), "pound")[0].code, CurrencyCode::GBP);
        assert_eq!(filter_rows(rows.clone(), "  ").len(), 2);
        assert!(filter_rows(rows, "yen").is_empty());
    }

    #[test]
    fn test_unknown_name_is_blank() {
        let rows = export_rows(&[overview(CurrencyCode::JPY, 150.0)], &names());
        assert_eq!(rows[0].name, "");
    }
}
