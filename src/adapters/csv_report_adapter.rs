//! Enriched-series CSV export for external charting tools.
//!
//! One row per bar; indicator columns are left empty while undefined.

use crate::domain::assistant::{AssistantConfig, Assessment};
use crate::domain::enrich::EnrichedSeries;
use crate::domain::error::TacticalError;
use crate::ports::report_port::ReportPort;
use std::io::Write;
use std::path::Path;

pub const HEADER: [&str; 10] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "rsi",
    "macd_histogram",
    "volume_avg",
    "volume_spike",
];

pub struct CsvReportAdapter;

fn report_error(e: impl std::fmt::Display) -> TacticalError {
    TacticalError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the enriched series as CSV to any writer.
pub fn write_enriched<W: Write>(series: &EnrichedSeries, writer: W) -> Result<(), TacticalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).map_err(report_error)?;

    for bar in series.bars() {
        wtr.write_record([
            bar.bar.timestamp.timestamp_millis().to_string(),
            bar.bar.open.to_string(),
            bar.bar.high.to_string(),
            bar.bar.low.to_string(),
            bar.bar.close.to_string(),
            bar.bar.volume.to_string(),
            optional(bar.rsi),
            optional(bar.macd_histogram),
            optional(bar.volume_avg),
            optional(bar.volume_spike),
        ])
        .map_err(report_error)?;
    }

    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        assessment: &Assessment,
        _config: &AssistantConfig,
        output_path: &Path,
    ) -> Result<(), TacticalError> {
        let file = std::fs::File::create(output_path)?;
        write_enriched(&assessment.series, file)
    }
}
