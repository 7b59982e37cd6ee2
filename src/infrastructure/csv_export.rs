// CSV rendering for metric exports
use crate::domain::metric::Metric;
use crate::domain::section::Section;
use chrono::{DateTime, NaiveDate, Utc};

pub const CSV_HEADER: [&str; 4] = ["Timestamp", "Metric Type", "Value", "Unit"];

/// Display form of a reading timestamp, e.g. `01/01/2024, 00:00:00`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%m/%d/%Y, %H:%M:%S").to_string()
}

/// Render metrics as CSV. Cells are joined with plain commas and not quoted,
/// so the timestamp's own comma splits it across two columns.
pub fn render_csv(metrics: &[Metric]) -> String {
    let mut lines = Vec::with_capacity(metrics.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for metric in metrics {
        lines.push(
            [
                format_timestamp(&metric.timestamp),
                metric.label().to_string(),
                metric.value.to_string(),
                metric.unit().to_string(),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

pub fn export_filename(device_ip: &str, section: Section, date: NaiveDate) -> String {
    format!("metrics-{}-{}-{}.csv", device_ip, section, date.format("%Y-%m-%d"))
}
