// Section summary aggregates and the overview cards derived from them
use super::section::{Section, ValueLevel};
use serde::{Deserialize, Serialize};

/// Aggregate figures for a section. Each section has its own shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "kebab-case")]
pub enum Summary {
    CpuMemory {
        avg_cpu: f64,
        avg_memory: f64,
        total_devices: u32,
    },
    Bandwidth {
        total_inbound: f64,
        total_outbound: f64,
        avg_utilization: f64,
    },
    LinkMonitoring {
        avg_response_time: f64,
        avg_packet_loss: f64,
        avg_jitter: f64,
    },
    Backup {
        successful_backups: u32,
        failed_backups: u32,
        total_backups: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
    pub trend: Trend,
    pub level: ValueLevel,
}

impl SummaryCard {
    fn new(label: &'static str, value: String, trend: Trend, level: ValueLevel) -> Self {
        Self {
            label,
            value,
            trend,
            level,
        }
    }
}

fn trend(value: f64, up_above: f64, down_below: Option<f64>) -> Trend {
    if value > up_above {
        Trend::Up
    } else if down_below.is_some_and(|limit| value < limit) {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn level(value: f64, warning_above: Option<f64>, critical_above: f64) -> ValueLevel {
    if value > critical_above {
        ValueLevel::Critical
    } else if warning_above.is_some_and(|limit| value > limit) {
        ValueLevel::Warning
    } else {
        ValueLevel::Normal
    }
}

impl Summary {
    pub fn section(&self) -> Section {
        match self {
            Summary::CpuMemory { .. } => Section::CpuMemory,
            Summary::Bandwidth { .. } => Section::Bandwidth,
            Summary::LinkMonitoring { .. } => Section::LinkMonitoring,
            Summary::Backup { .. } => Section::Backup,
        }
    }

    /// Overview cards shown above the alert table
    pub fn cards(&self) -> Vec<SummaryCard> {
        match *self {
            Summary::CpuMemory {
                avg_cpu,
                avg_memory,
                total_devices,
            } => vec![
                SummaryCard::new(
                    "Avg CPU Usage",
                    format!("{avg_cpu}%"),
                    trend(avg_cpu, 70.0, Some(30.0)),
                    level(avg_cpu, Some(60.0), 80.0),
                ),
                SummaryCard::new(
                    "Avg Memory Usage",
                    format!("{avg_memory}%"),
                    trend(avg_memory, 80.0, Some(40.0)),
                    level(avg_memory, Some(70.0), 90.0),
                ),
                SummaryCard::new(
                    "Total Devices",
                    total_devices.to_string(),
                    Trend::Stable,
                    ValueLevel::Neutral,
                ),
            ],
            Summary::Bandwidth {
                total_inbound,
                total_outbound,
                avg_utilization,
            } => vec![
                SummaryCard::new(
                    "Total Inbound",
                    format!("{total_inbound} Mbps"),
                    Trend::Up,
                    ValueLevel::Normal,
                ),
                SummaryCard::new(
                    "Total Outbound",
                    format!("{total_outbound} Mbps"),
                    Trend::Up,
                    ValueLevel::Neutral,
                ),
                SummaryCard::new(
                    "Avg Utilization",
                    format!("{avg_utilization}%"),
                    trend(avg_utilization, 80.0, None),
                    level(avg_utilization, None, 90.0),
                ),
            ],
            Summary::LinkMonitoring {
                avg_response_time,
                avg_packet_loss,
                avg_jitter,
            } => vec![
                SummaryCard::new(
                    "Avg Response Time",
                    format!("{avg_response_time} ms"),
                    trend(avg_response_time, 100.0, None),
                    level(avg_response_time, Some(100.0), 200.0),
                ),
                SummaryCard::new(
                    "Avg Packet Loss",
                    format!("{avg_packet_loss}%"),
                    trend(avg_packet_loss, 1.0, None),
                    level(avg_packet_loss, Some(0.5), 2.0),
                ),
                SummaryCard::new(
                    "Avg Jitter",
                    format!("{avg_jitter} ms"),
                    trend(avg_jitter, 5.0, None),
                    level(avg_jitter, Some(5.0), 10.0),
                ),
            ],
            // No overview cards for backups yet; the ranking table covers it
            Summary::Backup { .. } => Vec::new(),
        }
    }
}
