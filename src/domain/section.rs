// Section catalog - monitoring sections and the metrics each one exposes
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown monitoring section: {0}")]
pub struct UnknownSection(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    CpuMemory,
    Bandwidth,
    LinkMonitoring,
    Backup,
}

/// Chart presentation settings for a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProfile {
    pub title: &'static str,
    pub y_axis_label: &'static str,
    pub color: &'static str,
}

impl Section {
    /// Navigation order as shown in the section bar
    pub const ALL: [Section; 4] = [
        Section::CpuMemory,
        Section::Bandwidth,
        Section::Backup,
        Section::LinkMonitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::CpuMemory => "cpu-memory",
            Section::Bandwidth => "bandwidth",
            Section::LinkMonitoring => "link-monitoring",
            Section::Backup => "backup",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::CpuMemory => "CPU & Memory",
            Section::Bandwidth => "Bandwidth",
            Section::LinkMonitoring => "Link Monitor",
            Section::Backup => "Backup",
        }
    }

    /// Backend table family the section reads from
    pub fn db_type(&self) -> &'static str {
        match self {
            Section::CpuMemory => "device",
            Section::Bandwidth => "bandwidth",
            Section::LinkMonitoring => "link",
            Section::Backup => "backup",
        }
    }

    pub fn metric_ids(&self) -> &'static [&'static str] {
        match self {
            Section::CpuMemory => &["cpu_util", "mem_util"],
            Section::Bandwidth => &["in_bandwidth_util", "out_bandwidth_util"],
            Section::LinkMonitoring => &["response_time", "packet_loss", "jitter", "latency"],
            Section::Backup => &["backup_status", "last_backup"],
        }
    }

    pub fn has_metric(&self, metric_type: &str) -> bool {
        self.metric_ids().contains(&metric_type)
    }

    /// Selector options as (id, label) pairs
    pub fn metric_options(&self) -> Vec<(&'static str, &'static str)> {
        self.metric_ids()
            .iter()
            .map(|id| (*id, metric_label(*id)))
            .collect()
    }

    pub fn default_metric(&self) -> &'static str {
        match self {
            Section::CpuMemory => "cpu_util",
            Section::Bandwidth => "in_bandwidth_util",
            Section::LinkMonitoring => "response_time",
            Section::Backup => "backup_status",
        }
    }

    pub fn top_devices_title(&self) -> &'static str {
        match self {
            Section::CpuMemory => "Top CPU/Memory Utilized Devices",
            Section::Bandwidth => "Top Bandwidth Utilized Devices",
            Section::LinkMonitoring => "Top Response Time Devices",
            Section::Backup => "Backup Status Overview",
        }
    }

    pub fn chart_profile(&self) -> ChartProfile {
        match self {
            Section::CpuMemory => ChartProfile {
                title: "CPU & Memory Utilization",
                y_axis_label: "Usage (%)",
                color: "rgb(59, 130, 246)",
            },
            Section::Bandwidth => ChartProfile {
                title: "Network Bandwidth Usage",
                y_axis_label: "Bandwidth (Mbps)",
                color: "rgb(34, 197, 94)",
            },
            Section::LinkMonitoring => ChartProfile {
                title: "Link Performance Metrics",
                y_axis_label: "Response Time (ms)",
                color: "rgb(168, 85, 247)",
            },
            Section::Backup => ChartProfile {
                title: "Metrics",
                y_axis_label: "Value",
                color: "rgb(107, 114, 128)",
            },
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Human readable label for a metric identifier; unknown ids label as themselves
pub fn metric_label(metric_type: &str) -> &str {
    match metric_type {
        "cpu_util" => "CPU Utilization",
        "mem_util" => "Memory Utilization",
        "in_bandwidth_util" => "Inbound Bandwidth",
        "out_bandwidth_util" => "Outbound Bandwidth",
        "response_time" => "Response Time",
        "packet_loss" => "Packet Loss",
        "jitter" => "Jitter",
        "latency" => "Latency",
        "throughput" => "Throughput",
        "backup_status" => "Backup Status",
        "last_backup" => "Last Backup Time",
        other => other,
    }
}

pub fn value_unit(metric_type: &str) -> &'static str {
    if metric_type.contains("util") {
        return "%";
    }
    match metric_type {
        "response_time" | "latency" | "jitter" => "ms",
        "packet_loss" => "%",
        "throughput" => "Mbps",
        _ if metric_type.contains("bandwidth") => "Mbps",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueLevel {
    Normal,
    Warning,
    Critical,
    Neutral,
}

impl ValueLevel {
    fn from_thresholds(value: f64, warning: f64, critical: f64) -> Self {
        if value > critical {
            ValueLevel::Critical
        } else if value > warning {
            ValueLevel::Warning
        } else {
            ValueLevel::Normal
        }
    }
}

/// Severity band of a single reading, used to colour table cells
pub fn value_level(metric_type: &str, value: f64) -> ValueLevel {
    match metric_type {
        "cpu_util" | "mem_util" => ValueLevel::from_thresholds(value, 60.0, 80.0),
        "response_time" | "latency" => ValueLevel::from_thresholds(value, 50.0, 100.0),
        "packet_loss" => ValueLevel::from_thresholds(value, 0.5, 1.0),
        _ => ValueLevel::Neutral,
    }
}
