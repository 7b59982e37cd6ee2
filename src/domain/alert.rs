// Alert domain model and the section/device alert filters
use super::section::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Normal,
    Warning,
    Critical,
}

/// A threshold alert raised against a device.
///
/// `status` is taken as reported by the data source and is never
/// recomputed from `value` and `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub device_ip: String,
    pub metric_type: String,
    pub threshold: f64,
    pub value: f64,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        device_ip: &str,
        metric_type: &str,
        threshold: f64,
        value: f64,
        status: AlertStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            device_ip: device_ip.to_string(),
            metric_type: metric_type.to_string(),
            threshold,
            value,
            status,
            timestamp,
        }
    }
}

/// Alerts whose metric belongs to `section`. With no section every alert passes.
pub fn section_alerts(alerts: &[Alert], section: Option<Section>) -> Vec<Alert> {
    match section {
        Some(section) => alerts
            .iter()
            .filter(|alert| section.has_metric(&alert.metric_type))
            .cloned()
            .collect(),
        None => alerts.to_vec(),
    }
}

/// Alerts raised against `device_ip`. An empty selection matches nothing.
pub fn device_alerts(alerts: &[Alert], device_ip: &str) -> Vec<Alert> {
    if device_ip.is_empty() {
        return Vec::new();
    }
    alerts
        .iter()
        .filter(|alert| alert.device_ip == device_ip)
        .cloned()
        .collect()
}
