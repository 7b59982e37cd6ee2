// Device domain models
use super::alert::AlertStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ip: String,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Device {
    pub fn new(ip: &str, hostname: &str) -> Self {
        Self {
            ip: ip.to_string(),
            hostname: hostname.to_string(),
            asset: None,
            location: None,
        }
    }

    pub fn with_asset(mut self, asset: &str) -> Self {
        self.asset = Some(asset.to_string());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }
}

/// Entry in the "top utilized devices" ranking of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopDevice {
    pub ip: String,
    pub hostname: String,
    pub utilization: f64,
    pub metric_type: String,
    pub status: AlertStatus,
}

impl TopDevice {
    pub fn new(ip: &str, hostname: &str, utilization: f64, metric_type: &str, status: AlertStatus) -> Self {
        Self {
            ip: ip.to_string(),
            hostname: hostname.to_string(),
            utilization,
            metric_type: metric_type.to_string(),
            status,
        }
    }

    /// Unit suffix for the ranking column; narrower than the table unit map
    pub fn unit(&self) -> &'static str {
        if self.metric_type.contains("util") {
            "%"
        } else if matches!(self.metric_type.as_str(), "response_time" | "latency") {
            "ms"
        } else {
            ""
        }
    }
}

/// Ranking entry as rendered, with its unit suffix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDeviceRow {
    #[serde(flatten)]
    pub device: TopDevice,
    pub unit: &'static str,
}

impl From<&TopDevice> for TopDeviceRow {
    fn from(device: &TopDevice) -> Self {
        Self {
            unit: device.unit(),
            device: device.clone(),
        }
    }
}
