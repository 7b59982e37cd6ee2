// Metric reading domain models
use super::section::{metric_label, value_level, value_unit, ValueLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub timestamp: DateTime<Utc>,
    pub metric_type: String,
    pub value: f64,
}

impl Metric {
    pub fn new(timestamp: DateTime<Utc>, metric_type: &str, value: f64) -> Self {
        Self {
            timestamp,
            metric_type: metric_type.to_string(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        metric_label(&self.metric_type)
    }

    pub fn unit(&self) -> &'static str {
        value_unit(&self.metric_type)
    }

    pub fn level(&self) -> ValueLevel {
        value_level(&self.metric_type, self.value)
    }
}

/// One point of the per-device chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: DateTime<Utc>, y: f64) -> Self {
        Self { x, y }
    }
}

/// Round to two decimals the way readings are displayed
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
