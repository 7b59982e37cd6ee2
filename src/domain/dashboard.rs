// Dashboard domain model
use super::alert::Alert;
use super::device::{Device, TopDevice, TopDeviceRow};
use super::section::Section;
use super::summary::{Summary, SummaryCard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a data source returns for one section load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    pub devices: Vec<Device>,
    pub summary: Summary,
    pub top_devices: Vec<TopDevice>,
}

impl SectionData {
    pub fn new(devices: Vec<Device>, summary: Summary, top_devices: Vec<TopDevice>) -> Self {
        Self {
            devices,
            summary,
            top_devices,
        }
    }
}

/// Operator selection. Empty strings mean "nothing selected".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub active_section: Section,
    pub selected_device: String,
    pub selected_metric: String,
    pub last_refresh: DateTime<Utc>,
}

impl Selection {
    pub fn new(active_section: Section, last_refresh: DateTime<Utc>) -> Self {
        Self {
            active_section,
            selected_device: String::new(),
            selected_metric: String::new(),
            last_refresh,
        }
    }

    /// Fill empty selections from a freshly loaded device list.
    /// Existing choices are kept even if they no longer match the data.
    pub fn apply_defaults(&mut self, devices: &[Device]) {
        if self.selected_device.is_empty() {
            if let Some(first) = devices.first() {
                self.selected_device = first.ip.clone();
            }
        }
        if self.selected_metric.is_empty() {
            self.selected_metric = self.active_section.default_metric().to_string();
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub selection: Selection,
    pub is_loading: bool,
    pub devices: Vec<Device>,
    pub summary: Option<Summary>,
    pub summary_cards: Vec<SummaryCard>,
    pub top_devices_title: &'static str,
    pub top_devices: Vec<TopDeviceRow>,
    pub section_alerts: Vec<Alert>,
    pub device_alerts: Vec<Alert>,
    pub selected_device_info: Option<Device>,
    pub no_devices: bool,
}
