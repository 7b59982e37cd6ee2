// Mock data source - Synthetic fixtures and random readings
use crate::application::data_source::{DataSource, LoadError};
use crate::domain::alert::{Alert, AlertStatus};
use crate::domain::dashboard::SectionData;
use crate::domain::device::{Device, TopDevice};
use crate::domain::metric::{round2, ChartPoint, Metric};
use crate::domain::section::Section;
use crate::domain::summary::Summary;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

const TABLE_POINTS: i64 = 50;
const TABLE_STEP_MINUTES: i64 = 2;
const CHART_HOURS: i64 = 24;

#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    latency: Duration,
    outage: bool,
}

impl MockDataSource {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            outage: false,
        }
    }

    pub fn with_outage(mut self, outage: bool) -> Self {
        self.outage = outage;
        self
    }

    /// Wait out the configured latency, then fail if an outage is configured
    async fn simulate_backend(&self) -> Result<(), LoadError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.outage {
            return Err(LoadError::Unavailable("mock source outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn load_section(&self, section: Section) -> Result<SectionData, LoadError> {
        self.simulate_backend().await?;
        Ok(SectionData::new(
            devices(section),
            summary(section),
            top_devices(section),
        ))
    }

    async fn load_alerts(&self, _section: Section) -> Result<Vec<Alert>, LoadError> {
        self.simulate_backend().await?;
        Ok(alerts(Utc::now()))
    }

    async fn load_metrics(
        &self,
        device_ip: &str,
        section: Section,
        _range: &str,
    ) -> Result<Vec<Metric>, LoadError> {
        self.simulate_backend().await?;
        tracing::debug!(device = device_ip, section = %section, "Generating mock metrics");
        Ok(generate_metrics(section, Utc::now(), &mut rand::thread_rng()))
    }

    async fn load_chart(&self, _device_ip: &str, section: Section) -> Result<Vec<ChartPoint>, LoadError> {
        self.simulate_backend().await?;
        Ok(generate_chart(section, Utc::now(), &mut rand::thread_rng()))
    }
}

fn data_center_devices() -> Vec<Device> {
    vec![
        Device::new("192.168.1.1", "Router-Main")
            .with_location("Data Center A")
            .with_asset("RT-001"),
        Device::new("192.168.1.2", "Switch-Core")
            .with_location("Data Center A")
            .with_asset("SW-001"),
        Device::new("192.168.1.3", "Server-DB")
            .with_location("Data Center B")
            .with_asset("SV-001"),
    ]
}

pub fn devices(section: Section) -> Vec<Device> {
    match section {
        Section::CpuMemory => vec![
            Device::new("192.168.1.1", "Router-Main").with_asset("RT-001"),
            Device::new("192.168.1.2", "Switch-Core").with_asset("SW-001"),
            Device::new("192.168.1.3", "Server-DB").with_asset("SV-001"),
        ],
        Section::Bandwidth | Section::LinkMonitoring => data_center_devices(),
        Section::Backup => vec![
            Device::new("192.168.1.10", "Backup-Server-1")
                .with_location("Data Center A")
                .with_asset("BK-001"),
            Device::new("192.168.1.11", "Backup-Server-2")
                .with_location("Data Center B")
                .with_asset("BK-002"),
        ],
    }
}

pub fn top_devices(section: Section) -> Vec<TopDevice> {
    use AlertStatus::{Critical, Normal, Warning};

    match section {
        Section::CpuMemory => vec![
            TopDevice::new("192.168.1.1", "Router-Main", 85.0, "cpu_util", Critical),
            TopDevice::new("192.168.1.2", "Switch-Core", 72.0, "mem_util", Warning),
            TopDevice::new("192.168.1.3", "Server-DB", 65.0, "cpu_util", Normal),
            TopDevice::new("192.168.1.4", "Web-Server", 58.0, "mem_util", Normal),
            TopDevice::new("192.168.1.5", "Mail-Server", 45.0, "cpu_util", Normal),
        ],
        Section::Bandwidth => vec![
            TopDevice::new("192.168.1.1", "Router-Main", 95.0, "in_bandwidth_util", Critical),
            TopDevice::new("192.168.1.2", "Switch-Core", 78.0, "out_bandwidth_util", Warning),
            TopDevice::new("192.168.1.3", "Server-DB", 67.0, "in_bandwidth_util", Normal),
            TopDevice::new("192.168.1.6", "Firewall", 54.0, "out_bandwidth_util", Normal),
            TopDevice::new("192.168.1.7", "Load-Balancer", 42.0, "in_bandwidth_util", Normal),
        ],
        Section::LinkMonitoring => vec![
            TopDevice::new("192.168.1.1", "Router-Main", 150.0, "response_time", Critical),
            TopDevice::new("192.168.1.2", "Switch-Core", 89.0, "response_time", Warning),
            TopDevice::new("192.168.1.3", "Server-DB", 45.0, "response_time", Normal),
            TopDevice::new("192.168.1.8", "Gateway", 67.0, "response_time", Normal),
            TopDevice::new("192.168.1.9", "Proxy-Server", 23.0, "response_time", Normal),
        ],
        Section::Backup => vec![
            TopDevice::new("192.168.1.10", "Backup-Server-1", 100.0, "backup_status", Normal),
            TopDevice::new("192.168.1.11", "Backup-Server-2", 85.0, "backup_status", Warning),
            TopDevice::new("192.168.1.12", "Storage-Array", 0.0, "backup_status", Critical),
        ],
    }
}

pub fn summary(section: Section) -> Summary {
    match section {
        Section::CpuMemory => Summary::CpuMemory {
            avg_cpu: 45.2,
            avg_memory: 62.1,
            total_devices: 3,
        },
        Section::Bandwidth => Summary::Bandwidth {
            total_inbound: 125.4,
            total_outbound: 98.7,
            avg_utilization: 67.3,
        },
        Section::LinkMonitoring => Summary::LinkMonitoring {
            avg_response_time: 45.2,
            avg_packet_loss: 0.3,
            avg_jitter: 2.1,
        },
        Section::Backup => Summary::Backup {
            successful_backups: 85,
            failed_backups: 3,
            total_backups: 88,
        },
    }
}

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert::new("192.168.1.1", "cpu_util", 80.0, 85.0, AlertStatus::Critical, now),
        Alert::new("192.168.1.2", "mem_util", 90.0, 92.0, AlertStatus::Warning, now),
        Alert::new("192.168.1.3", "response_time", 100.0, 150.0, AlertStatus::Critical, now),
        Alert::new("192.168.1.1", "in_bandwidth_util", 90.0, 95.0, AlertStatus::Critical, now),
    ]
}

/// Metric types drawn for the readings table of a section
fn table_metric_pool(section: Section) -> &'static [&'static str] {
    match section {
        Section::CpuMemory => &["cpu_util", "mem_util"],
        Section::Bandwidth => &["in_bandwidth_util", "out_bandwidth_util"],
        Section::LinkMonitoring => &["response_time", "jitter", "packet_loss", "latency", "throughput"],
        Section::Backup => &["unknown"],
    }
}

fn random_reading<R: Rng>(metric_type: &str, rng: &mut R) -> f64 {
    let sample: f64 = rng.r#gen();
    let value = match metric_type {
        "cpu_util" | "mem_util" => sample * 80.0 + 10.0,
        "in_bandwidth_util" | "out_bandwidth_util" => sample * 100.0 + 20.0,
        "response_time" | "latency" => sample * 150.0 + 10.0,
        "jitter" => sample * 10.0 + 1.0,
        "packet_loss" => sample * 2.0,
        "throughput" => sample * 1000.0 + 100.0,
        _ => sample * 100.0,
    };
    round2(value)
}

/// Table readings every two minutes back from `now`, newest first
pub fn generate_metrics<R: Rng>(section: Section, now: DateTime<Utc>, rng: &mut R) -> Vec<Metric> {
    let pool = table_metric_pool(section);
    let mut metrics: Vec<Metric> = (0..TABLE_POINTS)
        .map(|i| {
            let metric_type = pool.choose(rng).copied().unwrap_or("unknown");
            let timestamp = now - TimeDelta::minutes(i * TABLE_STEP_MINUTES);
            Metric::new(timestamp, metric_type, random_reading(metric_type, rng))
        })
        .collect();
    metrics.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    metrics
}

/// Hourly chart points over the last day, oldest first
pub fn generate_chart<R: Rng>(section: Section, now: DateTime<Utc>, rng: &mut R) -> Vec<ChartPoint> {
    (0..CHART_HOURS)
        .rev()
        .map(|i| {
            let sample: f64 = rng.r#gen();
            let value = match section {
                Section::CpuMemory => sample * 80.0 + 10.0,
                Section::Bandwidth => sample * 100.0 + 20.0,
                Section::LinkMonitoring => sample * 150.0 + 10.0,
                Section::Backup => sample * 100.0,
            };
            ChartPoint::new(now - TimeDelta::hours(i), round2(value))
        })
        .collect()
}
