// HTTP data source - Client for a telemetry backend exposing the dashboard endpoints
use crate::application::data_source::{DataSource, LoadError};
use crate::domain::alert::Alert;
use crate::domain::dashboard::SectionData;
use crate::domain::device::{Device, TopDevice};
use crate::domain::metric::{ChartPoint, Metric};
use crate::domain::section::Section;
use crate::domain::summary::Summary;
use crate::infrastructure::config::prepare_path;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

const DEVICES_PATH: &str = "/devices?section=${section}";
const SUMMARY_PATH: &str = "/summary?section=${section}";
const TOP_DEVICES_PATH: &str = "/top-devices?section=${section}";
const ALERTS_PATH: &str = "/alerts?section=${section}";
const METRICS_PATH: &str = "/metrics?device=${device}&section=${section}&range=${range}";
const CHART_PATH: &str = "/metrics/chart?device=${device}&section=${section}";

#[derive(Debug, Clone)]
pub struct HttpDataSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, template: &str, vars: &HashMap<&str, &str>) -> String {
        format!("{}{}", self.base_url, prepare_path(template, vars))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, LoadError> {
        tracing::debug!(%url, "Fetching from telemetry backend");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| LoadError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Status { url, status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| LoadError::Request { url, source })
    }

    async fn section_resource<T: DeserializeOwned>(
        &self,
        template: &str,
        section: Section,
    ) -> Result<T, LoadError> {
        let vars = HashMap::from([("section", section.as_str())]);
        self.get_json(self.build_url(template, &vars)).await
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn load_section(&self, section: Section) -> Result<SectionData, LoadError> {
        let (devices, summary, top_devices) = tokio::try_join!(
            self.section_resource::<Vec<Device>>(DEVICES_PATH, section),
            self.section_resource::<Summary>(SUMMARY_PATH, section),
            self.section_resource::<Vec<TopDevice>>(TOP_DEVICES_PATH, section),
        )?;
        if summary.section() != section {
            return Err(LoadError::SectionMismatch {
                expected: section,
                actual: summary.section(),
            });
        }
        Ok(SectionData::new(devices, summary, top_devices))
    }

    async fn load_alerts(&self, section: Section) -> Result<Vec<Alert>, LoadError> {
        self.section_resource(ALERTS_PATH, section).await
    }

    async fn load_metrics(
        &self,
        device_ip: &str,
        section: Section,
        range: &str,
    ) -> Result<Vec<Metric>, LoadError> {
        let vars = HashMap::from([
            ("device", device_ip),
            ("section", section.as_str()),
            ("range", range),
        ]);
        self.get_json(self.build_url(METRICS_PATH, &vars)).await
    }

    async fn load_chart(&self, device_ip: &str, section: Section) -> Result<Vec<ChartPoint>, LoadError> {
        let vars = HashMap::from([("device", device_ip), ("section", section.as_str())]);
        self.get_json(self.build_url(CHART_PATH, &vars)).await
    }
}
