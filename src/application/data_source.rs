// Data source trait - the seam between dashboard logic and telemetry backends
use crate::domain::alert::Alert;
use crate::domain::dashboard::SectionData;
use crate::domain::metric::{ChartPoint, Metric};
use crate::domain::section::Section;
use async_trait::async_trait;

/// Failure to obtain data from a source. Callers keep their last good state.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned a {actual} summary for section {expected}")]
    SectionMismatch { expected: Section, actual: Section },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Devices, summary and top-device ranking for a section
    async fn load_section(&self, section: Section) -> Result<SectionData, LoadError>;

    /// Full authoritative alert list; filtering happens downstream
    async fn load_alerts(&self, section: Section) -> Result<Vec<Alert>, LoadError>;

    /// Table readings for a device, newest first
    async fn load_metrics(
        &self,
        device_ip: &str,
        section: Section,
        range: &str,
    ) -> Result<Vec<Metric>, LoadError>;

    /// Chart series for a device, oldest first
    async fn load_chart(&self, device_ip: &str, section: Section) -> Result<Vec<ChartPoint>, LoadError>;
}
