// Metrics service - Paginated readings table, chart series and CSV export
use crate::application::data_source::{DataSource, LoadError};
use crate::domain::metric::{ChartPoint, Metric};
use crate::domain::section::{ChartProfile, Section, ValueLevel};
use crate::infrastructure::csv_export::{export_filename, render_csv};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_RANGE: &str = "24h";

#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    pub timestamp: chrono::DateTime<Utc>,
    pub metric_type: String,
    pub label: String,
    pub value: f64,
    pub unit: &'static str,
    pub level: ValueLevel,
}

impl From<&Metric> for MetricRow {
    fn from(metric: &Metric) -> Self {
        Self {
            timestamp: metric.timestamp,
            metric_type: metric.metric_type.clone(),
            label: metric.label().to_string(),
            value: metric.value,
            unit: metric.unit(),
            level: metric.level(),
        }
    }
}

/// One page of the readings table. `start` is 1-based for display, `end` inclusive.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsPage {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub rows: Vec<MetricRow>,
}

/// Clamped page number, page count and the `offset..end` window of one page
fn page_window(total: usize, page: usize, page_size: usize) -> (usize, usize, usize, usize) {
    let total_pages = total.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * page_size;
    let end = (offset + page_size).min(total);
    (page, total_pages, offset, end)
}

impl MetricsPage {
    pub fn paginate(metrics: &[Metric], page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total = metrics.len();
        let (page, total_pages, offset, end) = page_window(total, page, page_size);
        let rows = metrics
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(MetricRow::from)
            .collect();

        Self {
            page,
            total_pages,
            page_size,
            start: if total == 0 { 0 } else { offset + 1 },
            end,
            total,
            has_previous: page > 1,
            has_next: page < total_pages,
            rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub title: String,
    #[serde(flatten)]
    pub profile: ChartProfile,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Clone)]
pub struct MetricsService {
    source: Arc<dyn DataSource>,
    page_size: usize,
}

impl MetricsService {
    pub fn new(source: Arc<dyn DataSource>, page_size: usize) -> Self {
        Self { source, page_size }
    }

    pub async fn metrics_page(
        &self,
        device_ip: &str,
        section: Section,
        range: &str,
        page: usize,
    ) -> Result<MetricsPage, LoadError> {
        let metrics = self.source.load_metrics(device_ip, section, range).await?;
        Ok(MetricsPage::paginate(&metrics, page, self.page_size))
    }

    /// Raw readings, narrowed to one page when `page` is given
    pub async fn readings(
        &self,
        device_ip: &str,
        section: Section,
        range: &str,
        page: Option<usize>,
    ) -> Result<Vec<Metric>, LoadError> {
        let mut metrics = self.source.load_metrics(device_ip, section, range).await?;
        if let Some(page) = page {
            let page_size = self.page_size.max(1);
            let (_, _, offset, end) = page_window(metrics.len(), page, page_size);
            metrics.truncate(end);
            metrics.drain(..offset);
        }
        Ok(metrics)
    }

    pub async fn chart(&self, device_ip: &str, section: Section) -> Result<ChartData, LoadError> {
        let points = self.source.load_chart(device_ip, section).await?;
        let profile = section.chart_profile();
        Ok(ChartData {
            title: format!("{} - Last 24 Hours", profile.title),
            profile,
            points,
        })
    }

    /// Export every reading of the range, not just the visible page
    pub async fn export_csv(
        &self,
        device_ip: &str,
        section: Section,
        range: &str,
    ) -> Result<CsvExport, LoadError> {
        let metrics = self.source.load_metrics(device_ip, section, range).await?;
        tracing::info!(device = device_ip, section = %section, rows = metrics.len(), "Exporting metrics CSV");
        Ok(CsvExport {
            filename: export_filename(device_ip, section, Utc::now().date_naive()),
            content: render_csv(&metrics),
        })
    }
}
