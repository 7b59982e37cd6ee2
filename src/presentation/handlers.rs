// HTTP request handlers
use crate::application::dashboard_service::Notification;
use crate::application::metrics_service::{ChartData, MetricsPage, DEFAULT_RANGE};
use crate::domain::alert::{section_alerts, Alert};
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::device::{Device, TopDevice};
use crate::domain::metric::{ChartPoint, Metric};
use crate::domain::section::Section;
use crate::domain::summary::Summary;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
}

#[derive(Deserialize)]
pub struct MetricsQuery {
    pub device: Option<String>,
    pub section: Option<String>,
    pub range: Option<String>,
    pub page: Option<usize>,
}

#[derive(Deserialize)]
pub struct DeviceSelection {
    pub ip: String,
}

#[derive(Deserialize)]
pub struct MetricSelection {
    pub metric: String,
}

#[derive(Serialize)]
pub struct MetricOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct SectionInfo {
    pub id: Section,
    pub label: &'static str,
    pub db_type: &'static str,
    pub default_metric: &'static str,
    pub metrics: Vec<MetricOption>,
}

/// Resolve an explicit section parameter, falling back to the active section
async fn resolve_section(state: &AppState, section: Option<&str>) -> Result<Section, ApiError> {
    match section {
        Some(id) => Ok(id.parse()?),
        None => Ok(state.dashboard.snapshot().await.selection.active_section),
    }
}

/// Resolve device and section for metric views, defaulting to the current selection
async fn resolve_device(state: &AppState, query: &MetricsQuery) -> Result<(String, Section), ApiError> {
    let snapshot = state.dashboard.snapshot().await;
    let section = match query.section.as_deref() {
        Some(id) => id.parse()?,
        None => snapshot.selection.active_section,
    };
    let device = query
        .device
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or(snapshot.selection.selected_device);
    if device.is_empty() {
        return Err(ApiError::BadRequest("no device selected".to_string()));
    }
    Ok((device, section))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Section catalog for the navigation bar and metric selector
pub async fn list_sections() -> Json<Vec<SectionInfo>> {
    let sections = Section::ALL
        .into_iter()
        .map(|section| SectionInfo {
            id: section,
            label: section.label(),
            db_type: section.db_type(),
            default_metric: section.default_metric(),
            metrics: section
                .metric_options()
                .into_iter()
                .map(|(value, label)| MetricOption { value, label })
                .collect(),
        })
        .collect();
    Json(sections)
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

pub async fn select_section(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let section: Section = id.parse()?;
    state.dashboard.select(section).await?;
    Ok(Json(state.dashboard.snapshot().await))
}

pub async fn select_device(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeviceSelection>,
) -> Json<DashboardSnapshot> {
    state.dashboard.select_device(&body.ip).await;
    Json(state.dashboard.snapshot().await)
}

pub async fn select_metric(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MetricSelection>,
) -> Json<DashboardSnapshot> {
    state.dashboard.select_metric(&body.metric).await;
    Json(state.dashboard.snapshot().await)
}

pub async fn refresh_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    state.dashboard.refresh().await?;
    Ok(Json(state.dashboard.snapshot().await))
}

/// Server-sent stream of refresh and failure notifications
pub async fn dashboard_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.dashboard.subscribe();
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    if let Some(event) = notification_event(&notification) {
                        yield Ok(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Notification subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn notification_event(notification: &Notification) -> Option<Event> {
    match Event::default().event("notification").json_data(notification) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode notification");
            None
        }
    }
}

pub async fn metrics_table(
    Query(query): Query<MetricsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsPage>, ApiError> {
    let (device, section) = resolve_device(&state, &query).await?;
    let range = query.range.as_deref().unwrap_or(DEFAULT_RANGE);
    let page = state
        .metrics
        .metrics_page(&device, section, range, query.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

pub async fn metrics_chart_view(
    Query(query): Query<MetricsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartData>, ApiError> {
    let (device, section) = resolve_device(&state, &query).await?;
    Ok(Json(state.metrics.chart(&device, section).await?))
}

/// Download every reading of the range as CSV
pub async fn export_metrics(
    Query(query): Query<MetricsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let (device, section) = resolve_device(&state, &query).await?;
    let range = query.range.as_deref().unwrap_or(DEFAULT_RANGE);
    let export = state.metrics.export_csv(&device, section, range).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}

// Backend-facing endpoints. These mirror the data source seam so one
// dashboard server can act as the backend of another.

pub async fn list_devices(
    Query(query): Query<SectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let section = resolve_section(&state, query.section.as_deref()).await?;
    let data = state.dashboard.source().load_section(section).await?;
    Ok(Json(data.devices))
}

pub async fn get_summary(
    Query(query): Query<SectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Summary>, ApiError> {
    let section = resolve_section(&state, query.section.as_deref()).await?;
    let data = state.dashboard.source().load_section(section).await?;
    Ok(Json(data.summary))
}

pub async fn list_top_devices(
    Query(query): Query<SectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopDevice>>, ApiError> {
    let section = resolve_section(&state, query.section.as_deref()).await?;
    let data = state.dashboard.source().load_section(section).await?;
    Ok(Json(data.top_devices))
}

/// Alerts for a section, defaulting to the active one. An unrecognised section returns every alert.
pub async fn list_alerts(
    Query(query): Query<SectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let active = resolve_section(&state, None).await?;
    let filter = match query.section.as_deref() {
        Some(id) => id.parse::<Section>().ok(),
        None => Some(active),
    };
    let alerts = state.dashboard.source().load_alerts(filter.unwrap_or(active)).await?;
    Ok(Json(section_alerts(&alerts, filter)))
}

pub async fn list_metrics(
    Query(query): Query<MetricsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Metric>>, ApiError> {
    let (device, section) = resolve_device(&state, &query).await?;
    let range = query.range.as_deref().unwrap_or(DEFAULT_RANGE);
    let metrics = state
        .metrics
        .readings(&device, section, range, query.page)
        .await?;
    Ok(Json(metrics))
}

pub async fn list_chart_points(
    Query(query): Query<MetricsQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let (device, section) = resolve_device(&state, &query).await?;
    let points = state.dashboard.source().load_chart(&device, section).await?;
    Ok(Json(points))
}
