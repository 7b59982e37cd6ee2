// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_events, export_metrics, get_dashboard, get_summary, health_check, list_alerts,
    list_chart_points, list_devices, list_metrics, list_sections, list_top_devices,
    metrics_chart_view, metrics_table, refresh_dashboard, select_device, select_metric,
    select_section,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sections", get(list_sections))
        // Dashboard state owner
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/section/:id", post(select_section))
        .route("/dashboard/device", post(select_device))
        .route("/dashboard/metric", post(select_metric))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/dashboard/events", get(dashboard_events))
        .route("/dashboard/table", get(metrics_table))
        .route("/dashboard/chart", get(metrics_chart_view))
        .route("/dashboard/export", get(export_metrics))
        // Data seam
        .route("/devices", get(list_devices))
        .route("/summary", get(get_summary))
        .route("/top-devices", get(list_top_devices))
        .route("/alerts", get(list_alerts))
        .route("/metrics", get(list_metrics))
        .route("/metrics/chart", get(list_chart_points))
        .route("/metrics/export", get(export_metrics))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::ScriptedSource;
    use crate::domain::section::Section;
    use crate::infrastructure::mock_source::MockDataSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn mock_router() -> Router {
        build_router(AppState::new(
            Arc::new(MockDataSource::default()),
            Section::CpuMemory,
            10,
        ))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(router, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(&mock_router(), "GET", "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_sections_catalog() {
        let (status, json) = send_json(&mock_router(), "GET", "/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[3]["id"], "link-monitoring");
        assert_eq!(json[3]["metrics"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_select_section_derives_defaults() {
        let router = mock_router();
        let (status, json) = send_json(&router, "POST", "/dashboard/section/bandwidth", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["selection"]["active_section"], "bandwidth");
        assert_eq!(json["selection"]["selected_device"], "192.168.1.1");
        assert_eq!(json["selection"]["selected_metric"], "in_bandwidth_util");
        assert_eq!(json["section_alerts"].as_array().unwrap().len(), 1);
        assert_eq!(json["device_alerts"].as_array().unwrap().len(), 2);
        assert_eq!(json["top_devices_title"], "Top Bandwidth Utilized Devices");
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        let (status, json) = send_json(&mock_router(), "POST", "/dashboard/section/storage", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "unknown monitoring section: storage");
    }

    #[tokio::test]
    async fn test_device_and_metric_selection() {
        let router = mock_router();
        send_json(&router, "POST", "/dashboard/section/cpu-memory", None).await;
        let (_, json) = send_json(
            &router,
            "POST",
            "/dashboard/device",
            Some(serde_json::json!({"ip": "192.168.1.3"})),
        )
        .await;
        assert_eq!(json["selection"]["selected_device"], "192.168.1.3");
        assert_eq!(json["selected_device_info"]["hostname"], "Server-DB");

        let (_, json) = send_json(
            &router,
            "POST",
            "/dashboard/metric",
            Some(serde_json::json!({"metric": "mem_util"})),
        )
        .await;
        assert_eq!(json["selection"]["selected_metric"], "mem_util");
    }

    #[tokio::test]
    async fn test_alerts_by_section() {
        let router = mock_router();
        let (_, json) = send_json(&router, "GET", "/alerts?section=cpu-memory", None).await;
        let metrics: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["metric_type"].as_str().unwrap())
            .collect();
        assert_eq!(metrics, vec!["cpu_util", "mem_util"]);

        let (status, json) = send_json(&router, "GET", "/alerts?section=storage", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_table_needs_a_device() {
        let (status, _) = send_json(&mock_router(), "GET", "/dashboard/table", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_table_uses_current_selection() {
        let router = mock_router();
        send_json(&router, "POST", "/dashboard/section/link-monitoring", None).await;
        let (status, json) = send_json(&router, "GET", "/dashboard/table?page=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["page"], 2);
        assert_eq!(json["total"], 50);
        assert_eq!(json["start"], 11);
        assert_eq!(json["rows"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_chart_view() {
        let (status, json) = send_json(
            &mock_router(),
            "GET",
            "/dashboard/chart?device=192.168.1.1&section=bandwidth",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Network Bandwidth Usage - Last 24 Hours");
        assert_eq!(json["y_axis_label"], "Bandwidth (Mbps)");
        assert_eq!(json["points"].as_array().unwrap().len(), 24);
    }

    async fn assert_csv_export(uri: &str) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let response = mock_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"metrics-192.168.1.1-cpu-memory-"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().next(), Some("Timestamp,Metric Type,Value,Unit"));
        assert_eq!(csv.lines().count(), 51);
    }

    #[tokio::test]
    async fn test_export_csv_attachment() {
        assert_csv_export("/dashboard/export?device=192.168.1.1&section=cpu-memory").await;
    }

    #[tokio::test]
    async fn test_export_on_data_seam() {
        assert_csv_export("/metrics/export?device=192.168.1.1&section=cpu-memory").await;
    }

    #[tokio::test]
    async fn test_raw_metrics_paging() {
        let router = mock_router();
        let uri = "/metrics?device=192.168.1.1&section=bandwidth&range=24h";
        let (status, json) = send_json(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 50);

        let (status, json) = send_json(&router, "GET", &format!("{uri}&page=5"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 10);

        let (_, json) = send_json(&router, "GET", &format!("{uri}&page=99"), None).await;
        assert_eq!(json.as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_snapshot_top_devices_carry_unit() {
        let router = mock_router();
        let (_, json) = send_json(&router, "POST", "/dashboard/section/link-monitoring", None).await;
        assert_eq!(json["top_devices"][0]["hostname"], "Router-Main");
        assert_eq!(json["top_devices"][0]["unit"], "ms");
    }

    #[tokio::test]
    async fn test_alerts_default_to_active_section() {
        let router = mock_router();
        send_json(&router, "POST", "/dashboard/section/link-monitoring", None).await;
        let (status, json) = send_json(&router, "GET", "/alerts", None).await;
        assert_eq!(status, StatusCode::OK);
        let alerts = json.as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["metric_type"], "response_time");
    }

    #[tokio::test]
    async fn test_mock_outage_is_service_unavailable() {
        let source = MockDataSource::default().with_outage(true);
        let router = build_router(AppState::new(Arc::new(source), Section::CpuMemory, 10));
        let (status, json) = send_json(&router, "POST", "/dashboard/section/bandwidth", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "data source unavailable: mock source outage");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_service_unavailable() {
        let source = Arc::new(ScriptedSource::default());
        let router = build_router(AppState::new(source.clone(), Section::CpuMemory, 10));
        let (status, _) = send_json(&router, "POST", "/dashboard/section/cpu-memory", None).await;
        assert_eq!(status, StatusCode::OK);

        source.fail.store(true, Ordering::SeqCst);
        let (status, json) = send_json(&router, "POST", "/dashboard/refresh", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "data source unavailable: scripted outage");

        let (_, json) = send_json(&router, "GET", "/dashboard", None).await;
        assert_eq!(json["devices"].as_array().unwrap().len(), 2);
    }
}
