// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::data_source::DataSource;
use crate::application::metrics_service::MetricsService;
use crate::domain::section::Section;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub metrics: MetricsService,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, initial_section: Section, page_size: usize) -> Self {
        Self {
            dashboard: DashboardService::new(source.clone(), initial_section),
            metrics: MetricsService::new(source, page_size),
        }
    }
}
