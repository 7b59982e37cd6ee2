// Application layer - Use cases over the data source seam
pub mod dashboard_service;
pub mod data_source;
pub mod metrics_service;
pub mod refresh;
