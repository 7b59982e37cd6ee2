// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_export;
pub mod http_source;
pub mod mock_source;
