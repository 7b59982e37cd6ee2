use crate::application::metrics_service::DEFAULT_PAGE_SIZE;
use crate::application::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::domain::section::Section;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_section")]
    pub initial_section: Section,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl DashboardSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_secs(),
            initial_section: default_section(),
            page_size: default_page_size(),
        }
    }
}

/// Where dashboard data comes from
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    Mock {
        #[serde(default)]
        latency_ms: u64,
        /// Fail every load, for exercising the error path
        #[serde(default)]
        outage: bool,
    },
    Http {
        base_url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::Mock {
            latency_ms: 0,
            outage: false,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_section() -> Section {
    Section::CpuMemory
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    10
}

/// Load `config/dashboard.{toml,yaml,json}` if present, then `DASHBOARD__*` overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in an endpoint template, URL-encoding each value
pub fn prepare_path(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
