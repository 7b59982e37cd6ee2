// Dashboard service - Owns selection state and runs section loads
use crate::application::data_source::{DataSource, LoadError};
use crate::domain::alert::{device_alerts, section_alerts, Alert};
use crate::domain::dashboard::{DashboardSnapshot, SectionData, Selection};
use crate::domain::device::TopDeviceRow;
use crate::domain::section::Section;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

const NOTIFICATION_CHANNEL_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTrigger {
    SectionChange,
    Manual,
    Timer,
}

/// What happened to a load that completed without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started while this one was in flight
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Refreshed,
    Refreshing,
    LoadFailed,
}

/// Transient message for the operator (toast)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub description: &'static str,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        let (title, description) = match kind {
            NotificationKind::Refreshed => ("Data Refreshed", "Dashboard data has been updated"),
            NotificationKind::Refreshing => ("Refreshing...", "Updating dashboard data"),
            NotificationKind::LoadFailed => ("Error", "Failed to load section data"),
        };
        Self {
            kind,
            title,
            description,
            at: Utc::now(),
        }
    }
}

#[derive(Debug)]
struct DashboardState {
    selection: Selection,
    data: Option<SectionData>,
    alerts: Vec<Alert>,
}

/// Decrements the in-flight counter even if the load future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn DataSource>,
    state: Arc<Mutex<DashboardState>>,
    generation: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
    notifications: broadcast::Sender<Notification>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DataSource>, initial_section: Section) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        Self {
            source,
            state: Arc::new(Mutex::new(DashboardState {
                selection: Selection::new(initial_section, Utc::now()),
                data: None,
                alerts: Vec::new(),
            })),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            notifications,
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Switch the active section and load its data.
    /// Device and metric choices survive; defaults only fill empty fields.
    pub async fn select(&self, section: Section) -> Result<LoadOutcome, LoadError> {
        self.state.lock().await.selection.active_section = section;
        tracing::info!(section = %section, "Section selected");
        self.load(LoadTrigger::SectionChange).await
    }

    pub async fn select_device(&self, ip: &str) {
        self.state.lock().await.selection.selected_device = ip.to_string();
        tracing::debug!(device = ip, "Device selected");
    }

    pub async fn select_metric(&self, metric: &str) {
        self.state.lock().await.selection.selected_metric = metric.to_string();
        tracing::debug!(metric, "Metric selected");
    }

    /// Operator-initiated reload of the active section
    pub async fn refresh(&self) -> Result<LoadOutcome, LoadError> {
        self.load(LoadTrigger::Manual).await
    }

    /// Timer-initiated reload of the active section
    pub async fn tick(&self) -> Result<LoadOutcome, LoadError> {
        self.load(LoadTrigger::Timer).await
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let is_loading = self.is_loading();
        let state = self.state.lock().await;
        let selection = state.selection.clone();

        let (devices, summary, top_devices) = match &state.data {
            Some(data) => (
                data.devices.clone(),
                Some(data.summary.clone()),
                data.top_devices.iter().map(TopDeviceRow::from).collect(),
            ),
            None => (Vec::new(), None, Vec::new()),
        };

        let selected_device_info = devices
            .iter()
            .find(|d| d.ip == selection.selected_device)
            .cloned();
        let no_devices = selection.selected_device.is_empty() && devices.is_empty() && !is_loading;

        DashboardSnapshot {
            summary_cards: summary.as_ref().map(|s| s.cards()).unwrap_or_default(),
            top_devices_title: selection.active_section.top_devices_title(),
            section_alerts: section_alerts(&state.alerts, Some(selection.active_section)),
            device_alerts: device_alerts(&state.alerts, &selection.selected_device),
            selected_device_info,
            no_devices,
            is_loading,
            devices,
            summary,
            top_devices,
            selection,
        }
    }

    async fn load(&self, trigger: LoadTrigger) -> Result<LoadOutcome, LoadError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let section = self.state.lock().await.selection.active_section;

        if trigger == LoadTrigger::Manual {
            self.notify(NotificationKind::Refreshing);
        }

        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            tokio::try_join!(
                self.source.load_section(section),
                self.source.load_alerts(section)
            )
        };

        let (data, alerts) = match result {
            Ok(loaded) => loaded,
            Err(e) if self.is_superseded(generation) => {
                tracing::debug!(section = %section, generation, error = %e, "Ignoring failure of superseded load");
                return Ok(LoadOutcome::Superseded);
            }
            Err(e) => {
                tracing::warn!(section = %section, ?trigger, error = %e, "Failed to load section data");
                self.notify(NotificationKind::LoadFailed);
                return Err(e);
            }
        };

        {
            let mut state = self.state.lock().await;
            if self.is_superseded(generation) || state.selection.active_section != section {
                tracing::debug!(
                    section = %section,
                    generation,
                    "Discarding superseded load result"
                );
                return Ok(LoadOutcome::Superseded);
            }

            state.selection.apply_defaults(&data.devices);
            if trigger != LoadTrigger::SectionChange {
                state.selection.last_refresh = Utc::now();
            }
            tracing::debug!(
                section = %section,
                devices = data.devices.len(),
                alerts = alerts.len(),
                "Applied section data"
            );
            state.data = Some(data);
            state.alerts = alerts;
        }

        if trigger == LoadTrigger::Timer {
            self.notify(NotificationKind::Refreshed);
        }
        Ok(LoadOutcome::Applied)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        generation != self.generation.load(Ordering::SeqCst)
    }

    fn notify(&self, kind: NotificationKind) {
        // No subscribers is fine; nobody is watching the toasts
        let _ = self.notifications.send(Notification::new(kind));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::alert::AlertStatus;
    use crate::domain::device::Device;
    use crate::domain::metric::{ChartPoint, Metric};
    use crate::domain::summary::Summary;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    /// Scripted source: counts calls, can fail, and can delay individual loads
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        pub section_loads: AtomicUsize,
        pub fail: std::sync::atomic::AtomicBool,
        pub delays: StdMutex<VecDeque<Duration>>,
        pub empty_sections: Vec<Section>,
    }

    impl ScriptedSource {
        pub(crate) fn loads(&self) -> usize {
            self.section_loads.load(Ordering::SeqCst)
        }
    }

    fn summary_for(section: Section) -> Summary {
        match section {
            Section::CpuMemory => Summary::CpuMemory {
                avg_cpu: 45.2,
                avg_memory: 62.1,
                total_devices: 2,
            },
            Section::Bandwidth => Summary::Bandwidth {
                total_inbound: 1.0,
                total_outbound: 2.0,
                avg_utilization: 3.0,
            },
            Section::LinkMonitoring => Summary::LinkMonitoring {
                avg_response_time: 1.0,
                avg_packet_loss: 0.1,
                avg_jitter: 1.0,
            },
            Section::Backup => Summary::Backup {
                successful_backups: 1,
                failed_backups: 0,
                total_backups: 1,
            },
        }
    }

    #[async_trait]
    impl DataSource for ScriptedSource {
        async fn load_section(&self, section: Section) -> Result<SectionData, LoadError> {
            let call = self.section_loads.fetch_add(1, Ordering::SeqCst) + 1;
            let delay = self.delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(LoadError::Unavailable("scripted outage".to_string()));
            }
            let devices = if self.empty_sections.contains(&section) {
                Vec::new()
            } else {
                vec![
                    Device::new(&format!("{section}-1"), &format!("load-{call}")),
                    Device::new(&format!("{section}-2"), &format!("load-{call}")),
                ]
            };
            Ok(SectionData::new(devices, summary_for(section), Vec::new()))
        }

        async fn load_alerts(&self, _section: Section) -> Result<Vec<Alert>, LoadError> {
            Ok(vec![
                Alert::new("cpu-memory-1", "cpu_util", 80.0, 85.0, AlertStatus::Critical, Utc::now()),
                Alert::new("cpu-memory-2", "response_time", 100.0, 150.0, AlertStatus::Critical, Utc::now()),
                Alert::new("bandwidth-1", "in_bandwidth_util", 90.0, 95.0, AlertStatus::Warning, Utc::now()),
            ])
        }

        async fn load_metrics(&self, _: &str, _: Section, _: &str) -> Result<Vec<Metric>, LoadError> {
            Ok(Vec::new())
        }

        async fn load_chart(&self, _: &str, _: Section) -> Result<Vec<ChartPoint>, LoadError> {
            Ok(Vec::new())
        }
    }

    fn service(source: Arc<ScriptedSource>) -> DashboardService {
        DashboardService::new(source, Section::CpuMemory)
    }

    #[tokio::test]
    async fn test_select_applies_defaults_for_every_section() {
        for section in Section::ALL {
            let source = Arc::new(ScriptedSource::default());
            let dashboard = service(source);
            assert_eq!(dashboard.select(section).await.unwrap(), LoadOutcome::Applied);

            let snapshot = dashboard.snapshot().await;
            assert_eq!(snapshot.selection.active_section, section);
            assert_eq!(snapshot.selection.selected_device, format!("{section}-1"));
            assert_eq!(snapshot.selection.selected_metric, section.default_metric());
        }
    }

    #[tokio::test]
    async fn test_empty_device_list_leaves_device_unselected() {
        let source = Arc::new(ScriptedSource {
            empty_sections: vec![Section::Backup],
            ..Default::default()
        });
        let dashboard = DashboardService::new(source, Section::Backup);
        dashboard.select(Section::Backup).await.unwrap();

        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.selection.selected_device.is_empty());
        assert!(snapshot.no_devices);
        assert!(snapshot.summary_cards.is_empty());
    }

    #[tokio::test]
    async fn test_manual_choices_survive_refresh_and_section_change() {
        let source = Arc::new(ScriptedSource::default());
        let dashboard = service(source);
        dashboard.select(Section::CpuMemory).await.unwrap();
        dashboard.select_device("cpu-memory-2").await;
        dashboard.select_metric("mem_util").await;

        dashboard.refresh().await.unwrap();
        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.selection.selected_device, "cpu-memory-2");
        assert_eq!(snapshot.selection.selected_metric, "mem_util");

        // Stale selections are tolerated after switching sections
        dashboard.select(Section::Bandwidth).await.unwrap();
        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.selection.selected_device, "cpu-memory-2");
        assert!(snapshot.selected_device_info.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_filters_alerts() {
        let source = Arc::new(ScriptedSource::default());
        let dashboard = service(source);
        dashboard.select(Section::CpuMemory).await.unwrap();

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.section_alerts.len(), 1);
        assert_eq!(snapshot.section_alerts[0].metric_type, "cpu_util");
        assert_eq!(snapshot.device_alerts.len(), 1);
        assert_eq!(snapshot.device_alerts[0].device_ip, "cpu-memory-1");
        assert_eq!(
            snapshot.selected_device_info.map(|d| d.ip),
            Some("cpu-memory-1".to_string())
        );
        assert_eq!(snapshot.summary_cards.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_state() {
        let source = Arc::new(ScriptedSource::default());
        let dashboard = service(source.clone());
        dashboard.select(Section::CpuMemory).await.unwrap();
        let before = dashboard.snapshot().await;

        let mut notifications = dashboard.subscribe();
        source.fail.store(true, Ordering::SeqCst);
        assert!(dashboard.tick().await.is_err());

        let after = dashboard.snapshot().await;
        assert_eq!(after.devices, before.devices);
        assert_eq!(after.selection, before.selection);
        assert_eq!(notifications.recv().await.unwrap().kind, NotificationKind::LoadFailed);
    }

    #[tokio::test]
    async fn test_refresh_notifications_and_stamp() {
        let source = Arc::new(ScriptedSource::default());
        let dashboard = service(source);
        dashboard.select(Section::CpuMemory).await.unwrap();
        let initial = dashboard.snapshot().await.selection.last_refresh;
        let mut notifications = dashboard.subscribe();

        dashboard.refresh().await.unwrap();
        let manual = notifications.recv().await.unwrap();
        assert_eq!(manual.kind, NotificationKind::Refreshing);
        assert_eq!(manual.title, "Refreshing...");

        dashboard.tick().await.unwrap();
        let timer = notifications.recv().await.unwrap();
        assert_eq!(timer.kind, NotificationKind::Refreshed);
        assert_eq!(timer.description, "Dashboard data has been updated");

        assert!(dashboard.snapshot().await.selection.last_refresh >= initial);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_load_does_not_overwrite_newer_result() {
        let source = Arc::new(ScriptedSource::default());
        source
            .delays
            .lock()
            .unwrap()
            .extend([Duration::from_secs(10), Duration::from_secs(1)]);
        let dashboard = service(source.clone());

        let slow = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.refresh().await }
        });
        tokio::task::yield_now().await;
        let fast = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.tick().await }
        });

        assert_eq!(fast.await.unwrap().unwrap(), LoadOutcome::Applied);
        assert_eq!(slow.await.unwrap().unwrap(), LoadOutcome::Superseded);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.devices[0].hostname, "load-2");
        assert!(!snapshot.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_for_previous_section_is_dropped() {
        let source = Arc::new(ScriptedSource::default());
        source
            .delays
            .lock()
            .unwrap()
            .extend([Duration::from_secs(10), Duration::from_secs(1)]);
        let dashboard = service(source);

        let first = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.select(Section::CpuMemory).await }
        });
        tokio::task::yield_now().await;
        dashboard.select(Section::LinkMonitoring).await.unwrap();
        assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Superseded);

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.selection.active_section, Section::LinkMonitoring);
        assert_eq!(snapshot.devices[0].ip, "link-monitoring-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_failure_is_silent() {
        let source = Arc::new(ScriptedSource::default());
        source
            .delays
            .lock()
            .unwrap()
            .extend([Duration::from_secs(10), Duration::from_secs(1)]);
        let dashboard = service(source.clone());

        let slow = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.refresh().await }
        });
        tokio::task::yield_now().await;
        let fast = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.tick().await }
        });
        assert_eq!(fast.await.unwrap().unwrap(), LoadOutcome::Applied);

        let mut notifications = dashboard.subscribe();
        source.fail.store(true, Ordering::SeqCst);
        assert_eq!(slow.await.unwrap().unwrap(), LoadOutcome::Superseded);

        assert!(notifications.try_recv().is_err());
        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.devices[0].hostname, "load-2");
        assert!(!snapshot.is_loading);
    }
}
