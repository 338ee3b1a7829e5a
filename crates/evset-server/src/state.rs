use crate::config::ServerConfig;
use crate::repository::SettingsRepository;
use chrono::{DateTime, Utc};
use evset_common::profile::FieldProfiles;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Mutex<SettingsRepository>>,
    pub profiles: Arc<FieldProfiles>,
    pub config: Arc<ServerConfig>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    /// Uses the configured field profiles, or the built-in catalog when the
    /// config lists none.
    pub fn new(config: ServerConfig, repository: SettingsRepository) -> anyhow::Result<Self> {
        let profiles = if config.fields.is_empty() {
            FieldProfiles::builtin()
        } else {
            FieldProfiles::new(config.fields.clone())?
        };
        Ok(Self {
            repository: Arc::new(Mutex::new(repository)),
            profiles: Arc::new(profiles),
            config: Arc::new(config),
            start_time: Utc::now(),
        })
    }

    pub fn repo(&self) -> MutexGuard<'_, SettingsRepository> {
        self.repository
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
