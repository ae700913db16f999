use crate::config::settings::AppConfig;
use crate::infrastructure::process::runner::ProcessRunner;
use crate::infrastructure::storage::local::LocalStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: LocalStorage,
    pub runner: Arc<dyn ProcessRunner>,
}

impl AppState {
    pub fn new(config: AppConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        let storage = LocalStorage::new(config.uploads_dir.clone(), config.results_dir.clone());

        Self {
            config,
            storage,
            runner,
        }
    }
}
