use crate::config::Config;
use emlpub_engine::PipeSettings;
use std::sync::Arc;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Pipe settings for one package under the configured storage and database
    pub fn pipe_settings(&self, package_number: &str) -> PipeSettings {
        PipeSettings {
            package_number: package_number.to_string(),
            storage_root: self.config.storage.root.clone(),
            public_base_url: self.config.storage.public_base_url.clone(),
            database_path: self.config.database.path.clone(),
        }
    }
}
