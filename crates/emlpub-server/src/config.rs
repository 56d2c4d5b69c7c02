use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming an alternative config file (without `.toml`)
pub const CONFIG_PATH_VAR: &str = "EMLPUB_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per package container
    pub root: PathBuf,
    /// Prefix of every blob URL handed out
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Query file used when a request names none
    #[serde(default)]
    pub query_path: Option<PathBuf>,
    pub csv_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub profile: String,
}

impl Config {
    /// Defaults, then `emlpub.toml` (or the file named by `EMLPUB_CONFIG`),
    /// then `EMLPUB__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => path,
            _ => "emlpub".to_string(),
        };
        Self::load_from(
            Some(file.as_str()),
            config::Environment::with_prefix("EMLPUB").separator("__"),
        )
    }

    pub fn load_from(
        file: Option<&str>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 7071)?
            .set_default("storage.root", "./blobs")?
            .set_default("storage.public_base_url", "http://localhost:7071/blobs")?
            .set_default("database.path", "./emlpub.db")?
            .set_default("pipeline.csv_name", emlpub_engine::commands::publish::DEFAULT_CSV_NAME)?
            .set_default("logging.profile", "development")?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
