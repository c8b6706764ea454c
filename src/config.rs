use crate::error::{BuilderError, BuilderResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Surreal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Remote SurrealDB endpoint; the embedded in-memory engine when unset.
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub namespace: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Quiet period after the last edit before an auto-save fires.
    pub autosave_debounce_ms: u64,
    /// Version snapshots retained per document.
    pub max_versions: usize,
}

impl EditorConfig {
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: 2000,
            max_versions: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    pub json: bool,
}

/// Load configuration from `storefront.{toml,yaml,json}` in the working
/// directory, then `path` if given, then `STOREFRONT__*` environment
/// variables. Every key has a default.
pub fn load_config(path: Option<&Path>) -> BuilderResult<AppConfig> {
    let mut builder = Config::builder()
        .set_default("server.host", "127.0.0.1")
        .and_then(|b| b.set_default("server.port", 8080))
        .and_then(|b| b.set_default("storage.backend", "memory"))
        .and_then(|b| b.set_default("storage.namespace", "storefront"))
        .and_then(|b| b.set_default("storage.database", "storefront"))
        .and_then(|b| b.set_default("editor.autosave_debounce_ms", 2000))
        .and_then(|b| b.set_default("editor.max_versions", 20))
        .and_then(|b| b.set_default("logging.level", "info"))
        .and_then(|b| b.set_default("logging.json", false))
        .map_err(|err| BuilderError::ConfigError(err.to_string()))?
        .add_source(File::with_name("storefront").required(false));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("STOREFRONT").separator("__"));

    let config = builder
        .build()
        .map_err(|err| BuilderError::ConfigError(err.to_string()))?;

    let parsed: AppConfig = config
        .try_deserialize()
        .map_err(|err| BuilderError::ConfigError(err.to_string()))?;

    if parsed.editor.max_versions == 0 {
        return Err(BuilderError::ConfigError(
            "editor.max_versions must be at least 1".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.editor.autosave_debounce(), Duration::from_secs(2));
        assert_eq!(config.editor.max_versions, 20);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[storage]\nbackend = \"surreal\"\n\n[editor]\nautosave_debounce_ms = 500\nmax_versions = 5"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Surreal);
        assert_eq!(config.storage.url, None);
        assert_eq!(config.editor.autosave_debounce_ms, 500);
        assert_eq!(config.editor.max_versions, 5);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_zero_versions_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[editor]\nmax_versions = 0").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(BuilderError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/storefront-config.toml");
        assert!(load_config(Some(missing)).is_err());
    }
}
