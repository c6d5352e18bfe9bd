//! Configuration loader for License Navigator.
//!
//! Reads `config.toml` from the data directory (`~/.licnav/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use licnav_types::config::{AppConfig, RetrievalConfig};
use licnav_types::error::ConfigError;

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// Priority: `LICNAV_DATA_DIR`, then `~/.licnav`, then `./.licnav`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LICNAV_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".licnav");
    }

    PathBuf::from(".licnav")
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Vector index directory: `retrieval.index_dir`, relative to `data_dir` unless absolute.
pub fn resolve_index_dir(data_dir: &Path, retrieval: &RetrievalConfig) -> PathBuf {
    let dir = Path::new(&retrieval.index_dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        data_dir.join(dir)
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Write `config` to `{data_dir}/config.toml`, creating the directory if needed.
pub async fn save_app_config(data_dir: &Path, config: &AppConfig) -> Result<PathBuf, ConfigError> {
    let text = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| ConfigError::FileSystem(format!("{}: {e}", data_dir.display())))?;

    let path = config_path(data_dir);
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| ConfigError::FileSystem(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use licnav_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.default_state, "DE");
        assert_eq!(config.enabled_states, vec!["DE", "FL"]);
    }

    #[tokio::test]
    async fn load_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            config_path(tmp.path()),
            r#"
default_state = "FL"

[llm]
provider = "offline"

[logging]
level = "debug"
json = true
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.default_state, "FL");
        assert_eq!(config.llm.provider, ProviderType::Offline);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn load_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(config_path(tmp.path()), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.default_state, "DE");
    }

    #[tokio::test]
    async fn save_then_load_keeps_enabled_states() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("nested");
        let mut config = AppConfig::default();
        config.disable_state("FL");
        config.enable_state("tx");

        let path = save_app_config(&data_dir, &config).await.unwrap();
        assert!(path.exists());

        let loaded = load_app_config(&data_dir).await;
        assert_eq!(loaded.enabled_states, vec!["DE", "TX"]);
    }

    #[test]
    fn index_dir_relative_and_absolute() {
        let mut retrieval = RetrievalConfig::default();
        assert_eq!(
            resolve_index_dir(Path::new("/data"), &retrieval),
            PathBuf::from("/data/index")
        );
        retrieval.index_dir = "/var/lib/licnav/index".to_string();
        assert_eq!(
            resolve_index_dir(Path::new("/data"), &retrieval),
            PathBuf::from("/var/lib/licnav/index")
        );
    }
}
