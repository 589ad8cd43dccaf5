use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk schema version written by [`save_to`]. Every bump needs a step in
/// [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable that replaces `api_base_url`.
pub const API_URL_ENV: &str = "CHECKWISE_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckwiseConfig {
    /// 0 when absent, for files written before versioning.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<jiff::Timestamp>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for CheckwiseConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_filter: default_log_filter(),
            created_at: None,
        }
    }
}

impl CheckwiseConfig {
    /// Apply the environment override, then the command-line flag, which
    /// wins over both the file and the environment.
    pub fn with_overrides(mut self, env_url: Option<String>, flag_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(url) = flag_url {
            self.api_base_url = url;
        }
        self
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("checkwise"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

/// The saved config, or defaults when none has been written yet.
pub fn load_config() -> eyre::Result<CheckwiseConfig> {
    if !has_config() {
        return Ok(CheckwiseConfig::default());
    }
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> eyre::Result<CheckwiseConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    let raw: serde_json::Value = serde_json::from_str(&contents)?;
    let version = raw
        .get("config_version")
        .and_then(serde_json::Value::as_u64)
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX));

    Ok(serde_json::from_value(migrate(raw, version)?)?)
}

/// Bring a raw config document from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(mut raw: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update checkwise."
        ));
    }

    if from_version == 0 {
        let fields = raw
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        let legacy_url = fields
            .remove("api_url")
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        fields.entry("api_base_url").or_insert(legacy_url);
        fields.insert("config_version".to_string(), 1.into());
        tracing::info!(from = 0, to = 1, "config migrated, api_url is now api_base_url");
    }

    Ok(raw)
}

pub fn save_config(config: &CheckwiseConfig) -> eyre::Result<PathBuf> {
    save_to(&config_dir()?, config)
}

/// Write `config.json` under `dir`, stamped with [`CURRENT_VERSION`] and
/// readable by the owner only. Readers never see a partial file.
pub fn save_to(dir: &Path, config: &CheckwiseConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let body = serde_json::to_string_pretty(&CheckwiseConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    })?;

    let path = dir.join("config.json");
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, body)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o600))?;
    }
    std::fs::rename(&staging, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}
