//! Application configuration for holocron.
//!
//! User config lives at `~/.holocron/holocron.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HolocronError, Result};
use crate::types::EntityKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "holocron.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".holocron";

// ---------------------------------------------------------------------------
// Config structs (matching holocron.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream catalog API.
    #[serde(default)]
    pub swapi: SwapiConfig,

    /// Wiki used for enrichment.
    #[serde(default)]
    pub wiki: WikiConfig,

    /// Document store location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-kind tuning overrides, keyed by kind name (`films`, `species`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kinds: BTreeMap<String, KindOverrides>,
}

/// `[swapi]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapiConfig {
    /// Base URL of the catalog API; resources live at `<base_url>/<resource>`.
    #[serde(default = "default_swapi_base_url")]
    pub base_url: String,
}

impl Default for SwapiConfig {
    fn default() -> Self {
        Self {
            base_url: default_swapi_base_url(),
        }
    }
}

fn default_swapi_base_url() -> String {
    "https://swapi.info/api".into()
}

/// `[wiki]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Base path articles are joined onto.
    #[serde(default = "default_wiki_base_url")]
    pub base_url: String,

    /// Browser-like User-Agent; the wiki blocks obvious bots.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout. Unset means the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: default_wiki_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_wiki_base_url() -> String {
    "https://starwars.fandom.com/wiki".into()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the embedded document database.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

fn default_database() -> String {
    "var/holocron.db".into()
}

/// `[kinds.<kind>]` entry. Unset fields keep the kind's built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindOverrides {
    /// A paragraph is kept only if its length is strictly greater than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_paragraph_len: Option<usize>,

    /// Maximum number of paragraphs kept per article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paragraphs: Option<usize>,

    /// Pause after every wiki request, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    /// Text stored when the article is missing or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_text: Option<String>,
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Catalog API base URL (no trailing slash).
    pub swapi_base_url: String,
    /// Wiki base URL (no trailing slash).
    pub wiki_base_url: String,
    /// User-Agent sent to the wiki.
    pub user_agent: String,
    /// Optional wiki request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Per-kind overrides with unknown kind names dropped.
    pub overrides: BTreeMap<EntityKind, KindOverrides>,
}

impl PipelineConfig {
    /// Overrides for one kind (empty when none are configured).
    pub fn overrides_for(&self, kind: EntityKind) -> KindOverrides {
        self.overrides.get(&kind).cloned().unwrap_or_default()
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        let overrides = config
            .kinds
            .iter()
            .filter_map(|(name, over)| match name.parse::<EntityKind>() {
                Ok(kind) => Some((kind, over.clone())),
                Err(e) => {
                    tracing::warn!(kind = %name, error = %e, "ignoring overrides for unknown kind");
                    None
                }
            })
            .collect();

        Self {
            swapi_base_url: config.swapi.base_url.trim_end_matches('/').to_string(),
            wiki_base_url: config.wiki.base_url.trim_end_matches('/').to_string(),
            user_agent: config.wiki.user_agent.clone(),
            timeout_secs: config.wiki.timeout_secs,
            overrides,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.holocron/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HolocronError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.holocron/holocron.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HolocronError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| HolocronError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HolocronError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HolocronError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HolocronError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject configs with unparseable URLs, unknown kinds or a zero paragraph cap.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    for (section, raw) in [("swapi", &config.swapi.base_url), ("wiki", &config.wiki.base_url)] {
        let url = Url::parse(raw).map_err(|e| {
            HolocronError::config(format!("[{section}] base_url '{raw}' is not a valid URL: {e}"))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(HolocronError::config(format!(
                "[{section}] base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
    }

    for (name, over) in &config.kinds {
        name.parse::<EntityKind>().map_err(HolocronError::config)?;
        if over.max_paragraphs == Some(0) {
            return Err(HolocronError::config(format!(
                "[kinds.{name}] max_paragraphs must be at least 1"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("swapi.info"));
        assert!(toml_str.contains("starwars.fandom.com"));
        assert!(!toml_str.contains("timeout_secs"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.storage.database, "var/holocron.db");
        assert_eq!(parsed.wiki.user_agent, "Mozilla/5.0 (Windows NT 10.0; Win64; x64)");
    }

    #[test]
    fn config_with_kind_overrides() {
        let toml_str = r#"
[swapi]
base_url = "http://localhost:9000/api/"

[kinds.species]
max_paragraphs = 4
delay_ms = 0

[kinds.droids]
delay_ms = 10
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.kinds.len(), 2);

        let runtime = PipelineConfig::from(&config);
        assert_eq!(runtime.swapi_base_url, "http://localhost:9000/api");
        assert_eq!(runtime.overrides.len(), 1);

        let species = runtime.overrides_for(EntityKind::Species);
        assert_eq!(species.max_paragraphs, Some(4));
        assert_eq!(species.delay_ms, Some(0));
        assert_eq!(species.min_paragraph_len, None);
        assert_eq!(runtime.overrides_for(EntityKind::Films), KindOverrides::default());
    }

    #[test]
    fn validation_rejects_unknown_kind() {
        let mut config = AppConfig::default();
        assert!(validate_config(&config).is_ok());

        config.kinds.insert("droids".into(), KindOverrides::default());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("droids"));
    }

    #[test]
    fn validation_rejects_bad_urls_and_zero_cap() {
        let mut config = AppConfig::default();
        config.wiki.base_url = "ftp://wiki.example.com".into();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.kinds.insert(
            "films".into(),
            KindOverrides {
                max_paragraphs: Some(0),
                ..KindOverrides::default()
            },
        );
        assert!(validate_config(&config).unwrap_err().to_string().contains("max_paragraphs"));
    }
}
