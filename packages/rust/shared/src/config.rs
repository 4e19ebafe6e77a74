//! Migrator configuration.
//!
//! Project config lives at `./docsite.toml` next to the site sources.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsiteError, Result};
use crate::types::{CategoryDescriptor, CategoryTable, TagRule, default_categories, default_tag_rules};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "docsite.toml";

// ---------------------------------------------------------------------------
// Config structs (matching docsite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source and destination trees.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Recognized category folders.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryDescriptor>,

    /// Content-sniffing tag rules.
    #[serde(default = "default_tag_rules")]
    pub tag_rules: Vec<TagRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            categories: default_categories(),
            tag_rules: default_tag_rules(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory of plain markdown articles to migrate.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Site content directory; wiped and rebuilt on every run.
    #[serde(default = "default_target_dir")]
    pub target_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
        }
    }
}

fn default_source_dir() -> String {
    "../持续内容生成系统".into()
}
fn default_target_dir() -> String {
    "docs".into()
}

// ---------------------------------------------------------------------------
// Migrate config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime migration configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub categories: CategoryTable,
    pub tag_rules: Vec<TagRule>,
}

impl MigrateConfig {
    /// Validate the file config and resolve it into runtime form.
    ///
    /// `source` and `target` override the `[paths]` section when given.
    pub fn resolve(
        config: &AppConfig,
        source: Option<PathBuf>,
        target: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(rule) = config.tag_rules.iter().find(|r| r.trigger.is_empty()) {
            return Err(DocsiteError::config(format!(
                "tag rule for '{}' has an empty trigger",
                rule.tag
            )));
        }

        let categories = CategoryTable::new(config.categories.clone())?;
        if categories.is_empty() {
            tracing::warn!("no category folders configured, no _category_.json will be written");
        }

        Ok(Self {
            source_dir: source.unwrap_or_else(|| PathBuf::from(&config.paths.source_dir)),
            target_dir: target.unwrap_or_else(|| PathBuf::from(&config.paths.target_dir)),
            categories,
            tag_rules: config.tag_rules.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `./docsite.toml`. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsiteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(DocsiteError::config(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocsiteError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DocsiteError::Serialize(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DocsiteError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
