use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::llm::ClassifierLlmConfig;

/// Current schema version for config.toml
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const CONFIG_DIR: &str = ".rhythms";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmsConfig {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "SourcesConfig::is_default")]
    pub sources: SourcesConfig,
    #[serde(skip_serializing_if = "EngineConfig::is_default")]
    pub engine: EngineConfig,
    #[serde(skip_serializing_if = "ClassifierConfig::is_default")]
    pub classifier: ClassifierConfig,
    #[serde(skip_serializing_if = "StoreConfig::is_default")]
    pub store: StoreConfig,
}

impl Default for RhythmsConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            sources: SourcesConfig::default(),
            engine: EngineConfig::default(),
            classifier: ClassifierConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Activity source settings shared by both trackers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// How many days of activity to consider for a cycle.
    pub lookback_days: u32,
    /// Cap on records accepted per source.
    pub max_items_per_source: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            lookback_days: 1,
            max_items_per_source: 50,
        }
    }
}

impl SourcesConfig {
    pub fn is_default(&self) -> bool {
        self.lookback_days == 1 && self.max_items_per_source == 50
    }
}

/// Reconciliation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cap on utterance/update rounds before the cycle reports incomplete.
    pub max_rounds: u32,
    /// Section receiving utterances that carry no section cue.
    pub default_section: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            default_section: "plans".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn is_default(&self) -> bool {
        self.max_rounds == 10 && self.default_section == "plans"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub llm: ClassifierLlmConfig,
}

impl ClassifierConfig {
    pub fn is_default(&self) -> bool {
        self.llm.is_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Override for the snapshot store directory; platform state dir otherwise.
    pub base_dir: String,
}

impl StoreConfig {
    pub fn is_default(&self) -> bool {
        self.base_dir.is_empty()
    }

    pub fn base_dir_path(&self) -> Option<PathBuf> {
        if self.base_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.base_dir))
        }
    }
}

impl RhythmsConfig {
    /// Load `.rhythms/config.toml` under `project_root`, if present.
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let path = Self::config_path(project_root);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(Some(config))
    }

    /// Load config for `project_root`, falling back to defaults.
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        Ok(Self::load(project_root)?.unwrap_or_default())
    }

    /// Save config to .rhythms/config.toml
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let config_dir = project_root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("failed to create {}", config_dir.display()))?;
        let config_path = config_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }

    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Check values serde cannot reject on its own. Returns human-readable
    /// problems; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.schema_version != CURRENT_SCHEMA_VERSION {
            problems.push(format!(
                "unsupported schema_version {} (expected {})",
                self.schema_version, CURRENT_SCHEMA_VERSION
            ));
        }
        if self.engine.max_rounds == 0 {
            problems.push("engine.max_rounds must be at least 1".to_string());
        }
        if !matches!(
            self.engine.default_section.as_str(),
            "accomplishments" | "blockers" | "plans"
        ) {
            problems.push(format!(
                "engine.default_section '{}' is not one of accomplishments, blockers, plans",
                self.engine.default_section
            ));
        }
        if self.sources.lookback_days == 0 {
            problems.push("sources.lookback_days must be at least 1".to_string());
        }
        if self.classifier.llm.enabled {
            if self.classifier.llm.base_url.is_empty() {
                problems.push("classifier.llm.base_url required when enabled".to_string());
            }
            if self.classifier.llm.models.is_empty() {
                problems.push("classifier.llm.models required when enabled".to_string());
            }
        }

        problems
    }

    /// Commented starter config written by `rhythms config init`.
    pub fn default_template() -> &'static str {
        DEFAULT_TEMPLATE
    }

    /// Write the starter config, returning its path.
    pub fn write_template(project_root: &Path) -> Result<PathBuf> {
        let config_dir = project_root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("failed to create {}", config_dir.display()))?;
        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, DEFAULT_TEMPLATE)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(config_path)
    }
}

const DEFAULT_TEMPLATE: &str = r#"schema_version = 1

[sources]
# How many days of activity feed one standup cycle.
lookback_days = 1
# Cap on records accepted per source.
max_items_per_source = 50

[engine]
# Reconciliation rounds before a cycle reports incomplete.
max_rounds = 10
# Section receiving utterances with no section cue.
default_section = "plans"

[classifier.llm]
# Enable the OpenAI-compatible classifier backend. The built-in rule
# classifier is used when disabled or unreachable.
enabled = false
base_url = ""
api_key = ""
# Comma-separated failover list, primary first.
models = ""

[store]
# Snapshot store directory; platform state dir when empty.
base_dir = ""
"#;

/// Walk up from `start` looking for a directory containing `.rhythms/`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(CONFIG_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
