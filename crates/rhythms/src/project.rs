//! Shared per-command context: project root discovery, config, store.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use rhythms_config::{RhythmsConfig, find_project_root};
use rhythms_memory::SnapshotStore;

/// Resolve the project root from an optional `--cd` override. Falls back to
/// the starting directory itself when no `.rhythms/` marker is found.
pub fn resolve_project_root(cd: Option<String>) -> Result<PathBuf> {
    let start = match cd {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    if !start.is_dir() {
        bail!("working directory does not exist: {}", start.display());
    }
    Ok(find_project_root(&start).unwrap_or(start))
}

/// Load config for the project, refusing to run on invalid values.
pub fn load_config(project_root: &std::path::Path) -> Result<RhythmsConfig> {
    let config = RhythmsConfig::load_or_default(project_root)?;
    let problems = config.validate();
    if !problems.is_empty() {
        bail!(
            "invalid configuration at {}:\n  {}",
            RhythmsConfig::config_path(project_root).display(),
            problems.join("\n  ")
        );
    }
    Ok(config)
}

/// Snapshot store honoring the `[store] base_dir` override.
pub fn open_store(config: &RhythmsConfig) -> SnapshotStore {
    match config.store.base_dir_path() {
        Some(base_dir) => SnapshotStore::new(base_dir),
        None => SnapshotStore::default(),
    }
}
