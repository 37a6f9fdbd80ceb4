use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use tracing::warn;

use rhythms_core::Section;

use crate::snapshot::{ItemStatus, MemorySnapshot};

const SNAPSHOT_FILE_NAME: &str = "standups.jsonl";
const APP_NAME: &str = "rhythms";

/// Append-only JSONL store of finalized standup snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base_dir: PathBuf,
    file_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(base_dir: PathBuf) -> Self {
        let base_dir = if base_dir.as_os_str().is_empty() {
            default_snapshot_base_dir()
        } else {
            base_dir
        };
        Self {
            file_path: base_dir.join(SNAPSHOT_FILE_NAME),
            base_dir,
        }
    }

    pub fn append(&self, snapshot: &MemorySnapshot) -> Result<()> {
        self.ensure_storage_dir()?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)
            .with_context(|| {
                format!("failed to open snapshot file: {}", self.file_path.display())
            })?;

        set_file_mode_600(&self.file_path)?;

        let line = serde_json::to_string(snapshot).context("failed to serialize snapshot")?;
        writeln!(file, "{line}").context("failed to append snapshot")?;
        file.flush().context("failed to flush snapshot append")?;

        Ok(())
    }

    pub fn load_all(&self) -> Result<Vec<MemorySnapshot>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let file = OpenOptions::new()
            .read(true)
            .open(&self.file_path)
            .with_context(|| {
                format!("failed to read snapshot file: {}", self.file_path.display())
            })?;
        let reader = BufReader::new(file);

        let mut snapshots = Vec::new();
        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result.with_context(|| {
                format!(
                    "failed to read snapshot line {} from {}",
                    idx + 1,
                    self.file_path.display()
                )
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<MemorySnapshot>(&line) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(error) => {
                    warn!(
                        path = %self.file_path.display(),
                        line_number = idx + 1,
                        %error,
                        "skipping corrupt snapshot jsonl line"
                    );
                }
            }
        }

        Ok(snapshots)
    }

    /// Most recently finalized snapshot, if any.
    pub fn load_latest(&self) -> Result<Option<MemorySnapshot>> {
        let snapshots = self.load_all()?;
        Ok(snapshots
            .into_iter()
            .max_by_key(|snapshot| snapshot.finalized_at))
    }

    /// Snapshots from the last `days` days, most recent first.
    pub fn history(&self, days: u32) -> Result<Vec<MemorySnapshot>> {
        let cutoff = Utc::now().date_naive() - Duration::days(i64::from(days));
        let mut snapshots: Vec<MemorySnapshot> = self
            .load_all()?
            .into_iter()
            .filter(|snapshot| snapshot.date >= cutoff)
            .collect();
        snapshots.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(snapshots)
    }

    /// Unresolved blocker bullets across all snapshots, most recent first.
    pub fn unresolved_blockers(&self) -> Result<Vec<(NaiveDate, String)>> {
        let mut blockers: Vec<(NaiveDate, String)> = Vec::new();
        for snapshot in self.load_all()? {
            for item in snapshot.items_in(Section::Blockers) {
                if item.status != ItemStatus::Resolved {
                    blockers.push((snapshot.date, item.bullet.clone()));
                }
            }
        }
        blockers.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(blockers)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_storage_dir(&self) -> Result<()> {
        let dir_exists = self.base_dir.exists();
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("failed to create snapshot dir: {}", self.base_dir.display())
        })?;

        if !dir_exists {
            set_dir_mode_700(&self.base_dir)?;
        }

        Ok(())
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

fn default_snapshot_base_dir() -> PathBuf {
    if let Some(project_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
        return project_dirs
            .state_dir()
            .unwrap_or_else(|| project_dirs.data_local_dir())
            .join("standups");
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        return base_dirs
            .home_dir()
            .join(".local")
            .join("state")
            .join(APP_NAME)
            .join("standups");
    }

    std::env::temp_dir()
        .join(format!("{APP_NAME}-state"))
        .join("standups")
}

#[cfg(unix)]
fn set_dir_mode_700(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("failed to chmod 700: {}", path.display()))
}

#[cfg(not(unix))]
fn set_dir_mode_700(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn set_file_mode_600(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to chmod 600: {}", path.display()))
}

#[cfg(not(unix))]
fn set_file_mode_600(_path: &std::path::Path) -> Result<()> {
    Ok(())
}
