use anyhow::{Context, Result};
use directories::BaseDirs;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const STATE_FILE: &str = "p-state.json";
pub const LEGACY_CONFIG_FILE: &str = "config.json";
pub const BACKUP_DIR: &str = "backup";

pub fn default_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_local_dir().join("levelplan"))
}

pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir).context("create plugin data dir")?;
    Ok(())
}

pub fn ensure_backup_dir(data_dir: &Path) -> Result<PathBuf> {
    let backup_dir = data_dir.join(BACKUP_DIR);
    fs::create_dir_all(&backup_dir).context("create backup dir")?;
    Ok(backup_dir)
}

pub fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_FILE)
}

pub fn legacy_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEGACY_CONFIG_FILE)
}

pub fn goal_table_path(data_dir: &Path, admiral_id: &str) -> PathBuf {
    data_dir.join(format!("goal-table-{admiral_id}.json"))
}

/// Extracts the admiral identifier from a `goal-table-<digits>.json` file
/// name. Anything that does not match the pattern exactly yields `None`.
pub fn goal_table_id(name: &str) -> Option<&str> {
    let id = name.strip_prefix("goal-table-")?.strip_suffix(".json")?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id)
}
