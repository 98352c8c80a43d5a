use crate::{
    paths,
    state::{self, PState, Sorter, STATE_VERSION},
};
use anyhow::{Context, Result};
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryClass {
    /// A `goal-table-<digits>.json` file, carrying the admiral identifier.
    GoalTable(String),
    /// `config.json` and `backup/` are owned by later steps, not the sweep.
    Deferred,
    Unknown,
}

fn classify(name: &str) -> EntryClass {
    if name == paths::LEGACY_CONFIG_FILE || name == paths::BACKUP_DIR {
        EntryClass::Deferred
    } else if let Some(id) = paths::goal_table_id(name) {
        EntryClass::GoalTable(id.to_string())
    } else {
        EntryClass::Unknown
    }
}

/// One-shot migration of pre-2.0.0 plugin data, invoked at plugin start-up
/// before anything else reads the data directory.
///
/// The existence of `p-state.json` is the only migration marker: once it is
/// present the directory is considered fully migrated and this is a no-op.
/// Files the sweep cannot stamp are moved into `backup/`, never deleted.
/// Recoverable failures are logged and leave the directory retryable on the
/// next launch; only a failed move returns an error, since a filesystem that
/// cannot rename within one directory is not safe to keep writing to.
pub fn migrate(data_dir: &Path) -> Result<()> {
    paths::ensure_data_dir(data_dir)?;
    let backup_dir = paths::ensure_backup_dir(data_dir)?;

    if paths::state_path(data_dir).exists() {
        info!("p-state.json present, nothing to migrate");
        return Ok(());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(data_dir).context("scan plugin data dir")? {
        let entry = entry.context("read dir entry")?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    for name in names {
        match classify(&name) {
            EntryClass::Deferred => {}
            EntryClass::GoalTable(id) => {
                let path = data_dir.join(&name);
                match stamp_goal_table_file(&path) {
                    Ok(()) => info!("stamped goal table for admiral {id}"),
                    Err(err) => {
                        warn!("could not migrate {name}, quarantining: {err:#}");
                        quarantine(&path, &backup_dir, &name)?;
                    }
                }
            }
            EntryClass::Unknown => {
                info!("unrecognized entry {name}, quarantining");
                quarantine(&data_dir.join(&name), &backup_dir, &name)?;
            }
        }
    }

    let config_path = paths::legacy_config_path(data_dir);
    if !config_path.exists() {
        info!("no legacy config.json, sweep complete");
        return Ok(());
    }

    let legacy = match read_legacy_config(&config_path) {
        Ok(legacy) => legacy,
        Err(err) => {
            error!("failed to read legacy config, will retry next launch: {err:#}");
            return Ok(());
        }
    };
    let pstate = migrate_legacy_config(&legacy);
    if let Err(err) = pstate.save(data_dir) {
        error!("failed to write p-state.json, will retry next launch: {err:#}");
        return Ok(());
    }

    // Retire the legacy config only after the new state file is durably in
    // place, so at no point are both representations missing.
    quarantine(&config_path, &backup_dir, paths::LEGACY_CONFIG_FILE)?;
    info!("legacy config migrated to p-state.json");
    Ok(())
}

/// Shallow-merges the canonical version marker into a parsed goal table.
/// Returns `None` for non-object documents; callers treat that as a failed
/// migration and quarantine the file.
pub fn stamp_version(value: Value) -> Option<Value> {
    let Value::Object(mut map) = value else {
        return None;
    };
    map.insert(
        "$version".to_string(),
        Value::String(STATE_VERSION.to_string()),
    );
    Some(Value::Object(map))
}

/// Builds the canonical state document from a parsed legacy `config.json`.
/// Missing or malformed fields fall back to documented defaults with a
/// warning; this transform never fails.
pub fn migrate_legacy_config(legacy: &Value) -> PState {
    let sort_method = match legacy.get("goalSorter") {
        Some(value) if value.as_object().is_some_and(|m| !m.is_empty()) => {
            match serde_json::from_value::<Sorter>(value.clone()) {
                Ok(sorter) => sorter,
                Err(err) => {
                    warn!("legacy goalSorter is malformed ({err}), using default");
                    Sorter::default()
                }
            }
        }
        _ => {
            warn!("legacy config has no goal sorter, using default");
            Sorter::default()
        }
    };

    let templates = match legacy.get("templates") {
        Some(Value::Array(list)) if !list.is_empty() => list.clone(),
        _ => {
            warn!("legacy config has no templates, substituting the default template");
            state::default_templates()
        }
    };

    PState::new(sort_method, templates)
}

fn stamp_goal_table_file(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path).context("read goal table")?;
    let value: Value = serde_json::from_str(&raw).context("parse goal table")?;
    let stamped = stamp_version(value).context("goal table is not a JSON object")?;
    let raw = serde_json::to_string_pretty(&stamped).context("serialize goal table")?;
    fs::write(path, raw).context("write goal table")?;
    Ok(())
}

fn read_legacy_config(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).context("read legacy config")?;
    serde_json::from_str(&raw).context("parse legacy config")
}

fn quarantine(path: &Path, backup_dir: &Path, name: &str) -> Result<()> {
    let dest = backup_dir.join(name);
    let _ = fs::remove_file(&dest);
    fs::rename(path, &dest).with_context(|| format!("move {name} into backup"))?;
    Ok(())
}
