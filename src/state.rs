use crate::{paths, template::Template};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fs, io::Write, path::Path};
use tempfile::NamedTempFile;

pub const STATE_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sorter {
    #[serde(default = "default_sort_method")]
    pub method: String,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Sorter {
    fn default() -> Self {
        Self {
            method: default_sort_method(),
            reversed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GoalTab {
    #[serde(rename = "sortMethod", default)]
    pub sort_method: Sorter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ui {
    #[serde(rename = "activeTab", default = "default_active_tab")]
    pub active_tab: String,
    #[serde(rename = "goalTab", default)]
    pub goal_tab: GoalTab,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            active_tab: default_active_tab(),
            goal_tab: GoalTab::default(),
        }
    }
}

/// The canonical persisted document for this plugin. Created once by the
/// migrator (or shipped with existing installs) and owned by the state store
/// afterwards. Templates are carried as raw JSON so fields this build does
/// not know about survive a load/save cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PState {
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub templates: Vec<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub goals: BTreeMap<String, Value>,
    #[serde(rename = "$version")]
    pub version: String,
}

impl PState {
    pub fn new(sort_method: Sorter, templates: Vec<Value>) -> Self {
        Self {
            ui: Ui {
                active_tab: default_active_tab(),
                goal_tab: GoalTab { sort_method },
            },
            templates,
            goals: BTreeMap::new(),
            version: STATE_VERSION.to_string(),
        }
    }

    pub fn load(data_dir: &Path) -> Result<Option<Self>> {
        let path = paths::state_path(data_dir);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).context("read p-state.json")?;
        let state = serde_json::from_str(&raw).context("parse p-state.json")?;
        Ok(Some(state))
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("serialize p-state.json")?;
        write_durably(&paths::state_path(data_dir), raw.as_bytes())
    }
}

/// Per-admiral goal table, one file per admiral after migration. Entries are
/// keyed by ship identifier and carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalTable {
    #[serde(rename = "$version", default)]
    pub version: String,
    #[serde(flatten)]
    pub goals: BTreeMap<String, Value>,
}

impl GoalTable {
    pub fn load(data_dir: &Path, admiral_id: &str) -> Result<Option<Self>> {
        let path = paths::goal_table_path(data_dir, admiral_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).context("read goal table")?;
        let table = serde_json::from_str(&raw).context("parse goal table")?;
        Ok(Some(table))
    }
}

pub fn default_templates() -> Vec<Value> {
    vec![serde_json::to_value(Template::default_main()).expect("serialize default template")]
}

fn default_sort_method() -> String {
    "rid".to_string()
}

fn default_active_tab() -> String {
    "goal".to_string()
}

// Writes through a sibling temp file so the destination only ever holds
// either the old content or the complete new content.
fn write_durably(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().context("resolve parent dir")?;
    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    tmp.write_all(bytes).context("write temp file")?;
    tmp.flush().context("flush temp file")?;
    let _ = fs::remove_file(path);
    tmp.persist(path).context("persist file")?;
    Ok(())
}
