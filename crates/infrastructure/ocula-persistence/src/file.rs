use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use ocula_config::{PREFERENCES_FILE_NAME, PROJECT_APP, PROJECT_ORG, PROJECT_QUALIFIER};
use serde_json::Value;
use tracing::warn;

use crate::{PreferenceError, PreferenceStore};

/// `preferences.json` inside the platform config directory.
pub fn default_preferences_path() -> Result<PathBuf, PreferenceError> {
    let dirs = ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORG, PROJECT_APP)
        .ok_or(PreferenceError::NoConfigDir)?;
    Ok(dirs.config_dir().join(PREFERENCES_FILE_NAME))
}

/// Preference store persisted as a single JSON object.
///
/// The whole object is rewritten on every change. A file that cannot be
/// parsed is treated as empty so a corrupt file never blocks startup; it is
/// replaced on the next write.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl JsonFilePreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = load_values(&path)?;
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn open_default() -> Result<Self, PreferenceError> {
        Self::open(default_preferences_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_locked(&self, values: &BTreeMap<String, Value>) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        atomic_write(&self.path, json.as_bytes())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        let values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.write_locked(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.write_locked(&next)?;
        *values = next;
        Ok(())
    }
}

fn load_values(path: &Path) -> Result<BTreeMap<String, Value>, PreferenceError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
        Ok(values) => Ok(values),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable preferences file");
            Ok(BTreeMap::new())
        }
    }
}

fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), PreferenceError> {
    write_then_rename(path, |file| {
        file.write_all(contents)?;
        file.sync_all()
    })
}

/// Fills a sibling `.tmp` file with `fill` and renames it over `path`.
/// The temp file never outlives a failed attempt.
fn write_then_rename(
    path: &Path,
    fill: impl FnOnce(&mut fs::File) -> std::io::Result<()>,
) -> Result<(), PreferenceError> {
    let tmp_path = {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    };

    let mut file = fs::File::create(&tmp_path)?;
    let filled = fill(&mut file);
    drop(file);
    if let Err(e) = filled {
        fs::remove_file(&tmp_path).ok();
        return Err(e.into());
    }

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            if let Err(e) = fs::rename(&tmp_path, path) {
                fs::remove_file(&tmp_path).ok();
                return Err(e.into());
            }
        }
        Err(e) => {
            fs::remove_file(&tmp_path).ok();
            return Err(e.into());
        }
    }

    Ok(())
}
