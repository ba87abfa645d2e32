use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, io};

const SETTINGS_FILE_VERSION: u32 = 1;

/// Sizing and threading knobs for the changes view. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_width: f32,
    pub max_width: f32,
    pub initial_width: f32,
    pub worker_threads: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            max_width: 640.0,
            initial_width: 320.0,
            worker_threads: gitpane_state::store::default_worker_threads(),
        }
    }
}

impl ViewSettings {
    /// Repairs values a hand-edited file may get wrong: swapped bounds, a width outside them,
    /// zero workers.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            self.min_width = defaults.min_width;
        }
        if !self.max_width.is_finite() {
            self.max_width = defaults.max_width;
        }
        if self.min_width > self.max_width {
            std::mem::swap(&mut self.min_width, &mut self.max_width);
        }
        if !self.initial_width.is_finite() {
            self.initial_width = defaults.initial_width;
        }
        self.initial_width = self.initial_width.clamp(self.min_width, self.max_width);
        self.worker_threads = self.worker_threads.max(1);
        self
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct SettingsFileV1 {
    version: u32,
    #[serde(default)]
    changes_view: ViewSettings,
}

/// Reads settings written by the host. Anything unreadable falls back to defaults.
pub fn load_from_path(path: &Path) -> ViewSettings {
    let Some(file) = load_file(path) else {
        return ViewSettings::default();
    };
    file.changes_view.normalized()
}

fn load_file(path: &Path) -> Option<SettingsFileV1> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("cannot read settings {}: {e}", path.display());
            }
            return None;
        }
    };
    let value = match serde_json::from_str::<serde_json::Value>(&contents) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring malformed settings {}: {e}", path.display());
            return None;
        }
    };
    let version = value
        .get("version")
        .and_then(|v| v.as_u64())
        .unwrap_or(SETTINGS_FILE_VERSION as u64);
    if version != SETTINGS_FILE_VERSION as u64 {
        log::warn!(
            "ignoring settings {} with unknown version {version}",
            path.display()
        );
        return None;
    }
    serde_json::from_value(value)
        .map_err(|e| log::warn!("ignoring settings {}: {e}", path.display()))
        .ok()
}

/// Writes `settings` atomically where the platform allows it.
pub fn persist_to_path(settings: &ViewSettings, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = SettingsFileV1 {
        version: SETTINGS_FILE_VERSION,
        changes_view: settings.clone(),
    };
    let contents = serde_json::to_vec_pretty(&file).map_err(io::Error::other)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;

    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            // Windows can't overwrite an existing file via rename.
            let copy_res = fs::copy(&tmp_path, path);
            let _ = fs::remove_file(&tmp_path);
            match copy_res {
                Ok(_) => Ok(()),
                Err(copy_err) => Err(io::Error::new(
                    copy_err.kind(),
                    format!("rename failed: {rename_err}; copy failed: {copy_err}"),
                )),
            }
        }
    }
}
