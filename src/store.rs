use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::options::{Options, OptionsUpdate};

// ─── Path ────────────────────────────────────────────────────────────────────

pub fn store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("duesort").join("options.json"))
}

// ─── I/O ─────────────────────────────────────────────────────────────────────

/// Stored option keys, if any. An unreadable file counts as empty.
pub fn load_stored(path: &Path) -> OptionsUpdate {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return OptionsUpdate::default();
    };
    match serde_json::from_str(&contents) {
        Ok(update) => update,
        Err(err) => {
            warn!("ignoring unreadable options store {}: {err}", path.display());
            OptionsUpdate::default()
        }
    }
}

pub fn save(path: &Path, options: &Options) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("invalid options store path {}", path.display()))?;
    std::fs::create_dir_all(parent)?;
    let json = serde_json::to_string_pretty(&OptionsUpdate::full(*options))?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write options store {}", path.display()))?;
    Ok(())
}

/// Current options: configured defaults overlaid with the store.
pub fn current(path: Option<&Path>, defaults: Options) -> Options {
    match path {
        Some(path) => defaults.apply(&load_stored(path)),
        None => defaults,
    }
}

/// Merges an update into the current value and persists the result.
pub fn apply_update(
    path: Option<&Path>,
    defaults: Options,
    update: &OptionsUpdate,
) -> Result<Options> {
    let merged = current(path, defaults).apply(update);
    if let Some(path) = path {
        save(path, &merged)?;
    }
    Ok(merged)
}
