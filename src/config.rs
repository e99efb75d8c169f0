//! Layered `podtrust.toml` loading.
//!
//! Layers apply in order: the user's global file, the project file, then a
//! git-ignored local override. Tables merge key by key; scalars and arrays
//! from a later layer replace earlier ones. Nothing is loaded unless the
//! project file exists.

use crate::error::{PodTrustError, Result};
use crate::types::config::PodTrustConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "podtrust.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".podtrust/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/podtrust/config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Global,
    Project,
    Local,
}

impl Layer {
    fn label(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
            Self::Local => "local override",
        }
    }
}

pub fn load_config(root: &Path) -> Result<Option<PodTrustConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<PodTrustConfig>> {
    let project_path = root.join(DEFAULT_CONFIG_FILE);
    if !project_path.exists() {
        debug!(path = %project_path.display(), "no project config; using defaults");
        return Ok(None);
    }

    let local_path = root.join(DEFAULT_LOCAL_FILE);
    let layers = [
        (Layer::Global, global_path),
        (Layer::Project, Some(project_path.as_path())),
        (Layer::Local, Some(local_path.as_path())),
    ];

    let mut merged = Value::Table(Map::new());
    for (layer, path) in layers {
        let Some(path) = path.filter(|path| path.exists()) else {
            continue;
        };
        let overlay = read_layer(layer, path)?;
        debug!(layer = layer.label(), path = %path.display(), "applying config layer");
        overlay_tables(&mut merged, overlay);
    }

    let cfg: PodTrustConfig = merged.try_into().map_err(|e: toml::de::Error| {
        PodTrustError::ConfigParse(format!(
            "{} (after merging layers): {}",
            project_path.display(),
            e.message()
        ))
    })?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn read_layer(layer: Layer, path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = toml::from_str(&content).map_err(|e| {
        PodTrustError::ConfigParse(format!(
            "{} config {}: {}",
            layer.label(),
            path.display(),
            e.message()
        ))
    })?;
    if !value.is_table() {
        return Err(PodTrustError::ConfigParse(format!(
            "{} config {} is not a TOML table",
            layer.label(),
            path.display()
        )));
    }
    Ok(value)
}

/// Folds `overlay` into `base`. Only tables merge recursively; a
/// `[[matching.bands]]` list in a later layer replaces the whole list.
fn overlay_tables(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => overlay_tables(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
