use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::palette::Palette;

pub const CONFIG_DIR_NAME: &str = "docsite-enhance";
pub const CONFIG_FILE_NAME: &str = "palette_v1.json";

/// Persists the chosen palette as a single namespaced JSON file.
pub struct PaletteStore {
    path: PathBuf,
}

impl PaletteStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = dirs::config_dir().context("no platform config directory")?;
        Ok(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fails soft: a missing file, unreadable bytes, malformed JSON or a
    /// non-object payload all read as "no persisted palette". Fields that are
    /// present but not strings read as unset.
    pub fn load(&self) -> Option<Palette> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(error = %e, path = %self.path.display(), "palette config unreadable");
                }
                return None;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, path = %self.path.display(), "palette config is not valid json");
                return None;
            }
        };
        let obj = value.as_object()?;
        Some(Palette {
            primary: obj.get("primary").and_then(|v| v.as_str()).map(str::to_owned),
            accent: obj.get("accent").and_then(|v| v.as_str()).map(str::to_owned),
        })
    }

    /// Writes unconditionally; color validation is the applier's concern.
    pub fn save(&self, palette: &Palette) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let json = serde_json::to_string(palette).context("serialize palette")?;
        std::fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))
    }

    /// Deletes the persisted entry. Idempotent: a missing file is success.
    pub fn reset(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
