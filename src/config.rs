use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ChangeSet;

const APP_NAME: &str = "pbxsplice";
const CONFIG_FILE: &str = "config.json";
const MANIFEST_FILE: &str = "project.pbxproj";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The `project.pbxproj` to edit, or the `.xcodeproj` bundle holding it.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
    /// Operations to apply when no change-set file is given on the command line.
    #[serde(default)]
    pub change_set: ChangeSet,
    /// Report what would change without writing.
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from the user's config directory.
    /// Returns default config if the file doesn't exist.
    pub fn load_default() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// The manifest file to edit, resolving `.xcodeproj` bundles.
    pub fn manifest(&self) -> Result<PathBuf> {
        let path = self
            .manifest_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No manifest path given (use --manifest)"))?;
        Ok(resolve_manifest_path(path))
    }
}

/// `Foo.xcodeproj` → `Foo.xcodeproj/project.pbxproj`; anything else unchanged.
pub fn resolve_manifest_path(path: &Path) -> PathBuf {
    let is_bundle = path.extension().is_some_and(|ext| ext == "xcodeproj") || path.is_dir();
    if is_bundle {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Read a change-set from a JSON file.
pub fn load_change_set(path: &Path) -> Result<ChangeSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read change-set {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse change-set {}", path.display()))
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_bundle_paths() {
        assert_eq!(
            resolve_manifest_path(Path::new("App.xcodeproj")),
            PathBuf::from("App.xcodeproj/project.pbxproj")
        );
        assert_eq!(
            resolve_manifest_path(Path::new("App.xcodeproj/project.pbxproj")),
            PathBuf::from("App.xcodeproj/project.pbxproj")
        );
    }

    #[test]
    fn test_parses_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"change_set": {"remove": ["LaunchAtLogin"]}}"#).unwrap();
        assert!(config.manifest_path.is_none());
        assert!(!config.dry_run);
        assert_eq!(config.change_set.remove, vec!["LaunchAtLogin".to_string()]);
        assert!(config.change_set.add.is_empty());
    }
}
