use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::IsoConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: IsoConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: IsoConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve a config path relative to the config file directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn blend_file(&self) -> Option<PathBuf> {
        self.config.blend_file.as_deref().map(|p| self.resolve(p))
    }

    /// A blank root is kept as-is so render validation still rejects it.
    pub fn output_root(&self) -> Option<PathBuf> {
        self.config.output_root.as_deref().map(|p| {
            if p.trim().is_empty() {
                PathBuf::from(p)
            } else {
                self.resolve(p)
            }
        })
    }

    pub fn blender_path(&self) -> Option<PathBuf> {
        self.config.blender_path.as_deref().map(|p| self.resolve(p))
    }

    pub fn montage_path(&self) -> Option<PathBuf> {
        self.config.montage_path.as_deref().map(|p| self.resolve(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.isorender");
        std::fs::write(
            &path,
            r#"{"blend_file": "art/knight.blend", "output_root": "/abs/renders"}"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();
        assert_eq!(loaded.blend_file(), Some(dir.path().join("art/knight.blend")));
        assert_eq!(loaded.output_root(), Some(PathBuf::from("/abs/renders")));
        assert_eq!(loaded.blender_path(), None);
    }

    #[test]
    fn test_blank_output_root_stays_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.isorender");
        std::fs::write(&path, r#"{"output_root": ""}"#).unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();
        assert_eq!(loaded.output_root(), Some(PathBuf::new()));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.isorender");
        std::fs::write(&path, "{ not json").unwrap();

        let err = LoadedConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
    }
}
