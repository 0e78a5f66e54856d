use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::job::RenderSettings;

/// Parameters for building the rig and the scene's output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    /// Name prefix for the created objects
    pub prefix: String,
    /// Output resolution
    pub resolution: RenderSettings,
    /// Render every Nth animation frame
    pub frame_step: u32,
    /// Orthographic camera scale
    pub ortho_scale: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            prefix: "irh".to_string(),
            resolution: RenderSettings::default(),
            frame_step: 2,
            ortho_scale: 1.8,
        }
    }
}

/// Names of the objects created by rig setup, as the host actually named them.
///
/// Saved beside the .blend file so later commands address exactly these
/// objects instead of guessing by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigHandle {
    /// Tracking target at the origin
    pub target: String,
    /// Orthographic camera
    pub camera: String,
    /// Circular path the camera follows; rotating it rotates the view
    pub path: String,
}

impl RigHandle {
    /// `scene.blend` -> `scene.rig.json`
    pub fn file_for(blend_file: &Path) -> PathBuf {
        blend_file.with_extension("rig.json")
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.target, &self.camera, &self.path]
    }

    pub fn save(&self, blend_file: &Path) -> Result<PathBuf> {
        let path = Self::file_for(blend_file);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Rig(format!("failed to serialize rig handle: {}", e)))?;
        fs::write(&path, content).map_err(|e| SheetError::io(&path, e))?;
        Ok(path)
    }

    pub fn load(blend_file: &Path) -> Result<Self> {
        let path = Self::file_for(blend_file);
        let content = fs::read_to_string(&path).map_err(|e| SheetError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            SheetError::Rig(format!("invalid rig handle {}: {}", path.display(), e))
        })
    }

    /// Delete the saved handle; a missing file is not an error.
    pub fn forget(blend_file: &Path) -> Result<()> {
        let path = Self::file_for(blend_file);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SheetError::io(&path, e)),
        }
    }
}
