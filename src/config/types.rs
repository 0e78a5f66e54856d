use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// isorender configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// The .blend file holding the animated object
    pub blend_file: Option<String>,
    /// Render output root directory
    pub output_root: Option<String>,
    /// Object to render instead of the active object
    pub object: Option<String>,
    /// Animation name to use instead of the object's action
    pub action: Option<String>,
    /// Frame width override in pixels
    pub width: Option<u32>,
    /// Frame height override in pixels
    pub height: Option<u32>,
    /// Blender executable
    pub blender_path: Option<String>,
    /// ImageMagick montage executable
    pub montage_path: Option<String>,
    /// Deadline for each external process in seconds
    pub timeout_secs: u64,
    /// Tile strips concurrently after all captures finish
    pub parallel_strips: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Write `<animation>.json` next to the sheet
    pub metadata: bool,
}

impl Default for IsoConfig {
    fn default() -> Self {
        Self {
            version: 1,
            blend_file: None,
            output_root: None,
            object: None,
            action: None,
            width: None,
            height: None,
            blender_path: None,
            montage_path: None,
            timeout_secs: crate::process::DEFAULT_TIMEOUT_SECS,
            parallel_strips: false,
            compress: None,
            metadata: true,
        }
    }
}
