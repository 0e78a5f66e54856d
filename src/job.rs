use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{Result, SheetError};

/// Extension of every frame, strip and sheet image
pub const IMAGE_EXT: &str = "png";

/// Render resolution as configured in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
        }
    }
}

/// The host's active object and the animation action assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub object: String,
    pub action: Option<String>,
}

/// Parameters of one sprite sheet run, fixed once validation succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    output_root: PathBuf,
    animation: String,
    width: u32,
    height: u32,
}

impl RenderJob {
    /// Validate user input and host state into a job.
    ///
    /// Touches nothing on disk.
    pub fn from_host(
        output_root: &str,
        selection: Option<&Selection>,
        settings: RenderSettings,
    ) -> Result<Self> {
        if output_root.trim().is_empty() {
            return Err(SheetError::Config(
                "missing output root directory".to_string(),
            ));
        }

        let selection = selection.ok_or(SheetError::Selection)?;
        let action = selection.action.as_deref().ok_or(SheetError::Selection)?;
        check_animation_name(action).map_err(|reason| SheetError::Naming {
            object: selection.object.clone(),
            reason: reason.to_string(),
        })?;

        if settings.width == 0 || settings.height == 0 {
            return Err(SheetError::Config(format!(
                "render resolution must be positive, got {}x{}",
                settings.width, settings.height
            )));
        }

        Ok(Self {
            output_root: PathBuf::from(output_root),
            animation: action.to_string(),
            width: settings.width,
            height: settings.height,
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn animation(&self) -> &str {
        &self.animation
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `{outputRoot}/{animation}`
    pub fn animation_dir(&self) -> PathBuf {
        self.output_root.join(&self.animation)
    }

    /// `{outputRoot}/{animation}/{direction}`
    pub fn frame_dir(&self, direction: Direction) -> PathBuf {
        self.animation_dir().join(direction.as_str())
    }

    /// `{outputRoot}/{animation}/{animation}_{direction}.png`
    pub fn strip_path(&self, direction: Direction) -> PathBuf {
        self.animation_dir()
            .join(format!("{}_{}.{}", self.animation, direction, IMAGE_EXT))
    }

    /// `{outputRoot}/{animation}/{animation}.png`
    pub fn sheet_path(&self) -> PathBuf {
        self.animation_dir()
            .join(format!("{}.{}", self.animation, IMAGE_EXT))
    }
}

/// The action name becomes a directory and file name under the output root,
/// so it must be exactly one normal path component.
fn check_animation_name(action: &str) -> std::result::Result<(), &'static str> {
    if action.trim().is_empty() {
        Err("the action has no name")
    } else if action == "." || action == ".." {
        Err("the action name is a relative directory")
    } else if action.contains(['/', '\\']) {
        Err("the action name contains a path separator")
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Selection {
        Selection {
            object: "Knight".to_string(),
            action: Some("Walk".to_string()),
        }
    }

    #[test]
    fn test_empty_output_root() {
        let err = RenderJob::from_host("", Some(&walk()), RenderSettings::default()).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_nothing_selected() {
        let err = RenderJob::from_host("/tmp/out", None, RenderSettings::default()).unwrap_err();
        assert_eq!(err.kind(), "SelectionError");
    }

    #[test]
    fn test_selection_without_action() {
        let selection = Selection {
            object: "Cube".to_string(),
            action: None,
        };
        let err = RenderJob::from_host("/tmp/out", Some(&selection), RenderSettings::default())
            .unwrap_err();
        assert_eq!(err.kind(), "SelectionError");
    }

    #[test]
    fn test_unnamed_action() {
        let selection = Selection {
            object: "Knight".to_string(),
            action: Some(String::new()),
        };
        let err = RenderJob::from_host("/tmp/out", Some(&selection), RenderSettings::default())
            .unwrap_err();
        assert_eq!(err.kind(), "NamingError");
    }

    #[test]
    fn test_action_names_that_escape_the_animation_dir() {
        for name in ["..", ".", "Walk/Run", "../Walk", "Walk\\Run"] {
            let selection = Selection {
                object: "Knight".to_string(),
                action: Some(name.to_string()),
            };
            let err = RenderJob::from_host("/tmp/out", Some(&selection), RenderSettings::default())
                .unwrap_err();
            assert_eq!(err.kind(), "NamingError", "action {:?}", name);
        }
    }

    #[test]
    fn test_dotted_action_name_is_fine() {
        let selection = Selection {
            object: "Knight".to_string(),
            action: Some("Walk.001".to_string()),
        };
        let job =
            RenderJob::from_host("/out", Some(&selection), RenderSettings::default()).unwrap();
        assert_eq!(job.sheet_path(), PathBuf::from("/out/Walk.001/Walk.001.png"));
    }

    #[test]
    fn test_zero_resolution() {
        let settings = RenderSettings {
            width: 0,
            height: 64,
        };
        let err = RenderJob::from_host("/tmp/out", Some(&walk()), settings).unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }

    #[test]
    fn test_paths() {
        let job = RenderJob::from_host("/out", Some(&walk()), RenderSettings::default()).unwrap();
        assert_eq!(job.frame_dir(Direction::NE), PathBuf::from("/out/Walk/NE"));
        assert_eq!(
            job.strip_path(Direction::S),
            PathBuf::from("/out/Walk/Walk_S.png")
        );
        assert_eq!(job.sheet_path(), PathBuf::from("/out/Walk/Walk.png"));
        assert_eq!((job.width(), job.height()), (300, 300));
    }
}
