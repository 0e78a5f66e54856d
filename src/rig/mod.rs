mod blender;
mod handle;

use std::path::Path;

pub use blender::{Blender, BlenderRig, SceneInfo};
pub use handle::{RigHandle, RigSettings};

use crate::error::Result;

/// The camera rig the pipeline rotates and renders through.
///
/// Methods take `&mut self`: the rig has exactly one writer, and a capture
/// must finish before the next rotation is issued.
pub trait RigPort {
    /// Rotate the rig around its vertical axis to `angle` radians.
    fn set_direction(&mut self, angle: f32) -> Result<()>;

    /// Render the animation at the current angle into `output_dir` as
    /// zero-padded numbered frames, creating the directory if needed.
    fn capture(&mut self, output_dir: &Path) -> Result<()>;
}
