pub mod cli;
pub mod composite;
pub mod config;
pub mod direction;
pub mod error;
pub mod frames;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod rig;

#[cfg(test)]
mod test_support;

pub use composite::{Montage, SpriteSheet, Strip, TilingTool};
pub use direction::{CANONICAL_ORDER, Direction};
pub use error::SheetError;
pub use job::{RenderJob, RenderSettings, Selection};
pub use pipeline::{PipelineState, SpritesheetPipeline};
pub use rig::{Blender, RigHandle, RigPort};
