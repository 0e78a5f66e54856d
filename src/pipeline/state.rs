use std::fmt;

use crate::direction::Direction;

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Validating,
    /// Rotating the rig and capturing frames
    Rendering(Direction),
    /// Tiling a captured direction into its strip
    Compositing(Direction),
    AssemblingSheet,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => f.write_str("idle"),
            PipelineState::Validating => f.write_str("validating"),
            PipelineState::Rendering(d) => write!(f, "rendering {}", d),
            PipelineState::Compositing(d) => write!(f, "compositing {}", d),
            PipelineState::AssemblingSheet => f.write_str("assembling sheet"),
            PipelineState::Done => f.write_str("done"),
            PipelineState::Failed => f.write_str("failed"),
        }
    }
}
