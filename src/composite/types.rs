use std::path::PathBuf;

use crate::direction::Direction;

/// One direction's frames tiled into a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub direction: Direction,
    pub frame_count: usize,
    pub path: PathBuf,
}

/// The final image: one strip per row, in canonical direction order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub path: PathBuf,
    /// Width of a single frame cell
    pub frame_width: u32,
    /// Height of a single frame cell
    pub frame_height: u32,
    /// Rows in sheet order
    pub rows: Vec<Strip>,
}

impl SpriteSheet {
    pub fn max_frames(&self) -> usize {
        self.rows.iter().map(|s| s.frame_count).max().unwrap_or(0)
    }
}
