mod invocation;
mod montage;
mod sheet;
mod strip;
mod types;

use std::fs;
use std::io::ErrorKind;

pub use invocation::{CellGeometry, TileGrid, TileInvocation};
pub use montage::{Montage, TilingTool};
pub use sheet::compose_sheet;
pub use strip::compose_strip;
pub use types::{SpriteSheet, Strip};

use crate::error::{Result, SheetError};

/// Run one tiling call and confirm it produced its output.
///
/// A previous run's output is removed first so a stale file is never
/// mistaken for success.
fn run_tiling(tool: &dyn TilingTool, invocation: &TileInvocation) -> Result<()> {
    let output = &invocation.output;

    match fs::remove_file(output) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SheetError::io(output, e)),
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| SheetError::io(parent, e))?;
    }

    tool.tile(invocation)?;

    if !output.is_file() {
        return Err(SheetError::composite(output, "tool produced no output file"));
    }
    Ok(())
}
