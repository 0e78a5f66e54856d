use log::info;

use super::{CellGeometry, SpriteSheet, Strip, TileGrid, TileInvocation, TilingTool, run_tiling};
use crate::direction::CANONICAL_ORDER;
use crate::error::{Result, SheetError};
use crate::job::RenderJob;

/// Stack the eight strips into a `1 x 8` sheet, one row per direction.
///
/// Rows follow [`CANONICAL_ORDER`] regardless of the order of `strips`.
/// Each cell is as wide as the longest strip so shorter rows stay left-aligned.
pub fn compose_sheet(
    tool: &dyn TilingTool,
    job: &RenderJob,
    strips: &[Strip],
) -> Result<SpriteSheet> {
    let output = job.sheet_path();

    let mut rows = Vec::with_capacity(CANONICAL_ORDER.len());
    for direction in CANONICAL_ORDER {
        let strip = strips
            .iter()
            .find(|s| s.direction == direction)
            .ok_or_else(|| {
                SheetError::composite(&output, format!("missing strip for direction {}", direction))
            })?;
        if !strip.path.is_file() {
            return Err(SheetError::composite(
                &output,
                format!("strip file missing: {}", strip.path.display()),
            ));
        }
        rows.push(strip.clone());
    }

    let max_frames = rows.iter().map(|s| s.frame_count).max().unwrap_or(0);
    let cell_width = u32::try_from(max_frames)
        .ok()
        .and_then(|n| n.checked_mul(job.width()))
        .ok_or_else(|| SheetError::composite(&output, "sheet too wide"))?;

    let invocation = TileInvocation {
        inputs: rows.iter().map(|s| s.path.clone()).collect(),
        grid: TileGrid {
            columns: 1,
            rows: 8,
        },
        geometry: CellGeometry::new(cell_width, job.height()),
        transparent: true,
        output,
    };
    run_tiling(tool, &invocation)?;

    info!("Sprite sheet -> {}", invocation.output.display());

    Ok(SpriteSheet {
        path: invocation.output,
        frame_width: job.width(),
        frame_height: job.height(),
        rows,
    })
}
