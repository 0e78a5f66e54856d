use log::info;

use super::{CellGeometry, Strip, TileGrid, TileInvocation, TilingTool, run_tiling};
use crate::direction::Direction;
use crate::error::{Result, SheetError};
use crate::frames::frame_paths;
use crate::job::RenderJob;

/// Tile the first `frame_count` frames of `direction` into a `frame_count x 1` strip.
pub fn compose_strip(
    tool: &dyn TilingTool,
    job: &RenderJob,
    direction: Direction,
    frame_count: usize,
) -> Result<Strip> {
    let output = job.strip_path(direction);

    if frame_count == 0 {
        return Err(SheetError::composite(
            &output,
            format!("no frames captured for direction {}", direction),
        ));
    }

    let frame_dir = job.frame_dir(direction);
    let inputs: Vec<_> = frame_paths(&frame_dir)?
        .into_iter()
        .take(frame_count)
        .collect();
    if inputs.len() < frame_count {
        return Err(SheetError::composite(
            &output,
            format!(
                "expected {} frames in {}, found {}",
                frame_count,
                frame_dir.display(),
                inputs.len()
            ),
        ));
    }

    let columns = u32::try_from(frame_count)
        .map_err(|_e| SheetError::composite(&output, "too many frames for one strip"))?;

    let invocation = TileInvocation {
        inputs,
        grid: TileGrid { columns, rows: 1 },
        geometry: CellGeometry::new(job.width(), job.height()),
        transparent: true,
        output,
    };
    run_tiling(tool, &invocation)?;

    info!(
        "Strip {} ({} frames) -> {}",
        direction,
        frame_count,
        invocation.output.display()
    );

    Ok(Strip {
        direction,
        frame_count,
        path: invocation.output,
    })
}
