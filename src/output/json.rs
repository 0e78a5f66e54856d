use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::composite::{SpriteSheet, Strip};
use crate::error::{Result, SheetError};

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    animation: String,
    image: String,
    size: Size,
    frame: Size,
    directions: Vec<JsonDirection>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDirection {
    name: &'static str,
    angle_degrees: u32,
    row: usize,
    y: u32,
    frame_count: usize,
}

/// Write `{animation}.json` describing the rows and frame cells of the sheet.
///
/// Sheet dimensions are read back from the written image.
pub fn write_metadata(sheet: &SpriteSheet, animation: &str, path: &Path) -> Result<()> {
    let (w, h) = image::image_dimensions(&sheet.path).map_err(|e| {
        SheetError::composite(&sheet.path, format!("unreadable sheet image: {}", e))
    })?;

    let image = sheet
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = JsonOutput {
        meta: Meta {
            app: "isorender",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        animation: animation.to_string(),
        image,
        size: Size { w, h },
        frame: Size {
            w: sheet.frame_width,
            h: sheet.frame_height,
        },
        directions: sheet
            .rows
            .iter()
            .map(|strip| direction_to_json(strip, sheet.frame_height))
            .collect(),
    };

    let content = serde_json::to_string_pretty(&output)
        .map_err(|e| SheetError::composite(path, format!("failed to serialize metadata: {}", e)))?;
    fs::write(path, content).map_err(|e| SheetError::io(path, e))?;

    Ok(())
}

fn direction_to_json(strip: &Strip, frame_height: u32) -> JsonDirection {
    let row = strip.direction.row();
    JsonDirection {
        name: strip.direction.as_str(),
        angle_degrees: strip.direction.degrees(),
        row,
        y: u32::try_from(row).unwrap_or(0) * frame_height,
        frame_count: strip.frame_count,
    }
}
