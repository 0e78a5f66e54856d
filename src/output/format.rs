use std::fs;
use std::path::Path;

use log::debug;

use crate::cli::CompressionLevel;
use crate::error::{Result, SheetError};

/// Recompress a PNG in place with oxipng
pub fn compress_png(path: &Path, level: CompressionLevel) -> Result<()> {
    let data = fs::read(path).map_err(|e| SheetError::io(path, e))?;

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    let optimized = oxipng::optimize_from_memory(&data, &opts)
        .map_err(|e| SheetError::composite(path, format!("PNG compression failed: {}", e)))?;

    debug!(
        "Compressed {}: {} -> {} bytes",
        path.display(),
        data.len(),
        optimized.len()
    );

    fs::write(path, optimized).map_err(|e| SheetError::io(path, e))?;
    Ok(())
}
