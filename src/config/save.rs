use std::path::Path;

use anyhow::{Context, Result};

use super::types::IsoConfig;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &IsoConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Express `path` relative to the config directory `base`.
///
/// Both are made absolute against the working directory first, so a relative
/// command-line path still loads back to the same file. Paths outside `base`
/// are stored absolute.
pub fn make_relative(path: &Path, base: &Path) -> String {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let base = std::path::absolute(base).unwrap_or_else(|_| base.to_path_buf());
    match path.strip_prefix(&base) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
