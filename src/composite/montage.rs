use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::debug;

use super::TileInvocation;
use crate::error::{Result, SheetError};
use crate::process::{find_tool, run_with_timeout};

/// An out-of-process image tiler.
///
/// Implementations only run the tool; callers check that the output exists.
pub trait TilingTool: Send + Sync {
    fn tile(&self, invocation: &TileInvocation) -> Result<()>;
}

/// ImageMagick `montage`, either standalone or as `magick montage`
#[derive(Debug, Clone)]
pub struct Montage {
    program: PathBuf,
    subcommand: Option<&'static str>,
    timeout: Duration,
}

impl Montage {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            subcommand: None,
            timeout,
        }
    }

    /// Find `montage` via explicit path, `MONTAGE_PATH`, or `PATH`,
    /// falling back to ImageMagick 7's `magick montage`.
    pub fn locate(explicit: Option<&Path>, timeout: Duration) -> Result<Self> {
        match find_tool("montage", explicit, "MONTAGE_PATH", &["montage"]) {
            Ok(program) => Ok(Self::new(program, timeout)),
            Err(err) if explicit.is_some() => Err(err),
            Err(_) => {
                let program = find_tool("montage", None, "MAGICK_PATH", &["magick"])?;
                Ok(Self {
                    program,
                    subcommand: Some("montage"),
                    timeout,
                })
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl TilingTool for Montage {
    fn tile(&self, invocation: &TileInvocation) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        if let Some(sub) = self.subcommand {
            cmd.arg(sub);
        }
        cmd.args(invocation.to_args());

        // Spawn failures and deadlines are still failures of this tile
        let output = run_with_timeout("montage", &mut cmd, self.timeout)
            .map_err(|err| SheetError::composite(&invocation.output, err.to_string()))?;
        if !output.success() {
            return Err(SheetError::composite(
                &invocation.output,
                output.failure_reason(),
            ));
        }

        debug!("montage wrote {}", invocation.output.display());
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::composite::{CellGeometry, TileGrid};

    fn invocation(output: PathBuf) -> TileInvocation {
        TileInvocation {
            inputs: vec![PathBuf::from("0001.png")],
            grid: TileGrid {
                columns: 1,
                rows: 1,
            },
            geometry: CellGeometry::new(4, 4),
            transparent: true,
            output,
        }
    }

    #[test]
    fn test_non_zero_exit_is_composite_error() {
        let tool = Montage::new("false", Duration::from_secs(5));
        let err = tool.tile(&invocation(PathBuf::from("out.png"))).unwrap_err();
        assert_eq!(err.kind(), "CompositeError");
    }

    #[test]
    fn test_missing_program_is_composite_error() {
        let tool = Montage::new("/nonexistent/montage", Duration::from_secs(5));
        let err = tool.tile(&invocation(PathBuf::from("out.png"))).unwrap_err();
        assert_eq!(err.kind(), "CompositeError");
        assert!(err.to_string().contains("Failed to spawn montage"));
    }

    #[test]
    fn test_deadline_is_composite_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow.sh");
        std::fs::write(&script, "exec sleep 5\n").unwrap();

        // `sh slow.sh <montage args>`
        let script_arg: &'static str =
            Box::leak(script.to_string_lossy().into_owned().into_boxed_str());
        let tool = Montage {
            program: PathBuf::from("sh"),
            subcommand: Some(script_arg),
            timeout: Duration::from_millis(200),
        };
        let err = tool.tile(&invocation(dir.path().join("out.png"))).unwrap_err();
        assert_eq!(err.kind(), "CompositeError");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_zero_exit_is_ok() {
        let tool = Montage::new("true", Duration::from_secs(5));
        assert!(tool.tile(&invocation(PathBuf::from("out.png"))).is_ok());
    }
}
