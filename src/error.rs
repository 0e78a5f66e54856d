use std::path::PathBuf;
use thiserror::Error;

use crate::direction::Direction;

pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No animation selected")]
    Selection,

    #[error("Unusable animation name on selected object '{object}': {reason}")]
    Naming { object: String, reason: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to composite '{output}': {reason}")]
    Composite { output: PathBuf, reason: String },

    #[error("Failed to capture direction {direction}: {reason}")]
    Capture { direction: Direction, reason: String },

    #[error("Rig operation failed: {0}")]
    Rig(String),

    #[error("{tool} executable not found. Install it or pass its path explicitly")]
    ToolNotFound { tool: &'static str },

    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },

    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout {
        tool: &'static str,
        timeout_secs: u64,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl SheetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn composite(output: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Composite {
            output: output.into(),
            reason: reason.into(),
        }
    }

    /// Name of the error category as reported to the user
    pub fn kind(&self) -> &'static str {
        match self {
            SheetError::Config(_) => "ConfigError",
            SheetError::Selection => "SelectionError",
            SheetError::Naming { .. } => "NamingError",
            SheetError::Io { .. } => "IOError",
            SheetError::Composite { .. } => "CompositeError",
            SheetError::Capture { .. } | SheetError::Rig(_) => "RigError",
            SheetError::ToolNotFound { .. }
            | SheetError::Spawn { .. }
            | SheetError::Timeout { .. } => "ProcessError",
            SheetError::Cancelled => "Cancelled",
        }
    }

    /// Validation failures raised before any rendering starts
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            SheetError::Config(_) | SheetError::Selection | SheetError::Naming { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_kinds() {
        assert!(SheetError::Config("empty".into()).is_preflight());
        assert!(SheetError::Selection.is_preflight());
        assert!(
            SheetError::Naming {
                object: "Armature".into(),
                reason: "the action has no name".into(),
            }
            .is_preflight()
        );
        assert!(!SheetError::Cancelled.is_preflight());
        assert!(!SheetError::composite("out.png", "exit 1").is_preflight());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SheetError::Selection.kind(), "SelectionError");
        assert_eq!(
            SheetError::io("frames", std::io::Error::other("gone")).kind(),
            "IOError"
        );
        assert_eq!(
            SheetError::composite("out.png", "no output").kind(),
            "CompositeError"
        );
    }

    #[test]
    fn test_config_display() {
        let err = SheetError::Config("render resolution must be positive, got 0x64".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: render resolution must be positive, got 0x64"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = SheetError::Timeout {
            tool: "montage",
            timeout_secs: 30,
        };
        assert!(err.to_string().contains("30 seconds"));
    }
}
