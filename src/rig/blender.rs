use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{RigHandle, RigPort, RigSettings};
use crate::error::{Result, SheetError};
use crate::job::{RenderSettings, Selection};
use crate::process::{find_tool, run_with_timeout};

const RIG_SCRIPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/blender/rig.py"));

/// Active object, its action and the render resolution of a .blend file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SceneInfo {
    pub object: Option<String>,
    pub action: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl SceneInfo {
    pub fn selection(&self) -> Option<Selection> {
        self.object.as_ref().map(|object| Selection {
            object: object.clone(),
            action: self.action.clone(),
        })
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
        }
    }
}

/// A Blender executable plus the rig script it runs in background mode
pub struct Blender {
    executable: PathBuf,
    timeout: Duration,
    // Keeps the extracted script alive for the lifetime of this value
    script: tempfile::NamedTempFile,
}

impl Blender {
    /// Find Blender via explicit path, `BLENDER_PATH`, or `PATH`.
    pub fn locate(explicit: Option<&Path>, timeout: Duration) -> Result<Self> {
        let names: &[&str] = if cfg!(windows) {
            &["blender.exe", "blender"]
        } else {
            &["blender"]
        };
        let executable = find_tool("blender", explicit, "BLENDER_PATH", names)?;
        Self::new(executable, timeout)
    }

    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let mut script = tempfile::Builder::new()
            .prefix("isorender_rig_")
            .suffix(".py")
            .tempfile()
            .map_err(|e| SheetError::io(std::env::temp_dir(), e))?;
        let script_path = script.path().to_path_buf();
        script
            .write_all(RIG_SCRIPT.as_bytes())
            .map_err(|e| SheetError::io(&script_path, e))?;
        script.flush().map_err(|e| SheetError::io(&script_path, e))?;

        Ok(Self {
            executable: executable.into(),
            timeout,
            script,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Build the rig in `blend_file`, save it, and persist the returned handle.
    pub fn setup_rig(&self, blend_file: &Path, settings: &RigSettings) -> Result<RigHandle> {
        let args: Vec<OsString> = vec![
            "--prefix".into(),
            settings.prefix.clone().into(),
            "--width".into(),
            settings.resolution.width.to_string().into(),
            "--height".into(),
            settings.resolution.height.to_string().into(),
            "--frame-step".into(),
            settings.frame_step.to_string().into(),
            "--ortho-scale".into(),
            settings.ortho_scale.to_string().into(),
        ];
        let handle: RigHandle = self.run_with_report(blend_file, "setup", args)?;
        let saved = handle.save(blend_file)?;
        info!(
            "Rig created ({}, {}, {}), handle saved to {}",
            handle.target,
            handle.camera,
            handle.path,
            saved.display()
        );
        Ok(handle)
    }

    /// Delete exactly the objects named in the saved handle.
    pub fn remove_rig(&self, blend_file: &Path) -> Result<()> {
        let handle = RigHandle::load(blend_file)?;
        let mut args: Vec<OsString> = Vec::new();
        for name in handle.names() {
            args.push("--name".into());
            args.push(name.into());
        }
        self.run_script(blend_file, "remove", args)?;
        RigHandle::forget(blend_file)?;
        info!("Rig removed from {}", blend_file.display());
        Ok(())
    }

    pub fn inspect_scene(&self, blend_file: &Path) -> Result<SceneInfo> {
        self.run_with_report(blend_file, "inspect", Vec::new())
    }

    /// A rig port bound to `blend_file` and the objects in `handle`.
    pub fn rig<'a>(&'a self, blend_file: &Path, handle: RigHandle) -> BlenderRig<'a> {
        BlenderRig {
            blender: self,
            blend_file: blend_file.to_path_buf(),
            handle,
            angle: None,
        }
    }

    fn run_with_report<T: DeserializeOwned>(
        &self,
        blend_file: &Path,
        mode: &str,
        mut args: Vec<OsString>,
    ) -> Result<T> {
        let report_dir = tempfile::tempdir().map_err(|e| SheetError::io(std::env::temp_dir(), e))?;
        let report_path = report_dir.path().join("report.json");
        args.push("--report".into());
        args.push(report_path.as_os_str().to_os_string());

        self.run_script(blend_file, mode, args)?;

        let content =
            fs::read_to_string(&report_path).map_err(|e| SheetError::io(&report_path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| SheetError::Rig(format!("invalid {} report: {}", mode, e)))
    }

    fn run_script(&self, blend_file: &Path, mode: &str, args: Vec<OsString>) -> Result<()> {
        if !blend_file.is_file() {
            return Err(SheetError::Rig(format!(
                "blend file not found: {}",
                blend_file.display()
            )));
        }

        let mut cmd = Command::new(&self.executable);
        cmd.arg("--background")
            .arg(blend_file)
            .arg("--python-exit-code")
            .arg("1")
            .arg("--python")
            .arg(self.script.path())
            .arg("--")
            .arg("--mode")
            .arg(mode)
            .args(args);

        debug!("Blender {} on {}", mode, blend_file.display());
        let output = run_with_timeout("blender", &mut cmd, self.timeout)?;
        if !output.success() {
            return Err(SheetError::Rig(format!(
                "blender {} {}",
                mode,
                output.failure_reason()
            )));
        }
        Ok(())
    }
}

/// [`RigPort`] backed by a saved .blend file and a background Blender per capture
pub struct BlenderRig<'a> {
    blender: &'a Blender,
    blend_file: PathBuf,
    handle: RigHandle,
    angle: Option<f32>,
}

impl RigPort for BlenderRig<'_> {
    fn set_direction(&mut self, angle: f32) -> Result<()> {
        self.angle = Some(angle);
        Ok(())
    }

    fn capture(&mut self, output_dir: &Path) -> Result<()> {
        let angle = self
            .angle
            .ok_or_else(|| SheetError::Rig("capture requested before set_direction".into()))?;

        fs::create_dir_all(output_dir).map_err(|e| SheetError::io(output_dir, e))?;

        let args: Vec<OsString> = vec![
            "--path-object".into(),
            self.handle.path.clone().into(),
            "--angle".into(),
            angle.to_string().into(),
            "--output".into(),
            output_dir.as_os_str().to_os_string(),
        ];
        self.blender.run_script(&self.blend_file, "capture", args)
    }
}
