//! Fakes shared by unit tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::composite::{TileInvocation, TilingTool};
use crate::direction::{CANONICAL_ORDER, Direction};
use crate::error::{Result, SheetError};
use crate::rig::RigPort;

/// Write `count` empty frames named `0001.png`, `0002.png`, ...
pub fn write_frames(dir: &Path, count: usize) {
    fs::create_dir_all(dir).unwrap();
    for i in 1..=count {
        fs::write(dir.join(format!("{:04}.png", i)), b"frame").unwrap();
    }
}

/// Records every invocation and writes a placeholder output file
pub struct RecordingTool {
    calls: Mutex<Vec<TileInvocation>>,
    writes_output: bool,
}

impl Default for RecordingTool {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            writes_output: true,
        }
    }
}

impl RecordingTool {
    /// Exits cleanly without producing anything
    pub fn without_output() -> Self {
        Self {
            writes_output: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TileInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl TilingTool for RecordingTool {
    fn tile(&self, invocation: &TileInvocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());
        if self.writes_output {
            fs::write(&invocation.output, b"tiled").unwrap();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RigCall {
    SetDirection(f32),
    Capture(PathBuf),
}

/// Writes a configurable number of frames per direction
pub struct FakeRig {
    pub calls: Vec<RigCall>,
    frames: HashMap<Direction, usize>,
    default_frames: usize,
    fail_on: Option<Direction>,
    cancel_after: Option<(Direction, Arc<AtomicBool>)>,
    current: Option<Direction>,
}

impl FakeRig {
    pub fn new(default_frames: usize) -> Self {
        Self {
            calls: Vec::new(),
            frames: HashMap::new(),
            default_frames,
            fail_on: None,
            cancel_after: None,
            current: None,
        }
    }

    pub fn with_frames(mut self, direction: Direction, count: usize) -> Self {
        self.frames.insert(direction, count);
        self
    }

    pub fn failing_on(mut self, direction: Direction) -> Self {
        self.fail_on = Some(direction);
        self
    }

    /// Set `token` once the capture for `direction` has written its frames
    pub fn cancelling_after(mut self, direction: Direction, token: Arc<AtomicBool>) -> Self {
        self.cancel_after = Some((direction, token));
        self
    }

    pub fn captured_dirs(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RigCall::Capture(p) => Some(p.clone()),
                RigCall::SetDirection(_) => None,
            })
            .collect()
    }
}

impl RigPort for FakeRig {
    fn set_direction(&mut self, angle: f32) -> Result<()> {
        self.calls.push(RigCall::SetDirection(angle));
        self.current = CANONICAL_ORDER
            .iter()
            .copied()
            .find(|d| (d.angle() - angle).abs() < 1e-4);
        Ok(())
    }

    fn capture(&mut self, output_dir: &Path) -> Result<()> {
        self.calls.push(RigCall::Capture(output_dir.to_path_buf()));
        let direction = self
            .current
            .ok_or_else(|| SheetError::Rig("no direction set".into()))?;
        if self.fail_on == Some(direction) {
            return Err(SheetError::Rig("render crashed".into()));
        }
        let count = self
            .frames
            .get(&direction)
            .copied()
            .unwrap_or(self.default_frames);
        write_frames(output_dir, count);
        if let Some((_, token)) = self.cancel_after.as_ref().filter(|(d, _)| *d == direction) {
            token.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}
