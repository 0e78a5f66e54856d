use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::PipelineState;
use crate::composite::{SpriteSheet, Strip, TilingTool, compose_sheet, compose_strip};
use crate::direction::{CANONICAL_ORDER, Direction};
use crate::error::{Result, SheetError};
use crate::frames::count_frames;
use crate::job::{RenderJob, RenderSettings, Selection};
use crate::rig::RigPort;

/// Renders all eight directions through a rig and assembles the sprite sheet
pub struct SpritesheetPipeline<'a> {
    tool: &'a dyn TilingTool,
    parallel_strips: bool,
    cancel_token: Option<Arc<AtomicBool>>,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> SpritesheetPipeline<'a> {
    pub fn new(tool: &'a dyn TilingTool) -> Self {
        Self {
            tool,
            parallel_strips: false,
            cancel_token: None,
            state: PipelineState::Idle,
            history: Vec::new(),
        }
    }

    /// Capture every direction first, then tile all strips concurrently.
    pub fn parallel_strips(mut self, parallel: bool) -> Self {
        self.parallel_strips = parallel;
        self
    }

    /// Stop before the next direction once `token` is set.
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered during the last run, in order
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Validate, render and composite; returns the finished sheet or the first error.
    pub fn run<R: RigPort + ?Sized>(
        &mut self,
        rig: &mut R,
        output_root: &str,
        selection: Option<&Selection>,
        settings: RenderSettings,
    ) -> Result<SpriteSheet> {
        self.history.clear();

        match self.execute(rig, output_root, selection, settings) {
            Ok(sheet) => {
                self.transition(PipelineState::Done);
                Ok(sheet)
            }
            Err(err) => {
                warn!("Sprite sheet failed while {}: {}", self.state, err);
                self.transition(PipelineState::Failed);
                Err(err)
            }
        }
    }

    fn execute<R: RigPort + ?Sized>(
        &mut self,
        rig: &mut R,
        output_root: &str,
        selection: Option<&Selection>,
        settings: RenderSettings,
    ) -> Result<SpriteSheet> {
        self.transition(PipelineState::Validating);
        let job = RenderJob::from_host(output_root, selection, settings)?;
        info!(
            "Rendering '{}' at {}x{} into {}",
            job.animation(),
            job.width(),
            job.height(),
            job.animation_dir().display()
        );

        let strips = if self.parallel_strips {
            self.render_then_composite(rig, &job)?
        } else {
            self.render_and_composite(rig, &job)?
        };

        self.check_cancelled()?;
        self.transition(PipelineState::AssemblingSheet);
        compose_sheet(self.tool, &job, &strips)
    }

    /// Capture and tile one direction at a time.
    fn render_and_composite<R: RigPort + ?Sized>(
        &mut self,
        rig: &mut R,
        job: &RenderJob,
    ) -> Result<Vec<Strip>> {
        let mut strips = Vec::with_capacity(CANONICAL_ORDER.len());
        for direction in CANONICAL_ORDER {
            let frame_count = self.capture(rig, job, direction)?;
            self.transition(PipelineState::Compositing(direction));
            strips.push(compose_strip(self.tool, job, direction, frame_count)?);
        }
        Ok(strips)
    }

    /// Capture all directions, then tile the strips on the rayon pool.
    ///
    /// Captures stay strictly sequential; only strip tiling runs concurrently.
    fn render_then_composite<R: RigPort + ?Sized>(
        &mut self,
        rig: &mut R,
        job: &RenderJob,
    ) -> Result<Vec<Strip>> {
        let mut captured = Vec::with_capacity(CANONICAL_ORDER.len());
        for direction in CANONICAL_ORDER {
            let frame_count = self.capture(rig, job, direction)?;
            captured.push((direction, frame_count));
        }

        for &(direction, _) in &captured {
            self.transition(PipelineState::Compositing(direction));
        }

        let tool = self.tool;
        let results: Vec<Result<Strip>> = captured
            .par_iter()
            .map(|&(direction, frame_count)| compose_strip(tool, job, direction, frame_count))
            .collect();

        // First failure in canonical order wins
        results.into_iter().collect()
    }

    /// Rotate, capture and count frames for one direction.
    fn capture<R: RigPort + ?Sized>(
        &mut self,
        rig: &mut R,
        job: &RenderJob,
        direction: Direction,
    ) -> Result<usize> {
        self.check_cancelled()?;
        self.transition(PipelineState::Rendering(direction));

        let frame_dir = job.frame_dir(direction);
        if frame_dir.exists() {
            fs::remove_dir_all(&frame_dir).map_err(|e| SheetError::io(&frame_dir, e))?;
        }

        rig.set_direction(direction.angle())?;
        rig.capture(&frame_dir).map_err(|err| match err {
            SheetError::Rig(reason) => SheetError::Capture { direction, reason },
            other => other,
        })?;

        let frame_count = count_frames(&frame_dir)?;
        info!("{}: captured {} frames", direction, frame_count);
        Ok(frame_count)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel_token {
            Some(token) if token.load(Ordering::Relaxed) => Err(SheetError::Cancelled),
            _ => Ok(()),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}
