use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "isorender")]
#[command(version, about = "8-direction isometric sprite sheet renderer", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add the isometric camera rig to a .blend file
    SetupRig(SetupArgs),
    /// Remove the rig created by setup-rig
    RemoveRig(CommonArgs),
    /// Render all eight directions and build the sprite sheet
    Render(RenderArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::SetupRig(args) => &args.common,
            Command::RemoveRig(args) => args,
            Command::Render(args) => &args.common,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The .blend file holding the animated object
    #[arg(required_unless_present = "config")]
    pub blend: Option<PathBuf>,

    /// Load settings from an .isorender config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Blender executable [default: $BLENDER_PATH or blender on PATH]
    #[arg(long, value_name = "PATH")]
    pub blender: Option<PathBuf>,

    /// Deadline for each external process in seconds [default: 300]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Render width in pixels [default: 300]
    #[arg(long)]
    pub width: Option<u32>,

    /// Render height in pixels [default: 300]
    #[arg(long)]
    pub height: Option<u32>,

    /// Render every Nth animation frame [default: 2]
    #[arg(long)]
    pub frame_step: Option<u32>,

    /// Name prefix for the rig objects [default: irh]
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Render output root; output goes to <ROOT>/<animation>/
    #[arg(short, long, value_name = "ROOT")]
    pub output_root: Option<String>,

    /// Object to render instead of the scene's active object
    #[arg(long)]
    pub object: Option<String>,

    /// Animation name to use instead of the object's current action
    #[arg(long)]
    pub action: Option<String>,

    /// Frame width in pixels [default: scene resolution]
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels [default: scene resolution]
    #[arg(long)]
    pub height: Option<u32>,

    /// ImageMagick montage executable [default: $MONTAGE_PATH or montage on PATH]
    #[arg(long, value_name = "PATH")]
    pub montage: Option<PathBuf>,

    /// Capture all directions first, then tile strips in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Skip writing <animation>.json metadata
    #[arg(long)]
    pub no_metadata: bool,

    /// Compress the sheet PNG (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Write the merged settings to a config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
