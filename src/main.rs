use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use isorender::cli::{CliArgs, Command, CommonArgs, CompressionLevel, RenderArgs, SetupArgs};
use isorender::config::{CompressConfig, IsoConfig, LoadedConfig, make_relative, save_config};
use isorender::output::{compress_png, write_metadata};
use isorender::process::DEFAULT_TIMEOUT_SECS;
use isorender::rig::RigSettings;
use isorender::{Blender, Montage, RenderSettings, RigHandle, Selection, SpritesheetPipeline};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let loaded_config = match &cli.command.common().config {
        Some(path) => Some(
            LoadedConfig::load(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?,
        ),
        None => None,
    };
    let common = merge_common(cli.command.common(), loaded_config.as_ref())?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if common.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("isorender v{}", env!("CARGO_PKG_VERSION"));

    let blender = Blender::locate(common.blender.as_deref(), common.timeout)?;
    info!("Using Blender at {}", blender.executable().display());

    match &cli.command {
        Command::SetupRig(args) => setup_rig(&blender, &common.blend, args),
        Command::RemoveRig(_) => {
            blender.remove_rig(&common.blend)?;
            Ok(())
        }
        Command::Render(args) => {
            let merged = merge_render(args, loaded_config.as_ref());
            render(&blender, &common, &merged)?;
            if let Some(path) = &args.save_config {
                save_merged_config(&common, &merged, path)?;
                info!("Saved config to {}", path.display());
            }
            Ok(())
        }
    }
}

/// Settings shared by every subcommand after merging CLI and config.
struct MergedCommon {
    blend: PathBuf,
    blender: Option<PathBuf>,
    timeout: Duration,
    verbose: bool,
}

/// Render settings after merging CLI and config.
struct MergedRender {
    output_root: String,
    object: Option<String>,
    action: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    montage: Option<PathBuf>,
    parallel: bool,
    metadata: bool,
    compress: Option<CompressionLevel>,
}

/// CLI arguments always take precedence over config values.
fn merge_common(args: &CommonArgs, loaded: Option<&LoadedConfig>) -> Result<MergedCommon> {
    let blend = args
        .blend
        .clone()
        .or_else(|| loaded.and_then(LoadedConfig::blend_file))
        .ok_or_else(|| anyhow!("no .blend file given on the command line or in the config"))?;

    let blender = args
        .blender
        .clone()
        .or_else(|| loaded.and_then(LoadedConfig::blender_path));

    let timeout_secs = args.timeout.unwrap_or_else(|| {
        loaded
            .map(|lc| lc.config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    });

    Ok(MergedCommon {
        blend,
        blender,
        timeout: Duration::from_secs(timeout_secs),
        verbose: args.verbose,
    })
}

fn merge_render(args: &RenderArgs, loaded: Option<&LoadedConfig>) -> MergedRender {
    let config = loaded.map(|lc| &lc.config);

    // An empty root is passed through so validation can report it
    let output_root = args
        .output_root
        .clone()
        .or_else(|| {
            loaded
                .and_then(LoadedConfig::output_root)
                .map(|p| p.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let compress = if args.compress.is_some() {
        args.compress
    } else {
        config.and_then(|c| c.compress.as_ref()).map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    };

    MergedRender {
        output_root,
        object: args
            .object
            .clone()
            .or_else(|| config.and_then(|c| c.object.clone())),
        action: args
            .action
            .clone()
            .or_else(|| config.and_then(|c| c.action.clone())),
        width: args.width.or_else(|| config.and_then(|c| c.width)),
        height: args.height.or_else(|| config.and_then(|c| c.height)),
        montage: args
            .montage
            .clone()
            .or_else(|| loaded.and_then(LoadedConfig::montage_path)),
        parallel: args.parallel || config.is_some_and(|c| c.parallel_strips),
        metadata: !args.no_metadata && config.is_none_or(|c| c.metadata),
        compress,
    }
}

fn setup_rig(blender: &Blender, blend: &Path, args: &SetupArgs) -> Result<()> {
    let defaults = RigSettings::default();
    let settings = RigSettings {
        prefix: args.prefix.clone().unwrap_or(defaults.prefix),
        resolution: RenderSettings {
            width: args.width.unwrap_or(defaults.resolution.width),
            height: args.height.unwrap_or(defaults.resolution.height),
        },
        frame_step: args.frame_step.unwrap_or(defaults.frame_step),
        ortho_scale: defaults.ortho_scale,
    };

    blender
        .setup_rig(blend, &settings)
        .with_context(|| format!("failed to set up rig in {}", blend.display()))?;
    Ok(())
}

fn render(blender: &Blender, common: &MergedCommon, merged: &MergedRender) -> Result<()> {
    let handle = RigHandle::load(&common.blend)
        .with_context(|| format!("no rig found for {}; run setup-rig first", common.blend.display()))?;

    let scene = blender.inspect_scene(&common.blend)?;

    let mut selection = match &merged.object {
        // The scene's action only applies to the active object
        Some(object) => Some(Selection {
            object: object.clone(),
            action: scene
                .selection()
                .filter(|active| &active.object == object)
                .and_then(|active| active.action),
        }),
        None => scene.selection(),
    };
    if let (Some(selection), Some(action)) = (selection.as_mut(), &merged.action) {
        selection.action = Some(action.clone());
    }

    let scene_settings = scene.render_settings();
    let settings = RenderSettings {
        width: merged.width.unwrap_or(scene_settings.width),
        height: merged.height.unwrap_or(scene_settings.height),
    };

    let montage = Montage::locate(merged.montage.as_deref(), common.timeout)?;
    info!("Using montage at {}", montage.program().display());

    let mut rig = blender.rig(&common.blend, handle);
    let mut pipeline = SpritesheetPipeline::new(&montage).parallel_strips(merged.parallel);
    let sheet = pipeline
        .run(&mut rig, &merged.output_root, selection.as_ref(), settings)
        .map_err(|e| anyhow!("{}: {}", e.kind(), e))?;

    if let Some(level) = merged.compress {
        compress_png(&sheet.path, level)?;
    }

    if merged.metadata {
        let animation = sheet
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let metadata_path = sheet.path.with_extension("json");
        write_metadata(&sheet, &animation, &metadata_path)?;
        info!("Generated {}", metadata_path.display());
    }

    info!("Done! Sprite sheet at {}", sheet.path.display());
    Ok(())
}

fn save_merged_config(common: &MergedCommon, merged: &MergedRender, path: &Path) -> Result<()> {
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let relative = |p: &Path| make_relative(p, &base);

    let config = IsoConfig {
        blend_file: Some(relative(&common.blend)),
        output_root: Some(relative(Path::new(&merged.output_root))),
        object: merged.object.clone(),
        action: merged.action.clone(),
        width: merged.width,
        height: merged.height,
        blender_path: common.blender.as_deref().map(relative),
        montage_path: merged.montage.as_deref().map(relative),
        timeout_secs: common.timeout.as_secs(),
        parallel_strips: merged.parallel,
        compress: merged.compress.map(|c| match c {
            CompressionLevel::Level(n) => CompressConfig::Level(n),
            CompressionLevel::Max => CompressConfig::Max("max".to_string()),
        }),
        metadata: merged.metadata,
        ..IsoConfig::default()
    };

    save_config(&config, path)
}
