//! Evergreen - Main entry point
//!
//! Opens the tree scene in a native window, or runs it without a window
//! for a fixed number of frames.

mod headless;

use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;
use evergreen_core::{load_config, SceneDescription};
use evergreen_scene::EvergreenScenePlugin;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "evergreen")]
#[command(about = "Decorative 3D tree with a glowing star")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "evergreen.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run this many frames without a window and exit
    #[arg(long, value_name = "N")]
    headless_frames: Option<u64>,

    /// Print the assembled scene as JSON and exit
    #[arg(long)]
    describe: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Evergreen v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    let scene = SceneDescription::build(&config)?;

    info!(
        levels = scene.foliage.len(),
        tree_top = scene.tree_top,
        bloom = scene.pipeline.bloom().is_some(),
        "Scene assembled"
    );

    if args.describe {
        println!("{}", scene.to_json_pretty()?);
        return Ok(());
    }

    if let Some(frames) = args.headless_frames {
        let report = headless::run(&scene, frames);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Evergreen".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EvergreenScenePlugin::new(scene))
        .run();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["evergreen"]).unwrap();
        assert_eq!(args.config, PathBuf::from("evergreen.toml"));
        assert_eq!(args.log_level, "info");
        assert_eq!(args.headless_frames, None);
        assert!(!args.describe);
    }

    #[test]
    fn test_headless_args() {
        let args =
            Args::try_parse_from(["evergreen", "-c", "tree.toml", "--headless-frames", "120", "-l", "debug"])
                .unwrap();
        assert_eq!(args.config, PathBuf::from("tree.toml"));
        assert_eq!(args.headless_frames, Some(120));
        assert_eq!(parse_level(&args.log_level), Level::DEBUG);
    }

    #[test]
    fn test_unknown_level_is_info() {
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level("WARN"), Level::WARN);
    }

    #[test]
    fn test_describe_uses_config_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tree]\nlevels = 4").unwrap();

        let config = load_config(file.path()).unwrap();
        let scene = SceneDescription::build(&config).unwrap();
        let json = scene.to_json_pretty().unwrap();
        assert_eq!(scene.foliage.len(), 4);
        assert!(json.contains("foliage"));
    }
}
