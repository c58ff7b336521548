//! `shapebake`: bake the poses of a scene file into shape keys
//!
//! ```text
//! shapebake bake demos/face.toml --output face_keys.json -v
//! ```

mod bake;
mod scene_file;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shapebake_algorithms::BakeConfig;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::scene_file::SceneFile;

#[derive(Parser, Debug)]
#[command(name = "shapebake", version, about = "Bake pose deformation into shape keys")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture the undeformed object and bake each pose as a shape key
    Bake {
        /// Scene description (TOML)
        scene: PathBuf,

        /// Bake settings (TOML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the shape keys here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bake only the pose with this name
        #[arg(short, long)]
        pose: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<BakeConfig> {
    let mut config = match path {
        Some(path) => BakeConfig::from_toml_file(path)
            .with_context(|| format!("loading bake config {}", path.display()))?,
        None => BakeConfig::default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Bake {
            scene,
            config,
            output,
            pose,
        } => {
            let config = load_config(config.as_ref())?;
            let scene_file = SceneFile::load(&scene)?;
            let baked = bake::run(&scene_file, config, pose.as_deref())?;
            let json = serde_json::to_string_pretty(&baked)?;

            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("Wrote {} shape key(s) to {}", baked.shape_keys.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
