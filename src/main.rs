use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use log::info;

use sprite_pipe::persist::load_config;

const USAGE_PROMPT: &str = "
usage:
  convert <input-sprite-dir> <output-chunk-dir> <output-header-dir> [--config <file.json>]

example:
  convert assets/sprites/ dist/assets/ generated/include/
";

/// Convert 8x8 PNG sprites into tile/palette chunks and a C header.
#[derive(Parser, Debug)]
#[command(name = "convert")]
struct Args {
    /// Directory of 8x8 RGBA PNG sprites
    sprite_dir: PathBuf,
    /// Destination for tiles.chunk and palettes.chunk
    chunk_dir: PathBuf,
    /// Destination for the generated header
    header_dir: PathBuf,
    /// JSON file overriding output file names
    #[arg(long)]
    config: Option<PathBuf>,
}

fn try_main(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let tables = sprite_pipe::run(&args.sprite_dir, &args.chunk_dir, &args.header_dir, &config)?;
    info!(
        "Wrote {} tiles and {} palettes",
        tables.tiles.len(),
        tables.palettes.len()
    );
    Ok(())
}

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{USAGE_PROMPT}");
            return ExitCode::FAILURE;
        }
    };

    match try_main(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("conversion failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
