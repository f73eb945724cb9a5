use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;

use sprite_pipe::{
    chunk::load_chunk_file,
    common::{Rgba, TILE_SIZE},
    persist::load_config,
    tile::color_index,
    Palette, Tile,
};

/// Print the contents of a tiles/palettes chunk pair.
#[derive(Parser, Debug)]
#[command(name = "dump_chunks")]
struct Args {
    /// Directory holding the chunk files
    chunk_dir: PathBuf,
    /// JSON file overriding chunk file names
    #[arg(long)]
    config: Option<PathBuf>,
}

fn format_color(c: &Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}

// Top row first, so the picture reads the right way up.
fn render_tile(tile: &Tile) -> Vec<String> {
    (0..TILE_SIZE)
        .rev()
        .map(|row| {
            (0..TILE_SIZE)
                .map(|col| match color_index(tile, row, col) {
                    0 => '.',
                    1 => '+',
                    2 => 'o',
                    _ => '#',
                })
                .collect()
        })
        .collect()
}

fn dump(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let tiles: Vec<Tile> = load_chunk_file(&args.chunk_dir.join(&config.tiles_file))
        .context("reading tile chunk")?;
    let palettes: Vec<Palette> = load_chunk_file(&args.chunk_dir.join(&config.palettes_file))
        .context("reading palette chunk")?;

    println!("{} palettes", palettes.len());
    for (i, palette) in palettes.iter().enumerate() {
        println!("  {i}: {}", palette.colors.iter().map(format_color).join(" "));
    }
    println!("{} tiles", tiles.len());
    for (i, tile) in tiles.iter().enumerate() {
        println!("  tile {i}:");
        for line in render_tile(tile) {
            println!("    {line}");
        }
    }
    Ok(())
}

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match dump(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
