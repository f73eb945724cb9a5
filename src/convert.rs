use std::{collections::BTreeMap, path::Path};

use log::info;

use crate::{
    error::Result,
    load::load_raw_sprite_images,
    palette::{extract_palette, intern_palette},
    persist::{render_outputs, store_outputs},
    state::{ConverterConfig, RawImage, SpriteIndices, SpriteTables},
    tile::{encode_tile, push_tile},
};

/// Adds one sprite to the tables, returning the grown tables.
pub fn process_sprite(
    mut tables: SpriteTables,
    name: &str,
    image: &RawImage,
) -> Result<SpriteTables> {
    let palette = extract_palette(name, image)?;
    let palette_idx = intern_palette(&mut tables.palettes, name, palette)?;
    let tile = encode_tile(image, &palette);
    let tile_idx = push_tile(&mut tables.tiles, name, tile)?;
    tables.mapping.insert(
        name.to_string(),
        SpriteIndices {
            tile: tile_idx,
            palette: palette_idx,
        },
    );
    Ok(tables)
}

/// Converts every sprite, in name order, into tile and palette tables.
pub fn process_sprite_images(images: &BTreeMap<String, RawImage>) -> Result<SpriteTables> {
    images
        .iter()
        .try_fold(SpriteTables::default(), |tables, (name, image)| {
            process_sprite(tables, name, image)
        })
}

/// Full run: load, convert, then write every artifact. Nothing is written
/// unless all sprites convert.
pub fn run(
    sprite_dir: &Path,
    chunk_dir: &Path,
    header_dir: &Path,
    config: &ConverterConfig,
) -> Result<SpriteTables> {
    let images = load_raw_sprite_images(sprite_dir)?;
    let tables = process_sprite_images(&images)?;
    info!(
        "Converted {} sprites into {} tiles and {} palettes",
        tables.mapping.len(),
        tables.tiles.len(),
        tables.palettes.len()
    );
    let outputs = render_outputs(&tables, chunk_dir, header_dir, config);
    store_outputs(&outputs)?;
    Ok(tables)
}
