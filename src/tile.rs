use crate::{
    common::{ColorIdx, Rgba, TileIdx, MAX_TILES, TILE_PIXELS, TILE_SIZE},
    error::{ConvertError, Result},
    state::{Palette, RawImage, Tile},
};

/// Packs `image` into two bit-planes indexing into `palette`. The palette must
/// have been extracted from this same image.
pub fn encode_tile(image: &RawImage, palette: &Palette) -> Tile {
    let mut tile = Tile::default();
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let color = image.pixel(row, col);
            let idx = match palette.index_of(color) {
                Some(idx) => idx as u8,
                None => panic!("internal error: color {color:?} missing from sprite palette"),
            };
            tile.bit0[row] |= (idx & 1) << col;
            tile.bit1[row] |= ((idx >> 1) & 1) << col;
        }
    }
    tile
}

pub fn color_index(tile: &Tile, row: usize, col: usize) -> ColorIdx {
    let lo = (tile.bit0[row] >> col) & 1;
    let hi = (tile.bit1[row] >> col) & 1;
    lo | (hi << 1)
}

/// Inverse of `encode_tile`: 64 pixels in the same row order.
pub fn decode_tile(tile: &Tile, palette: &Palette) -> Vec<Rgba> {
    let mut pixels = Vec::with_capacity(TILE_PIXELS);
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            pixels.push(palette.colors[color_index(tile, row, col) as usize]);
        }
    }
    pixels
}

pub fn push_tile(tiles: &mut Vec<Tile>, name: &str, tile: Tile) -> Result<TileIdx> {
    if tiles.len() >= MAX_TILES {
        return Err(ConvertError::TooManyTiles {
            name: name.to_string(),
            limit: MAX_TILES,
        });
    }
    tiles.push(tile);
    Ok((tiles.len() - 1) as TileIdx)
}
