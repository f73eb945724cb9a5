use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    common::{PaletteIdx, Rgba, TileIdx, PALETTE_COLORS, TILE_PIXELS, TILE_SIZE},
    error::{ConvertError, Result},
};

/// An 8x8 sprite in row-major order. Row 0 is the bottom row of the source
/// image, matching the row order of the tile bit-planes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RawImage {
    /// `path` only serves to label the error when the dimensions are wrong.
    pub fn new(path: &Path, width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        if width as usize != TILE_SIZE
            || height as usize != TILE_SIZE
            || pixels.len() != TILE_PIXELS
        {
            return Err(ConvertError::InvalidDimensions {
                path: path.to_owned(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> Rgba {
        self.pixels[row * TILE_SIZE + col]
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Palette {
    pub colors: [Rgba; PALETTE_COLORS],
}

impl Palette {
    pub fn index_of(&self, color: Rgba) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }
}

/// Two bit-planes, one byte per row. Bit `col` of a row byte holds pixel
/// column `col`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    pub bit0: [u8; TILE_SIZE],
    pub bit1: [u8; TILE_SIZE],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteIndices {
    pub tile: TileIdx,
    pub palette: PaletteIdx,
}

pub type ResourceMapping = BTreeMap<String, SpriteIndices>;

/// Accumulated output of a conversion run. It is passed by value through each
/// per-sprite step and handed back with the new sprite added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteTables {
    pub tiles: Vec<Tile>,
    pub palettes: Vec<Palette>,
    pub mapping: ResourceMapping,
}

/// Output file names, loaded from an optional JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub tiles_file: String,
    pub palettes_file: String,
    pub header_file: String,
    pub manifest_file: Option<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            tiles_file: "tiles.chunk".to_string(),
            palettes_file: "palettes.chunk".to_string(),
            header_file: "assets_res.h".to_string(),
            manifest_file: None,
        }
    }
}
