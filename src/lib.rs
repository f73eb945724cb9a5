//! Converts directories of 8x8 RGBA sprites into packed 2bpp tile and
//! 4-color palette tables, plus a C header naming each sprite's indices.

pub mod chunk;
pub mod common;
pub mod convert;
pub mod error;
pub mod header;
pub mod load;
pub mod palette;
pub mod persist;
pub mod state;
pub mod tile;

pub use convert::{process_sprite, process_sprite_images, run};
pub use error::ConvertError;
pub use state::{ConverterConfig, Palette, RawImage, SpriteIndices, SpriteTables, Tile};
