//! Tagged binary containers for the tile and palette tables.
//!
//! Layout: 4-byte ASCII tag, payload byte length as a little-endian `u32`,
//! then the packed elements with no padding between them.

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use log::info;

use crate::{
    common::{Rgba, PALETTE_COLORS, TILE_SIZE},
    error::{ConvertError, Result},
    state::{Palette, Tile},
};

pub type Tag = [u8; 4];

/// A table element with a fixed byte layout inside a chunk payload.
pub trait ChunkElement: Sized {
    const TAG: Tag;
    const SIZE: usize;

    fn write_bytes(&self, out: &mut Vec<u8>);

    /// `bytes` is exactly `SIZE` long.
    fn from_bytes(bytes: &[u8]) -> Self;
}

// 8 bytes of bit0 rows followed by 8 bytes of bit1 rows.
impl ChunkElement for Tile {
    const TAG: Tag = *b"til0";
    const SIZE: usize = TILE_SIZE * 2;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.bit0);
        out.extend_from_slice(&self.bit1);
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut tile = Tile::default();
        tile.bit0.copy_from_slice(&bytes[..TILE_SIZE]);
        tile.bit1.copy_from_slice(&bytes[TILE_SIZE..Self::SIZE]);
        tile
    }
}

// Four RGBA8 colors.
impl ChunkElement for Palette {
    const TAG: Tag = *b"plt0";
    const SIZE: usize = PALETTE_COLORS * 4;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        for color in &self.colors {
            out.extend_from_slice(&color.to_bytes());
        }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut palette = Palette::default();
        for (color, raw) in palette.colors.iter_mut().zip(bytes.chunks_exact(4)) {
            *color = Rgba::from_bytes([raw[0], raw[1], raw[2], raw[3]]);
        }
        palette
    }
}

fn tag_text(tag: &Tag) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

pub fn write_chunk<T: ChunkElement, W: Write>(writer: &mut W, elements: &[T]) -> io::Result<()> {
    let mut payload = Vec::with_capacity(elements.len() * T::SIZE);
    for element in elements {
        element.write_bytes(&mut payload);
    }
    let len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk payload too large"))?;
    writer.write_all(&T::TAG)?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    Ok(())
}

pub fn encode_chunk<T: ChunkElement>(elements: &[T]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + elements.len() * T::SIZE);
    write_chunk(&mut bytes, elements).unwrap();
    bytes
}

/// Reads one chunk of `T` elements. `path` labels errors.
pub fn read_chunk<T: ChunkElement, R: Read>(reader: &mut R, path: &Path) -> Result<Vec<T>> {
    let read_err = |e: io::Error, what: &str| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ConvertError::corrupt(path, format!("truncated {what}"))
        } else {
            ConvertError::io(path, e)
        }
    };

    let mut tag: Tag = [0; 4];
    reader.read_exact(&mut tag).map_err(|e| read_err(e, "tag"))?;
    if tag != T::TAG {
        return Err(ConvertError::corrupt(
            path,
            format!(
                "expected tag '{}', found '{}'",
                tag_text(&T::TAG),
                tag_text(&tag)
            ),
        ));
    }

    let mut len_bytes = [0u8; 4];
    reader
        .read_exact(&mut len_bytes)
        .map_err(|e| read_err(e, "length"))?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len % T::SIZE != 0 {
        return Err(ConvertError::corrupt(
            path,
            format!(
                "payload length {len} is not a multiple of the {}-byte element size",
                T::SIZE
            ),
        ));
    }

    let mut payload = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut payload)
        .map_err(|e| ConvertError::io(path, e))?;
    if payload.len() != len {
        return Err(ConvertError::corrupt(
            path,
            format!("truncated payload: expected {len} bytes, found {}", payload.len()),
        ));
    }

    Ok(payload.chunks_exact(T::SIZE).map(T::from_bytes).collect())
}

pub fn load_chunk_file<T: ChunkElement>(path: &Path) -> Result<Vec<T>> {
    info!("Loading {}", path.display());
    let mut file = fs::File::open(path).map_err(|e| ConvertError::io(path, e))?;
    read_chunk(&mut file, path)
}
