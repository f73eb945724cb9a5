use std::iter;

use itertools::Itertools;
use log::debug;

use crate::{
    common::{PaletteIdx, Rgba, MAX_PALETTES, PALETTE_COLORS},
    error::{ConvertError, Result},
    state::{Palette, RawImage},
};

/// Distinct colors of `image` in the order they are first seen. Fails as soon
/// as a fifth color shows up.
pub fn distinct_colors(name: &str, image: &RawImage) -> Result<Vec<Rgba>> {
    let mut colors: Vec<Rgba> = Vec::with_capacity(PALETTE_COLORS);
    for &pixel in image.pixels() {
        if colors.contains(&pixel) {
            continue;
        }
        colors.push(pixel);
        if colors.len() > PALETTE_COLORS {
            return Err(ConvertError::TooManyColors {
                name: name.to_string(),
                count: colors.len(),
                limit: PALETTE_COLORS,
            });
        }
    }
    Ok(colors)
}

/// Pads a color set with transparent black and sorts it by (alpha, red,
/// green, blue). The result only depends on the set, not its order.
pub fn canonical_palette(colors: &[Rgba]) -> Palette {
    debug_assert!(colors.len() <= PALETTE_COLORS);
    let mut palette = Palette::default();
    let padded = colors
        .iter()
        .copied()
        .chain(iter::repeat(Rgba::TRANSPARENT))
        .take(PALETTE_COLORS)
        .sorted_by_key(Rgba::sort_key);
    for (slot, color) in palette.colors.iter_mut().zip(padded) {
        *slot = color;
    }
    palette
}

pub fn extract_palette(name: &str, image: &RawImage) -> Result<Palette> {
    let colors = distinct_colors(name, image)?;
    Ok(canonical_palette(&colors))
}

/// Finds `palette` in the global table or appends it. Returns the index it
/// occupies.
pub fn intern_palette(
    palettes: &mut Vec<Palette>,
    name: &str,
    palette: Palette,
) -> Result<PaletteIdx> {
    if let Some(idx) = palettes.iter().position(|p| *p == palette) {
        debug!("{name}: reusing palette {idx}");
        return Ok(idx as PaletteIdx);
    }
    if palettes.len() >= MAX_PALETTES {
        return Err(ConvertError::TooManyPalettes {
            name: name.to_string(),
            limit: MAX_PALETTES,
        });
    }
    palettes.push(palette);
    debug!("{name}: new palette {}", palettes.len() - 1);
    Ok((palettes.len() - 1) as PaletteIdx)
}
