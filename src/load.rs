use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use log::{debug, info};

use crate::{
    common::{Rgba, TILE_SIZE},
    error::{ConvertError, Result},
    state::RawImage,
};

pub const IMAGE_EXTENSION: &str = "png";

/// Resource names become C identifiers in the generated header.
pub fn is_valid_resource_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn decode_err(e: png::DecodingError) -> io::Error {
    match e {
        png::DecodingError::IoError(e) => e,
        e => io::Error::new(io::ErrorKind::InvalidData, e),
    }
}

/// Decodes a PNG into RGBA8 pixels, bottom row first.
pub fn load_png(path: &Path) -> Result<RawImage> {
    debug!("Decoding {}", path.display());
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ConvertError::io(path, decode_err(e)))?;

    let (width, height) = (reader.info().width, reader.info().height);
    if width as usize != TILE_SIZE || height as usize != TILE_SIZE {
        return Err(ConvertError::InvalidDimensions {
            path: path.to_owned(),
            width,
            height,
        });
    }
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ConvertError::io(path, decode_err(e)))?;
    let data = &buf[..frame.buffer_size()];

    let top_down: Vec<Rgba> = match frame.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|p| Rgba::new(p[0], p[1], p[2], 255))
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|p| Rgba::new(p[0], p[0], p[0], p[1]))
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| Rgba::new(v, v, v, 255)).collect(),
        png::ColorType::Indexed => {
            return Err(ConvertError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidData, "indexed PNG was not expanded"),
            ))
        }
    };

    let mut pixels = Vec::with_capacity(top_down.len());
    for row in top_down.chunks(TILE_SIZE).rev() {
        pixels.extend_from_slice(row);
    }
    RawImage::new(path, width, height, pixels)
}

/// Loads every PNG in `dir`, keyed by file stem. Iteration order of the
/// returned map is ascending by name.
pub fn load_raw_sprite_images(dir: &Path) -> Result<BTreeMap<String, RawImage>> {
    info!("Loading sprites from {}", dir.display());
    if !dir.is_dir() {
        return Err(ConvertError::io(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "sprite directory not found"),
        ));
    }
    let dir_str = dir.to_str().ok_or_else(|| {
        ConvertError::io(
            dir,
            io::Error::new(io::ErrorKind::InvalidInput, "path is not valid UTF-8"),
        )
    })?;
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(dir_str),
        IMAGE_EXTENSION
    );
    let mut options = glob::MatchOptions::new();
    options.case_sensitive = false;
    let entries = glob::glob_with(&pattern, options).map_err(|e| {
        ConvertError::io(dir, io::Error::new(io::ErrorKind::InvalidInput, e))
    })?;

    let mut images = BTreeMap::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_owned();
            ConvertError::io(path, e.into_error())
        })?;
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if !is_valid_resource_name(&name) {
            return Err(ConvertError::InvalidResourceName { path, name });
        }
        if images.contains_key(&name) {
            return Err(ConvertError::DuplicateResource { path, name });
        }
        let image = load_png(&path)?;
        images.insert(name, image);
    }
    info!("Loaded {} sprites", images.len());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use std::{fs, io::BufWriter, path::PathBuf};

    use super::*;
    use crate::common::TILE_PIXELS;

    fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
    }

    fn solid(color: [u8; 4]) -> Vec<u8> {
        color.repeat(TILE_PIXELS)
    }

    #[test]
    fn resource_names() {
        assert!(is_valid_resource_name("boomerang"));
        assert!(is_valid_resource_name("fish_0"));
        assert!(is_valid_resource_name("_hidden"));
        assert!(!is_valid_resource_name("0fish"));
        assert!(!is_valid_resource_name("big-fish"));
        assert!(!is_valid_resource_name(""));
    }

    #[test]
    fn top_source_row_becomes_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut rgba = solid([0, 0, 0, 255]);
        // First source row is the top of the image.
        rgba[..32].copy_from_slice(&[255, 255, 255, 255].repeat(8));
        let path = dir.path().join("bar.png");
        write_png(&path, 8, 8, &rgba);

        let image = load_png(&path).unwrap();
        assert_eq!(image.pixel(7, 0), Rgba::new(255, 255, 255, 255));
        assert_eq!(image.pixel(0, 0), Rgba::new(0, 0, 0, 255));
    }

    #[test]
    fn rgb_png_gets_opaque_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let file = fs::File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 8, 8);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[9, 8, 7].repeat(TILE_PIXELS)).unwrap();
        drop(writer);

        let image = load_png(&path).unwrap();
        assert!(image.pixels().iter().all(|&p| p == Rgba::new(9, 8, 7, 255)));
    }

    #[test]
    fn wrong_size_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 16, 8, &[0u8; 16 * 8 * 4]);
        match load_png(&path) {
            Err(ConvertError::InvalidDimensions {
                path: p,
                width: 16,
                height: 8,
            }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn oversized_image_is_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        write_png(&path, 64, 64, &[7u8; 64 * 64 * 4]);
        // Keep the signature, IHDR and the start of IDAT only; decoding the
        // frame would fail on the missing image data.
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..45]).unwrap();

        match load_png(&path) {
            Err(ConvertError::InvalidDimensions {
                width: 64,
                height: 64,
                ..
            }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn garbage_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        fs::write(&path, b"not a png").unwrap();
        let err = load_raw_sprite_images(dir.path()).unwrap_err();
        match err {
            ConvertError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn directory_is_loaded_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zebra", "apple", "Mango", "fish_0"] {
            write_png(&dir.path().join(format!("{name}.png")), 8, 8, &solid([1, 2, 3, 255]));
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let images = load_raw_sprite_images(dir.path()).unwrap();
        let names: Vec<&str> = images.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Mango", "apple", "fish_0", "zebra"]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let missing = PathBuf::from("/definitely/not/a/sprite/dir");
        let err = load_raw_sprite_images(&missing).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }

    #[test]
    fn invalid_stem_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("big-fish.png"), 8, 8, &solid([0, 0, 0, 255]));
        let err = load_raw_sprite_images(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidResourceName { ref name, .. } if name == "big-fish"));
    }
}
