use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;
use tempfile::NamedTempFile;

use crate::{
    chunk::encode_chunk,
    error::{ConvertError, Result},
    header::render_header,
    state::{ConverterConfig, ResourceMapping, SpriteTables},
};

/// A fully rendered output file waiting to be committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    tiles: usize,
    palettes: usize,
    sprites: &'a ResourceMapping,
}

fn to_json<T: Serialize>(data: &T) -> Vec<u8> {
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser).unwrap();
    data_bytes.push(b'\n');
    data_bytes
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = fs::read(path).map_err(|e| ConvertError::io(path, e))?;
    serde_json::from_slice(&data_bytes).map_err(|source| ConvertError::Config {
        path: path.to_owned(),
        source,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    match path {
        Some(path) => load_json(path),
        None => Ok(ConverterConfig::default()),
    }
}

/// Renders every artifact of a run into memory.
pub fn render_outputs(
    tables: &SpriteTables,
    chunk_dir: &Path,
    header_dir: &Path,
    config: &ConverterConfig,
) -> Vec<PendingFile> {
    let mut outputs = vec![
        PendingFile {
            path: chunk_dir.join(&config.tiles_file),
            contents: encode_chunk(&tables.tiles),
        },
        PendingFile {
            path: chunk_dir.join(&config.palettes_file),
            contents: encode_chunk(&tables.palettes),
        },
        PendingFile {
            path: header_dir.join(&config.header_file),
            contents: render_header(&tables.mapping).into_bytes(),
        },
    ];
    if let Some(manifest_file) = &config.manifest_file {
        let manifest = Manifest {
            tiles: tables.tiles.len(),
            palettes: tables.palettes.len(),
            sprites: &tables.mapping,
        };
        outputs.push(PendingFile {
            path: header_dir.join(manifest_file),
            contents: to_json(&manifest),
        });
    }
    outputs
}

fn stage(file: &PendingFile) -> Result<NamedTempFile> {
    let dir = file.path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
    tmp.write_all(&file.contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ConvertError::io(&file.path, e))?;
    Ok(tmp)
}

/// Writes all files or none of them: everything is staged to temp files next
/// to its target before any target is replaced.
pub fn store_outputs(files: &[PendingFile]) -> Result<()> {
    let staged = files.iter().map(stage).collect::<Result<Vec<_>>>()?;
    for (tmp, file) in staged.into_iter().zip(files) {
        info!("Saving {}", file.path.display());
        tmp.persist(&file.path)
            .map_err(|e| ConvertError::io(&file.path, e.error))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SpriteIndices;

    fn tables() -> SpriteTables {
        let mut tables = SpriteTables::default();
        tables.tiles.push(Default::default());
        tables.palettes.push(Default::default());
        tables
            .mapping
            .insert("hero".to_string(), SpriteIndices { tile: 0, palette: 0 });
        tables
    }

    #[test]
    fn outputs_use_configured_names() {
        let config = ConverterConfig {
            header_file: "sprites.h".to_string(),
            manifest_file: Some("sprites.json".to_string()),
            ..Default::default()
        };
        let outputs = render_outputs(&tables(), Path::new("out"), Path::new("inc"), &config);
        let paths: Vec<PathBuf> = outputs.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/tiles.chunk"),
                PathBuf::from("out/palettes.chunk"),
                PathBuf::from("inc/sprites.h"),
                PathBuf::from("inc/sprites.json"),
            ]
        );
    }

    #[test]
    fn manifest_lists_sprites() {
        let config = ConverterConfig {
            manifest_file: Some("m.json".to_string()),
            ..Default::default()
        };
        let outputs = render_outputs(&tables(), Path::new("a"), Path::new("b"), &config);
        let manifest: serde_json::Value = serde_json::from_slice(&outputs[3].contents).unwrap();
        assert_eq!(manifest["tiles"], 1);
        assert_eq!(manifest["sprites"]["hero"]["palette"], 0);
    }

    #[test]
    fn store_creates_directories_and_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("nested/dir/file.bin");
        store_outputs(&[PendingFile {
            path: path.clone(),
            contents: b"first".to_vec(),
        }])
        .unwrap();
        store_outputs(&[PendingFile {
            path: path.clone(),
            contents: b"second".to_vec(),
        }])
        .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn bad_config_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), ConverterConfig::default());
    }
}
