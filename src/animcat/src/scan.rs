//! Character resource scanning.
//!
//! A scan walks one project folder for character definitions and builds
//! fresh catalog entries for them. It is replacing, not incremental:
//! callers hand the result to `CatalogStore::replace_all`.

use crate::assets::{AssetRoot, CHARACTER_EXT};
use crate::catalog::CharacterEntry;
use crate::clips::extract_clips;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("character folder not found: {0}")]
    RootNotFound(PathBuf),
}

/// Recursively scan `folder` (a project path) for character definitions.
///
/// Definitions that fail to load and characters with zero discoverable
/// clips are skipped; one bad asset never aborts the scan. The walk is
/// sorted by file name, so the output order is stable for a given
/// filesystem snapshot.
pub fn scan_characters(
    assets: &AssetRoot,
    folder: &str,
) -> Result<Vec<CharacterEntry>, ScanError> {
    let dir = assets.absolute_path(folder);
    if !dir.is_dir() {
        return Err(ScanError::RootNotFound(dir));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(CHARACTER_EXT) {
            continue;
        }

        let Ok(character) = assets.character_from_file(path) else {
            continue;
        };

        let clips = extract_clips(assets, &character);
        if clips.is_empty() {
            continue;
        }

        entries.push(CharacterEntry {
            name: character.name,
            asset_path: character.path,
            clips,
        });
    }
    Ok(entries)
}
