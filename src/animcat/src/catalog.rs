//! Catalog data model, edit operations, and persistence.
//!
//! The catalog is an ordered list of characters, each with an ordered
//! list of clip records. `CatalogStore` owns the list for the lifetime
//! of an editing session and is the only writer; it persists the whole
//! catalog as a JSON array and reloads it fail-safe.

use crate::assets::{AssetError, AssetRoot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Playback speed assigned to freshly discovered clips.
pub const DEFAULT_SPEED: f32 = 1.0;

/// Playback length, in seconds, assumed when a record carries none.
pub const DEFAULT_LENGTH: f32 = 10.0;

/// Editor slider range for playback speed.
pub const SPEED_RANGE: (f32, f32) = (0.1, 5.0);

/// Editor slider range for playback length, in seconds.
pub const LENGTH_RANGE: (f32, f32) = (1.0, 30.0);

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

fn default_length() -> f32 {
    DEFAULT_LENGTH
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("character index {index} out of range ({len} characters)")]
    CharacterIndex { index: usize, len: usize },

    #[error("clip index {index} out of range ({len} clips)")]
    ClipIndex { index: usize, len: usize },

    #[error("playback speed and length must be positive, got {speed} / {length}")]
    InvalidParams { speed: f32, length: f32 },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One animation clip known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    /// Display and lookup identity; the dedup key within one character.
    pub name: String,

    /// Project path of the underlying clip asset.
    pub source_path: String,

    /// Playback speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Playback duration in seconds.
    #[serde(default = "default_length")]
    pub length: f32,
}

/// One character and its clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntry {
    pub name: String,

    /// Project path of the character definition asset.
    pub asset_path: String,

    /// Insertion-ordered clip records.
    #[serde(default)]
    pub clips: Vec<ClipRecord>,
}

/// Validated playback parameters for an edit.
///
/// Construction rejects non-positive or non-finite values, so a held
/// `PlaybackParams` is always safe to stamp onto records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    speed: f32,
    length: f32,
}

impl PlaybackParams {
    pub fn new(speed: f32, length: f32) -> Result<Self, CatalogError> {
        if !(speed.is_finite() && length.is_finite()) || speed <= 0.0 || length <= 0.0 {
            return Err(CatalogError::InvalidParams { speed, length });
        }
        Ok(PlaybackParams { speed, length })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

/// Owner of the in-memory catalog.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::path::Path;
/// use animcat::{AssetRoot, CatalogStore, PlaybackParams};
///
/// let assets = AssetRoot::new("project")?;
/// let mut store = CatalogStore::new();
/// store.replace_all(animcat::scan_characters(&assets, "Characters")?);
///
/// store.apply_params_to_all(0, PlaybackParams::new(1.5, 12.0)?)?;
/// store.save(Path::new("project/AnimationConfig.json"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CatalogStore {
    entries: Vec<CharacterEntry>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CharacterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole catalog. Used by a scan; also the only way back
    /// to an empty catalog.
    pub fn replace_all(&mut self, entries: Vec<CharacterEntry>) {
        self.entries = entries;
    }

    /// Look up a character by position.
    pub fn character(&self, index: usize) -> Result<&CharacterEntry, CatalogError> {
        let len = self.entries.len();
        self.entries
            .get(index)
            .ok_or(CatalogError::CharacterIndex { index, len })
    }

    fn character_mut(&mut self, index: usize) -> Result<&mut CharacterEntry, CatalogError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(CatalogError::CharacterIndex { index, len })
    }

    /// Resolve `candidate` to a clip asset and append it to a character.
    ///
    /// Adds are not checked against existing names: adding the same
    /// clip twice produces two records.
    pub fn add_clip(
        &mut self,
        index: usize,
        candidate: &Path,
        params: PlaybackParams,
        assets: &AssetRoot,
    ) -> Result<ClipRecord, CatalogError> {
        self.character(index)?;
        let clip = assets.resolve_clip(candidate)?;
        let record = ClipRecord {
            name: clip.name,
            source_path: clip.path,
            speed: params.speed(),
            length: params.length(),
        };
        self.entries[index].clips.push(record.clone());
        Ok(record)
    }

    /// Remove and return the clip at `clip` within character `character`.
    pub fn delete_clip(&mut self, character: usize, clip: usize) -> Result<ClipRecord, CatalogError> {
        let entry = self.character_mut(character)?;
        let len = entry.clips.len();
        if clip >= len {
            return Err(CatalogError::ClipIndex { index: clip, len });
        }
        Ok(entry.clips.remove(clip))
    }

    /// Stamp `params` onto every clip of a character.
    pub fn apply_params_to_all(
        &mut self,
        character: usize,
        params: PlaybackParams,
    ) -> Result<(), CatalogError> {
        let entry = self.character_mut(character)?;
        for clip in &mut entry.clips {
            clip.speed = params.speed();
            clip.length = params.length();
        }
        Ok(())
    }

    /// Serialize the whole catalog to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a catalog file, replacing the held entries.
    ///
    /// A file that fails to read or parse leaves the held catalog
    /// untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), CatalogError> {
        let text = fs::read_to_string(path)?;
        let entries: Vec<CharacterEntry> = serde_json::from_str(&text)?;
        self.entries = entries;
        Ok(())
    }

    /// Load `path` if it exists; an absent file is not an error.
    ///
    /// Returns whether a catalog was loaded.
    pub fn load_if_exists(&mut self, path: &Path) -> Result<bool, CatalogError> {
        if !path.exists() {
            return Ok(false);
        }
        self.load(path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, speed: f32, length: f32) -> ClipRecord {
        ClipRecord {
            name: name.to_string(),
            source_path: format!("clips/{name}.clip"),
            speed,
            length,
        }
    }

    fn sample_entries() -> Vec<CharacterEntry> {
        vec![
            CharacterEntry {
                name: "Hero".to_string(),
                asset_path: "Characters/hero.character".to_string(),
                clips: vec![clip("Idle", 1.0, 10.0), clip("Run", 2.0, 5.0)],
            },
            CharacterEntry {
                name: "Hero".to_string(),
                asset_path: "Characters/alt/hero.character".to_string(),
                clips: vec![clip("Wave", 0.5, 3.0)],
            },
        ]
    }

    fn populated_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.replace_all(sample_entries());
        store
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("AnimationConfig.json");

        let store = populated_store();
        store.save(&path).unwrap();

        let mut reloaded = CatalogStore::new();
        reloaded.load(&path).unwrap();
        // Duplicate character names round-trip untouched.
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_load_parse_failure_is_non_destructive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = populated_store();
        let before = store.entries().to_vec();

        assert!(matches!(store.load(&path), Err(CatalogError::Parse(_))));
        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_load_missing_file_is_non_destructive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");

        let mut store = populated_store();
        let before = store.entries().to_vec();

        assert!(matches!(store.load(&path), Err(CatalogError::Io(_))));
        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_load_if_exists_skips_absent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");

        let mut store = CatalogStore::new();
        assert!(!store.load_if_exists(&path).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sparse.json");
        fs::write(
            &path,
            r#"[
                {"name": "Hero", "assetPath": "Characters/hero.character"},
                {"name": "Crab", "assetPath": "Characters/crab.character",
                 "clips": [{"name": "Snip", "sourcePath": "clips/snip.clip"}]}
            ]"#,
        )
        .unwrap();

        let mut store = CatalogStore::new();
        store.load(&path).unwrap();
        assert!(store.entries()[0].clips.is_empty());
        let snip = &store.entries()[1].clips[0];
        assert_eq!(snip.speed, DEFAULT_SPEED);
        assert_eq!(snip.length, DEFAULT_LENGTH);
    }

    #[test]
    fn test_character_index_bounds() {
        let store = populated_store();
        assert!(store.character(1).is_ok());
        assert!(matches!(
            store.character(2),
            Err(CatalogError::CharacterIndex { index: 2, len: 2 })
        ));

        let empty = CatalogStore::new();
        assert!(matches!(
            empty.character(0),
            Err(CatalogError::CharacterIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_delete_clip_out_of_range_leaves_list_unmodified() {
        let mut store = populated_store();
        assert!(matches!(
            store.delete_clip(0, 5),
            Err(CatalogError::ClipIndex { index: 5, len: 2 })
        ));
        assert_eq!(store.entries()[0].clips.len(), 2);
    }

    #[test]
    fn test_delete_clip() {
        let mut store = populated_store();
        let removed = store.delete_clip(0, 0).unwrap();
        assert_eq!(removed.name, "Idle");
        assert_eq!(store.entries()[0].clips.len(), 1);
        assert_eq!(store.entries()[0].clips[0].name, "Run");
    }

    #[test]
    fn test_delete_all_clips_keeps_character() {
        let mut store = populated_store();
        store.delete_clip(1, 0).unwrap();
        // The character stays listed even with zero clips.
        assert_eq!(store.len(), 2);
        assert!(store.entries()[1].clips.is_empty());
    }

    #[test]
    fn test_apply_params_to_all() {
        let mut store = populated_store();
        let params = PlaybackParams::new(3.0, 7.0).unwrap();
        store.apply_params_to_all(0, params).unwrap();

        for clip in &store.entries()[0].clips {
            assert_eq!(clip.speed, 3.0);
            assert_eq!(clip.length, 7.0);
        }
        // Other characters are untouched.
        assert_eq!(store.entries()[1].clips[0].speed, 0.5);
    }

    #[test]
    fn test_playback_params_reject_non_positive() {
        assert!(PlaybackParams::new(1.0, 10.0).is_ok());
        assert!(matches!(
            PlaybackParams::new(0.0, 10.0),
            Err(CatalogError::InvalidParams { .. })
        ));
        assert!(matches!(
            PlaybackParams::new(1.0, -2.0),
            Err(CatalogError::InvalidParams { .. })
        ));
        assert!(matches!(
            PlaybackParams::new(f32::NAN, 10.0),
            Err(CatalogError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_add_clip_appends_with_given_params() {
        let temp_dir = tempfile::tempdir().unwrap();
        let assets = AssetRoot::new(temp_dir.path()).unwrap();
        fs::write(assets.root().join("jump.clip"), "name: Jump\nduration: 0.8\n").unwrap();

        let mut store = populated_store();
        let params = PlaybackParams::new(2.5, 4.0).unwrap();
        let record = store
            .add_clip(0, Path::new("jump.clip"), params, &assets)
            .unwrap();

        assert_eq!(record.name, "Jump");
        assert_eq!(record.source_path, "jump.clip");
        assert_eq!(record.speed, 2.5);
        assert_eq!(record.length, 4.0);
        assert_eq!(store.entries()[0].clips.len(), 3);
    }

    #[test]
    fn test_add_clip_allows_duplicates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let assets = AssetRoot::new(temp_dir.path()).unwrap();
        fs::write(assets.root().join("jump.clip"), "name: Jump\nduration: 0.8\n").unwrap();

        let mut store = populated_store();
        let params = PlaybackParams::new(1.0, 10.0).unwrap();
        store.add_clip(0, Path::new("jump.clip"), params, &assets).unwrap();
        store.add_clip(0, Path::new("jump.clip"), params, &assets).unwrap();

        let names: Vec<_> = store.entries()[0]
            .clips
            .iter()
            .filter(|c| c.name == "Jump")
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_add_clip_failures_leave_catalog_unchanged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let outside_dir = tempfile::tempdir().unwrap();
        let assets = AssetRoot::new(temp_dir.path()).unwrap();
        fs::write(outside_dir.path().join("jump.clip"), "duration: 0.8\n").unwrap();
        fs::write(assets.root().join("notes.txt"), "duration: 0.8\n").unwrap();

        let mut store = populated_store();
        let params = PlaybackParams::new(1.0, 10.0).unwrap();

        assert!(matches!(
            store.add_clip(0, &outside_dir.path().join("jump.clip"), params, &assets),
            Err(CatalogError::Asset(AssetError::OutsideRoot(_)))
        ));
        assert!(matches!(
            store.add_clip(0, Path::new("notes.txt"), params, &assets),
            Err(CatalogError::Asset(AssetError::NotAClip(_)))
        ));
        assert!(matches!(
            store.add_clip(9, Path::new("notes.txt"), params, &assets),
            Err(CatalogError::CharacterIndex { index: 9, len: 2 })
        ));
        assert_eq!(store.entries()[0].clips.len(), 2);
    }

    #[test]
    fn test_replace_all_empties_catalog() {
        let mut store = populated_store();
        store.replace_all(Vec::new());
        assert!(store.is_empty());
    }
}
