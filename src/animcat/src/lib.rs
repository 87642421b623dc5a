//! # animcat
//!
//! Character animation catalog library - scanning, clip merging, and
//! catalog editing.
//!
//! This library provides functionality to:
//! - Scan a managed asset root for character definitions
//! - Merge each character's clips from the controller and legacy
//!   animation subsystems into one deduplicated list
//! - Edit per-clip playback parameters and clip membership
//! - Persist the catalog as JSON and reload it later
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use animcat::{AssetRoot, CatalogStore, PlaybackParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assets = AssetRoot::new("project")?;
//! let mut store = CatalogStore::new();
//!
//! // Build the catalog from the character folder, replacing any prior
//! // contents, then stamp the session's playback params and persist.
//! store.replace_all(animcat::scan_characters(&assets, "Characters")?);
//! store.apply_params_to_all(0, PlaybackParams::new(1.5, 12.0)?)?;
//! store.save(Path::new("project/AnimationConfig.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod catalog;
pub mod clips;
pub mod scan;

// Re-export commonly used items
pub use assets::{AssetError, AssetRoot, CharacterAsset, CharacterFile, ClipAsset};
pub use catalog::{
    CatalogError, CatalogStore, CharacterEntry, ClipRecord, PlaybackParams, DEFAULT_LENGTH,
    DEFAULT_SPEED, LENGTH_RANGE, SPEED_RANGE,
};
pub use clips::{
    extract_clips, merge_clips, ClipInfo, ClipSource, ControllerSource, LegacySource, SourcedClip,
};
pub use scan::{scan_characters, ScanError};
