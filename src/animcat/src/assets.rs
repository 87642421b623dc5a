//! Managed asset root, project paths, and asset file parsing.
//!
//! All asset references held by the catalog are *project paths*:
//! root-relative, forward-slash strings. This module owns the mapping
//! between project paths and absolute filesystem paths, and parses the
//! two on-disk asset formats the catalog consumes: character definitions
//! (`*.character`) and animation clips (`*.clip`), both YAML documents.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extension of character definition assets.
pub const CHARACTER_EXT: &str = "character";

/// File extension of animation clip assets.
pub const CLIP_EXT: &str = "clip";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset root is not a directory: {0}")]
    RootNotFound(PathBuf),

    #[error("path is outside the managed asset root: {0}")]
    OutsideRoot(PathBuf),

    #[error("not a valid clip asset: {0}")]
    NotAClip(PathBuf),

    #[error("not a valid character asset: {0}")]
    NotACharacter(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk character definition document.
///
/// A character may carry a state-machine controller, a legacy animation
/// component, both, or neither. Clip references are project paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterFile {
    /// Display name; the file stem is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub controller: Option<ControllerDef>,
    #[serde(default)]
    pub animation: Option<LegacyAnimationDef>,
}

/// Animation-state-machine controller: every clip reachable from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerDef {
    #[serde(default)]
    pub clips: Vec<String>,
}

/// Legacy direct-animation component: one primary clip plus extras.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyAnimationDef {
    /// The component's primary clip.
    #[serde(default)]
    pub clip: Option<String>,
    /// Additional clips attached to the component.
    #[serde(default)]
    pub clips: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClipFile {
    #[serde(default)]
    name: Option<String>,
    duration: f32,
}

/// A character definition resolved against the asset root.
#[derive(Debug, Clone)]
pub struct CharacterAsset {
    pub name: String,
    /// Project path of the definition file.
    pub path: String,
    pub definition: CharacterFile,
}

/// A clip asset resolved against the asset root.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAsset {
    pub name: String,
    /// Project path of the clip file.
    pub path: String,
    /// Declared duration in seconds.
    pub duration: f32,
}

/// The managed asset root directory.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use animcat::AssetRoot;
///
/// let assets = AssetRoot::new("project")?;
/// let clip = assets.load_clip("Characters/hero/idle.clip")?;
/// println!("{} ({}s)", clip.name, clip.duration);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    /// Bind the managed root. The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AssetError::RootNotFound(root));
        }
        // Canonical form so prefix checks against absolute candidates hold.
        let root = root.canonicalize()?;
        Ok(AssetRoot { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert an absolute filesystem path into a project path.
    pub fn project_path(&self, path: &Path) -> Result<String, AssetError> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| AssetError::OutsideRoot(path.to_path_buf()))?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    /// Resolve a project path back to an absolute filesystem path.
    pub fn absolute_path(&self, project: &str) -> PathBuf {
        let mut absolute = self.root.clone();
        for part in project.split('/').filter(|p| !p.is_empty()) {
            absolute.push(part);
        }
        absolute
    }

    /// Load a character definition by project path.
    pub fn load_character(&self, project: &str) -> Result<CharacterAsset, AssetError> {
        self.character_from_file(&self.absolute_path(project))
    }

    /// Load a character definition from an absolute path under the root.
    pub fn character_from_file(&self, path: &Path) -> Result<CharacterAsset, AssetError> {
        if path.extension().and_then(|e| e.to_str()) != Some(CHARACTER_EXT) || !path.is_file() {
            return Err(AssetError::NotACharacter(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let definition: CharacterFile = serde_yaml::from_str(&text)
            .map_err(|_| AssetError::NotACharacter(path.to_path_buf()))?;
        let name = definition
            .name
            .clone()
            .unwrap_or_else(|| stem_name(path));
        Ok(CharacterAsset { name, path: self.project_path(path)?, definition })
    }

    /// Load a clip asset by project path.
    pub fn load_clip(&self, project: &str) -> Result<ClipAsset, AssetError> {
        self.clip_from_file(&self.absolute_path(project))
    }

    /// Resolve an operator-supplied candidate path to a clip asset.
    ///
    /// Absolute candidates must lie under the managed root; relative
    /// candidates are taken as project paths.
    pub fn resolve_clip(&self, candidate: &Path) -> Result<ClipAsset, AssetError> {
        let absolute = if candidate.is_absolute() {
            if !candidate.starts_with(&self.root) {
                return Err(AssetError::OutsideRoot(candidate.to_path_buf()));
            }
            candidate.to_path_buf()
        } else {
            self.absolute_path(&candidate.to_string_lossy())
        };
        self.clip_from_file(&absolute)
    }

    fn clip_from_file(&self, path: &Path) -> Result<ClipAsset, AssetError> {
        if path.extension().and_then(|e| e.to_str()) != Some(CLIP_EXT) || !path.is_file() {
            return Err(AssetError::NotAClip(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let file: ClipFile = serde_yaml::from_str(&text)
            .map_err(|_| AssetError::NotAClip(path.to_path_buf()))?;
        let name = file.name.unwrap_or_else(|| stem_name(path));
        Ok(ClipAsset { name, path: self.project_path(path)?, duration: file.duration })
    }
}

fn stem_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
