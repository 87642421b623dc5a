//! Clip extraction from the two animation subsystems and the ordered,
//! name-deduplicating merge.
//!
//! A character can carry clips in an animation-state-machine controller
//! (the current subsystem), in a legacy direct-animation component (one
//! primary clip plus extras), or in both during a migration. The merge
//! queries both sources in a fixed order and keeps the first occurrence
//! of each clip name. One exception: the legacy primary clip is always
//! included, even when the controller already produced a clip of the
//! same name.

use crate::assets::{AssetRoot, CharacterAsset, ClipAsset, ControllerDef, LegacyAnimationDef};
use crate::catalog::{ClipRecord, DEFAULT_SPEED};

/// One clip as reported by a source: identity plus declared duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Project path of the clip asset.
    pub source_path: String,
    /// Declared duration in seconds.
    pub duration: f32,
}

impl From<ClipAsset> for ClipInfo {
    fn from(clip: ClipAsset) -> Self {
        ClipInfo { name: clip.name, source_path: clip.path, duration: clip.duration }
    }
}

impl From<&ClipInfo> for ClipRecord {
    fn from(info: &ClipInfo) -> Self {
        ClipRecord {
            name: info.name.clone(),
            source_path: info.source_path.clone(),
            speed: DEFAULT_SPEED,
            length: info.duration,
        }
    }
}

/// A clip offered to the merge.
#[derive(Debug, Clone)]
pub struct SourcedClip {
    pub info: ClipInfo,
    /// Pinned clips bypass the duplicate-name check.
    pub pinned: bool,
}

/// A provider of clips for one character, queried by [`merge_clips`].
pub trait ClipSource {
    /// Clips offered by this source, in enumeration order.
    fn clips(&self) -> Vec<SourcedClip>;
}

/// Clips reachable from a character's state-machine controller.
#[derive(Debug, Default)]
pub struct ControllerSource {
    clips: Vec<ClipInfo>,
}

impl ControllerSource {
    pub fn new(clips: Vec<ClipInfo>) -> Self {
        ControllerSource { clips }
    }

    /// Resolve a controller definition's clip references.
    ///
    /// Unresolvable references are skipped, matching the scan policy.
    pub fn from_definition(assets: &AssetRoot, controller: Option<&ControllerDef>) -> Self {
        let mut clips = Vec::new();
        if let Some(def) = controller {
            for reference in &def.clips {
                if let Ok(clip) = assets.load_clip(reference) {
                    clips.push(clip.into());
                }
            }
        }
        ControllerSource { clips }
    }
}

impl ClipSource for ControllerSource {
    fn clips(&self) -> Vec<SourcedClip> {
        self.clips
            .iter()
            .map(|info| SourcedClip { info: info.clone(), pinned: false })
            .collect()
    }
}

/// Clips held by a character's legacy direct-animation component.
#[derive(Debug, Default)]
pub struct LegacySource {
    primary: Option<ClipInfo>,
    extras: Vec<ClipInfo>,
}

impl LegacySource {
    pub fn new(primary: Option<ClipInfo>, extras: Vec<ClipInfo>) -> Self {
        LegacySource { primary, extras }
    }

    /// Resolve a legacy component's clip references.
    ///
    /// Unresolvable references are skipped, matching the scan policy.
    pub fn from_definition(assets: &AssetRoot, animation: Option<&LegacyAnimationDef>) -> Self {
        let Some(def) = animation else {
            return LegacySource::default();
        };
        let primary = def
            .clip
            .as_ref()
            .and_then(|reference| assets.load_clip(reference).ok())
            .map(ClipInfo::from);
        let extras = def
            .clips
            .iter()
            .filter_map(|reference| assets.load_clip(reference).ok())
            .map(ClipInfo::from)
            .collect();
        LegacySource { primary, extras }
    }
}

impl ClipSource for LegacySource {
    fn clips(&self) -> Vec<SourcedClip> {
        // Extras only contribute alongside a primary clip; a component
        // with no primary is treated as absent.
        let Some(primary) = &self.primary else {
            return Vec::new();
        };
        let mut out = vec![SourcedClip { info: primary.clone(), pinned: true }];
        out.extend(
            self.extras
                .iter()
                .map(|info| SourcedClip { info: info.clone(), pinned: false }),
        );
        out
    }
}

/// Merge clips from `sources`, in order, into catalog records.
///
/// A pinned clip is always appended; every other clip is appended only
/// if no record of the same name exists yet. First occurrence wins.
pub fn merge_clips(sources: &[&dyn ClipSource]) -> Vec<ClipRecord> {
    let mut records: Vec<ClipRecord> = Vec::new();
    for source in sources {
        for sourced in source.clips() {
            if !sourced.pinned && records.iter().any(|r| r.name == sourced.info.name) {
                continue;
            }
            records.push(ClipRecord::from(&sourced.info));
        }
    }
    records
}

/// Extract the merged clip list for one resolved character.
pub fn extract_clips(assets: &AssetRoot, character: &CharacterAsset) -> Vec<ClipRecord> {
    let controller =
        ControllerSource::from_definition(assets, character.definition.controller.as_ref());
    let legacy = LegacySource::from_definition(assets, character.definition.animation.as_ref());
    merge_clips(&[&controller, &legacy])
}
