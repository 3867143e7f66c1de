//! Animation definition registry.
//!
//! Stores reusable animation timing definitions keyed by name, so several
//! entities can build the same animation from their own strips. Definitions
//! are plain data and can be loaded from JSON:
//!
//! ```json
//! {
//!   "walk":  { "frame_durations": [4, 4, 4, 4] },
//!   "death": { "frame_durations": [2, 2, 6], "hold": "last" },
//!   "rewind": { "frame_durations": [3, 3], "backwards": true, "hold": { "frame": 0 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::animation::{Animation, HoldTarget};
use crate::error::StoreError;
use crate::graphics::surface::Surface;

/// Immutable timing data for one animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDef {
    /// Ticks each frame stays visible. One entry per frame.
    pub frame_durations: Vec<u32>,
    /// Hold armed when the animation is created.
    #[serde(default)]
    pub hold: Option<HoldTarget>,
    #[serde(default)]
    pub backwards: bool,
}

impl AnimationDef {
    pub fn new(frame_durations: impl Into<Vec<u32>>) -> Self {
        Self {
            frame_durations: frame_durations.into(),
            hold: None,
            backwards: false,
        }
    }
}

/// Central registry of animation definitions.
#[derive(Debug, Clone, Default)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, AnimationDef>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping names to definitions.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let animations: FxHashMap<String, AnimationDef> = serde_json::from_str(json)?;
        Ok(Self { animations })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        info!("Loaded {} animations from {:?}", store.len(), path);
        Ok(store)
    }

    /// Register `def` under `key`, returning any definition it replaces.
    pub fn insert(&mut self, key: impl Into<String>, def: AnimationDef) -> Option<AnimationDef> {
        self.animations.insert(key.into(), def)
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.animations.get(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Build an [`Animation`] over `strip` from the definition named `key`.
    pub fn instantiate(
        &self,
        key: &str,
        strip: Surface,
        x: i32,
        y: i32,
    ) -> Result<Animation, StoreError> {
        let def = self
            .get(key)
            .ok_or_else(|| StoreError::UnknownAnimation(key.to_string()))?;
        let mut animation = Animation::new(strip, x, y, def.frame_durations.clone())?;
        if def.backwards {
            animation = animation.backwards();
        }
        if let Some(target) = def.hold {
            animation = animation.holding(target)?;
        }
        Ok(animation)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::AnimationError;

    const JSON: &str = r#"{
        "walk": { "frame_durations": [4, 4, 4, 4] },
        "death": { "frame_durations": [2, 2, 6], "hold": "last" },
        "rewind": { "frame_durations": [3, 3], "backwards": true, "hold": { "frame": 0 } }
    }"#;

    fn strip(frames: u32) -> Surface {
        Surface::filled(frames * 2, 2, [0, 0, 255, 255])
    }

    #[test]
    fn parses_optional_fields() {
        let store = AnimationStore::from_json_str(JSON).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("walk"), Some(&AnimationDef::new([4, 4, 4, 4])));
        assert_eq!(store.get("death").unwrap().hold, Some(HoldTarget::Last));
        let rewind = store.get("rewind").unwrap();
        assert!(rewind.backwards);
        assert_eq!(rewind.hold, Some(HoldTarget::Frame(0)));
    }

    #[test]
    fn instantiate_applies_definition() {
        let store = AnimationStore::from_json_str(JSON).unwrap();
        let anim = store.instantiate("rewind", strip(2), 1, 2).unwrap();
        assert!(anim.is_playing_backwards());
        assert_eq!(anim.held_frame(), Some(HoldTarget::Frame(0)));
        assert_eq!(anim.frame_durations(), &[3, 3]);
        assert_eq!(anim.frame_width(), 2);
    }

    #[test]
    fn instantiate_reports_unknown_and_invalid() {
        let mut store = AnimationStore::new();
        assert!(matches!(
            store.instantiate("missing", strip(1), 0, 0),
            Err(StoreError::UnknownAnimation(k)) if k == "missing"
        ));
        store.insert("broken", AnimationDef::new([1, 0]));
        assert!(matches!(
            store.instantiate("broken", strip(2), 0, 0),
            Err(StoreError::Animation(AnimationError::ZeroDuration { frame: 1 }))
        ));
    }

    #[test]
    fn load_from_file_reads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();
        let store = AnimationStore::load_from_file(file.path()).unwrap();
        assert!(store.get("death").is_some());
    }

    #[test]
    fn load_from_file_surfaces_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AnimationStore::load_from_file(dir.path().join("nope.json")),
            Err(StoreError::Io(_))
        ));
        assert!(matches!(
            AnimationStore::from_json_str("{ not json"),
            Err(StoreError::Json(_))
        ));
    }
}
