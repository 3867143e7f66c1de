//! Error types.
//!
//! Every failure the library can report is a construction-time configuration
//! error or a component contract violation. Nothing in the tick or message path
//! performs I/O; only the [`AnimationStore`](crate::resources::animationstore::AnimationStore)
//! and [`GameConfig`](crate::resources::gameconfig::GameConfig) touch the filesystem.

use thiserror::Error;

use crate::component::Role;
use crate::entity::EntityId;

/// Invalid animation setup or an out-of-range frame request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("an animation needs at least one frame duration")]
    EmptyDurations,

    #[error("frame {frame} has a duration of zero ticks")]
    ZeroDuration { frame: usize },

    #[error("strip is {width}px wide, too narrow for {frames} frames")]
    StripTooNarrow { width: u32, frames: usize },

    #[error("strip width {width}px does not split into {frames} equal frames")]
    UnevenStrip { width: u32, frames: usize },

    #[error("strip geometry implies {expected} frames but {found} durations were given")]
    FrameCountMismatch { expected: usize, found: usize },

    #[error("frame {index} is out of range for an animation of {frames} frames")]
    FrameOutOfRange { index: usize, frames: usize },
}

/// Violations of the component contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("{role} component requires message handling but does not implement receive_message")]
    MessageHandlerMissing { role: Role },

    #[error("component already bound to entity {current}, cannot rebind to {requested}")]
    AlreadyBound {
        current: EntityId,
        requested: EntityId,
    },
}

/// Failures while loading or instantiating stored animation definitions.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no animation registered under '{0}'")]
    UnknownAnimation(String),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}

/// Failures while reading or writing the INI configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    Load(String),

    #[error("Failed to save config file: {0}")]
    Save(String),

    #[error("invalid value for [{section}] {key}: {value}")]
    Invalid {
        section: &'static str,
        key: &'static str,
        value: String,
    },
}
