//! Stock components.
//!
//! Submodules overview:
//! - [`animation`] – frame-strip playback with direction control and one-shot frame holds
//! - [`graphic`] – static image drawn at an offset from its entity, plus the [`graphic::Visual`] role interface

pub mod animation;
pub mod graphic;
