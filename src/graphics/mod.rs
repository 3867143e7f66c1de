//! Pixel buffers and 2D geometry.
//!
//! - [`rect`] – integer positions, rectangles and flip/center axes
//! - [`surface`] – RGBA pixel buffer with surface-wide opacity, the backend
//!   every graphic component draws through
//! - [`strip`] – frame-order repair for horizontally mirrored frame strips

pub mod rect;
pub mod strip;
pub mod surface;

pub use rect::{Axis, Position, Rect};
pub use strip::restore_frame_order;
pub use surface::Surface;
