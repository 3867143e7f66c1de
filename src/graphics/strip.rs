//! Frame-order repair for mirrored strips.
//!
//! Mirroring a horizontal strip flips every frame's content, but it also
//! reverses the order of the frames themselves:
//!
//! ```text
//!  before    ┌────┬────┬────┐      mirrored  ┌────┬────┬────┐
//!            │ A> │ B> │ C> │  ==>           │ <C │ <B │ <A │
//!            └────┴────┴────┘                └────┴────┴────┘
//!
//!  restored  ┌────┬────┬────┐
//!            │ <A │ <B │ <C │   output[i] = input[N-1-i]
//!            └────┴────┴────┘
//! ```

use crate::graphics::rect::{Position, Rect};
use crate::graphics::surface::{OPAQUE, Surface};

/// Put the frames of a horizontally mirrored strip back in their original
/// left-to-right order, keeping each frame's mirrored content.
///
/// The strip is treated as `width / frame_width` frames of `frame_width`
/// pixels; trailing columns that do not form a whole frame are dropped.
/// Frames are copied pixel for pixel, keyed and transparent pixels included.
/// The input's surface opacity is forced to fully opaque while the frames are
/// copied, and the original opacity and color key are applied to the result.
pub fn restore_frame_order(mut mirrored: Surface, frame_width: u32) -> Surface {
    if frame_width == 0 {
        return mirrored;
    }
    let frames = mirrored.width() / frame_width;
    let height = mirrored.height();

    let original_alpha = mirrored.alpha();
    mirrored.set_alpha(OPAQUE);

    let mut restored = Surface::new(frames * frame_width, height);
    for i in 0..frames {
        let source_x = ((frames - 1 - i) * frame_width) as i32;
        let dest_x = (i * frame_width) as i32;
        restored.copy_region(
            &mirrored,
            Position::new(dest_x, 0),
            Rect::new(source_x, 0, frame_width, height),
        );
    }

    if let Some(key) = mirrored.color_key() {
        restored = restored.with_color_key(key);
    }
    restored.set_alpha(original_alpha);
    restored
}
