//! CPU pixel buffer used as the graphics backend.
//!
//! A [`Surface`] is an RGBA image plus a surface-wide opacity that is applied
//! when the surface is composited onto another one. Per-pixel alpha and the
//! surface opacity multiply together, so a half-transparent surface blitted
//! onto an empty buffer leaves half-transparent, darkened pixels behind. Code
//! that moves regions between buffers without compositing (see
//! [`restore_frame_order`]) uses [`Surface::copy_region`] instead.
//!
//! [`restore_frame_order`]: crate::graphics::strip::restore_frame_order

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageResult, Rgba, RgbaImage};

use crate::graphics::rect::{Axis, Position, Rect};

pub const OPAQUE: u8 = u8::MAX;
pub const TRANSPARENT: u8 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
    alpha: u8,
    color_key: Option<[u8; 3]>,
}

impl Surface {
    /// Fully transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    /// Surface filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            alpha: OPAQUE,
            color_key: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Surface-wide opacity applied at composite time.
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn color_key(&self) -> Option<[u8; 3]> {
        self.color_key
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x < self.width() && y < self.height() {
            self.image.put_pixel(x, y, Rgba(color));
        }
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.image.pixels_mut() {
            *px = Rgba(color);
        }
    }

    /// Overwrite the pixels under `rect` (clipped to the surface).
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let Some(clip) = rect.intersection(&self.bounds()) else {
            return;
        };
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                self.image.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }

    /// Nearest-neighbour scale to an exact size.
    pub fn scaled(&self, width: u32, height: u32) -> Surface {
        let image = if width == 0 || height == 0 {
            RgbaImage::new(width, height)
        } else {
            imageops::resize(&self.image, width, height, FilterType::Nearest)
        };
        Surface {
            image,
            alpha: self.alpha,
            color_key: self.color_key,
        }
    }

    /// Mirrored copy across the requested axes.
    pub fn flipped(&self, axis: Axis) -> Surface {
        let mut image = self.image.clone();
        if axis.includes_horizontal() {
            image = imageops::flip_horizontal(&image);
        }
        if axis.includes_vertical() {
            image = imageops::flip_vertical(&image);
        }
        Surface {
            image,
            alpha: self.alpha,
            color_key: self.color_key,
        }
    }

    /// Copy with every pixel matching `key` made fully transparent, leaving a
    /// uniform background that composites away.
    pub fn with_color_key(&self, key: [u8; 3]) -> Surface {
        let mut image = self.image.clone();
        for px in image.pixels_mut() {
            if px.0[..3] == key {
                *px = Rgba([key[0], key[1], key[2], TRANSPARENT]);
            }
        }
        Surface {
            image,
            alpha: self.alpha,
            color_key: Some(key),
        }
    }

    /// Composite `source` (or the `area` of it) onto this surface with its
    /// top-left corner at `position`.
    ///
    /// Uses source-over blending with the source's per-pixel alpha scaled by
    /// its surface opacity. Returns the region of this surface that was drawn
    /// onto; a zero-sized rect at `position` when nothing was touched.
    pub fn blit(&mut self, source: &Surface, position: Position, area: Option<Rect>) -> Rect {
        let untouched = Rect::new(position.x, position.y, 0, 0);
        let area = match area {
            Some(area) => match area.intersection(&source.bounds()) {
                Some(area) => area,
                None => return untouched,
            },
            None => source.bounds(),
        };
        let target = Rect::new(position.x, position.y, area.width, area.height);
        let Some(clip) = target.intersection(&self.bounds()) else {
            return untouched;
        };

        let src_dx = area.x - position.x;
        let src_dy = area.y - position.y;
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                let src = source.image.get_pixel((x + src_dx) as u32, (y + src_dy) as u32).0;
                let dst = self.image.get_pixel_mut(x as u32, y as u32);
                dst.0 = blend(src, source.alpha, dst.0);
            }
        }
        clip
    }

    /// Overwrite pixels with `area` of `source` placed at `position`, without
    /// blending. Surface opacity is ignored. Returns the region written, or a
    /// zero-sized rect at `position` when nothing was touched.
    pub fn copy_region(&mut self, source: &Surface, position: Position, area: Rect) -> Rect {
        let untouched = Rect::new(position.x, position.y, 0, 0);
        let Some(area) = area.intersection(&source.bounds()) else {
            return untouched;
        };
        let target = Rect::new(position.x, position.y, area.width, area.height);
        let Some(clip) = target.intersection(&self.bounds()) else {
            return untouched;
        };
        let region = imageops::crop_imm(
            &source.image,
            area.x as u32,
            area.y as u32,
            area.width,
            area.height,
        )
        .to_image();
        imageops::replace(&mut self.image, &region, position.x as i64, position.y as i64);
        clip
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save(path)
    }
}

/// Source-over composite of one pixel.
fn blend(src: [u8; 4], surface_alpha: u8, dst: [u8; 4]) -> [u8; 4] {
    let sa = (src[3] as u32 * surface_alpha as u32 + 127) / 255;
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return [src[0], src[1], src[2], OPAQUE];
    }
    let da = dst[3] as u32;
    // Output alpha scaled by 255 to keep the division exact for empty targets.
    let out_a = sa * 255 + da * (255 - sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        out[c] = ((value + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    out
}
