//! Static 2D image component.
//!
//! A [`Graphic`] keeps its position as an offset from the owning entity: an
//! entity at (30, 30) with a graphic at (2, 3) draws the image at (32, 33).
//! The [`Visual`] trait is the graphic-role interface shared with
//! [`Animation`](crate::components::animation::Animation), so code that moves,
//! flips or draws "the graphic" of an entity does not care which one it got.

use std::any::Any;

use log::warn;

use crate::component::{Binding, Component, Role};
use crate::entity::{EntityId, Host};
use crate::error::ComponentError;
use crate::events::message::{Message, MessageKind};
use crate::graphics::rect::{Axis, Position, Rect, round_px};
use crate::graphics::surface::{OPAQUE, Surface, TRANSPARENT};

/// Flip the graphic. Detail 0: axis as an integer (1 horizontal, 2 vertical,
/// 3 both).
pub const FLIP_GRAPHIC: MessageKind = MessageKind::new("flip_graphic");

/// Graphic-role behaviour: placement relative to the entity, effects, drawing.
pub trait Visual {
    /// Offset and size relative to the owning entity.
    fn local_rect(&self) -> Rect;

    /// Move by a relative distance. Fractions are rounded to whole pixels.
    fn offset(&mut self, dx: f32, dy: f32);

    /// Place at an exact offset; `None` keeps that axis.
    fn set_position(&mut self, x: Option<f32>, y: Option<f32>);

    fn flip(&mut self, axis: Axis);

    /// Scale width and height by the same factor.
    fn magnify(&mut self, zoom: f32);

    /// Stretch or shrink to exact dimensions.
    fn resize(&mut self, width: u32, height: u32);

    /// Surface opacity, 0 (invisible) to 255 (opaque).
    fn opacity(&self) -> u8;

    /// Add `amount` to the opacity, clamped to the valid range.
    fn opacify(&mut self, amount: i32);

    /// Draw `source` (or its `area`) onto this graphic's own image.
    fn blit(&mut self, source: &Surface, position: Position, area: Option<Rect>) -> Rect;

    /// Draw onto `destination` for an entity at `origin`. Returns the region
    /// of `destination` that was drawn onto.
    fn draw(&self, destination: &mut Surface, origin: Position) -> Rect;

    fn width(&self) -> u32 {
        self.local_rect().width
    }

    fn height(&self) -> u32 {
        self.local_rect().height
    }

    /// Where the graphic lands for an entity at `origin`.
    fn draw_rect(&self, origin: Position) -> Rect {
        self.local_rect().moved(origin.x, origin.y)
    }

    /// No pixel lies outside `container`.
    fn is_contained(&self, container: &Rect, origin: Position) -> bool {
        container.contains(&self.draw_rect(origin))
    }

    /// Every pixel lies outside `container`.
    fn is_outside(&self, container: &Rect, origin: Position) -> bool {
        !container.overlaps(&self.draw_rect(origin))
    }

    /// Entity position that centers this graphic in `container` on the given
    /// axes, starting from an entity at `origin`.
    fn centered_origin(&self, axis: Axis, container: &Rect, origin: Position) -> Position {
        let local = self.local_rect();
        let mut centered = origin;
        if axis.includes_horizontal() {
            let x = (container.width as f32 - local.width as f32) / 2.0 + container.x as f32;
            centered.x = round_px(x - local.x as f32);
        }
        if axis.includes_vertical() {
            let y = (container.height as f32 - local.height as f32) / 2.0 + container.y as f32;
            centered.y = round_px(y - local.y as f32);
        }
        centered
    }

    fn is_opaque(&self) -> bool {
        self.opacity() == OPAQUE
    }

    fn is_transparent(&self) -> bool {
        self.opacity() == TRANSPARENT
    }
}

/// A single image drawn at an offset from its entity.
#[derive(Debug, Clone)]
pub struct Graphic {
    image: Surface,
    rect: Rect,
    binding: Binding,
}

impl Graphic {
    /// Wrap `source`, placed at `(x, y)` relative to the entity. The image
    /// starts fully opaque.
    pub fn new(mut source: Surface, x: i32, y: i32) -> Self {
        source.set_alpha(OPAQUE);
        let rect = Rect::new(x, y, source.width(), source.height());
        Self {
            image: source,
            rect,
            binding: Binding::default(),
        }
    }

    pub fn image(&self) -> &Surface {
        &self.image
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.binding.owner()
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.rect.width = width;
        self.rect.height = height;
    }

    /// Replace the image through `f`. The rect is left alone.
    pub(crate) fn map_image(&mut self, f: impl FnOnce(Surface) -> Surface) {
        let image = std::mem::replace(&mut self.image, Surface::new(0, 0));
        self.image = f(image);
    }

    pub(crate) fn bind(&mut self, entity: EntityId) -> Result<(), ComponentError> {
        self.binding.bind(entity)
    }

    fn sync_size(&mut self) {
        self.rect.width = self.image.width();
        self.rect.height = self.image.height();
    }
}

/// Axis carried by a [`FLIP_GRAPHIC`] message, if it names a valid one.
pub(crate) fn flip_axis(message: &Message) -> Option<Axis> {
    message.int(0).and_then(Axis::from_bits)
}

/// Scale a dimension by `zoom`, rounding to the nearest pixel.
pub(crate) fn zoomed(value: u32, zoom: f32) -> u32 {
    (value as f32 * zoom.max(0.0)).round() as u32
}

/// Apply a relative opacity change, clamped to 0..=255.
pub(crate) fn shifted_alpha(current: u8, amount: i32) -> u8 {
    (current as i32 + amount).clamp(TRANSPARENT as i32, OPAQUE as i32) as u8
}

impl Visual for Graphic {
    fn local_rect(&self) -> Rect {
        self.rect
    }

    fn offset(&mut self, dx: f32, dy: f32) {
        self.rect.move_by(round_px(dx), round_px(dy));
    }

    fn set_position(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.rect.x = round_px(x);
        }
        if let Some(y) = y {
            self.rect.y = round_px(y);
        }
    }

    fn flip(&mut self, axis: Axis) {
        self.image = self.image.flipped(axis);
    }

    fn magnify(&mut self, zoom: f32) {
        let width = zoomed(self.rect.width, zoom);
        let height = zoomed(self.rect.height, zoom);
        self.resize(width, height);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = self.image.scaled(width, height);
        self.sync_size();
    }

    fn opacity(&self) -> u8 {
        self.image.alpha()
    }

    fn opacify(&mut self, amount: i32) {
        let alpha = shifted_alpha(self.image.alpha(), amount);
        self.image.set_alpha(alpha);
    }

    fn blit(&mut self, source: &Surface, position: Position, area: Option<Rect>) -> Rect {
        self.image.blit(source, position, area)
    }

    fn draw(&self, destination: &mut Surface, origin: Position) -> Rect {
        let at = self.draw_rect(origin);
        destination.blit(&self.image, Position::new(at.x, at.y), None)
    }
}

impl Component for Graphic {
    fn role(&self) -> Role {
        Role::Graphic
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_bind(&mut self, entity: EntityId) -> Result<(), ComponentError> {
        self.bind(entity)
    }

    fn receive_message(&mut self, host: &Host, message: &Message) -> Result<(), ComponentError> {
        if message.is(FLIP_GRAPHIC) {
            match flip_axis(message) {
                Some(axis) => self.flip(axis),
                None => warn!("Entity {}: ignoring flip with axis {:?}", host.id, message.detail(0)),
            }
        }
        Ok(())
    }

    fn as_visual(&self) -> Option<&dyn Visual> {
        Some(self)
    }

    fn as_visual_mut(&mut self) -> Option<&mut dyn Visual> {
        Some(self)
    }
}
