//! Frame-strip animation component.
//!
//! An [`Animation`] is a [`Graphic`] whose image is a horizontal strip of
//! equally sized frames. Only the current frame is drawn. Frame timing is
//! counted in update calls (ticks), never in wall-clock time, so playback is
//! deterministic.
//!
//! # Playback
//!
//! Every tick while not paused the frame counter grows by one. Once it reaches
//! the current frame's duration the counter resets and the frame index steps
//! one place in the play direction, wrapping around at either end. Frame `i` is
//! therefore visible for exactly `durations[i]` ticks and a full cycle takes
//! `sum(durations)` ticks.
//!
//! # Holding a frame
//!
//! [`Animation::hold_frame`] arms a one-shot [`HoldTarget`]. The next frame
//! change that lands on the target pauses the animation and disarms the
//! target. [`HoldTarget::Last`] means the last frame in the current play
//! direction: `N - 1` when playing forward, `0` when playing backward.
//! With nothing armed the animation loops forever.
//!
//! # Messages
//!
//! Animations listen for [`PAUSE_ANIMATION`], [`RESUME_ANIMATION`],
//! [`HOLD_FRAME`], [`REVERSE_ANIMATION`] and [`FLIP_GRAPHIC`], so a sibling
//! component can drive playback without holding a reference to it.

use std::any::Any;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::component::{Component, MessageInterest, Role};
use crate::components::graphic::{
    FLIP_GRAPHIC, Graphic, Visual, flip_axis, shifted_alpha, zoomed,
};
use crate::entity::{EntityId, Host};
use crate::error::{AnimationError, ComponentError};
use crate::events::message::{Detail, Message, MessageKind};
use crate::graphics::rect::{Axis, Position, Rect};
use crate::graphics::strip::restore_frame_order;
use crate::graphics::surface::Surface;

/// Pause playback.
pub const PAUSE_ANIMATION: MessageKind = MessageKind::new("pause_animation");
/// Resume playback.
pub const RESUME_ANIMATION: MessageKind = MessageKind::new("resume_animation");
/// Arm a hold. Detail 0 (optional): frame index; absent means the last frame.
pub const HOLD_FRAME: MessageKind = MessageKind::new("hold_frame");
/// Toggle the play direction.
pub const REVERSE_ANIMATION: MessageKind = MessageKind::new("reverse_animation");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayDirection {
    #[default]
    Forward,
    Backward,
}

/// Frame that pauses the animation the next time it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldTarget {
    /// An explicit frame index.
    Frame(usize),
    /// The last frame in the current play direction.
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    PlayingForward,
    PlayingBackward,
    Paused,
}

#[derive(Debug, Clone)]
pub struct Animation {
    graphic: Graphic,
    frame_durations: Vec<u32>,
    frame_index: usize,
    frame_counter: u32,
    direction: PlayDirection,
    paused: bool,
    held_frame: Option<HoldTarget>,
}

impl Animation {
    /// Build an animation from a strip split into one frame per duration.
    ///
    /// `frame_durations` are in ticks. The strip width must divide evenly into
    /// that many frames.
    pub fn new(
        strip: Surface,
        x: i32,
        y: i32,
        frame_durations: impl Into<Vec<u32>>,
    ) -> Result<Self, AnimationError> {
        let frame_durations = frame_durations.into();
        validate_durations(&frame_durations)?;
        let frames = frame_durations.len();
        let width = strip.width();
        if (width as usize) < frames {
            return Err(AnimationError::StripTooNarrow { width, frames });
        }
        if width as usize % frames != 0 {
            return Err(AnimationError::UnevenStrip { width, frames });
        }
        let frame_width = width / frames as u32;
        Ok(Self::from_parts(strip, x, y, frame_width, frame_durations))
    }

    /// Build an animation whose frame width is known up front. The strip must
    /// hold exactly one frame per duration.
    pub fn with_frame_width(
        strip: Surface,
        x: i32,
        y: i32,
        frame_width: u32,
        frame_durations: impl Into<Vec<u32>>,
    ) -> Result<Self, AnimationError> {
        let frame_durations = frame_durations.into();
        validate_durations(&frame_durations)?;
        let frames = frame_durations.len();
        let width = strip.width();
        if frame_width == 0 || width % frame_width != 0 {
            return Err(AnimationError::UnevenStrip { width, frames });
        }
        let expected = (width / frame_width) as usize;
        if expected != frames {
            return Err(AnimationError::FrameCountMismatch {
                expected,
                found: frames,
            });
        }
        Ok(Self::from_parts(strip, x, y, frame_width, frame_durations))
    }

    fn from_parts(
        strip: Surface,
        x: i32,
        y: i32,
        frame_width: u32,
        frame_durations: Vec<u32>,
    ) -> Self {
        let mut graphic = Graphic::new(strip, x, y);
        let height = graphic.height();
        graphic.set_size(frame_width, height);
        Self {
            graphic,
            frame_durations,
            frame_index: 0,
            frame_counter: 0,
            direction: PlayDirection::Forward,
            paused: false,
            held_frame: None,
        }
    }

    /// Arm `target` right away.
    pub fn holding(mut self, target: HoldTarget) -> Result<Self, AnimationError> {
        self.hold_frame(target)?;
        Ok(self)
    }

    /// Start in backward playback.
    pub fn backwards(mut self) -> Self {
        self.direction = PlayDirection::Backward;
        self
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Ticks since the last frame change.
    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn frame_count(&self) -> usize {
        self.frame_durations.len()
    }

    pub fn frame_durations(&self) -> &[u32] {
        &self.frame_durations
    }

    pub fn frame_width(&self) -> u32 {
        self.graphic.width()
    }

    /// The whole strip.
    pub fn strip(&self) -> &Surface {
        self.graphic.image()
    }

    /// Region of the strip shown for the current frame.
    pub fn frame_rect(&self) -> Rect {
        let width = self.frame_width();
        Rect::new(
            (self.frame_index as u32 * width) as i32,
            0,
            width,
            self.graphic.height(),
        )
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.graphic.owner()
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_playing_backwards(&self) -> bool {
        self.direction == PlayDirection::Backward
    }

    pub fn held_frame(&self) -> Option<HoldTarget> {
        self.held_frame
    }

    pub fn state(&self) -> AnimationState {
        match (self.paused, self.direction) {
            (true, _) => AnimationState::Paused,
            (false, PlayDirection::Forward) => AnimationState::PlayingForward,
            (false, PlayDirection::Backward) => AnimationState::PlayingBackward,
        }
    }

    /// Stop changing frames and reset the frame counter.
    pub fn pause(&mut self) {
        self.paused = true;
        self.frame_counter = 0;
    }

    /// Resume from the current frame and counter.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn enable_backwards_playback(&mut self, backwards: bool) {
        self.direction = if backwards {
            PlayDirection::Backward
        } else {
            PlayDirection::Forward
        };
    }

    pub fn toggle_backwards_playback(&mut self) {
        self.enable_backwards_playback(!self.is_playing_backwards());
    }

    /// Arm a one-shot pause on `target`.
    pub fn hold_frame(&mut self, target: HoldTarget) -> Result<(), AnimationError> {
        if let HoldTarget::Frame(index) = target {
            self.check_index(index)?;
        }
        self.held_frame = Some(target);
        Ok(())
    }

    /// Disarm any pending hold.
    pub fn release_hold(&mut self) {
        self.held_frame = None;
    }

    /// Jump to `index` and restart its duration.
    pub fn set_frame(&mut self, index: usize) -> Result<(), AnimationError> {
        self.check_index(index)?;
        self.frame_index = index;
        self.frame_counter = 0;
        Ok(())
    }

    /// One tick of playback.
    pub fn advance(&mut self) {
        if self.paused {
            return;
        }
        self.frame_counter += 1;
        if self.frame_counter < self.frame_durations[self.frame_index] {
            return;
        }
        self.frame_counter = 0;
        let frames = self.frame_count();
        self.frame_index = match self.direction {
            PlayDirection::Forward => (self.frame_index + 1) % frames,
            PlayDirection::Backward => (self.frame_index + frames - 1) % frames,
        };
        trace!("Animation {:?}: frame -> {}", self.owner(), self.frame_index);
        self.check_hold();
    }

    fn check_hold(&mut self) {
        let Some(target) = self.held_frame else {
            return;
        };
        if self.resolve(target) == self.frame_index {
            self.held_frame = None;
            self.pause();
            debug!("Animation {:?}: held on frame {}", self.owner(), self.frame_index);
        }
    }

    fn resolve(&self, target: HoldTarget) -> usize {
        match (target, self.direction) {
            (HoldTarget::Frame(index), _) => index,
            (HoldTarget::Last, PlayDirection::Forward) => self.frame_count() - 1,
            (HoldTarget::Last, PlayDirection::Backward) => 0,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), AnimationError> {
        if index < self.frame_count() {
            Ok(())
        } else {
            Err(AnimationError::FrameOutOfRange {
                index,
                frames: self.frame_count(),
            })
        }
    }
}

fn validate_durations(frame_durations: &[u32]) -> Result<(), AnimationError> {
    if frame_durations.is_empty() {
        return Err(AnimationError::EmptyDurations);
    }
    if let Some(frame) = frame_durations.iter().position(|&d| d == 0) {
        return Err(AnimationError::ZeroDuration { frame });
    }
    Ok(())
}

impl Visual for Animation {
    /// The rect is one frame wide.
    fn local_rect(&self) -> Rect {
        self.graphic.local_rect()
    }

    fn offset(&mut self, dx: f32, dy: f32) {
        self.graphic.offset(dx, dy);
    }

    fn set_position(&mut self, x: Option<f32>, y: Option<f32>) {
        self.graphic.set_position(x, y);
    }

    /// A horizontal flip mirrors every frame in place; frame order is kept.
    fn flip(&mut self, axis: Axis) {
        let frame_width = self.frame_width();
        if axis.includes_horizontal() {
            self.graphic.map_image(|strip| {
                restore_frame_order(strip.flipped(Axis::Horizontal), frame_width)
            });
        }
        if axis.includes_vertical() {
            self.graphic.map_image(|strip| strip.flipped(Axis::Vertical));
        }
    }

    fn magnify(&mut self, zoom: f32) {
        let width = zoomed(self.frame_width(), zoom);
        let height = zoomed(self.graphic.height(), zoom);
        self.resize(width, height);
    }

    /// `width` is the new width of a single frame.
    fn resize(&mut self, width: u32, height: u32) {
        let frames = self.frame_count() as u32;
        self.graphic
            .map_image(|strip| strip.scaled(width.saturating_mul(frames), height));
        self.graphic.set_size(width, height);
    }

    fn opacity(&self) -> u8 {
        self.graphic.opacity()
    }

    fn opacify(&mut self, amount: i32) {
        let alpha = shifted_alpha(self.opacity(), amount);
        self.graphic.map_image(|mut strip| {
            strip.set_alpha(alpha);
            strip
        });
    }

    /// Draws onto the strip; `position` is relative to the strip's left edge.
    fn blit(&mut self, source: &Surface, position: Position, area: Option<Rect>) -> Rect {
        self.graphic.blit(source, position, area)
    }

    /// Draw only the current frame.
    fn draw(&self, destination: &mut Surface, origin: Position) -> Rect {
        let at = self.draw_rect(origin);
        destination.blit(
            self.graphic.image(),
            Position::new(at.x, at.y),
            Some(self.frame_rect()),
        )
    }
}

impl Component for Animation {
    /// Animations stand in for graphics.
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
        self.graphic.bind(entity)
    }

    fn update(&mut self, _host: &Host, _dt: f32) {
        self.advance();
    }

    fn message_interest(&self) -> MessageInterest {
        MessageInterest::Required
    }

    fn receive_message(&mut self, host: &Host, message: &Message) -> Result<(), ComponentError> {
        match message.kind {
            PAUSE_ANIMATION => self.pause(),
            RESUME_ANIMATION => self.unpause(),
            REVERSE_ANIMATION => self.toggle_backwards_playback(),
            HOLD_FRAME => {
                let target = match message.detail(0) {
                    None => HoldTarget::Last,
                    Some(&Detail::Int(index)) if index >= 0 => HoldTarget::Frame(index as usize),
                    Some(&Detail::Int(index)) => {
                        warn!("Entity {}: ignoring hold on negative frame {index}", host.id);
                        return Ok(());
                    }
                    Some(other) => {
                        warn!("Entity {}: ignoring hold on non-integer frame {other:?}", host.id);
                        return Ok(());
                    }
                };
                if let Err(e) = self.hold_frame(target) {
                    warn!("Entity {}: {e}", host.id);
                }
            }
            FLIP_GRAPHIC => match flip_axis(message) {
                Some(axis) => self.flip(axis),
                None => warn!("Entity {}: ignoring flip with axis {:?}", host.id, message.detail(0)),
            },
            _ => {}
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

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(frames: u32) -> Surface {
        Surface::filled(frames * 4, 4, [255, 255, 255, 255])
    }

    fn anim(durations: &[u32]) -> Animation {
        Animation::new(strip(durations.len() as u32), 0, 0, durations.to_vec()).unwrap()
    }

    fn tick(a: &mut Animation, n: u32) {
        for _ in 0..n {
            a.advance();
        }
    }

    #[test]
    fn each_frame_lasts_its_duration() {
        let mut a = anim(&[2, 3, 1]);
        tick(&mut a, 1);
        assert_eq!((a.frame_index(), a.frame_counter()), (0, 1));
        tick(&mut a, 1);
        assert_eq!((a.frame_index(), a.frame_counter()), (1, 0));
        tick(&mut a, 3);
        assert_eq!(a.frame_index(), 2);
        tick(&mut a, 1);
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn backward_playback_wraps_below_zero() {
        let mut a = anim(&[1, 1, 1]).backwards();
        tick(&mut a, 1);
        assert_eq!(a.frame_index(), 2);
        tick(&mut a, 1);
        assert_eq!(a.frame_index(), 1);
    }

    #[test]
    fn direction_change_keeps_index_and_counter() {
        let mut a = anim(&[3, 3]);
        tick(&mut a, 2);
        a.toggle_backwards_playback();
        assert_eq!((a.frame_index(), a.frame_counter()), (0, 2));
        assert_eq!(a.state(), AnimationState::PlayingBackward);
        tick(&mut a, 1);
        assert_eq!(a.frame_index(), 1);
        a.enable_backwards_playback(false);
        assert_eq!(a.state(), AnimationState::PlayingForward);
    }

    #[test]
    fn pause_resets_counter_and_freezes() {
        let mut a = anim(&[3, 3]);
        tick(&mut a, 2);
        a.pause();
        assert_eq!(a.frame_counter(), 0);
        tick(&mut a, 10);
        assert_eq!((a.frame_index(), a.frame_counter()), (0, 0));
        a.unpause();
        tick(&mut a, 3);
        assert_eq!(a.frame_index(), 1);
    }

    #[test]
    fn hold_last_backward_means_frame_zero() {
        let mut a = anim(&[1, 1, 1]).backwards().holding(HoldTarget::Last).unwrap();
        a.set_frame(1).unwrap();
        tick(&mut a, 1);
        assert_eq!(a.frame_index(), 0);
        assert!(a.is_paused());
        assert_eq!(a.held_frame(), None);
    }

    #[test]
    fn hold_is_not_checked_without_a_transition() {
        let mut a = anim(&[2, 2]).holding(HoldTarget::Frame(0)).unwrap();
        tick(&mut a, 1);
        assert!(!a.is_paused());
        tick(&mut a, 3);
        assert_eq!(a.frame_index(), 0);
        assert!(a.is_paused());
    }

    #[test]
    fn out_of_range_requests_are_rejected() {
        let mut a = anim(&[1, 1]);
        assert_eq!(
            a.hold_frame(HoldTarget::Frame(2)),
            Err(AnimationError::FrameOutOfRange { index: 2, frames: 2 })
        );
        assert_eq!(a.held_frame(), None);
        assert!(a.set_frame(5).is_err());
        a.hold_frame(HoldTarget::Frame(1)).unwrap();
        a.release_hold();
        assert_eq!(a.held_frame(), None);
    }

    #[test]
    fn construction_validates_durations() {
        assert_eq!(
            Animation::new(strip(2), 0, 0, Vec::new()).unwrap_err(),
            AnimationError::EmptyDurations
        );
        assert_eq!(
            Animation::new(strip(2), 0, 0, vec![1, 0]).unwrap_err(),
            AnimationError::ZeroDuration { frame: 1 }
        );
        assert_eq!(
            Animation::new(Surface::new(10, 4), 0, 0, vec![1, 1, 1]).unwrap_err(),
            AnimationError::UnevenStrip {
                width: 10,
                frames: 3
            }
        );
        assert_eq!(
            Animation::new(Surface::new(2, 4), 0, 0, vec![1, 1, 1]).unwrap_err(),
            AnimationError::StripTooNarrow { width: 2, frames: 3 }
        );
    }

    #[test]
    fn explicit_frame_width_must_match_duration_count() {
        assert_eq!(
            Animation::with_frame_width(strip(3), 0, 0, 4, vec![1, 1]).unwrap_err(),
            AnimationError::FrameCountMismatch {
                expected: 3,
                found: 2
            }
        );
        assert!(matches!(
            Animation::with_frame_width(strip(3), 0, 0, 5, vec![1, 1, 1]),
            Err(AnimationError::UnevenStrip { .. })
        ));
        let a = Animation::with_frame_width(strip(3), 0, 0, 4, vec![1, 1, 1]).unwrap();
        assert_eq!(a.frame_width(), 4);
    }

    #[test]
    fn rect_is_one_frame_wide() {
        let mut a = anim(&[1, 1, 1]);
        assert_eq!(a.local_rect(), Rect::new(0, 0, 4, 4));
        a.advance();
        assert_eq!(a.frame_rect(), Rect::new(4, 0, 4, 4));
    }

    #[test]
    fn resize_and_magnify_scale_every_frame() {
        let mut a = anim(&[1, 1, 1]);
        a.magnify(2.0);
        assert_eq!((a.frame_width(), a.height()), (8, 8));
        assert_eq!(a.strip().width(), 24);
        a.resize(3, 5);
        assert_eq!((a.frame_width(), a.height()), (3, 5));
        assert_eq!(a.strip().width(), 9);
    }

    #[test]
    fn opacify_applies_to_strip() {
        let mut a = anim(&[1]);
        a.opacify(-55);
        assert_eq!(a.opacity(), 200);
        assert_eq!(a.strip().alpha(), 200);
    }

    #[test]
    fn messages_drive_playback() {
        let mut a = anim(&[1, 1, 1]);
        let host = Host {
            id: EntityId::next(),
            position: Position::ORIGIN,
        };
        a.receive_message(&host, &Message::signal(PAUSE_ANIMATION)).unwrap();
        assert!(a.is_paused());
        a.receive_message(&host, &Message::signal(RESUME_ANIMATION)).unwrap();
        assert!(!a.is_paused());
        a.receive_message(&host, &Message::new(HOLD_FRAME, [2])).unwrap();
        assert_eq!(a.held_frame(), Some(HoldTarget::Frame(2)));
        a.receive_message(&host, &Message::signal(HOLD_FRAME)).unwrap();
        assert_eq!(a.held_frame(), Some(HoldTarget::Last));
        a.receive_message(&host, &Message::new(HOLD_FRAME, [7])).unwrap();
        assert_eq!(a.held_frame(), Some(HoldTarget::Last));
        a.receive_message(&host, &Message::signal(REVERSE_ANIMATION)).unwrap();
        assert!(a.is_playing_backwards());
        let unrelated = Message::signal(MessageKind::new("jump"));
        assert_eq!(a.receive_message(&host, &unrelated), Ok(()));
    }

    #[test]
    fn hold_message_with_non_integer_detail_is_ignored() {
        let mut a = anim(&[1, 1, 1]);
        let host = Host {
            id: EntityId::next(),
            position: Position::ORIGIN,
        };
        a.receive_message(&host, &Message::new(HOLD_FRAME, [Detail::Float(1.0)]))
            .unwrap();
        assert_eq!(a.held_frame(), None);
        a.receive_message(&host, &Message::new(HOLD_FRAME, ["last"])).unwrap();
        assert_eq!(a.held_frame(), None);
        a.receive_message(&host, &Message::new(HOLD_FRAME, [-1])).unwrap();
        assert_eq!(a.held_frame(), None);
        tick(&mut a, 6);
        assert!(!a.is_paused());
    }

    #[test]
    fn flip_message_with_bad_axis_leaves_strip_alone() {
        let mut a = anim(&[1, 1]);
        let before = a.strip().clone();
        let host = Host {
            id: EntityId::next(),
            position: Position::ORIGIN,
        };
        a.receive_message(&host, &Message::new(FLIP_GRAPHIC, [9])).unwrap();
        a.receive_message(&host, &Message::new(FLIP_GRAPHIC, [Detail::Float(1.0)]))
            .unwrap();
        assert_eq!(a.strip(), &before);
    }

    #[test]
    fn resize_saturates_huge_strip_widths() {
        let mut a = anim(&[1, 1, 1]);
        a.resize(u32::MAX, 0);
        assert_eq!(a.frame_width(), u32::MAX);
        assert_eq!(a.strip().height(), 0);
    }

    #[test]
    fn hold_target_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&HoldTarget::Last).unwrap(), r#""last""#);
        assert_eq!(
            serde_json::from_str::<HoldTarget>(r#"{"frame":3}"#).unwrap(),
            HoldTarget::Frame(3)
        );
    }
}
