//! Mirroring multi-frame strips keeps frames in playback order.

use componentry::component::Role;
use componentry::components::animation::Animation;
use componentry::components::graphic::{FLIP_GRAPHIC, Visual};
use componentry::entity::Entity;
use componentry::graphics::{Axis, Position, Surface, restore_frame_order};

const FRAMES: u32 = 3;

fn left(frame: u32) -> [u8; 4] {
    [10 + frame as u8, 0, 0, 255]
}

fn right(frame: u32) -> [u8; 4] {
    [0, 10 + frame as u8, 0, 255]
}

/// Each frame is two pixels wide: `left(i)` then `right(i)`.
fn two_tone_strip() -> Surface {
    let mut strip = Surface::new(FRAMES * 2, 1);
    for frame in 0..FRAMES {
        strip.put_pixel(frame * 2, 0, left(frame));
        strip.put_pixel(frame * 2 + 1, 0, right(frame));
    }
    strip
}

#[test]
fn a_plain_mirror_reverses_frame_order() {
    let mirrored = two_tone_strip().flipped(Axis::Horizontal);
    assert_eq!(mirrored.pixel(0, 0), Some(right(FRAMES - 1)));

    let restored = restore_frame_order(mirrored, 2);
    for frame in 0..FRAMES {
        assert_eq!(restored.pixel(frame * 2, 0), Some(right(frame)));
        assert_eq!(restored.pixel(frame * 2 + 1, 0), Some(left(frame)));
    }
}

#[test]
fn flipping_an_animation_mirrors_each_frame_in_place() {
    let anim = Animation::new(two_tone_strip(), 0, 0, vec![1; FRAMES as usize]).unwrap();
    let mut entity = Entity::new(0, 0);
    entity.add_component(Box::new(anim)).unwrap();

    entity
        .send_message(FLIP_GRAPHIC, [Axis::Horizontal.bits()])
        .unwrap();

    let strip = entity.get::<Animation>(Role::Graphic).unwrap().strip();
    for frame in 0..FRAMES {
        assert_eq!(strip.pixel(frame * 2, 0), Some(right(frame)));
        assert_eq!(strip.pixel(frame * 2 + 1, 0), Some(left(frame)));
    }

    entity.update(1.0);
    let mut canvas = Surface::new(2, 1);
    entity.draw(&mut canvas).unwrap();
    assert_eq!(canvas.pixel(0, 0), Some(right(1)));
    assert_eq!(canvas.pixel(1, 0), Some(left(1)));
}

#[test]
fn flipping_twice_restores_the_strip() {
    let mut anim = Animation::new(two_tone_strip(), 0, 0, vec![2; FRAMES as usize]).unwrap();
    anim.flip(Axis::Horizontal);
    anim.flip(Axis::Horizontal);
    assert_eq!(anim.strip(), &two_tone_strip());
}

#[test]
fn translucent_animations_keep_their_opacity_through_a_flip() {
    let mut anim = Animation::new(two_tone_strip(), 0, 0, vec![1; FRAMES as usize]).unwrap();
    anim.opacify(-155);
    anim.flip(Axis::Both);
    assert_eq!(anim.opacity(), 100);
    assert_eq!(anim.frame_count(), FRAMES as usize);
    // Vertical flip of a one-pixel-high strip leaves rows unchanged.
    assert_eq!(anim.strip().pixel(0, 0), Some(right(0)));
    let drawn = anim.draw(&mut Surface::new(4, 4), Position::new(1, 1));
    assert_eq!((drawn.x, drawn.y, drawn.width), (1, 1, 2));
}

#[test]
fn keyed_animations_round_trip_through_two_flips() {
    let keyed = two_tone_strip().with_color_key([10, 0, 0]);
    let mut anim = Animation::new(keyed.clone(), 0, 0, vec![1; FRAMES as usize]).unwrap();
    anim.flip(Axis::Horizontal);
    anim.flip(Axis::Horizontal);
    assert_eq!(anim.strip(), &keyed);
    assert_eq!(anim.strip().pixel(0, 0), Some([10, 0, 0, 0]));
}
