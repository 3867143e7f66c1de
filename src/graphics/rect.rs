use serde::{Deserialize, Serialize};

/// Integer pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis selector for flips and centering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
    Both,
}

impl Axis {
    pub fn includes_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal | Axis::Both)
    }

    pub fn includes_vertical(self) -> bool {
        matches!(self, Axis::Vertical | Axis::Both)
    }

    /// Decode the integer form used in message payloads (1 = horizontal,
    /// 2 = vertical, 3 = both).
    pub fn from_bits(bits: i64) -> Option<Self> {
        match bits {
            1 => Some(Axis::Horizontal),
            2 => Some(Axis::Vertical),
            3 => Some(Axis::Both),
            _ => None,
        }
    }

    pub fn bits(self) -> i64 {
        match self {
            Axis::Horizontal => 1,
            Axis::Vertical => 2,
            Axis::Both => 3,
        }
    }
}

/// Axis-aligned pixel rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy of this rect translated by `(dx, dy)`.
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// True when `other` lies completely inside this rect.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rects share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Overlapping region, or `None` when the rects are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            left,
            top,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

/// Round a float coordinate to the nearest whole pixel.
pub(crate) fn round_px(value: f32) -> i32 {
    value.round() as i32
}
