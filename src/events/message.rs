//! Messages broadcast between the components of one entity.
//!
//! A [`Message`] is a [`MessageKind`] tag plus an ordered list of [`Detail`]
//! values. The game defines its own kinds as constants; the number and type of
//! details should correspond to the kind. For example a physics component could
//! report a hit with
//!
//! ```
//! use componentry::events::message::{Detail, MessageKind};
//!
//! const ENEMY_COLLISION: MessageKind = MessageKind::new("enemy_collision");
//! // damage, knockback, hitstun
//! let details = [Detail::Int(12), Detail::Float(3.5), Detail::Int(20)];
//! # let _ = (ENEMY_COLLISION, details);
//! ```
//!
//! and every other component on the entity decides for itself whether the
//! message is relevant.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::graphics::rect::Position;

/// Classifies a message. Compared by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MessageKind(&'static str);

impl MessageKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Point(i32, i32),
}

impl Detail {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Detail::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Detail::Float(v) => Some(*v),
            Detail::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Detail::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Detail::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Position> {
        match self {
            Detail::Point(x, y) => Some(Position::new(*x, *y)),
            _ => None,
        }
    }
}

impl From<i64> for Detail {
    fn from(v: i64) -> Self {
        Detail::Int(v)
    }
}

impl From<i32> for Detail {
    fn from(v: i32) -> Self {
        Detail::Int(v as i64)
    }
}

impl From<usize> for Detail {
    fn from(v: usize) -> Self {
        Detail::Int(v as i64)
    }
}

impl From<f64> for Detail {
    fn from(v: f64) -> Self {
        Detail::Float(v)
    }
}

impl From<f32> for Detail {
    fn from(v: f32) -> Self {
        Detail::Float(v as f64)
    }
}

impl From<bool> for Detail {
    fn from(v: bool) -> Self {
        Detail::Bool(v)
    }
}

impl From<&str> for Detail {
    fn from(v: &str) -> Self {
        Detail::Text(v.to_owned())
    }
}

impl From<String> for Detail {
    fn from(v: String) -> Self {
        Detail::Text(v)
    }
}

impl From<Position> for Detail {
    fn from(p: Position) -> Self {
        Detail::Point(p.x, p.y)
    }
}

/// Message payload. Most messages carry a handful of values.
pub type Details = SmallVec<[Detail; 4]>;

/// A tagged payload delivered unchanged to every component of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub kind: MessageKind,
    pub details: Details,
}

impl Message {
    pub fn new<I, D>(kind: MessageKind, details: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Detail>,
    {
        Self {
            kind,
            details: details.into_iter().map(Into::into).collect(),
        }
    }

    /// Message without details.
    pub fn signal(kind: MessageKind) -> Self {
        Self {
            kind,
            details: Details::new(),
        }
    }

    pub fn is(&self, kind: MessageKind) -> bool {
        self.kind == kind
    }

    pub fn detail(&self, index: usize) -> Option<&Detail> {
        self.details.get(index)
    }

    pub fn int(&self, index: usize) -> Option<i64> {
        self.detail(index).and_then(Detail::as_int)
    }

    pub fn float(&self, index: usize) -> Option<f64> {
        self.detail(index).and_then(Detail::as_float)
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.detail(index).and_then(Detail::as_bool)
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.detail(index).and_then(Detail::as_text)
    }

    pub fn point(&self, index: usize) -> Option<Position> {
        self.detail(index).and_then(Detail::as_point)
    }
}
