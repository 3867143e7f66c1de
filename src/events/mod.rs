//! Messages exchanged between sibling components.
//!
//! Submodules:
//! - [`message`] – message kinds and their ordered payload values
pub mod message;
