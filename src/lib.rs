//! Componentry library.
//!
//! Entities assembled at runtime from pluggable components, ticked in binding
//! order and coordinated through synchronous broadcast messages. Ships a
//! frame-strip [`Animation`](components::animation::Animation) component and a
//! small CPU [`Surface`](graphics::Surface) to draw onto.

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod events;
pub mod graphics;
pub mod registry;
pub mod resources;
