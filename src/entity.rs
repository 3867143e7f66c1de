//! Game objects.
//!
//! An [`Entity`] is a position plus the components bound to it. It owns its
//! components outright; each component only learns its owner's [`EntityId`]
//! at bind time and receives a [`Host`] snapshot (id and position) with every
//! tick and message.
//!
//! # Dispatch
//!
//! - [`Entity::update`] forwards one tick to every component in binding order.
//! - [`Entity::send_message`] broadcasts a [`Message`] to every component in
//!   binding order; each decides on its own whether the message matters.
//!
//! Components never hold references to their siblings, so all lateral
//! communication goes through messages.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error};

use crate::component::{Component, Role};
use crate::components::graphic::Visual;
use crate::error::ComponentError;
use crate::events::message::{Detail, Message, MessageKind};
use crate::graphics::rect::{Axis, Position, Rect, round_px};
use crate::graphics::surface::Surface;
use crate::registry::RoleRegistry;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a component knows about its entity during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    pub id: EntityId,
    pub position: Position,
}

pub struct Entity {
    id: EntityId,
    /// Horizontal position in the container's space.
    pub x: i32,
    /// Vertical position in the container's space.
    pub y: i32,
    components: RoleRegistry,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("roles", &self.components.roles().collect::<Vec<_>>())
            .finish()
    }
}

impl Entity {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            id: EntityId::next(),
            x,
            y,
            components: RoleRegistry::new(),
        }
    }

    /// Create an entity and bind `components` in order.
    pub fn with_components<I>(x: i32, y: i32, components: I) -> Result<Self, ComponentError>
    where
        I: IntoIterator<Item = Box<dyn Component>>,
    {
        let mut entity = Self::new(x, y);
        entity.add_components(components)?;
        Ok(entity)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn host(&self) -> Host {
        Host {
            id: self.id,
            position: self.position(),
        }
    }

    /// Move to an exact position. Axes passed as `None` keep their value;
    /// fractional coordinates are rounded to the nearest pixel.
    pub fn set_position(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.x = round_px(x);
        }
        if let Some(y) = y {
            self.y = round_px(y);
        }
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Bind `component` to this entity and register it under its role.
    ///
    /// A component already registered under the same role is unbound from the
    /// registry and handed back. If the component refuses the binding (it
    /// belongs to another entity) it is dropped and the error returned.
    pub fn add_component(
        &mut self,
        mut component: Box<dyn Component>,
    ) -> Result<Option<Box<dyn Component>>, ComponentError> {
        component.on_bind(self.id)?;
        let role = component.role();
        let replaced = self.components.insert(component);
        if replaced.is_some() {
            debug!("Entity {}: replaced {} component", self.id, role);
        } else {
            debug!("Entity {}: bound {} component", self.id, role);
        }
        Ok(replaced)
    }

    /// Bind several components in order. Replaced components are dropped.
    pub fn add_components<I>(&mut self, components: I) -> Result<(), ComponentError>
    where
        I: IntoIterator<Item = Box<dyn Component>>,
    {
        for component in components {
            self.add_component(component)?;
        }
        Ok(())
    }

    pub fn remove_component(&mut self, role: Role) -> Option<Box<dyn Component>> {
        self.components.remove(role)
    }

    pub fn component(&self, role: Role) -> Option<&dyn Component> {
        self.components.get(role)
    }

    pub fn component_mut(&mut self, role: Role) -> Option<&mut dyn Component> {
        self.components.get_mut(role)
    }

    /// Component under `role`, downcast to its concrete type.
    pub fn get<T: Component>(&self, role: Role) -> Option<&T> {
        self.components.get(role)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self, role: Role) -> Option<&mut T> {
        self.components.get_mut(role)?.as_any_mut().downcast_mut::<T>()
    }

    /// The component bound under [`Role::Graphic`], whatever its type.
    pub fn graphic(&self) -> Option<&dyn Visual> {
        self.components.get(Role::Graphic)?.as_visual()
    }

    pub fn graphic_mut(&mut self) -> Option<&mut dyn Visual> {
        self.components.get_mut(Role::Graphic)?.as_visual_mut()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.components.contains(role)
    }

    /// Bound roles in binding order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.components.roles()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Advance every component by one tick.
    pub fn update(&mut self, dt: f32) {
        let host = self.host();
        for component in self.components.iter_mut() {
            component.update(&host, dt);
        }
    }

    /// Broadcast a message built from `kind` and `details`.
    pub fn send_message<I, D>(&mut self, kind: MessageKind, details: I) -> Result<(), ComponentError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Detail>,
    {
        let message = Message::new(kind, details);
        self.broadcast(&message)
    }

    /// Deliver `message` to every component in binding order.
    ///
    /// Delivery always reaches every component. A component that requires
    /// message handling but lacks a handler is reported through the returned
    /// error (the first one encountered) after the fan-out completes.
    pub fn broadcast(&mut self, message: &Message) -> Result<(), ComponentError> {
        let host = self.host();
        let mut first_error = None;
        for component in self.components.iter_mut() {
            if let Err(e) = component.receive_message(&host, message) {
                error!("Entity {}: {} while handling '{}'", self.id, e, message.kind);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Draw the graphic component, if any, at this entity's position.
    /// Returns the region of `destination` that was drawn onto.
    pub fn draw(&self, destination: &mut Surface) -> Option<Rect> {
        let origin = self.position();
        self.graphic().map(|g| g.draw(destination, origin))
    }

    /// Move this entity so its graphic is centered inside `container` on the
    /// requested axes. Returns `false` when the entity has no graphic.
    pub fn center_graphic(&mut self, axis: Axis, container: &Rect) -> bool {
        let origin = self.position();
        let Some(centered) = self.graphic().map(|g| g.centered_origin(axis, container, origin))
        else {
            return false;
        };
        self.x = centered.x;
        self.y = centered.y;
        true
    }
}
