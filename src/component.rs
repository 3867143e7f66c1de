//! The contract every component implements.
//!
//! A component handles one facet of an [`Entity`](crate::entity::Entity):
//! how it is drawn, how it moves, how it behaves. Components never reference
//! their siblings. They react to per-tick [`Component::update`] calls and to
//! messages broadcast with [`Entity::send_message`](crate::entity::Entity::send_message).
//!
//! Each component declares the [`Role`] it is registered under. The role is a
//! plain tag chosen by the component author, so two unrelated types can share
//! one role: [`Animation`](crate::components::animation::Animation) registers
//! as [`Role::Graphic`] just like [`Graphic`](crate::components::graphic::Graphic)
//! and calling code reaches either one through
//! [`Entity::graphic`](crate::entity::Entity::graphic).

use std::any::Any;
use std::fmt;

use log::warn;

use crate::components::graphic::Visual;
use crate::entity::{EntityId, Host};
use crate::error::ComponentError;
use crate::events::message::Message;

/// Key under which a component is registered on its entity. At most one
/// component per role per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Graphic,
    Physics,
    Input,
    Sound,
    Behaviour,
    /// Game-defined role.
    Custom(&'static str),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Graphic => f.write_str("graphic"),
            Role::Physics => f.write_str("physics"),
            Role::Input => f.write_str("input"),
            Role::Sound => f.write_str("sound"),
            Role::Behaviour => f.write_str("behaviour"),
            Role::Custom(name) => f.write_str(name),
        }
    }
}

/// Whether a component must handle messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageInterest {
    /// Unrecognized messages are silently ignored.
    #[default]
    Ignore,
    /// The component must override [`Component::receive_message`].
    Required,
}

/// Set-once back-reference to the owning entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binding {
    owner: Option<EntityId>,
}

impl Binding {
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    /// Record `entity` as the owner. Binding again to the same entity is a
    /// no-op; binding to a different one is rejected.
    pub fn bind(&mut self, entity: EntityId) -> Result<(), ComponentError> {
        match self.owner {
            None => {
                self.owner = Some(entity);
                Ok(())
            }
            Some(current) if current == entity => Ok(()),
            Some(current) => {
                warn!("Refusing to rebind component from entity {current} to {entity}");
                Err(ComponentError::AlreadyBound {
                    current,
                    requested: entity,
                })
            }
        }
    }
}

/// Part of an entity.
///
/// Only [`role`](Component::role) and the two `as_any` accessors are
/// mandatory. Everything else has a default that does nothing.
pub trait Component: Any {
    /// Role this component is registered under.
    fn role(&self) -> Role;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Called once when the component is bound to `entity`.
    fn on_bind(&mut self, entity: EntityId) -> Result<(), ComponentError> {
        let _ = entity;
        Ok(())
    }

    /// Per-tick work. `dt` is the elapsed time in seconds since the last
    /// update; components that count ticks ignore it.
    fn update(&mut self, host: &Host, dt: f32) {
        let _ = (host, dt);
    }

    fn message_interest(&self) -> MessageInterest {
        MessageInterest::Ignore
    }

    /// React to a message broadcast on the owning entity.
    ///
    /// The default ignores the message, unless the component declared
    /// [`MessageInterest::Required`], in which case the missing handler is
    /// reported as [`ComponentError::MessageHandlerMissing`].
    fn receive_message(&mut self, host: &Host, message: &Message) -> Result<(), ComponentError> {
        let _ = (host, message);
        match self.message_interest() {
            MessageInterest::Ignore => Ok(()),
            MessageInterest::Required => Err(ComponentError::MessageHandlerMissing {
                role: self.role(),
            }),
        }
    }

    /// Graphic-role view of this component, if it can be drawn.
    fn as_visual(&self) -> Option<&dyn Visual> {
        None
    }

    fn as_visual_mut(&mut self) -> Option<&mut dyn Visual> {
        None
    }
}
