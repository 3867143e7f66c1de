//! Role-keyed component storage.
//!
//! [`RoleRegistry`] keeps an entity's components in binding order and maps
//! each [`Role`] to the single component bound under it. Registering a second
//! component with a role already present evicts the first one; the newcomer
//! goes to the end of the binding order.

use rustc_hash::FxHashMap;

use crate::component::{Component, Role};

#[derive(Default)]
pub struct RoleRegistry {
    slots: Vec<Box<dyn Component>>,
    index: FxHashMap<Role, usize>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under its declared role. Returns the component
    /// previously registered under that role, if any.
    pub fn insert(&mut self, component: Box<dyn Component>) -> Option<Box<dyn Component>> {
        let role = component.role();
        let evicted = self.remove(role);
        self.index.insert(role, self.slots.len());
        self.slots.push(component);
        evicted
    }

    pub fn remove(&mut self, role: Role) -> Option<Box<dyn Component>> {
        let slot = self.index.remove(&role)?;
        let removed = self.slots.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, role: Role) -> Option<&dyn Component> {
        let slot = *self.index.get(&role)?;
        Some(self.slots[slot].as_ref())
    }

    pub fn get_mut(&mut self, role: Role) -> Option<&mut dyn Component> {
        let slot = *self.index.get(&role)?;
        Some(self.slots[slot].as_mut())
    }

    pub fn contains(&self, role: Role) -> bool {
        self.index.contains_key(&role)
    }

    /// Components in binding order.
    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn Component>> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Component>> {
        self.slots.iter_mut()
    }

    /// Registered roles in binding order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.slots.iter().map(|c| c.role())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
