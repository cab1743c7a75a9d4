//! The board's component collection and the wiring graph it defines.
//!
//! Components are kept in insertion order. Every contact is registered by its
//! [`ContactId`], which is what links point at, so following a link is a map
//! lookup rather than a reference between components.

use crate::component::{Component, ComponentId};
use crate::connector::{self, Contact, ContactId};
use crate::error::ConnectError;
use std::collections::{HashMap, HashSet};

/// Where a contact lives on the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactAddress {
    /// Owning component
    pub component: ComponentId,
    /// The contact itself
    pub contact: ContactId,
}

/// Ordered components plus the contact registry.
#[derive(Debug, Default)]
pub struct Circuit {
    components: Vec<Component>,
    owners: HashMap<ContactId, ComponentId>,
}

fn two_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

impl Circuit {
    /// Creates an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the circuit has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Looks up a component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Mutable access to a component's placement and tag.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Adds a component and registers its contacts.
    ///
    /// Components must arrive unlinked: links are only ever made between contacts
    /// already on the circuit.
    pub fn add_component(&mut self, component: Component) -> Result<ComponentId, ConnectError> {
        let mut incoming = HashSet::new();
        for contact in component.contacts() {
            if self.owners.contains_key(&contact.uuid()) || !incoming.insert(contact.uuid()) {
                return Err(ConnectError::DuplicateContact(contact.uuid()));
            }
            if contact.is_linked() {
                return Err(ConnectError::AlreadyConnected(contact.uuid()));
            }
        }

        let id = component.id;
        for contact in component.contacts() {
            self.owners.insert(contact.uuid(), id);
        }
        log::debug!("added {} {}", component.name(), id);
        self.components.push(component);
        Ok(id)
    }

    /// Removes a component after disconnecting every one of its contacts, so no
    /// peer is left linked to it.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        let index = self.components.iter().position(|c| c.id == id)?;
        let contacts: Vec<ContactId> = self.components[index]
            .contacts()
            .iter()
            .map(Contact::uuid)
            .collect();
        for contact in &contacts {
            self.disconnect(*contact);
            self.owners.remove(contact);
        }
        Some(self.components.remove(index))
    }

    /// Finds a contact anywhere on the circuit.
    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        let owner = self.owners.get(&id)?;
        self.component(*owner)?
            .contacts()
            .iter()
            .find(|c| c.uuid() == id)
    }

    /// The component owning `contact`.
    pub fn owner_of(&self, contact: ContactId) -> Option<ComponentId> {
        self.owners.get(&contact).copied()
    }

    /// The contact linked to `contact`.
    pub fn peer(&self, contact: ContactId) -> Option<&Contact> {
        self.contact(self.contact(contact)?.link()?)
    }

    /// Board position of a contact in millimeters, `None` if unknown or unplaced.
    pub fn absolute_position(&self, contact: ContactId) -> Option<(f32, f32)> {
        let owner = self.component(self.owner_of(contact)?)?;
        owner.absolute_position(self.contact(contact)?)
    }

    fn locate(&self, contact: ContactId) -> Result<(usize, usize), ConnectError> {
        let owner = self
            .owners
            .get(&contact)
            .ok_or(ConnectError::UnknownContact(contact))?;
        let component = self
            .components
            .iter()
            .position(|c| c.id == *owner)
            .ok_or(ConnectError::UnknownContact(contact))?;
        let index = self.components[component]
            .index_of(contact)
            .ok_or(ConnectError::UnknownContact(contact))?;
        Ok((component, index))
    }

    fn pair_mut(
        &mut self,
        a: ContactId,
        b: ContactId,
    ) -> Result<(&mut Contact, &mut Contact), ConnectError> {
        let (component_a, index_a) = self.locate(a)?;
        let (component_b, index_b) = self.locate(b)?;
        if component_a == component_b {
            if index_a == index_b {
                return Err(ConnectError::SelfConnection(a));
            }
            let contacts = self.components[component_a].contacts_mut();
            return Ok(two_mut(contacts, index_a, index_b));
        }
        let (first, second) = two_mut(&mut self.components, component_a, component_b);
        Ok((
            &mut first.contacts_mut()[index_a],
            &mut second.contacts_mut()[index_b],
        ))
    }

    /// Links two contacts on the circuit. See [`connector::connect`] for the rules.
    pub fn connect(&mut self, a: ContactId, b: ContactId) -> Result<(), ConnectError> {
        let (first, second) = self.pair_mut(a, b)?;
        connector::connect(first, second)
    }

    /// Clears the link of `contact` on both sides. Returns `false` if it was not linked.
    pub fn disconnect(&mut self, contact: ContactId) -> bool {
        let Some(peer) = self.contact(contact).and_then(Contact::link) else {
            return false;
        };
        match self.pair_mut(contact, peer) {
            Ok((first, second)) => connector::disconnect(first, second),
            Err(err) => {
                log::warn!("cannot disconnect {}: {}", contact, err);
                false
            }
        }
    }

    /// Every link exactly once, in component order.
    pub fn links(&self) -> Vec<(ContactAddress, ContactAddress)> {
        let mut links = Vec::new();
        for component in &self.components {
            for contact in component.contacts() {
                let Some(peer) = contact.link() else {
                    continue;
                };
                if contact.uuid() > peer {
                    continue;
                }
                if let Some(peer_owner) = self.owner_of(peer) {
                    links.push((
                        ContactAddress {
                            component: component.id,
                            contact: contact.uuid(),
                        },
                        ContactAddress {
                            component: peer_owner,
                            contact: peer,
                        },
                    ));
                }
            }
        }
        links
    }

    /// Area spanned by a wire's two peers as `(left, top, right, bottom)` in
    /// millimeters. `None` unless `wire` is a wire with both ends linked to placed
    /// contacts.
    pub fn wire_bounds(&self, wire: ComponentId) -> Option<(f32, f32, f32, f32)> {
        let wire = self.component(wire).filter(|c| c.is_wire())?;
        let [start, end] = wire.contacts() else {
            return None;
        };
        let (x1, y1) = self.absolute_position(start.link()?)?;
        let (x2, y2) = self.absolute_position(end.link()?)?;
        Some((x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)))
    }
}
