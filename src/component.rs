//! Components placed on the board.
//!
//! A component is a closed set of kinds sharing one shape: a name, a footprint
//! in millimeters, an image handle, the contacts it owns and a top-left position.
//! [`ComponentKind::Wire`] is special: its two contacts have no position and only
//! exist to be linked to other components' contacts.

use crate::connector::{Contact, ContactId, Gender};
use crate::constants::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for components.
pub type ComponentId = Uuid;

/// Host-resolved reference to a component's artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub String);

/// What a component is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Two-pin part passing its input straight through
    Passthrough,
    /// Edge between two other components' contacts
    Wire,
    /// Application-defined part
    Custom {
        /// Display name
        name: String,
        /// Footprint in millimeters
        size: (f32, f32),
        /// Artwork
        image: Option<ImageHandle>,
    },
}

impl ComponentKind {
    /// Display name of the kind.
    pub fn name(&self) -> &str {
        match self {
            ComponentKind::Passthrough => "Passthrough",
            ComponentKind::Wire => "Wire",
            ComponentKind::Custom { name, .. } => name,
        }
    }

    /// Footprint in millimeters. Wires have none.
    pub fn size(&self) -> (f32, f32) {
        match self {
            ComponentKind::Passthrough => (PASSTHROUGH_WIDTH, PASSTHROUGH_HEIGHT),
            ComponentKind::Wire => (0.0, 0.0),
            ComponentKind::Custom { size, .. } => *size,
        }
    }
}

/// A placed object owning its contacts.
#[derive(Debug)]
pub struct Component {
    /// Unique identifier
    pub id: ComponentId,
    /// Free-form tag set by the application
    pub tag: String,
    /// Left-top corner in millimeters
    pub position: (f32, f32),
    kind: ComponentKind,
    image: Option<ImageHandle>,
    contacts: Vec<Contact>,
}

impl Component {
    /// Creates a component of `kind` with the given contacts at the origin.
    pub fn new(kind: ComponentKind, tag: impl Into<String>, contacts: Vec<Contact>) -> Self {
        let image = match &kind {
            ComponentKind::Custom { image, .. } => image.clone(),
            ComponentKind::Passthrough => Some(ImageHandle("passthrough".into())),
            ComponentKind::Wire => None,
        };
        Self {
            id: Uuid::new_v4(),
            tag: tag.into(),
            position: (0.0, 0.0),
            kind,
            image,
            contacts,
        }
    }

    /// An 8 by 2 mm passthrough with female "In" and "Out" pins.
    pub fn passthrough(tag: impl Into<String>) -> Self {
        Self::new(
            ComponentKind::Passthrough,
            tag,
            vec![
                Contact::new(1, "In", Gender::Female, (0.5, 0.5)),
                Contact::new(2, "Out", Gender::Female, (7.5, 0.5)),
            ],
        )
    }

    /// A wire with the default endpoint nicknames.
    pub fn wire(tag: impl Into<String>) -> Self {
        Self::wire_with_nicknames(tag, WIRE_START_NICKNAME, WIRE_END_NICKNAME)
    }

    /// A wire whose two unplaced, unspecified-gender ends carry the given nicknames.
    pub fn wire_with_nicknames(
        tag: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self::new(
            ComponentKind::Wire,
            tag,
            vec![
                Contact::unplaced(0, start, Gender::Unspecified),
                Contact::unplaced(1, end, Gender::Unspecified),
            ],
        )
    }

    /// Moves the component to `position`, returning it for chaining.
    pub fn at(mut self, position: (f32, f32)) -> Self {
        self.position = position;
        self
    }

    /// Kind of component.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Footprint in millimeters.
    pub fn size(&self) -> (f32, f32) {
        self.kind.size()
    }

    /// Artwork, if any.
    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// Whether this is a wire.
    pub fn is_wire(&self) -> bool {
        matches!(self.kind, ComponentKind::Wire)
    }

    /// Contacts in declaration order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub(crate) fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts
    }

    /// Looks up a contact by its component-local id.
    pub fn contact(&self, id: u32) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Looks up a contact by nickname.
    pub fn contact_named(&self, nickname: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.nickname == nickname)
    }

    pub(crate) fn index_of(&self, contact: ContactId) -> Option<usize> {
        self.contacts.iter().position(|c| c.uuid() == contact)
    }

    /// Footprint as `(left, top, right, bottom)` in millimeters.
    pub fn bounds_mm(&self) -> (f32, f32, f32, f32) {
        let (x, y) = self.position;
        let (w, h) = self.size();
        (x, y, x + w, y + h)
    }

    /// Board position of a contact, or `None` if it is unplaced.
    pub fn absolute_position(&self, contact: &Contact) -> Option<(f32, f32)> {
        contact.is_placed().then(|| {
            (
                self.position.0 + contact.position.0,
                self.position.1 + contact.position.1,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_shape() {
        let part = Component::passthrough("p1").at((10.0, 20.0));
        assert_eq!(part.name(), "Passthrough");
        assert_eq!(part.size(), (8.0, 2.0));
        assert_eq!(part.bounds_mm(), (10.0, 20.0, 18.0, 22.0));

        let input = part.contact_named("In").unwrap();
        let output = part.contact(2).unwrap();
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(output.nickname, "Out");
        assert_eq!(part.absolute_position(output), Some((17.5, 20.5)));

        let (left, top, right, bottom) = part.bounds_mm();
        for contact in part.contacts() {
            let (x, y) = part.absolute_position(contact).unwrap();
            assert!((left..=right).contains(&x) && (top..=bottom).contains(&y));
        }
    }

    #[test]
    fn test_wire_has_two_unplaced_ends() {
        let wire = Component::wire("w");
        assert!(wire.is_wire());
        assert_eq!(wire.contacts().len(), 2);
        assert_eq!(wire.contacts()[0].nickname, "wire_start");
        assert_eq!(wire.contacts()[1].nickname, "wire_end");
        assert!(wire
            .contacts()
            .iter()
            .all(|c| !c.is_placed() && c.gender == Gender::Unspecified));
        assert_eq!(wire.absolute_position(&wire.contacts()[0]), None);
        assert!(wire.image().is_none());
    }

    #[test]
    fn test_custom_kind() {
        let kind = ComponentKind::Custom {
            name: "And".into(),
            size: (6.0, 4.0),
            image: Some(ImageHandle("and_gate".into())),
        };
        let gate = Component::new(kind, "g", vec![Contact::new(0, "A", Gender::Male, (0.0, 1.0))]);
        assert_eq!(gate.name(), "And");
        assert_eq!(gate.size(), (6.0, 4.0));
        assert_eq!(gate.image(), Some(&ImageHandle("and_gate".into())));
        assert!(gate.index_of(gate.contacts()[0].uuid()).is_some());
    }

    #[test]
    fn test_contact_identities_are_unique() {
        let a = Component::passthrough("a");
        let b = Component::passthrough("b");
        assert_ne!(a.id, b.id);
        assert_ne!(a.contacts()[0].uuid(), b.contacts()[0].uuid());
    }
}
