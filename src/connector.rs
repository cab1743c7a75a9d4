//! Contacts (pins) and the symmetric link relation between them.
//!
//! A link is a non-owning reference stored as the peer's [`ContactId`]. It can only
//! be set through [`connect`] and cleared through [`disconnect`], which always
//! update both sides together. A rejected [`connect`] leaves both contacts as they
//! were.

use crate::error::ConnectError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique identity of a contact.
pub type ContactId = Uuid;

/// Gender of a contact. Two contacts of the same explicit gender cannot be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    /// Fits anything, including another unspecified contact
    #[default]
    Unspecified,
    /// Fits female or unspecified
    Male,
    /// Fits male or unspecified
    Female,
}

impl Gender {
    /// Whether a contact of this gender may be linked to one of `other`.
    pub fn is_compatible_with(self, other: Gender) -> bool {
        !matches!(
            (self, other),
            (Gender::Male, Gender::Male) | (Gender::Female, Gender::Female)
        )
    }
}

/// A named, gendered connection point owned by a component or a wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Identifier, unique within the owning component
    pub id: u32,
    /// Display name, e.g. "In"
    pub nickname: String,
    /// Compatibility class
    pub gender: Gender,
    /// Position in millimeters relative to the owner's top-left corner, NaN when unplaced
    pub position: (f32, f32),
    uuid: ContactId,
    link: Option<ContactId>,
}

impl Contact {
    /// Creates an unlinked contact with a fresh identity.
    pub fn new(id: u32, nickname: impl Into<String>, gender: Gender, position: (f32, f32)) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            gender,
            position,
            uuid: Uuid::new_v4(),
            link: None,
        }
    }

    /// Creates a contact without a position, as used by wire endpoints.
    pub fn unplaced(id: u32, nickname: impl Into<String>, gender: Gender) -> Self {
        Self::new(id, nickname, gender, (f32::NAN, f32::NAN))
    }

    /// Global identity.
    pub fn uuid(&self) -> ContactId {
        self.uuid
    }

    /// The contact this one is linked to.
    pub fn link(&self) -> Option<ContactId> {
        self.link
    }

    /// Whether the contact is linked.
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// Whether the contact has a position.
    pub fn is_placed(&self) -> bool {
        !(self.position.0.is_nan() || self.position.1.is_nan())
    }

    /// Checks whether `self` and `other` could be linked right now.
    pub fn can_connect(&self, other: &Contact) -> Result<(), ConnectError> {
        if self.uuid == other.uuid {
            return Err(ConnectError::SelfConnection(self.uuid));
        }
        if self.is_linked() {
            return Err(ConnectError::AlreadyConnected(self.uuid));
        }
        if other.is_linked() {
            return Err(ConnectError::AlreadyConnected(other.uuid));
        }
        if !self.gender.is_compatible_with(other.gender) {
            return Err(ConnectError::IncompatibleGender(self.uuid, other.uuid));
        }
        Ok(())
    }
}

/// Links `a` and `b` to each other.
///
/// # Errors
///
/// * `AlreadyConnected` if either contact is linked
/// * `IncompatibleGender` if both are male or both are female
/// * `SelfConnection` if both refer to the same identity
///
/// On error neither contact is modified.
pub fn connect(a: &mut Contact, b: &mut Contact) -> Result<(), ConnectError> {
    a.can_connect(b)?;
    a.link = Some(b.uuid);
    b.link = Some(a.uuid);
    Ok(())
}

/// Clears the link between `a` and `b`.
///
/// Does nothing unless the two are linked to each other, so a contact can never be
/// left pointing at a peer that no longer points back.
pub fn disconnect(a: &mut Contact, b: &mut Contact) -> bool {
    if a.link != Some(b.uuid) || b.link != Some(a.uuid) {
        return false;
    }
    a.link = None;
    b.link = None;
    true
}
