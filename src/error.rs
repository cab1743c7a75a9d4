//! Error types for configuration and the connector graph.

use uuid::Uuid;

/// Reasons a `connect` request is refused.
///
/// A refused request never changes the link state of either contact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// One of the contacts is already linked to something.
    #[error("contact {0} is already connected")]
    AlreadyConnected(Uuid),
    /// Both contacts are male or both are female.
    #[error("contacts {0} and {1} have the same gender")]
    IncompatibleGender(Uuid, Uuid),
    /// Source and destination are the same contact.
    #[error("contact {0} cannot be connected to itself")]
    SelfConnection(Uuid),
    /// The address does not resolve to a contact on the board.
    #[error("no contact {0} on this circuit")]
    UnknownContact(Uuid),
    /// A contact with this identity is already on the circuit.
    #[error("contact {0} is already on this circuit")]
    DuplicateContact(Uuid),
}

/// Configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An interval set needs at least two spacings.
    #[error("intervals must have at least two items, got {0}")]
    TooFewIntervals(usize),
    /// Spacings are millimeter distances and must be finite and positive.
    #[error("interval {0} is not a positive finite spacing")]
    NonPositiveInterval(f32),
    /// Spacings must be strictly increasing or strictly decreasing.
    #[error("intervals must be strictly monotonic")]
    NotMonotonic,
    /// Raw strategy code outside of the known set.
    #[error("unknown interval strategy {0}")]
    UnknownStrategy(i32),
    /// Raw priority code outside of the known set.
    #[error("unknown interval priority {0}")]
    UnknownPriority(i32),
    /// Zoom bounds as `(min, max)`.
    #[error("multiplier range [{0}, {1}] is empty or not positive")]
    InvalidMultiplierRange(f32, f32),
    /// Showing window as `(min, max)` in millimeters.
    #[error("showing interval range [{0}, {1}] is empty or not positive")]
    InvalidShowingRange(f32, f32),
    /// The serialized configuration could not be read.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}
