//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors raised by set, family, relation and enumeration operations.
///
/// Invariant violations and invalid arguments are reported before any
/// work is done. Cancellation is not an error: see [`Outcome`][crate::cancel::Outcome]
/// and [`Completion`][crate::enumerate::Completion].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A bit mask carries bits beyond the universe of the element type.
    #[error("bit mask {bits:#x} has members outside a universe of {count} elements")]
    StrayBits {
        /// Offending mask
        bits: u64,
        /// Size of the element universe
        count: usize,
    },
    /// An element index does not name any atom.
    #[error("element index {index} is out of range for a universe of {count} elements")]
    ElementOutOfRange {
        /// Requested index
        index: usize,
        /// Size of the element universe
        count: usize,
    },
    /// A family member is not a subset of the declared universe.
    #[error("member {member} of the family is not a subset of the universe {universe}")]
    MemberOutsideUniverse {
        /// Rendered offending member
        member: String,
        /// Rendered universe
        universe: String,
    },
    /// A declared domain, codomain or universe does not cover the pairs of a relation.
    #[error("{side} does not cover the element {element} of the relation")]
    InvariantViolation {
        /// Which side was violated ("domain", "codomain" or "universe")
        side: &'static str,
        /// Rendered uncovered element
        element: String,
    },
    /// An element is not a member of the declared universe of a relation.
    #[error("element {element} is not a member of the universe")]
    NotInUniverse {
        /// Rendered element
        element: String,
    },
    /// The requested universe size exceeds the safety ceiling of the enumerator.
    #[error("cardinality {cardinality} exceeds the enumeration ceiling {max}")]
    CardinalityTooLarge {
        /// Requested cardinality
        cardinality: usize,
        /// Effective ceiling
        max: usize,
    },
    /// A property name could not be resolved.
    #[error("unknown property name \"{0}\"")]
    UnknownProperty(String),
    /// The worker pool could not be built.
    #[error("failed to build the worker pool: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(error.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
