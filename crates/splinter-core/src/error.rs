//! Error types for the Splinter framework.
//!
//! Organized by failure class: configuration problems detected before a
//! family exists ([`ConfigError`]), lifecycle contract misuse and
//! construction failures ([`FamilyError`]), and tracker registration
//! conflicts ([`DuplicateActor`]). Malformed solver events are not errors
//! at this level; the family logs and skips them.

use std::error::Error;
use std::fmt;

use crate::actor::Actor;
use crate::id::ActorId;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating family configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Material health multiplier is NaN, infinite, zero, or negative.
    InvalidMaterialHealth {
        /// The invalid value.
        value: f32,
    },
    /// Asset bond health maximum is NaN, infinite, zero, or negative.
    InvalidBondHealthMax {
        /// The invalid value.
        value: f32,
    },
    /// Asset default bond or lower-support chunk health is negative or not finite.
    InvalidDefaultHealth {
        /// The invalid value.
        value: f32,
    },
    /// Support graph arrays are inconsistent with each other.
    InvalidSupportGraph {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaterialHealth { value } => {
                write!(f, "material health must be finite and positive, got {value}")
            }
            Self::InvalidBondHealthMax { value } => {
                write!(f, "bond health max must be finite and positive, got {value}")
            }
            Self::InvalidDefaultHealth { value } => {
                write!(
                    f,
                    "default health must be finite and non-negative, got {value}"
                )
            }
            Self::InvalidSupportGraph { reason } => write!(f, "invalid support graph: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── FamilyError ────────────────────────────────────────────────────

/// Errors from family construction and lifecycle operations.
///
/// Lifecycle variants are recoverable no-ops: the family state is left
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq)]
pub enum FamilyError {
    /// `spawn()` was called on a family that is already spawned.
    AlreadySpawned,
    /// `despawn()` was called on a family that is not spawned.
    NotSpawned,
    /// The fracture framework did not produce a solver family.
    SolverFamilyCreation,
    /// The family configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for FamilyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySpawned => write!(f, "family is already spawned"),
            Self::NotSpawned => write!(f, "family is not spawned"),
            Self::SolverFamilyCreation => {
                write!(f, "fracture framework failed to create a solver family")
            }
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for FamilyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for FamilyError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── DuplicateActor ─────────────────────────────────────────────────

/// An actor could not be registered because its ID is already tracked.
///
/// Carries the rejected actor back to the caller so its external
/// resources can still be released through the factory.
#[derive(Debug)]
pub struct DuplicateActor(pub Actor);

impl DuplicateActor {
    /// ID of the rejected actor.
    pub fn id(&self) -> ActorId {
        self.0.id()
    }

    /// Recover the rejected actor.
    pub fn into_inner(self) -> Actor {
        self.0
    }
}

impl fmt::Display for DuplicateActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor {} is already tracked", self.0.id())
    }
}

impl Error for DuplicateActor {}
