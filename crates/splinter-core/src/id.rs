//! Strongly-typed identifiers and small collection aliases.

use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`FamilyId`] allocation.
static FAMILY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`ActorId`] allocation.
static ACTOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a fracture family.
///
/// Allocated from a monotonic atomic counter via [`FamilyId::next`].
/// Two families never share an ID within one process, even if one was
/// dropped before the other was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyId(u64);

impl FamilyId {
    /// Allocate a fresh, unique family ID. Thread-safe.
    pub fn next() -> Self {
        Self(FAMILY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a live actor (one fragment of a family).
///
/// This is the typed back-reference stored as solver user-data: the
/// solver hands it back inside split events and the family resolves it
/// through its tracker. IDs are never reused, so a stale reference
/// resolves to nothing rather than to a different actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    /// Allocate a fresh, unique actor ID. Thread-safe.
    pub fn next() -> Self {
        Self(ACTOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an actor inside the fracture solver's node/chunk graph.
///
/// Opaque to this crate: only the solver knows what it indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolverActorId(pub u32);

impl fmt::Display for SolverActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SolverActorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Opaque handle to an externally-managed entity attached to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a solver group that simulates many families together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physics-engine material assigned to every body of a family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicsMaterialId(pub u32);

impl fmt::Display for PhysicsMaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a component type in an entity manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u32);

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Indices of the visible asset chunks an actor represents.
///
/// Most fragments cover a handful of chunks, so up to 8 stay inline.
pub type ChunkIndices = SmallVec<[u32; 8]>;

/// Component types to instantiate on a new actor's entity.
pub type ComponentManifest = SmallVec<[ComponentTypeId; 4]>;
