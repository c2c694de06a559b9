//! Registry of a family's live actors.
//!
//! [`ActorTracker`] owns every live [`Actor`] of one family, keyed by
//! [`ActorId`]. An actor enters on creation and leaves when it is handed
//! back to the factory for destruction, so `contains(id)` is exactly
//! "the actor is alive".

use indexmap::IndexMap;
use splinter_core::{Actor, ActorId, DuplicateActor, SolverActorId};

/// Live-actor registry. Not internally synchronized.
///
/// Enumeration order is unspecified; callers must not depend on it.
#[derive(Debug, Default)]
pub struct ActorTracker {
    actors: IndexMap<ActorId, Actor>,
}

impl ActorTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            actors: IndexMap::new(),
        }
    }

    /// Register a live actor.
    ///
    /// Fails if an actor with the same ID is already tracked; the
    /// rejected actor is returned inside the error.
    pub fn add(&mut self, actor: Actor) -> Result<(), DuplicateActor> {
        let id = actor.id();
        if self.actors.contains_key(&id) {
            return Err(DuplicateActor(actor));
        }
        self.actors.insert(id, actor);
        Ok(())
    }

    /// Unregister an actor and hand it back. `None` if it is not tracked.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        // swap_remove is O(1); enumeration order is not part of the contract.
        self.actors.swap_remove(&id)
    }

    /// Whether `id` is currently tracked.
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Look up a tracked actor.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Find the tracked actor representing a solver actor.
    pub fn find_by_solver_actor(&self, solver_actor: SolverActorId) -> Option<&Actor> {
        self.actors
            .values()
            .find(|a| a.solver_actor() == solver_actor)
    }

    /// All tracked actors.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    /// Owned snapshot of every tracked ID.
    ///
    /// Use this to destroy actors while iterating: destruction mutates the
    /// tracker, so the live map itself must never be iterated at the same
    /// time.
    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    /// Number of tracked actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are tracked.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
