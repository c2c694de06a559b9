//! Creation and destruction notifications.

use splinter_core::{Actor, FamilyId};

use crate::tracker::ActorTracker;

/// Read-only view of a family handed to listener callbacks.
///
/// Callbacks may query membership but cannot mutate the tracker: the
/// family is in the middle of a creation or destruction batch.
#[derive(Clone, Copy, Debug)]
pub struct FamilyView<'a> {
    id: FamilyId,
    tracker: &'a ActorTracker,
}

impl<'a> FamilyView<'a> {
    pub(crate) fn new(id: FamilyId, tracker: &'a ActorTracker) -> Self {
        Self { id, tracker }
    }

    /// The family's ID.
    pub fn id(&self) -> FamilyId {
        self.id
    }

    /// The family's live actors.
    pub fn tracker(&self) -> &'a ActorTracker {
        self.tracker
    }
}

/// Receives one notification per actor creation and per destruction.
///
/// Both callbacks run synchronously inside the family operation that
/// caused them. `on_actor_created` runs after the actor is registered;
/// `on_actor_destroyed` runs after it is unregistered but before the
/// factory releases it.
///
/// For each split event, the parent's destruction is reported before any
/// of that event's creations. Events in a batch are applied in order, so
/// the notifications of one split never interleave with the next.
pub trait FamilyListener: Send {
    /// A new actor is live.
    fn on_actor_created(&mut self, family: FamilyView<'_>, actor: &Actor);

    /// An actor is no longer live.
    fn on_actor_destroyed(&mut self, family: FamilyView<'_>, actor: &Actor);
}
