//! A [`FamilyListener`] that records what it was told.

use std::sync::{Arc, Mutex};

use splinter_core::{Actor, ActorId, FamilyId, SolverActorId};
use splinter_family::{FamilyListener, FamilyView};

use crate::lock;

/// One recorded callback.
///
/// `tracked` is whether the actor was in the family's tracker when the
/// callback ran; `live` is the tracker size at that moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Created {
        family: FamilyId,
        actor: ActorId,
        solver_actor: SolverActorId,
        tracked: bool,
        live: usize,
    },
    Destroyed {
        family: FamilyId,
        actor: ActorId,
        solver_actor: SolverActorId,
        tracked: bool,
        live: usize,
    },
}

impl Notification {
    pub fn actor(&self) -> ActorId {
        match *self {
            Self::Created { actor, .. } | Self::Destroyed { actor, .. } => actor,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Records every notification in order. Clones share the record.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.log).clone()
    }

    pub fn created(&self) -> Vec<ActorId> {
        lock(&self.log)
            .iter()
            .filter(|n| n.is_created())
            .map(Notification::actor)
            .collect()
    }

    pub fn destroyed(&self) -> Vec<ActorId> {
        lock(&self.log)
            .iter()
            .filter(|n| !n.is_created())
            .map(Notification::actor)
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.log).clear();
    }
}

impl FamilyListener for RecordingListener {
    fn on_actor_created(&mut self, family: FamilyView<'_>, actor: &Actor) {
        lock(&self.log).push(Notification::Created {
            family: family.id(),
            actor: actor.id(),
            solver_actor: actor.solver_actor(),
            tracked: family.tracker().contains(actor.id()),
            live: family.tracker().len(),
        });
    }

    fn on_actor_destroyed(&mut self, family: FamilyView<'_>, actor: &Actor) {
        lock(&self.log).push(Notification::Destroyed {
            family: family.id(),
            actor: actor.id(),
            solver_actor: actor.solver_actor(),
            tracked: family.tracker().contains(actor.id()),
            live: family.tracker().len(),
        });
    }
}
