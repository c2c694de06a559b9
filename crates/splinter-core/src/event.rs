//! Values exchanged with the fracture solver: the event stream it pushes
//! into a family, and the descriptor a family passes when asking for a
//! new solver family.

use crate::id::{ActorId, GroupId, SolverActorId};

/// One event delivered by the solver's event stream.
///
/// Only [`Split`](SolverEvent::Split) drives family state. The other
/// kinds exist in the solver's stream and are counted but ignored; new
/// kinds may appear, so matching code must keep a wildcard arm.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum SolverEvent {
    /// An actor's bonds broke and it was replaced by child actors.
    ///
    /// `None` models a split event whose payload the solver failed to
    /// attach; the family rejects it with a diagnostic.
    Split(Option<SplitEvent>),
    /// Damage commands were applied to the family.
    FractureCommand,
    /// Bond and chunk damage results were produced.
    FractureEvent,
    /// A joint between actors changed.
    JointUpdate,
}

impl SolverEvent {
    /// Short name of the event kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Split(_) => "split",
            Self::FractureCommand => "fracture_command",
            Self::FractureEvent => "fracture_event",
            Self::JointUpdate => "joint_update",
        }
    }
}

/// The actor that was split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitParent {
    /// The parent's solver handle. No longer valid in the solver after the split.
    pub solver_actor: SolverActorId,
    /// Back-reference to the family actor that owned the solver actor.
    pub user_data: Option<ActorId>,
}

/// Payload of a [`SolverEvent::Split`].
#[derive(Clone, Debug, PartialEq)]
pub struct SplitEvent {
    /// The actor that broke apart.
    pub parent: SplitParent,
    /// New solver actors. `None` entries are solver defects and are skipped.
    pub children: Vec<Option<SolverActorId>>,
}

impl SplitEvent {
    /// Build a well-formed split event.
    pub fn new(
        parent_solver_actor: SolverActorId,
        parent_user_data: ActorId,
        children: impl IntoIterator<Item = SolverActorId>,
    ) -> Self {
        Self {
            parent: SplitParent {
                solver_actor: parent_solver_actor,
                user_data: Some(parent_user_data),
            },
            children: children.into_iter().map(Some).collect(),
        }
    }
}

/// Request for the first actor of a new solver family.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverActorDesc {
    /// Initial health of every bond.
    pub uniform_initial_bond_health: f32,
    /// Initial health of every lower-support chunk.
    pub uniform_initial_lower_support_chunk_health: f32,
    /// Group to add the new actor to, if any. The solver removes actors
    /// from their group when it releases them.
    pub group: Option<GroupId>,
}
