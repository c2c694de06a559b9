//! Collaborator traits implemented by the host application.
//!
//! The family core never talks to a concrete solver, physics engine or
//! entity system. It only sees these interfaces, each of which is
//! object-safe and `Send` so a family can be moved to whichever thread
//! drives its solver group.

use glam::Vec3;

use crate::actor::{Actor, ActorDescriptor};
use crate::event::{SolverActorDesc, SolverEvent};
use crate::id::{ActorId, ChunkIndices, ComponentManifest, EntityId, SolverActorId};
use crate::math::Transform;

/// Creates solver families. One framework serves many families.
pub trait FractureFramework {
    /// Create a solver family whose only actor is described by `desc`.
    ///
    /// Returns `None` if the solver cannot create the actor; the family
    /// constructor turns that into a construction error.
    fn create_family(&mut self, desc: &SolverActorDesc) -> Option<Box<dyn SolverFamily>>;
}

/// One solver-side family: the source of truth for which solver actors
/// exist and how they are connected.
///
/// Owned exclusively by a single family; dropping it releases every
/// solver actor that remains.
pub trait SolverFamily: Send {
    /// Solver actors that currently exist in this family.
    fn active_actors(&self) -> Vec<SolverActorId>;

    /// Number of solver actors that currently exist.
    fn actor_count(&self) -> usize {
        self.active_actors().len()
    }

    /// Start delivering this family's events to its owner.
    fn add_listener(&mut self);

    /// Stop delivering events.
    fn remove_listener(&mut self);

    /// Whether events are currently being delivered.
    fn has_listener(&self) -> bool;

    /// Support graph nodes the actor covers. Empty for sub-support actors.
    fn graph_node_indices(&self, actor: SolverActorId) -> Vec<u32>;

    /// Current health of every bond in the family, indexed by bond index.
    fn bond_healths(&self, actor: SolverActorId) -> Vec<f32>;

    /// Store the family actor that represents `actor`.
    fn set_user_data(&mut self, actor: SolverActorId, user_data: Option<ActorId>);

    /// The family actor that represents `actor`, if one was stored.
    fn user_data(&self, actor: SolverActorId) -> Option<ActorId>;
}

/// Game-specific actor construction and classification.
///
/// The three `calculate_*` classification queries must be pure: they see
/// the solver's current topology and nothing else.
pub trait ActorFactory: Send {
    /// Visible chunks represented by `actor`.
    fn calculate_visible_chunks(
        &self,
        solver: &dyn SolverFamily,
        actor: SolverActorId,
    ) -> ChunkIndices;

    /// Whether `actor` should be a static (world-attached) body.
    fn calculate_is_static(
        &self,
        solver: &dyn SolverFamily,
        actor: SolverActorId,
        chunks: &[u32],
    ) -> bool;

    /// Whether `actor` is a single leaf chunk.
    fn calculate_is_leaf_chunk(
        &self,
        solver: &dyn SolverFamily,
        actor: SolverActorId,
        chunks: &[u32],
    ) -> bool;

    /// Component types the actor's entity needs.
    fn calculate_components(&self, is_static: bool) -> ComponentManifest;

    /// Build an actor, including its physics body.
    fn create_actor(&mut self, desc: ActorDescriptor, entity: EntityId) -> Actor;

    /// Release an actor and everything the factory created for it.
    fn destroy_actor(&mut self, actor: Actor);
}

/// Creates the external entity attached to each new actor.
pub trait EntityProvider: Send {
    /// Create an entity with the given components.
    fn create_entity(&mut self, components: &ComponentManifest) -> EntityId;
}

/// Read access to a physics body owned by the host's physics world.
pub trait SimulatedBody: Send {
    /// Current world transform (unscaled).
    fn transform(&self) -> Transform;

    /// Linear velocity in world space. Zero for static bodies.
    fn linear_velocity(&self) -> Vec3;

    /// Angular velocity in world space. Zero for static bodies.
    fn angular_velocity(&self) -> Vec3;

    /// Center of mass in the body's local frame.
    fn center_of_mass_local(&self) -> Vec3;
}

/// Receiver of a solver family's event stream.
///
/// The solver (or the group driving it) calls `receive` synchronously
/// from its simulation step, once per batch.
pub trait SolverEventSink {
    /// Handle one batch of events.
    fn receive(&mut self, events: &[SolverEvent]);
}
