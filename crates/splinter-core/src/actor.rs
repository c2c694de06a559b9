//! Live actors and the descriptors they are built from.

use std::fmt;

use glam::{Quat, Vec3};

use crate::id::{
    ActorId, ChunkIndices, ComponentManifest, EntityId, FamilyId, PhysicsMaterialId,
    SolverActorId,
};
use crate::math::Transform;
use crate::traits::SimulatedBody;

/// Initial rigid-body settings for a new actor's physics body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyConfiguration {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Continuous collision detection.
    pub ccd_enabled: bool,
    /// Whether the body simulates immediately.
    pub start_simulation_enabled: bool,
    /// Angular velocity the body starts with.
    pub initial_angular_velocity: Vec3,
}

impl Default for BodyConfiguration {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            ccd_enabled: false,
            start_simulation_enabled: true,
            initial_angular_velocity: Vec3::ZERO,
        }
    }
}

/// Everything an [`ActorFactory`](crate::traits::ActorFactory) needs to
/// build one actor.
///
/// Transient: produced by the state calculator, consumed once by actor
/// creation. Identity and geometry (`solver_actor`, `chunk_indices`,
/// `is_static`, `is_leaf_chunk`) come from the solver's topology; the
/// kinematic fields come from the parent body, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorDescriptor {
    /// Family the actor will belong to.
    pub family: FamilyId,
    /// Solver actor the new actor represents.
    pub solver_actor: SolverActorId,
    /// Physics material for the body.
    pub physics_material: PhysicsMaterialId,
    /// Visible chunks the actor renders.
    pub chunk_indices: ChunkIndices,
    /// Static actors are attached to the world and never move.
    pub is_static: bool,
    /// Whether the actor is a single leaf chunk (cannot split further).
    pub is_leaf_chunk: bool,
    /// Component types for the actor's entity.
    pub components: ComponentManifest,
    /// Parent center of mass in world space.
    pub parent_center_of_mass: Vec3,
    /// Parent linear velocity at the moment of the split.
    pub parent_linear_velocity: Vec3,
    /// Initial body placement and flags.
    pub body_configuration: BodyConfiguration,
    /// Family uniform scale.
    pub scale: f32,
}

/// One live fragment of a family.
///
/// Owned by the family's tracker from creation until it is handed back
/// to the factory for destruction.
pub struct Actor {
    id: ActorId,
    family: FamilyId,
    solver_actor: SolverActorId,
    chunk_indices: ChunkIndices,
    is_static: bool,
    is_leaf_chunk: bool,
    scale: f32,
    entity: EntityId,
    body: Option<Box<dyn SimulatedBody>>,
}

impl Actor {
    /// Build an actor from its descriptor, allocating a fresh [`ActorId`].
    ///
    /// Called by factory implementations after they have created the
    /// physics body (if any) described by `desc.body_configuration`.
    pub fn new(
        desc: &ActorDescriptor,
        entity: EntityId,
        body: Option<Box<dyn SimulatedBody>>,
    ) -> Self {
        Self {
            id: ActorId::next(),
            family: desc.family,
            solver_actor: desc.solver_actor,
            chunk_indices: desc.chunk_indices.clone(),
            is_static: desc.is_static,
            is_leaf_chunk: desc.is_leaf_chunk,
            scale: desc.scale,
            entity,
            body,
        }
    }

    /// Unique actor ID.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Owning family.
    pub fn family(&self) -> FamilyId {
        self.family
    }

    /// Solver actor this actor represents.
    pub fn solver_actor(&self) -> SolverActorId {
        self.solver_actor
    }

    /// Visible chunk indices.
    pub fn chunk_indices(&self) -> &[u32] {
        &self.chunk_indices
    }

    /// Whether the actor is static.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the actor is a single leaf chunk.
    pub fn is_leaf_chunk(&self) -> bool {
        self.is_leaf_chunk
    }

    /// Family uniform scale the actor was created with.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Attached entity.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Physics body, if the factory created one.
    pub fn body(&self) -> Option<&dyn SimulatedBody> {
        self.body.as_deref()
    }

    /// Current world transform of the body, if there is one.
    pub fn world_transform(&self) -> Option<Transform> {
        self.body.as_ref().map(|b| b.transform())
    }

    /// Release the physics body so the factory can return it to the host.
    pub fn take_body(&mut self) -> Option<Box<dyn SimulatedBody>> {
        self.body.take()
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("solver_actor", &self.solver_actor)
            .field("chunk_indices", &self.chunk_indices)
            .field("is_static", &self.is_static)
            .field("is_leaf_chunk", &self.is_leaf_chunk)
            .field("scale", &self.scale)
            .field("entity", &self.entity)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
