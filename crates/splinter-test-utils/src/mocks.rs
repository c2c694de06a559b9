//! In-memory host collaborators.
//!
//! [`MockSolverFamily`] keeps a map of solver actors to support nodes and
//! can split them on demand, producing the [`SolverEvent`] the real
//! solver would emit. [`MockActorFactory`] classifies actors from that
//! topology and gives every dynamic actor a [`MockBody`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use glam::Vec3;
use smallvec::smallvec;
use splinter_core::{
    Actor, ActorDescriptor, ActorFactory, ActorId, ChunkIndices, ComponentManifest,
    ComponentTypeId, EntityId, EntityProvider, FractureAsset, FractureFramework, SimulatedBody,
    SolverActorDesc, SolverActorId, SolverEvent, SolverFamily, SplitEvent, SplitParent, Transform,
};

use crate::lock;

// ── Solver ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SolverActorState {
    nodes: Vec<u32>,
    user_data: Option<ActorId>,
}

#[derive(Debug, Default)]
struct SolverState {
    actors: BTreeMap<SolverActorId, SolverActorState>,
    bond_healths: Vec<f32>,
    listeners: u32,
    next_actor: u32,
}

/// Solver family over an asset's support graph.
///
/// Starts with one solver actor, `SolverActorId(0)`, owning every
/// support node. Splitting removes the parent and hands its nodes to new
/// actors with fresh IDs, like the real solver does.
#[derive(Clone, Debug)]
pub struct MockSolverFamily {
    asset: Arc<FractureAsset>,
    state: Arc<Mutex<SolverState>>,
}

impl MockSolverFamily {
    pub fn new(asset: Arc<FractureAsset>) -> Self {
        Self::with_bond_health(asset, 1.0)
    }

    /// A family whose bonds all start at `bond_health`.
    pub fn with_bond_health(asset: Arc<FractureAsset>, bond_health: f32) -> Self {
        let mut actors = BTreeMap::new();
        actors.insert(
            SolverActorId(0),
            SolverActorState {
                nodes: (0..asset.graph.node_count() as u32).collect(),
                user_data: None,
            },
        );
        let state = SolverState {
            actors,
            bond_healths: vec![bond_health; asset.bonds.len()],
            listeners: 0,
            next_actor: 1,
        };
        Self {
            asset,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// A family over [`chain_asset(n)`](crate::chain_asset).
    pub fn with_chain(n: u32) -> Self {
        Self::new(Arc::new(crate::chain_asset(n)))
    }

    pub fn asset(&self) -> &Arc<FractureAsset> {
        &self.asset
    }

    /// Split `parent` into `parts` actors of contiguous nodes.
    ///
    /// Panics if `parent` is unknown or has fewer than `parts` nodes.
    pub fn split(&self, parent: SolverActorId, parts: usize) -> SolverEvent {
        let nodes = self.nodes(parent);
        assert!(
            parts > 0 && nodes.len() >= parts,
            "cannot split {} nodes into {parts} parts",
            nodes.len()
        );
        let base = nodes.len() / parts;
        let extra = nodes.len() % parts;
        let mut groups = Vec::with_capacity(parts);
        let mut start = 0;
        for i in 0..parts {
            let len = base + usize::from(i < extra);
            groups.push(nodes[start..start + len].to_vec());
            start += len;
        }
        self.split_into(parent, groups)
    }

    /// Split `parent` into one new actor per node group.
    ///
    /// Panics if `parent` is unknown. Groups may be empty (sub-support
    /// actors have no graph nodes).
    pub fn split_into(&self, parent: SolverActorId, groups: Vec<Vec<u32>>) -> SolverEvent {
        let mut state = lock(&self.state);
        let removed = state
            .actors
            .remove(&parent)
            .unwrap_or_else(|| panic!("unknown solver actor {parent}"));

        let mut children = Vec::with_capacity(groups.len());
        for nodes in groups {
            let id = SolverActorId(state.next_actor);
            state.next_actor += 1;
            state.actors.insert(
                id,
                SolverActorState {
                    nodes,
                    user_data: None,
                },
            );
            children.push(Some(id));
        }

        SolverEvent::Split(Some(SplitEvent {
            parent: SplitParent {
                solver_actor: parent,
                user_data: removed.user_data,
            },
            children,
        }))
    }

    /// Support nodes owned by `actor` (empty if unknown).
    pub fn nodes(&self, actor: SolverActorId) -> Vec<u32> {
        lock(&self.state)
            .actors
            .get(&actor)
            .map(|a| a.nodes.clone())
            .unwrap_or_default()
    }

    pub fn set_bond_health(&self, bond: usize, health: f32) {
        if let Some(h) = lock(&self.state).bond_healths.get_mut(bond) {
            *h = health;
        }
    }

    /// Number of active listener subscriptions.
    pub fn listener_count(&self) -> u32 {
        lock(&self.state).listeners
    }
}

impl SolverFamily for MockSolverFamily {
    fn active_actors(&self) -> Vec<SolverActorId> {
        lock(&self.state).actors.keys().copied().collect()
    }

    fn add_listener(&mut self) {
        lock(&self.state).listeners += 1;
    }

    fn remove_listener(&mut self) {
        let mut state = lock(&self.state);
        state.listeners = state.listeners.saturating_sub(1);
    }

    fn has_listener(&self) -> bool {
        lock(&self.state).listeners > 0
    }

    fn graph_node_indices(&self, actor: SolverActorId) -> Vec<u32> {
        self.nodes(actor)
    }

    fn bond_healths(&self, _actor: SolverActorId) -> Vec<f32> {
        lock(&self.state).bond_healths.clone()
    }

    fn set_user_data(&mut self, actor: SolverActorId, user_data: Option<ActorId>) {
        if let Some(a) = lock(&self.state).actors.get_mut(&actor) {
            a.user_data = user_data;
        }
    }

    fn user_data(&self, actor: SolverActorId) -> Option<ActorId> {
        lock(&self.state)
            .actors
            .get(&actor)
            .and_then(|a| a.user_data)
    }
}

/// Framework that hands out [`MockSolverFamily`]s over one asset.
#[derive(Debug)]
pub struct MockFramework {
    asset: Option<Arc<FractureAsset>>,
    requests: Vec<SolverActorDesc>,
    families: Vec<MockSolverFamily>,
}

impl MockFramework {
    pub fn new(asset: Arc<FractureAsset>) -> Self {
        Self {
            asset: Some(asset),
            requests: Vec::new(),
            families: Vec::new(),
        }
    }

    /// A framework whose `create_family` always fails.
    pub fn failing() -> Self {
        Self {
            asset: None,
            requests: Vec::new(),
            families: Vec::new(),
        }
    }

    /// Every descriptor passed to `create_family`, in order.
    pub fn requests(&self) -> &[SolverActorDesc] {
        &self.requests
    }

    /// Shared handle to the most recently created solver family.
    pub fn last_family(&self) -> Option<MockSolverFamily> {
        self.families.last().cloned()
    }
}

impl FractureFramework for MockFramework {
    fn create_family(&mut self, desc: &SolverActorDesc) -> Option<Box<dyn SolverFamily>> {
        self.requests.push(desc.clone());
        let asset = self.asset.clone()?;
        let family = MockSolverFamily::with_bond_health(asset, desc.uniform_initial_bond_health);
        self.families.push(family.clone());
        Some(Box::new(family))
    }
}

// ── Bodies ──────────────────────────────────────────────────────

/// Kinematic state reported by a [`MockBody`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub center_of_mass_local: Vec3,
}

/// Body whose state the test sets directly.
#[derive(Clone, Debug)]
pub struct MockBody {
    state: Arc<Mutex<BodyState>>,
}

impl MockBody {
    pub fn new(state: BodyState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> BodyState {
        *lock(&self.state)
    }

    pub fn set_state(&self, state: BodyState) {
        *lock(&self.state) = state;
    }
}

impl SimulatedBody for MockBody {
    fn transform(&self) -> Transform {
        lock(&self.state).transform
    }

    fn linear_velocity(&self) -> Vec3 {
        lock(&self.state).linear_velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        lock(&self.state).angular_velocity
    }

    fn center_of_mass_local(&self) -> Vec3 {
        lock(&self.state).center_of_mass_local
    }
}

// ── Factory ─────────────────────────────────────────────────────

/// Component present on every actor's entity.
pub const COMPONENT_RENDER: ComponentTypeId = ComponentTypeId(1);
/// Component present only on dynamic actors' entities.
pub const COMPONENT_RIGID_BODY: ComponentTypeId = ComponentTypeId(2);

#[derive(Debug, Default)]
struct FactoryState {
    static_chunks: HashSet<u32>,
    created: Vec<(ActorId, ActorDescriptor)>,
    destroyed: Vec<ActorId>,
    bodies: HashMap<ActorId, MockBody>,
    without_bodies: bool,
}

/// Actor factory over an asset's support graph.
///
/// - Visible chunks are the chunks of the solver actor's graph nodes.
/// - An actor is static if any of its chunks was marked static.
/// - An actor is a leaf if it shows exactly one chunk.
/// - Every actor gets a [`MockBody`] at its descriptor's placement with
///   the inherited velocities, unless built with
///   [`without_bodies()`](Self::without_bodies).
#[derive(Clone, Debug)]
pub struct MockActorFactory {
    asset: Arc<FractureAsset>,
    state: Arc<Mutex<FactoryState>>,
}

impl MockActorFactory {
    pub fn new(asset: Arc<FractureAsset>) -> Self {
        Self {
            asset,
            state: Arc::new(Mutex::new(FactoryState::default())),
        }
    }

    /// Mark chunks as attached to the world.
    pub fn with_static_chunks(self, chunks: impl IntoIterator<Item = u32>) -> Self {
        lock(&self.state).static_chunks.extend(chunks);
        self
    }

    /// Create actors with no physics body.
    pub fn without_bodies(self) -> Self {
        lock(&self.state).without_bodies = true;
        self
    }

    /// Descriptors of every created actor, in creation order.
    pub fn created(&self) -> Vec<(ActorId, ActorDescriptor)> {
        lock(&self.state).created.clone()
    }

    /// Descriptor the actor `id` was created from.
    pub fn descriptor(&self, id: ActorId) -> Option<ActorDescriptor> {
        lock(&self.state)
            .created
            .iter()
            .find(|(a, _)| *a == id)
            .map(|(_, d)| d.clone())
    }

    /// IDs of every destroyed actor, in destruction order.
    pub fn destroyed(&self) -> Vec<ActorId> {
        lock(&self.state).destroyed.clone()
    }

    /// Shared handle to the body of actor `id`.
    pub fn body(&self, id: ActorId) -> Option<MockBody> {
        lock(&self.state).bodies.get(&id).cloned()
    }
}

impl ActorFactory for MockActorFactory {
    fn calculate_visible_chunks(
        &self,
        solver: &dyn SolverFamily,
        actor: SolverActorId,
    ) -> ChunkIndices {
        solver
            .graph_node_indices(actor)
            .into_iter()
            .filter_map(|n| self.asset.graph.chunk_indices.get(n as usize).copied())
            .collect()
    }

    fn calculate_is_static(
        &self,
        _solver: &dyn SolverFamily,
        _actor: SolverActorId,
        chunks: &[u32],
    ) -> bool {
        let state = lock(&self.state);
        chunks.iter().any(|c| state.static_chunks.contains(c))
    }

    fn calculate_is_leaf_chunk(
        &self,
        _solver: &dyn SolverFamily,
        _actor: SolverActorId,
        chunks: &[u32],
    ) -> bool {
        chunks.len() == 1
    }

    fn calculate_components(&self, is_static: bool) -> ComponentManifest {
        if is_static {
            smallvec![COMPONENT_RENDER]
        } else {
            smallvec![COMPONENT_RENDER, COMPONENT_RIGID_BODY]
        }
    }

    fn create_actor(&mut self, desc: ActorDescriptor, entity: EntityId) -> Actor {
        let mut state = lock(&self.state);
        let body = (!state.without_bodies).then(|| {
            let (linear_velocity, angular_velocity) = if desc.is_static {
                (Vec3::ZERO, Vec3::ZERO)
            } else {
                (
                    desc.parent_linear_velocity,
                    desc.body_configuration.initial_angular_velocity,
                )
            };
            MockBody::new(BodyState {
                transform: Transform::from_rotation_translation(
                    desc.body_configuration.orientation,
                    desc.body_configuration.position,
                ),
                linear_velocity,
                angular_velocity,
                center_of_mass_local: Vec3::ZERO,
            })
        });

        let boxed = body
            .clone()
            .map(|b| Box::new(b) as Box<dyn SimulatedBody>);
        let actor = Actor::new(&desc, entity, boxed);
        if let Some(body) = body {
            state.bodies.insert(actor.id(), body);
        }
        state.created.push((actor.id(), desc));
        actor
    }

    fn destroy_actor(&mut self, actor: Actor) {
        let mut state = lock(&self.state);
        state.bodies.remove(&actor.id());
        state.destroyed.push(actor.id());
    }
}

// ── Entities ────────────────────────────────────────────────────

/// Entity provider that numbers entities sequentially from 1.
#[derive(Clone, Debug, Default)]
pub struct MockEntityProvider {
    created: Arc<Mutex<Vec<(EntityId, ComponentManifest)>>>,
}

impl MockEntityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every created entity with its components, in creation order.
    pub fn created(&self) -> Vec<(EntityId, ComponentManifest)> {
        lock(&self.created).clone()
    }
}

impl EntityProvider for MockEntityProvider {
    fn create_entity(&mut self, components: &ComponentManifest) -> EntityId {
        let mut created = lock(&self.created);
        let id = EntityId(created.len() as u64 + 1);
        created.push((id, components.clone()));
        id
    }
}
