//! The family lifecycle state machine.
//!
//! A [`Family`] owns one solver family and mirrors its solver actors as
//! live [`Actor`]s. States:
//!
//! ```text
//!   Unspawned ──spawn()──▶ Spawned ──despawn()──▶ Unspawned
//! ```
//!
//! While spawned the family listens to the solver's event stream and
//! applies each split event as "destroy the parent, create its children".
//! Events of a batch are applied in order, so a split's destruction is
//! reported after the creations of the split before it.
//!
//! # Ownership model
//!
//! `Family` is [`Send`] but every mutating method takes `&mut self`, so
//! it is the only mutator of its tracker during event handling.
//! Listener callbacks get a read-only [`FamilyView`] and cannot mutate
//! it. Dropping a spawned family despawns it first, then releases the
//! solver family.

use std::fmt;
use std::sync::Arc;

use splinter_core::{
    ActorConfiguration, ActorDescriptor, ActorFactory, ActorId, ConfigError, EntityProvider,
    FamilyError, FamilyId, FractureAsset, FractureFramework, FractureMaterial, GroupId,
    PhysicsMaterialId, SolverActorDesc, SolverEvent, SolverEventSink, SolverFamily, SplitEvent,
    Transform,
};
use tracing::{debug, error, trace, trace_span, warn};

use crate::calculator::ActorStateCalculator;
use crate::debug::{self, DebugRenderBuffer, DebugRenderMode};
use crate::listener::{FamilyListener, FamilyView};
use crate::metrics::FamilyMetrics;
use crate::tracker::ActorTracker;

// Compile-time assertion: Family is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Family>();
    }
};

// ── FamilyDesc ──────────────────────────────────────────────────

/// Everything needed to construct a [`Family`].
pub struct FamilyDesc {
    /// Fracture asset the family is instanced from.
    pub asset: Arc<FractureAsset>,
    /// Destruction material.
    pub material: FractureMaterial,
    /// Physics material for every body of the family.
    pub physics_material: PhysicsMaterialId,
    /// Rigid-body flags for every body of the family.
    pub actor_configuration: ActorConfiguration,
    /// Solver group to simulate the family in, if any.
    pub group: Option<GroupId>,
    /// Builds and releases actors.
    pub factory: Box<dyn ActorFactory>,
    /// Creates the entity attached to each actor.
    pub entity_provider: Box<dyn EntityProvider>,
    /// Receives creation and destruction notifications.
    pub listener: Box<dyn FamilyListener>,
}

impl FamilyDesc {
    /// Validate the material and the asset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.material.validate()?;
        self.asset.validate()
    }

    /// The request for the family's first solver actor.
    ///
    /// Assets are authored with unit health; the material scales them.
    pub fn solver_actor_desc(&self) -> SolverActorDesc {
        SolverActorDesc {
            uniform_initial_bond_health: self.asset.default_bond_health * self.material.health,
            uniform_initial_lower_support_chunk_health: self
                .asset
                .default_lower_support_chunk_health
                * self.material.health,
            group: self.group,
        }
    }
}

impl fmt::Debug for FamilyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyDesc")
            .field("asset", &self.asset)
            .field("material", &self.material)
            .field("physics_material", &self.physics_material)
            .field("actor_configuration", &self.actor_configuration)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

// ── Family ──────────────────────────────────────────────────────

/// A fracturable body and every fragment it has broken into.
pub struct Family {
    id: FamilyId,
    asset: Arc<FractureAsset>,
    material: FractureMaterial,
    physics_material: PhysicsMaterialId,
    actor_configuration: ActorConfiguration,
    solver: Box<dyn SolverFamily>,
    factory: Box<dyn ActorFactory>,
    entity_provider: Box<dyn EntityProvider>,
    listener: Box<dyn FamilyListener>,
    tracker: ActorTracker,
    initial_transform: Transform,
    spawned: bool,
    metrics: FamilyMetrics,
}

impl Family {
    /// Validate `desc` and create the family's solver family.
    ///
    /// The solver family starts with one actor covering the whole asset.
    /// No [`Actor`](splinter_core::Actor) exists until [`spawn()`](Self::spawn).
    ///
    /// # Errors
    ///
    /// [`FamilyError::Config`] if validation fails,
    /// [`FamilyError::SolverFamilyCreation`] if the framework cannot
    /// create the solver family.
    pub fn new(
        desc: FamilyDesc,
        framework: &mut dyn FractureFramework,
    ) -> Result<Self, FamilyError> {
        desc.validate()?;
        let solver = framework
            .create_family(&desc.solver_actor_desc())
            .ok_or(FamilyError::SolverFamilyCreation)?;

        let id = FamilyId::next();
        debug!(family = %id, group = ?desc.group, "family created");

        Ok(Self {
            id,
            asset: desc.asset,
            material: desc.material,
            physics_material: desc.physics_material,
            actor_configuration: desc.actor_configuration,
            solver,
            factory: desc.factory,
            entity_provider: desc.entity_provider,
            listener: desc.listener,
            tracker: ActorTracker::new(),
            initial_transform: Transform::IDENTITY,
            spawned: false,
            metrics: FamilyMetrics::default(),
        })
    }

    /// Materialize the family at `transform`.
    ///
    /// Subscribes to the solver's events and creates one actor per
    /// currently active solver actor (usually one, more if the solver
    /// family was already split).
    ///
    /// # Errors
    ///
    /// [`FamilyError::AlreadySpawned`] if the family is spawned; nothing
    /// changes in that case.
    pub fn spawn(&mut self, transform: Transform) -> Result<(), FamilyError> {
        if self.spawned {
            debug!(family = %self.id, "spawn ignored: already spawned");
            return Err(FamilyError::AlreadySpawned);
        }

        self.initial_transform = transform;
        self.solver.add_listener();

        let descriptors = self.initial_descriptors(&transform);
        self.create_actors(descriptors);

        self.spawned = true;
        debug!(family = %self.id, actors = self.tracker.len(), "family spawned");
        Ok(())
    }

    /// Destroy every live actor and stop listening to the solver.
    ///
    /// # Errors
    ///
    /// [`FamilyError::NotSpawned`] if the family is not spawned.
    pub fn despawn(&mut self) -> Result<(), FamilyError> {
        if !self.spawned {
            debug!(family = %self.id, "despawn ignored: not spawned");
            return Err(FamilyError::NotSpawned);
        }

        // Snapshot first: destroying mutates the tracker.
        let ids = self.tracker.ids();
        self.destroy_actors(&ids);

        self.solver.remove_listener();
        self.spawned = false;
        debug!(family = %self.id, "family despawned");
        Ok(())
    }

    /// Apply a batch of solver events in order.
    ///
    /// Each split is applied on its own: child descriptors are derived
    /// while the parent is still live, then the parent is destroyed, then
    /// the children are created, before the next event is looked at.
    /// Non-split events are ignored.
    pub fn handle_events(&mut self, events: &[SolverEvent]) {
        let _span = trace_span!("handle_events", family = %self.id, count = events.len()).entered();

        if !self.spawned {
            debug!(
                family = %self.id,
                count = events.len(),
                "ignoring solver events delivered while unspawned"
            );
            self.metrics.events_while_unspawned += events.len() as u64;
            return;
        }

        for event in events {
            match event {
                SolverEvent::Split(split) => {
                    let mut descriptors = Vec::new();
                    let mut to_destroy = Vec::new();
                    self.handle_split_event(split.as_ref(), &mut descriptors, &mut to_destroy);
                    self.destroy_actors(&to_destroy);
                    self.create_actors(descriptors);
                }
                other => {
                    trace!(family = %self.id, kind = other.kind_name(), "ignoring solver event");
                    self.metrics.ignored_events += 1;
                }
            }
        }
    }

    /// Append child descriptors for one split to `descriptors` and its
    /// parent to `to_destroy`.
    ///
    /// Appends nothing if the event as a whole is malformed. Null
    /// children are skipped one by one.
    fn handle_split_event(
        &mut self,
        split: Option<&SplitEvent>,
        descriptors: &mut Vec<ActorDescriptor>,
        to_destroy: &mut Vec<ActorId>,
    ) {
        let Some(split) = split else {
            error!(family = %self.id, "received split event without payload");
            self.metrics.rejected_events += 1;
            return;
        };

        let Some(parent_id) = split.parent.user_data else {
            error!(
                family = %self.id,
                solver_actor = %split.parent.solver_actor,
                "parent actor in split event has no user data"
            );
            self.metrics.rejected_events += 1;
            return;
        };

        let Some(parent) = self.tracker.get(parent_id) else {
            error!(
                family = %self.id,
                parent = %parent_id,
                "split event parent is not an actor of this family"
            );
            self.metrics.rejected_events += 1;
            return;
        };

        if parent.solver_actor() != split.parent.solver_actor {
            error!(
                family = %self.id,
                parent = %parent_id,
                solver_actor = %split.parent.solver_actor,
                "split event parent user data points at a different solver actor"
            );
            self.metrics.rejected_events += 1;
            return;
        }

        let parent_body = parent.body();
        let parent_transform = match parent_body {
            Some(body) => {
                let mut t = body.transform();
                t.multiply_by_uniform_scale(self.initial_transform.uniform_scale());
                t
            }
            None => self.initial_transform,
        };

        let calculator = self.calculator();
        let mut null_children = 0u64;
        for (index, child) in split.children.iter().enumerate() {
            match child {
                Some(child) => descriptors.push(calculator.derive_child_descriptor(
                    parent_body,
                    parent.is_static(),
                    &parent_transform,
                    *child,
                )),
                None => {
                    error!(
                        family = %self.id,
                        parent = %parent_id,
                        index,
                        "split event generated with a null child"
                    );
                    null_children += 1;
                }
            }
        }

        self.metrics.rejected_children += null_children;
        self.metrics.split_events += 1;
        to_destroy.push(parent_id);
    }

    /// Create, register, and announce one actor per descriptor.
    ///
    /// The listener is called only after the actor is in the tracker and
    /// its solver actor points back at it.
    pub fn create_actors(&mut self, descriptors: Vec<ActorDescriptor>) {
        let _span =
            trace_span!("create_actors", family = %self.id, count = descriptors.len()).entered();

        for desc in descriptors {
            let entity = self.entity_provider.create_entity(&desc.components);
            let solver_actor = desc.solver_actor;
            let actor = self.factory.create_actor(desc, entity);
            let id = actor.id();

            if let Err(duplicate) = self.tracker.add(actor) {
                error!(
                    family = %self.id,
                    actor = %duplicate.id(),
                    "factory produced an actor that is already tracked"
                );
                self.factory.destroy_actor(duplicate.into_inner());
                continue;
            }
            self.solver.set_user_data(solver_actor, Some(id));
            self.metrics.actors_created += 1;

            if let Some(actor) = self.tracker.get(id) {
                trace!(family = %self.id, actor = %id, %solver_actor, "actor created");
                self.listener
                    .on_actor_created(FamilyView::new(self.id, &self.tracker), actor);
            }
        }
    }

    /// Unregister, announce, and release each actor.
    ///
    /// The listener sees the actor after it has left the tracker and
    /// before the factory releases it. IDs that are not tracked are
    /// skipped.
    pub fn destroy_actors(&mut self, ids: &[ActorId]) {
        let _span = trace_span!("destroy_actors", family = %self.id, count = ids.len()).entered();

        for &id in ids {
            let Some(actor) = self.tracker.remove(id) else {
                debug!(family = %self.id, actor = %id, "skipping actor that is not tracked");
                continue;
            };

            let solver_actor = actor.solver_actor();
            if self.solver.user_data(solver_actor) == Some(id) {
                self.solver.set_user_data(solver_actor, None);
            }
            self.metrics.actors_destroyed += 1;

            trace!(family = %self.id, actor = %id, %solver_actor, "actor destroyed");
            self.listener
                .on_actor_destroyed(FamilyView::new(self.id, &self.tracker), &actor);
            self.factory.destroy_actor(actor);
        }
    }

    /// Destroy one actor of this family.
    ///
    /// Returns `false`, with a warning, if the actor is not part of the
    /// family.
    pub fn destroy_actor(&mut self, id: ActorId) -> bool {
        if !self.tracker.contains(id) {
            warn!(
                family = %self.id,
                actor = %id,
                "family is trying to destroy an actor that is not part of it"
            );
            return false;
        }
        self.destroy_actors(&[id]);
        true
    }

    /// Append debug lines for every live actor to `buffer`.
    ///
    /// Lines are produced in each actor's local frame and then moved to
    /// world space with the actor's body transform (the spawn transform
    /// for body-less actors). Actors without support graph nodes draw
    /// nothing.
    pub fn fill_debug_render(&self, buffer: &mut DebugRenderBuffer, mode: DebugRenderMode) {
        if mode == DebugRenderMode::Disabled {
            return;
        }

        let bond_health_max = self.asset.bond_health_max * self.material.health;
        for actor in self.tracker.actors() {
            let solver_actor = actor.solver_actor();
            let nodes = self.solver.graph_node_indices(solver_actor);
            if nodes.is_empty() {
                continue;
            }

            let start = buffer.lines.len();
            if mode.draws_health_graph() {
                let healths = self.solver.bond_healths(solver_actor);
                debug::fill_health_graph(
                    &mut buffer.lines,
                    mode,
                    &self.asset,
                    &nodes,
                    &healths,
                    bond_health_max,
                );
            }
            if mode.draws_accelerator() {
                debug::fill_accelerator(&mut buffer.lines, mode, &self.asset);
            }

            let local_to_world = actor
                .world_transform()
                .unwrap_or(self.initial_transform);
            debug::transform_lines(&mut buffer.lines[start..], &local_to_world);
        }
    }

    /// A calculator over this family's configuration and collaborators.
    pub fn calculator(&self) -> ActorStateCalculator<'_> {
        ActorStateCalculator::new(
            self.id,
            self.physics_material,
            &self.actor_configuration,
            self.factory.as_ref(),
            self.solver.as_ref(),
        )
    }

    fn initial_descriptors(&self, transform: &Transform) -> Vec<ActorDescriptor> {
        let calculator = self.calculator();
        self.solver
            .active_actors()
            .into_iter()
            .map(|solver_actor| calculator.derive_initial_descriptor(transform, solver_actor))
            .collect()
    }

    /// Unique family ID.
    pub fn id(&self) -> FamilyId {
        self.id
    }

    /// Whether the family is spawned.
    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// Live actors.
    pub fn tracker(&self) -> &ActorTracker {
        &self.tracker
    }

    /// Transform passed to the most recent [`spawn()`](Self::spawn).
    pub fn initial_transform(&self) -> Transform {
        self.initial_transform
    }

    /// Lifecycle counters.
    pub fn metrics(&self) -> &FamilyMetrics {
        &self.metrics
    }

    /// The solver family.
    pub fn solver(&self) -> &dyn SolverFamily {
        self.solver.as_ref()
    }

    /// The fracture asset.
    pub fn asset(&self) -> &Arc<FractureAsset> {
        &self.asset
    }

    /// The destruction material.
    pub fn material(&self) -> &FractureMaterial {
        &self.material
    }

    /// The physics material.
    pub fn physics_material(&self) -> PhysicsMaterialId {
        self.physics_material
    }

    /// Rigid-body flags applied to new actors.
    pub fn actor_configuration(&self) -> &ActorConfiguration {
        &self.actor_configuration
    }
}

impl SolverEventSink for Family {
    fn receive(&mut self, events: &[SolverEvent]) {
        self.handle_events(events);
    }
}

impl Drop for Family {
    fn drop(&mut self) {
        if self.spawned {
            let _ = self.despawn();
        }
    }
}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family")
            .field("id", &self.id)
            .field("spawned", &self.spawned)
            .field("actors", &self.tracker.len())
            .field("initial_transform", &self.initial_transform)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splinter_core::Actor;
    use splinter_test_utils::{chain_asset, MockActorFactory, MockEntityProvider, MockFramework};

    struct NullListener;

    impl FamilyListener for NullListener {
        fn on_actor_created(&mut self, _family: FamilyView<'_>, _actor: &Actor) {}
        fn on_actor_destroyed(&mut self, _family: FamilyView<'_>, _actor: &Actor) {}
    }

    fn desc(asset: Arc<FractureAsset>) -> FamilyDesc {
        FamilyDesc {
            asset: Arc::clone(&asset),
            material: FractureMaterial { health: 2.0 },
            physics_material: PhysicsMaterialId(1),
            actor_configuration: ActorConfiguration::default(),
            group: Some(GroupId(5)),
            factory: Box::new(MockActorFactory::new(asset)),
            entity_provider: Box::new(MockEntityProvider::new()),
            listener: Box::new(NullListener),
        }
    }

    #[test]
    fn solver_actor_desc_scales_health_by_material() {
        let mut asset = chain_asset(3);
        asset.default_bond_health = 1.5;
        asset.default_lower_support_chunk_health = 0.5;
        let d = desc(Arc::new(asset)).solver_actor_desc();
        assert_eq!(d.uniform_initial_bond_health, 3.0);
        assert_eq!(d.uniform_initial_lower_support_chunk_health, 1.0);
        assert_eq!(d.group, Some(GroupId(5)));
    }

    #[test]
    fn construction_passes_solver_desc_to_framework() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let family = Family::new(desc(asset), &mut framework).unwrap();
        assert!(!family.is_spawned());
        assert!(family.tracker().is_empty());
        assert_eq!(framework.requests().len(), 1);
        assert_eq!(framework.requests()[0].uniform_initial_bond_health, 2.0);
    }

    #[test]
    fn construction_fails_without_solver_family() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::failing();
        match Family::new(desc(asset), &mut framework) {
            Err(FamilyError::SolverFamilyCreation) => {}
            other => panic!("expected SolverFamilyCreation, got {other:?}"),
        }
    }

    #[test]
    fn construction_fails_on_invalid_material() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let mut d = desc(asset);
        d.material.health = 0.0;
        match Family::new(d, &mut framework) {
            Err(FamilyError::Config(ConfigError::InvalidMaterialHealth { .. })) => {}
            other => panic!("expected Config(InvalidMaterialHealth), got {other:?}"),
        }
        assert!(framework.requests().is_empty());
    }

    #[test]
    fn spawn_twice_is_rejected_without_duplicates() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let mut family = Family::new(desc(asset), &mut framework).unwrap();

        family.spawn(Transform::IDENTITY).unwrap();
        let ids = family.tracker().ids();
        assert_eq!(
            family.spawn(Transform::from_translation(glam::Vec3::ONE)),
            Err(FamilyError::AlreadySpawned)
        );
        assert_eq!(family.tracker().ids(), ids);
        assert_eq!(family.initial_transform(), Transform::IDENTITY);
        assert_eq!(family.metrics().actors_created, 1);
    }

    #[test]
    fn despawn_without_spawn_is_rejected() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let mut family = Family::new(desc(asset), &mut framework).unwrap();
        assert_eq!(family.despawn(), Err(FamilyError::NotSpawned));
    }

    #[test]
    fn spawn_subscribes_and_despawn_unsubscribes() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let mut family = Family::new(desc(asset), &mut framework).unwrap();
        assert!(!family.solver().has_listener());
        family.spawn(Transform::IDENTITY).unwrap();
        assert!(family.solver().has_listener());
        family.despawn().unwrap();
        assert!(!family.solver().has_listener());
        assert!(family.tracker().is_empty());
    }

    #[test]
    fn events_while_unspawned_are_counted_and_ignored() {
        let asset = Arc::new(chain_asset(3));
        let mut framework = MockFramework::new(Arc::clone(&asset));
        let mut family = Family::new(desc(asset), &mut framework).unwrap();
        family.receive(&[SolverEvent::Split(None), SolverEvent::FractureEvent]);
        assert_eq!(family.metrics().events_while_unspawned, 2);
        assert_eq!(family.metrics().rejected_events, 0);
    }
}
