//! A [`Family`] wired to mocks, for integration tests.
//!
//! Only usable from a crate's `tests/` directory: unit tests inside
//! `splinter-family` see a different copy of the `Family` type.

use std::sync::Arc;

use splinter_core::{
    Actor, ActorConfiguration, ActorId, FractureAsset, FractureMaterial, GroupId,
    PhysicsMaterialId, SolverActorId, SolverEvent,
};
use splinter_family::{Family, FamilyDesc};

use crate::{
    chain_asset, MockActorFactory, MockEntityProvider, MockFramework, MockSolverFamily,
    RecordingListener,
};

/// Configures a [`FamilyHarness`].
#[derive(Debug)]
pub struct HarnessBuilder {
    asset: Arc<FractureAsset>,
    material: FractureMaterial,
    physics_material: PhysicsMaterialId,
    actor_configuration: ActorConfiguration,
    group: Option<GroupId>,
    static_chunks: Vec<u32>,
    without_bodies: bool,
}

impl HarnessBuilder {
    pub fn material(mut self, health: f32) -> Self {
        self.material = FractureMaterial { health };
        self
    }

    pub fn physics_material(mut self, id: PhysicsMaterialId) -> Self {
        self.physics_material = id;
        self
    }

    pub fn actor_configuration(mut self, config: ActorConfiguration) -> Self {
        self.actor_configuration = config;
        self
    }

    pub fn group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn static_chunks(mut self, chunks: impl IntoIterator<Item = u32>) -> Self {
        self.static_chunks.extend(chunks);
        self
    }

    pub fn without_bodies(mut self) -> Self {
        self.without_bodies = true;
        self
    }

    /// Construct the family. Panics if construction fails.
    pub fn build(self) -> FamilyHarness {
        let mut framework = MockFramework::new(Arc::clone(&self.asset));
        let mut factory =
            MockActorFactory::new(Arc::clone(&self.asset)).with_static_chunks(self.static_chunks);
        if self.without_bodies {
            factory = factory.without_bodies();
        }
        let entities = MockEntityProvider::new();
        let listener = RecordingListener::new();

        let family = Family::new(
            FamilyDesc {
                asset: self.asset,
                material: self.material,
                physics_material: self.physics_material,
                actor_configuration: self.actor_configuration,
                group: self.group,
                factory: Box::new(factory.clone()),
                entity_provider: Box::new(entities.clone()),
                listener: Box::new(listener.clone()),
            },
            &mut framework,
        )
        .expect("family construction");
        let solver = framework
            .last_family()
            .expect("framework created a solver family");

        FamilyHarness {
            family,
            solver,
            factory,
            entities,
            listener,
            framework,
        }
    }
}

/// A family plus shared handles to every collaborator it owns.
#[derive(Debug)]
pub struct FamilyHarness {
    pub family: Family,
    pub solver: MockSolverFamily,
    pub factory: MockActorFactory,
    pub entities: MockEntityProvider,
    pub listener: RecordingListener,
    pub framework: MockFramework,
}

impl FamilyHarness {
    pub fn builder(asset: FractureAsset) -> HarnessBuilder {
        HarnessBuilder {
            asset: Arc::new(asset),
            material: FractureMaterial::default(),
            physics_material: PhysicsMaterialId::default(),
            actor_configuration: ActorConfiguration::default(),
            group: None,
            static_chunks: Vec::new(),
            without_bodies: false,
        }
    }

    /// An unspawned family over [`chain_asset(n)`](crate::chain_asset).
    pub fn chain(n: u32) -> Self {
        Self::builder(chain_asset(n)).build()
    }

    /// The single live actor. Panics unless exactly one is live.
    pub fn only_actor(&self) -> &Actor {
        let tracker = self.family.tracker();
        assert_eq!(tracker.len(), 1, "expected exactly one live actor");
        tracker
            .actors()
            .next()
            .expect("tracker reported one actor")
    }

    /// The live actor representing `solver_actor`. Panics if none.
    pub fn actor_for(&self, solver_actor: SolverActorId) -> &Actor {
        self.family
            .tracker()
            .find_by_solver_actor(solver_actor)
            .unwrap_or_else(|| panic!("no live actor for {solver_actor}"))
    }

    /// Have the solver split live actor `actor` into `parts`.
    pub fn split(&self, actor: ActorId, parts: usize) -> SolverEvent {
        let solver_actor = self
            .family
            .tracker()
            .get(actor)
            .unwrap_or_else(|| panic!("actor {actor} is not live"))
            .solver_actor();
        self.solver.split(solver_actor, parts)
    }

    /// Live actor IDs, sorted.
    pub fn live_ids(&self) -> Vec<ActorId> {
        let mut ids = self.family.tracker().ids();
        ids.sort();
        ids
    }
}
