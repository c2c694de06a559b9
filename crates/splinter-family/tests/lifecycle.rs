//! Integration test: spawn, despawn, and teardown of a family.
//!
//! Drives a `Family` over mock collaborators and checks that the set of
//! live actors, the solver back-references, and the listener stream stay
//! consistent through every lifecycle transition.

use std::sync::Arc;

use glam::{Quat, Vec3};
use splinter_core::{
    ActorConfiguration, FamilyError, FractureMaterial, GroupId, PhysicsMaterialId, SolverActorId,
    SolverFamily, Transform,
};
use splinter_family::{Family, FamilyDesc};
use splinter_test_utils::{
    chain_asset, init_test_logging, FamilyHarness, MockActorFactory, MockEntityProvider,
    MockFramework, Notification, RecordingListener, COMPONENT_RENDER, COMPONENT_RIGID_BODY,
};

// ── Spawn ────────────────────────────────────────────────────────────

#[test]
fn spawn_creates_one_actor_for_the_root() {
    init_test_logging();
    let mut h = FamilyHarness::chain(4);
    let t = Transform::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_x(0.4), 1.0);
    h.family.spawn(t).unwrap();

    assert!(h.family.is_spawned());
    assert_eq!(h.family.initial_transform(), t);
    let actor = h.only_actor();
    assert_eq!(actor.solver_actor(), SolverActorId(0));
    assert_eq!(actor.family(), h.family.id());
    assert_eq!(actor.chunk_indices(), &[1, 2, 3, 4]);
    assert_eq!(h.solver.user_data(SolverActorId(0)), Some(actor.id()));

    let world = actor.world_transform().unwrap();
    assert_eq!(world.translation, t.translation);
    assert_eq!(world.rotation, t.rotation);
}

#[test]
fn created_notification_sees_registered_actor() {
    let mut h = FamilyHarness::chain(3);
    h.family.spawn(Transform::IDENTITY).unwrap();
    let id = h.only_actor().id();

    assert_eq!(
        h.listener.notifications(),
        vec![Notification::Created {
            family: h.family.id(),
            actor: id,
            solver_actor: SolverActorId(0),
            tracked: true,
            live: 1,
        }]
    );
}

#[test]
fn spawn_twice_keeps_the_first_actor_set() {
    let mut h = FamilyHarness::chain(3);
    h.family.spawn(Transform::IDENTITY).unwrap();
    let before = h.live_ids();

    let err = h
        .family
        .spawn(Transform::from_translation(Vec3::X))
        .unwrap_err();
    assert_eq!(err, FamilyError::AlreadySpawned);
    assert_eq!(h.live_ids(), before);
    assert_eq!(h.listener.created().len(), 1);
    assert_eq!(h.factory.created().len(), 1);
    assert_eq!(h.solver.listener_count(), 1);
}

#[test]
fn spawn_after_solver_split_creates_every_fragment() {
    let mut h = FamilyHarness::chain(6);
    // Split before the family listens: the event is never delivered.
    let _ = h.solver.split(SolverActorId(0), 3);

    h.family.spawn(Transform::IDENTITY).unwrap();
    assert_eq!(h.family.tracker().len(), 3);
    for solver_actor in h.solver.active_actors() {
        let actor = h.actor_for(solver_actor);
        assert_eq!(h.solver.user_data(solver_actor), Some(actor.id()));
        assert_eq!(actor.chunk_indices().len(), 2);
    }
}

#[test]
fn spawn_descriptors_follow_configuration() {
    let mut h = FamilyHarness::builder(chain_asset(2))
        .physics_material(PhysicsMaterialId(9))
        .actor_configuration(ActorConfiguration {
            simulated: false,
            ccd_enabled: true,
        })
        .build();
    let t = Transform::new(Vec3::new(0.0, 5.0, 0.0), Quat::IDENTITY, 3.0);
    h.family.spawn(t).unwrap();

    let (_, desc) = h.factory.created().remove(0);
    assert_eq!(desc.physics_material, PhysicsMaterialId(9));
    assert!(!desc.body_configuration.start_simulation_enabled);
    assert!(desc.body_configuration.ccd_enabled);
    assert_eq!(desc.scale, 3.0);
    assert_eq!(desc.parent_center_of_mass, t.translation);
    assert_eq!(desc.parent_linear_velocity, Vec3::ZERO);
}

#[test]
fn entity_components_depend_on_static_flag() {
    let mut dynamic = FamilyHarness::chain(2);
    dynamic.family.spawn(Transform::IDENTITY).unwrap();
    let mut fixed = FamilyHarness::builder(chain_asset(2))
        .static_chunks([1])
        .build();
    fixed.family.spawn(Transform::IDENTITY).unwrap();

    assert!(!dynamic.only_actor().is_static());
    assert!(fixed.only_actor().is_static());
    assert_eq!(
        dynamic.entities.created()[0].1.as_slice(),
        &[COMPONENT_RENDER, COMPONENT_RIGID_BODY]
    );
    assert_eq!(fixed.entities.created()[0].1.as_slice(), &[COMPONENT_RENDER]);
    assert_eq!(
        dynamic.only_actor().entity(),
        dynamic.entities.created()[0].0
    );
}

// ── Despawn ──────────────────────────────────────────────────────────

#[test]
fn despawn_destroys_every_actor_and_unsubscribes() {
    let mut h = FamilyHarness::chain(4);
    h.family.spawn(Transform::IDENTITY).unwrap();
    let root = h.only_actor().id();
    let split = h.split(root, 2);
    h.family.handle_events(&[split]);
    let live = h.live_ids();
    assert_eq!(live.len(), 2);
    h.listener.clear();

    h.family.despawn().unwrap();

    assert!(!h.family.is_spawned());
    assert!(h.family.tracker().is_empty());
    assert_eq!(h.solver.listener_count(), 0);
    for solver_actor in h.solver.active_actors() {
        assert_eq!(h.solver.user_data(solver_actor), None);
    }

    let mut destroyed = h.listener.destroyed();
    destroyed.sort();
    assert_eq!(destroyed, live);
    assert!(h.listener.created().is_empty());
    for n in h.listener.notifications() {
        assert!(matches!(n, Notification::Destroyed { tracked: false, .. }));
    }
}

#[test]
fn despawn_when_unspawned_is_an_error_and_a_no_op() {
    let mut h = FamilyHarness::chain(2);
    assert_eq!(h.family.despawn(), Err(FamilyError::NotSpawned));
    assert!(h.listener.notifications().is_empty());
}

#[test]
fn respawn_after_despawn_uses_the_new_transform() {
    let mut h = FamilyHarness::chain(2);
    h.family.spawn(Transform::IDENTITY).unwrap();
    let first = h.only_actor().id();
    h.family.despawn().unwrap();

    let t = Transform::from_translation(Vec3::new(0.0, 0.0, 7.0));
    h.family.spawn(t).unwrap();
    let second = h.only_actor().id();
    assert_ne!(first, second);
    assert_eq!(h.family.initial_transform(), t);
    assert_eq!(h.solver.listener_count(), 1);
}

#[test]
fn dropping_a_spawned_family_despawns_it() {
    let h = FamilyHarness::chain(3);
    let FamilyHarness {
        mut family,
        solver,
        factory,
        listener,
        ..
    } = h;
    family.spawn(Transform::IDENTITY).unwrap();
    let id = family.tracker().ids()[0];
    drop(family);

    assert_eq!(factory.destroyed(), vec![id]);
    assert_eq!(listener.destroyed(), vec![id]);
    assert_eq!(solver.listener_count(), 0);
}

#[test]
fn dropping_an_unspawned_family_notifies_nothing() {
    let h = FamilyHarness::chain(3);
    let FamilyHarness {
        family, listener, ..
    } = h;
    drop(family);
    assert!(listener.notifications().is_empty());
}

// ── Single-actor destruction ─────────────────────────────────────────

#[test]
fn destroy_actor_removes_own_actor() {
    let mut h = FamilyHarness::chain(2);
    h.family.spawn(Transform::IDENTITY).unwrap();
    let id = h.only_actor().id();

    assert!(h.family.destroy_actor(id));
    assert!(h.family.tracker().is_empty());
    assert_eq!(h.solver.user_data(SolverActorId(0)), None);
    assert_eq!(h.factory.destroyed(), vec![id]);
    assert_eq!(h.listener.destroyed(), vec![id]);
}

#[test]
fn destroy_actor_rejects_foreign_actor() {
    let mut a = FamilyHarness::chain(2);
    let mut b = FamilyHarness::chain(2);
    a.family.spawn(Transform::IDENTITY).unwrap();
    b.family.spawn(Transform::IDENTITY).unwrap();
    let foreign = b.only_actor().id();

    assert!(!a.family.destroy_actor(foreign));
    assert_eq!(a.family.tracker().len(), 1);
    assert!(b.family.tracker().contains(foreign));
    assert!(a.listener.destroyed().is_empty());
    assert!(a.factory.destroyed().is_empty());
}

// ── Construction ─────────────────────────────────────────────────────

#[test]
fn construction_requests_material_scaled_health_in_group() {
    let h = FamilyHarness::builder(chain_asset(3))
        .material(4.0)
        .group(GroupId(2))
        .build();
    let req = &h.framework.requests()[0];
    assert_eq!(req.uniform_initial_bond_health, 4.0);
    assert_eq!(req.uniform_initial_lower_support_chunk_health, 4.0);
    assert_eq!(req.group, Some(GroupId(2)));
    assert!(h.family.tracker().is_empty());
    assert!(h.listener.notifications().is_empty());
}

#[test]
fn construction_fails_when_framework_cannot_create_family() {
    let asset = Arc::new(chain_asset(3));
    let mut framework = MockFramework::failing();
    let result = Family::new(
        FamilyDesc {
            asset: Arc::clone(&asset),
            material: FractureMaterial::default(),
            physics_material: PhysicsMaterialId::default(),
            actor_configuration: ActorConfiguration::default(),
            group: None,
            factory: Box::new(MockActorFactory::new(asset)),
            entity_provider: Box::new(MockEntityProvider::new()),
            listener: Box::new(RecordingListener::new()),
        },
        &mut framework,
    );
    assert!(matches!(result, Err(FamilyError::SolverFamilyCreation)));
}
