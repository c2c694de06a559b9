//! Spawn descriptors for new actors.
//!
//! [`ActorStateCalculator`] splits a new actor's state into two sources:
//!
//! - **Identity and geometry** (visible chunks, static/leaf
//!   classification, component manifest) come from the actor factory's
//!   queries against the solver's *current* topology for the new solver
//!   actor. They are never inherited from the parent.
//! - **Kinematics** (angular and linear velocity, center of mass) come
//!   from the parent body, and only when that body exists and is
//!   dynamic. Children of a static structure start at rest.

use glam::Vec3;
use splinter_core::{
    ActorConfiguration, ActorDescriptor, ActorFactory, BodyConfiguration, FamilyId,
    PhysicsMaterialId, SimulatedBody, SolverActorId, SolverFamily, Transform,
};

/// Pure descriptor derivation for one family.
///
/// Borrows everything it reads; building a calculator is free, so the
/// family creates one per batch.
pub struct ActorStateCalculator<'a> {
    family: FamilyId,
    physics_material: PhysicsMaterialId,
    actor_configuration: &'a ActorConfiguration,
    factory: &'a dyn ActorFactory,
    solver: &'a dyn SolverFamily,
}

impl<'a> ActorStateCalculator<'a> {
    /// Create a calculator over a family's configuration and collaborators.
    pub fn new(
        family: FamilyId,
        physics_material: PhysicsMaterialId,
        actor_configuration: &'a ActorConfiguration,
        factory: &'a dyn ActorFactory,
        solver: &'a dyn SolverFamily,
    ) -> Self {
        Self {
            family,
            physics_material,
            actor_configuration,
            factory,
            solver,
        }
    }

    /// Descriptor for an actor with no parent context.
    ///
    /// Used at spawn: the body is placed at `transform`, starts at rest,
    /// and its parent center of mass is the transform's translation.
    pub fn derive_initial_descriptor(
        &self,
        transform: &Transform,
        solver_actor: SolverActorId,
    ) -> ActorDescriptor {
        let chunk_indices = self
            .factory
            .calculate_visible_chunks(self.solver, solver_actor);
        let is_static = self
            .factory
            .calculate_is_static(self.solver, solver_actor, &chunk_indices);
        let is_leaf_chunk =
            self.factory
                .calculate_is_leaf_chunk(self.solver, solver_actor, &chunk_indices);
        let components = self.factory.calculate_components(is_static);

        ActorDescriptor {
            family: self.family,
            solver_actor,
            physics_material: self.physics_material,
            chunk_indices,
            is_static,
            is_leaf_chunk,
            components,
            parent_center_of_mass: transform.translation,
            parent_linear_velocity: Vec3::ZERO,
            body_configuration: BodyConfiguration {
                position: transform.translation,
                orientation: transform.rotation,
                ccd_enabled: self.actor_configuration.ccd_enabled,
                start_simulation_enabled: self.actor_configuration.simulated,
                initial_angular_velocity: Vec3::ZERO,
            },
            scale: transform.uniform_scale(),
        }
    }

    /// Descriptor for a child produced by splitting a parent actor.
    ///
    /// `parent_transform` is the parent's world transform with the
    /// family's uniform scale already applied. Velocities and center of
    /// mass are inherited only if `parent_body` is present and
    /// `parent_is_static` is false; otherwise they are zero and the
    /// center of mass sits at `parent_transform`'s origin.
    pub fn derive_child_descriptor(
        &self,
        parent_body: Option<&dyn SimulatedBody>,
        parent_is_static: bool,
        parent_transform: &Transform,
        child: SolverActorId,
    ) -> ActorDescriptor {
        let mut desc = self.derive_initial_descriptor(parent_transform, child);

        let dynamic_parent = parent_body.filter(|_| !parent_is_static);
        let (angular_velocity, linear_velocity, com_local) = match dynamic_parent {
            Some(body) => (
                body.angular_velocity(),
                body.linear_velocity(),
                body.center_of_mass_local(),
            ),
            None => (Vec3::ZERO, Vec3::ZERO, Vec3::ZERO),
        };

        desc.body_configuration.initial_angular_velocity = angular_velocity;
        desc.parent_linear_velocity = linear_velocity;
        desc.parent_center_of_mass = parent_transform.transform_point(com_local);
        desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use splinter_test_utils::{chain_asset, BodyState, MockActorFactory, MockBody, MockSolverFamily};
    use std::sync::Arc;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    struct Fixture {
        family: FamilyId,
        config: ActorConfiguration,
        factory: MockActorFactory,
        solver: MockSolverFamily,
    }

    impl Fixture {
        fn new() -> Self {
            let asset = Arc::new(chain_asset(4));
            Self {
                family: FamilyId::next(),
                config: ActorConfiguration {
                    simulated: true,
                    ccd_enabled: true,
                },
                factory: MockActorFactory::new(Arc::clone(&asset)),
                solver: MockSolverFamily::new(asset),
            }
        }

        fn calc(&self) -> ActorStateCalculator<'_> {
            ActorStateCalculator::new(
                self.family,
                PhysicsMaterialId(3),
                &self.config,
                &self.factory,
                &self.solver,
            )
        }
    }

    fn dynamic_body() -> MockBody {
        MockBody::new(BodyState {
            transform: Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
            linear_velocity: Vec3::new(1.0, 2.0, 3.0),
            angular_velocity: Vec3::new(0.0, 0.5, 0.0),
            center_of_mass_local: Vec3::new(0.0, 1.0, 0.0),
        })
    }

    #[test]
    fn initial_descriptor_is_at_rest_at_transform() {
        let fx = Fixture::new();
        let root = fx.solver.active_actors()[0];
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.3),
            2.5,
        );
        let d = fx.calc().derive_initial_descriptor(&t, root);

        assert_eq!(d.family, fx.family);
        assert_eq!(d.solver_actor, root);
        assert_eq!(d.physics_material, PhysicsMaterialId(3));
        assert_eq!(d.body_configuration.position, t.translation);
        assert_eq!(d.body_configuration.orientation, t.rotation);
        assert!(d.body_configuration.ccd_enabled);
        assert!(d.body_configuration.start_simulation_enabled);
        assert_eq!(d.body_configuration.initial_angular_velocity, Vec3::ZERO);
        assert_eq!(d.parent_linear_velocity, Vec3::ZERO);
        assert_eq!(d.parent_center_of_mass, t.translation);
        assert_eq!(d.scale, 2.5);
    }

    #[test]
    fn classification_comes_from_solver_topology() {
        let fx = Fixture::new();
        let root = fx.solver.active_actors()[0];
        let d = fx
            .calc()
            .derive_initial_descriptor(&Transform::IDENTITY, root);
        // Chain of 4 support nodes -> chunks 1..=4, not a leaf.
        assert_eq!(d.chunk_indices.as_slice(), &[1, 2, 3, 4]);
        assert!(!d.is_leaf_chunk);
        assert!(!d.is_static);
        assert_eq!(d.components, fx.factory.calculate_components(false));
    }

    #[test]
    fn dynamic_parent_passes_on_velocities_and_center_of_mass() {
        let fx = Fixture::new();
        let child = fx.solver.active_actors()[0];
        let body = dynamic_body();
        let mut parent_t = body.transform();
        parent_t.multiply_by_uniform_scale(2.0);

        let d = fx
            .calc()
            .derive_child_descriptor(Some(&body), false, &parent_t, child);

        assert_eq!(d.parent_linear_velocity, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            d.body_configuration.initial_angular_velocity,
            Vec3::new(0.0, 0.5, 0.0)
        );
        // Local COM (0,1,0) scaled by 2 and offset by (5,0,0).
        assert!(approx(d.parent_center_of_mass, Vec3::new(5.0, 2.0, 0.0)));
        assert_eq!(d.body_configuration.position, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(d.scale, 2.0);
    }

    #[test]
    fn static_parent_children_start_at_rest() {
        let fx = Fixture::new();
        let child = fx.solver.active_actors()[0];
        let body = dynamic_body();
        let parent_t = body.transform();

        let d = fx
            .calc()
            .derive_child_descriptor(Some(&body), true, &parent_t, child);

        assert_eq!(d.parent_linear_velocity, Vec3::ZERO);
        assert_eq!(d.body_configuration.initial_angular_velocity, Vec3::ZERO);
        assert_eq!(d.parent_center_of_mass, parent_t.translation);
    }

    #[test]
    fn missing_parent_body_means_zero_kinematics() {
        let fx = Fixture::new();
        let child = fx.solver.active_actors()[0];
        let parent_t = Transform::from_translation(Vec3::new(0.0, 0.0, 9.0));

        let d = fx
            .calc()
            .derive_child_descriptor(None, false, &parent_t, child);

        assert_eq!(d.parent_linear_velocity, Vec3::ZERO);
        assert_eq!(d.body_configuration.initial_angular_velocity, Vec3::ZERO);
        assert_eq!(d.parent_center_of_mass, Vec3::new(0.0, 0.0, 9.0));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn vec3() -> impl Strategy<Value = Vec3> {
            (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
                .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        proptest! {
            #[test]
            fn dynamic_children_carry_exact_parent_velocities(
                v in vec3(),
                w in vec3(),
                is_static in any::<bool>(),
            ) {
                let fx = Fixture::new();
                let child = fx.solver.active_actors()[0];
                let body = MockBody::new(BodyState {
                    transform: Transform::IDENTITY,
                    linear_velocity: v,
                    angular_velocity: w,
                    center_of_mass_local: Vec3::ZERO,
                });
                let d = fx.calc().derive_child_descriptor(
                    Some(&body),
                    is_static,
                    &Transform::IDENTITY,
                    child,
                );
                if is_static {
                    prop_assert_eq!(d.parent_linear_velocity, Vec3::ZERO);
                    prop_assert_eq!(d.body_configuration.initial_angular_velocity, Vec3::ZERO);
                } else {
                    prop_assert_eq!(d.parent_linear_velocity, v);
                    prop_assert_eq!(d.body_configuration.initial_angular_velocity, w);
                }
            }
        }
    }
}
