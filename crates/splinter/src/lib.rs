//! Splinter: fracture-family lifecycle for destructible bodies.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Splinter sub-crates. A host supplies the fracture solver, the
//! physics bodies, and the entities; Splinter keeps the set of live
//! fragments consistent with the solver's split events.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use splinter::prelude::*;
//! use splinter_test_utils::{
//!     chain_asset, MockActorFactory, MockEntityProvider, MockFramework, RecordingListener,
//! };
//!
//! let asset = Arc::new(chain_asset(4));
//! let mut framework = MockFramework::new(Arc::clone(&asset));
//! let listener = RecordingListener::new();
//!
//! let mut family = Family::new(
//!     FamilyDesc {
//!         asset: Arc::clone(&asset),
//!         material: FractureMaterial::default(),
//!         physics_material: PhysicsMaterialId::default(),
//!         actor_configuration: ActorConfiguration::default(),
//!         group: None,
//!         factory: Box::new(MockActorFactory::new(asset)),
//!         entity_provider: Box::new(MockEntityProvider::new()),
//!         listener: Box::new(listener.clone()),
//!     },
//!     &mut framework,
//! )
//! .unwrap();
//!
//! family.spawn(Transform::IDENTITY).unwrap();
//! assert_eq!(family.tracker().len(), 1);
//!
//! // The solver splits the root actor in two.
//! let solver = framework.last_family().unwrap();
//! let root = family.tracker().actors().next().unwrap().solver_actor();
//! family.receive(&[solver.split(root, 2)]);
//!
//! assert_eq!(family.tracker().len(), 2);
//! assert_eq!(listener.destroyed().len(), 1);
//! assert_eq!(listener.created().len(), 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `splinter-core` | IDs, actors, assets, solver events, host traits, errors |
//! | [`family`] | `splinter-family` | Actor tracker, state calculator, family lifecycle, debug lines |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`splinter-core`).
///
/// Contains the [`types::Actor`] record, fracture assets, solver events,
/// error types, and the host traits ([`types::FractureFramework`],
/// [`types::SolverFamily`], [`types::ActorFactory`],
/// [`types::EntityProvider`], [`types::SimulatedBody`]).
pub use splinter_core as types;

/// Family lifecycle (`splinter-family`).
///
/// [`family::Family`] is the main entry point; [`family::ActorTracker`]
/// and [`family::ActorStateCalculator`] are its building blocks.
pub use splinter_family as family;

/// Common imports for typical Splinter usage.
///
/// ```rust
/// use splinter::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use splinter_core::{
        Actor, ActorConfiguration, ActorDescriptor, ActorId, FamilyId, FractureAsset,
        FractureMaterial, PhysicsMaterialId, SolverActorId, SolverEvent, Transform,
    };

    // Host traits
    pub use splinter_core::{
        ActorFactory, EntityProvider, FractureFramework, SimulatedBody, SolverEventSink,
        SolverFamily,
    };

    // Errors
    pub use splinter_core::{ConfigError, FamilyError};

    // Family
    pub use splinter_family::{
        ActorTracker, DebugRenderBuffer, DebugRenderMode, Family, FamilyDesc, FamilyListener,
        FamilyMetrics, FamilyView,
    };
}
