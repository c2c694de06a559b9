//! Core types and traits for the Splinter fracture-family framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Splinter workspace:
//! identifiers, transforms, solver events, asset topology, actor
//! descriptors, error types, and the collaborator traits a host
//! application implements (solver, actor factory, entity provider,
//! simulated body).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod actor;
pub mod asset;
pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod math;
pub mod traits;

pub use actor::{Actor, ActorDescriptor, BodyConfiguration};
pub use asset::{
    AccelerationStructure, BondDesc, ChunkDesc, FractureAsset, RawDebugLine, SupportGraph,
};
pub use config::{ActorConfiguration, FractureMaterial};
pub use error::{ConfigError, DuplicateActor, FamilyError};
pub use event::{SolverActorDesc, SolverEvent, SplitEvent, SplitParent};
pub use id::{
    ActorId, ChunkIndices, ComponentManifest, ComponentTypeId, EntityId, FamilyId, GroupId,
    PhysicsMaterialId, SolverActorId,
};
pub use math::Transform;
pub use traits::{
    ActorFactory, EntityProvider, FractureFramework, SimulatedBody, SolverEventSink, SolverFamily,
};
