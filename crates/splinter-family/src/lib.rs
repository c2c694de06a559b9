//! Fracture family lifecycle for the Splinter framework.
//!
//! A [`Family`] owns one solver family and keeps a consistent set of live
//! actors as the solver reports splits. Building blocks, leaves first:
//!
//! - [`ActorTracker`]: the registry of live actors.
//! - [`ActorStateCalculator`]: derives spawn descriptors from a parent's
//!   physical state and the solver's topology.
//! - [`Family`]: the spawn/despawn state machine and split handling.
//! - [`debug`]: bond-health and acceleration-structure debug lines.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod calculator;
pub mod debug;
pub mod family;
pub mod listener;
pub mod metrics;
pub mod tracker;

pub use calculator::ActorStateCalculator;
pub use debug::{Color, DebugLine, DebugRenderBuffer, DebugRenderMode};
pub use family::{Family, FamilyDesc};
pub use listener::{FamilyListener, FamilyView};
pub use metrics::FamilyMetrics;
pub use tracker::ActorTracker;
