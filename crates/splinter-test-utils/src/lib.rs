//! Test utilities and mock collaborators for Splinter development.
//!
//! Provides in-memory implementations of the host traits
//! ([`FractureFramework`](splinter_core::FractureFramework),
//! [`SolverFamily`](splinter_core::SolverFamily),
//! [`ActorFactory`](splinter_core::ActorFactory),
//! [`EntityProvider`](splinter_core::EntityProvider),
//! [`SimulatedBody`](splinter_core::SimulatedBody)) plus a
//! [`RecordingListener`], small topology fixtures, and a
//! [`FamilyHarness`] that wires them into a
//! [`Family`](splinter_family::Family).
//!
//! Every mock is `Clone` and clones share state: keep one clone in the
//! test and box the other into the code under test.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod harness;
pub mod listener;
pub mod mocks;

pub use fixtures::{actor_fixture, chain_asset};
pub use harness::{FamilyHarness, HarnessBuilder};
pub use listener::{Notification, RecordingListener};
pub use mocks::{
    BodyState, MockActorFactory, MockBody, MockEntityProvider, MockFramework, MockSolverFamily,
    COMPONENT_RENDER, COMPONENT_RIGID_BODY,
};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Install a `tracing` subscriber for the current test binary.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lock a mutex, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
