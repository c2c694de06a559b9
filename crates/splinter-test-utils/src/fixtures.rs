//! Topology and actor fixtures.
//!
//! - [`chain_asset`]: a straight chain of support chunks along +X.
//! - [`actor_fixture`]: a body-less actor for tracker tests.

use glam::Vec3;
use smallvec::smallvec;
use splinter_core::{
    Actor, ActorDescriptor, BodyConfiguration, BondDesc, ChunkDesc, EntityId, FamilyId,
    FractureAsset, PhysicsMaterialId, SolverActorId, SupportGraph,
};

/// A chain of `n` support chunks under one root chunk.
///
/// Chunk 0 is the root. Chunk `i` (1..=n) has its centroid at `x = i`
/// and one visual sub-chunk. Support node `k` maps to chunk `k + 1`;
/// bond `k` joins nodes `k` and `k + 1`, with its centroid halfway
/// between them and its normal along +X.
pub fn chain_asset(n: u32) -> FractureAsset {
    let mut chunks = vec![ChunkDesc {
        centroid: Vec3::new((n as f32 + 1.0) / 2.0, 0.0, 0.0),
        visual_subchunk_count: 1,
    }];
    chunks.extend((1..=n).map(|i| ChunkDesc {
        centroid: Vec3::new(i as f32, 0.0, 0.0),
        visual_subchunk_count: 1,
    }));

    let bond_count = n.saturating_sub(1);
    let bonds = (0..bond_count)
        .map(|k| BondDesc {
            centroid: Vec3::new(k as f32 + 1.5, 0.0, 0.0),
            normal: Vec3::X,
            area: 1.0,
        })
        .collect();

    let mut graph = SupportGraph {
        chunk_indices: (0..n).map(|k| k + 1).collect(),
        ..SupportGraph::default()
    };
    for k in 0..n {
        if k > 0 {
            graph.adjacent_node_indices.push(k - 1);
            graph.adjacent_bond_indices.push(k - 1);
        }
        if k + 1 < n {
            graph.adjacent_node_indices.push(k + 1);
            graph.adjacent_bond_indices.push(k);
        }
        graph
            .adjacency_partition
            .push(graph.adjacent_node_indices.len() as u32);
    }

    FractureAsset {
        chunks,
        bonds,
        graph,
        ..FractureAsset::default()
    }
}

/// A body-less dynamic actor representing `SolverActorId(solver_actor)`
/// and showing chunk `solver_actor`.
pub fn actor_fixture(solver_actor: u32) -> Actor {
    let desc = ActorDescriptor {
        family: FamilyId::next(),
        solver_actor: SolverActorId(solver_actor),
        physics_material: PhysicsMaterialId::default(),
        chunk_indices: smallvec![solver_actor],
        is_static: false,
        is_leaf_chunk: true,
        components: smallvec![],
        parent_center_of_mass: Vec3::ZERO,
        parent_linear_velocity: Vec3::ZERO,
        body_configuration: BodyConfiguration::default(),
        scale: 1.0,
    };
    Actor::new(&desc, EntityId(u64::from(solver_actor)), None)
}
