//! Read-only fracture asset topology.
//!
//! Loading assets is the host's job; this module only defines the shape
//! of the data the family reads: chunk and bond geometry, the support
//! graph that connects support chunks through bonds, health defaults,
//! and an optional acceleration structure used for debug drawing.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::error::ConfigError;

/// Geometry of one asset chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkDesc {
    /// Chunk centroid in asset space.
    pub centroid: Vec3,
    /// Number of visual sub-chunks. Zero for chunks with no render mesh.
    pub visual_subchunk_count: u32,
}

/// Geometry of one bond between two support chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct BondDesc {
    /// Centroid of the bond interface in asset space.
    pub centroid: Vec3,
    /// Interface normal. Not required to be normalized.
    pub normal: Vec3,
    /// Interface area.
    pub area: f32,
}

/// Support graph in compressed adjacency form.
///
/// Node `n` maps to chunk `chunk_indices[n]`; its neighbours are the
/// entries `adjacency_partition[n]..adjacency_partition[n + 1]` of
/// `adjacent_node_indices`, with the connecting bond at the same
/// position in `adjacent_bond_indices`. Every bond appears twice, once
/// from each endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct SupportGraph {
    /// Chunk index per node. May exceed the chunk count for world-bound nodes.
    pub chunk_indices: Vec<u32>,
    /// Offsets into the adjacency arrays; `node_count() + 1` entries.
    pub adjacency_partition: Vec<u32>,
    /// Neighbour node per adjacency entry.
    pub adjacent_node_indices: Vec<u32>,
    /// Bond index per adjacency entry.
    pub adjacent_bond_indices: Vec<u32>,
}

impl Default for SupportGraph {
    /// An empty graph: no nodes and a single zero partition entry.
    fn default() -> Self {
        Self {
            chunk_indices: Vec::new(),
            adjacency_partition: vec![0],
            adjacent_node_indices: Vec::new(),
            adjacent_bond_indices: Vec::new(),
        }
    }
}

impl SupportGraph {
    /// Number of graph nodes.
    pub fn node_count(&self) -> usize {
        self.chunk_indices.len()
    }

    /// Neighbours of `node` as `(adjacent_node, bond_index)` pairs.
    ///
    /// Yields nothing for an out-of-range node.
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = node as usize;
        let range = match (
            self.adjacency_partition.get(n),
            self.adjacency_partition.get(n + 1),
        ) {
            (Some(&start), Some(&end)) => start as usize..end as usize,
            _ => 0..0,
        };
        range.filter_map(move |i| {
            Some((
                *self.adjacent_node_indices.get(i)?,
                *self.adjacent_bond_indices.get(i)?,
            ))
        })
    }

    /// Check structural consistency against `bond_count` bonds.
    pub fn validate(&self, bond_count: usize) -> Result<(), ConfigError> {
        let nodes = self.node_count();
        if self.adjacency_partition.len() != nodes + 1 {
            return Err(ConfigError::InvalidSupportGraph {
                reason: format!(
                    "adjacency_partition has {} entries, expected {}",
                    self.adjacency_partition.len(),
                    nodes + 1
                ),
            });
        }
        if self.adjacent_node_indices.len() != self.adjacent_bond_indices.len() {
            return Err(ConfigError::InvalidSupportGraph {
                reason: format!(
                    "adjacent_node_indices ({}) and adjacent_bond_indices ({}) differ in length",
                    self.adjacent_node_indices.len(),
                    self.adjacent_bond_indices.len()
                ),
            });
        }
        if self.adjacency_partition.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::InvalidSupportGraph {
                reason: "adjacency_partition is not monotone".to_string(),
            });
        }
        let last = self.adjacency_partition.last().copied().unwrap_or(0) as usize;
        if last != self.adjacent_node_indices.len() {
            return Err(ConfigError::InvalidSupportGraph {
                reason: format!(
                    "adjacency_partition ends at {last}, adjacency arrays have {} entries",
                    self.adjacent_node_indices.len()
                ),
            });
        }
        if let Some(&n) = self
            .adjacent_node_indices
            .iter()
            .find(|&&n| n as usize >= nodes)
        {
            return Err(ConfigError::InvalidSupportGraph {
                reason: format!("adjacent node {n} out of range ({nodes} nodes)"),
            });
        }
        if let Some(&b) = self
            .adjacent_bond_indices
            .iter()
            .find(|&&b| b as usize >= bond_count)
        {
            return Err(ConfigError::InvalidSupportGraph {
                reason: format!("bond {b} out of range ({bond_count} bonds)"),
            });
        }
        Ok(())
    }
}

/// A debug line as produced by an acceleration structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDebugLine {
    /// Start point in asset space.
    pub p0: Vec3,
    /// End point in asset space.
    pub p1: Vec3,
    /// Packed `0xAARRGGBB` color.
    pub color: u32,
}

/// Spatial acceleration structure over the asset's chunks (e.g. an AABB tree).
pub trait AccelerationStructure: Send + Sync {
    /// Wireframe of the whole structure. `segments` selects segment
    /// rendering over centroid rendering.
    fn debug_lines(&self, segments: bool) -> Vec<RawDebugLine>;
}

/// Fracture asset shared by every family spawned from it.
#[derive(Clone)]
pub struct FractureAsset {
    /// All chunks, indexed by chunk index.
    pub chunks: Vec<ChunkDesc>,
    /// All bonds, indexed by bond index.
    pub bonds: Vec<BondDesc>,
    /// Support graph over support chunks.
    pub graph: SupportGraph,
    /// Largest bond health the asset was authored with. Default: 1.0.
    pub bond_health_max: f32,
    /// Authored initial health of every bond. Default: 1.0.
    pub default_bond_health: f32,
    /// Authored initial health of lower-support chunks. Default: 1.0.
    pub default_lower_support_chunk_health: f32,
    /// Optional acceleration structure for debug drawing.
    pub accelerator: Option<Arc<dyn AccelerationStructure>>,
}

impl Default for FractureAsset {
    fn default() -> Self {
        Self {
            chunks: Vec::new(),
            bonds: Vec::new(),
            graph: SupportGraph::default(),
            bond_health_max: 1.0,
            default_bond_health: 1.0,
            default_lower_support_chunk_health: 1.0,
            accelerator: None,
        }
    }
}

impl FractureAsset {
    /// Number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Validate health values and support graph structure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bond_health_max.is_finite() || self.bond_health_max <= 0.0 {
            return Err(ConfigError::InvalidBondHealthMax {
                value: self.bond_health_max,
            });
        }
        for value in [
            self.default_bond_health,
            self.default_lower_support_chunk_health,
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDefaultHealth { value });
            }
        }
        self.graph.validate(self.bonds.len())
    }
}

impl fmt::Debug for FractureAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FractureAsset")
            .field("chunks", &self.chunks.len())
            .field("bonds", &self.bonds.len())
            .field("graph_nodes", &self.graph.node_count())
            .field("bond_health_max", &self.bond_health_max)
            .field("default_bond_health", &self.default_bond_health)
            .field(
                "default_lower_support_chunk_health",
                &self.default_lower_support_chunk_health,
            )
            .field("has_accelerator", &self.accelerator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three nodes in a line: 0 -b0- 1 -b1- 2.
    fn line_graph() -> SupportGraph {
        SupportGraph {
            chunk_indices: vec![1, 2, 3],
            adjacency_partition: vec![0, 1, 3, 4],
            adjacent_node_indices: vec![1, 0, 2, 1],
            adjacent_bond_indices: vec![0, 0, 1, 1],
        }
    }

    #[test]
    fn neighbors_follow_partition() {
        let g = line_graph();
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), vec![(1, 0)]);
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
        assert_eq!(g.neighbors(9).count(), 0);
    }

    #[test]
    fn valid_graph_passes() {
        assert!(line_graph().validate(2).is_ok());
    }

    #[test]
    fn short_partition_fails() {
        let mut g = line_graph();
        g.adjacency_partition.pop();
        assert!(matches!(
            g.validate(2),
            Err(ConfigError::InvalidSupportGraph { .. })
        ));
    }

    #[test]
    fn bond_out_of_range_fails() {
        assert!(matches!(
            line_graph().validate(1),
            Err(ConfigError::InvalidSupportGraph { .. })
        ));
    }

    #[test]
    fn non_monotone_partition_fails() {
        let mut g = line_graph();
        g.adjacency_partition = vec![0, 3, 1, 4];
        assert!(g.validate(2).is_err());
    }

    #[test]
    fn asset_rejects_zero_bond_health_max() {
        let asset = FractureAsset {
            bond_health_max: 0.0,
            ..FractureAsset::default()
        };
        assert_eq!(
            asset.validate(),
            Err(ConfigError::InvalidBondHealthMax { value: 0.0 })
        );
    }

    #[test]
    fn empty_default_asset_is_valid() {
        assert!(FractureAsset::default().validate().is_ok());
    }
}
