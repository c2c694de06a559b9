//! Debug line generation for fracture topology.
//!
//! Lines are produced in an actor's local frame by the `fill_*` functions
//! and moved to world space by [`Family::fill_debug_render()`](crate::Family::fill_debug_render).
//! Nothing here affects simulation.

use glam::{Quat, Vec3};
use splinter_core::{FractureAsset, Transform};

// ── Color ───────────────────────────────────────────────────────

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    /// Bond normal lines.
    pub const BOND_NORMAL: Self = Self::new(0.0, 0.8, 1.0, 1.0);
    /// Centroids of bonds between chunks with no visual geometry.
    pub const BOND_INVISIBLE: Self = Self::new(0.65, 0.16, 0.16, 1.0);

    /// Create a color from components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed `0xAARRGGBB` color.
    pub fn from_u32(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }

    /// Componentwise linear blend; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

/// Color for a bond with health fraction `health` in `[0, 1]`.
///
/// Red at 0, yellow at 0.5, green at 1.
pub fn bond_health_color(health: f32) -> Color {
    if health < 0.5 {
        Color::RED.lerp(Color::YELLOW, 2.0 * health)
    } else {
        Color::YELLOW.lerp(Color::GREEN, 2.0 * health - 1.0)
    }
}

// ── Buffer ──────────────────────────────────────────────────────

/// One colored line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    /// Start point.
    pub p0: Vec3,
    /// End point.
    pub p1: Vec3,
    /// Line color.
    pub color: Color,
}

impl DebugLine {
    /// Create a line.
    pub fn new(p0: Vec3, p1: Vec3, color: Color) -> Self {
        Self { p0, p1, color }
    }
}

/// Lines accumulated across one or more families.
#[derive(Clone, Debug, Default)]
pub struct DebugRenderBuffer {
    /// Accumulated lines, in world space once filled by a family.
    pub lines: Vec<DebugLine>,
}

impl DebugRenderBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// What to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DebugRenderMode {
    /// Nothing.
    #[default]
    Disabled,
    /// Chunk-to-chunk lines for every visible bond, colored by health.
    HealthGraph,
    /// A square and a normal line at every bond centroid.
    Centroids,
    /// Both [`HealthGraph`](Self::HealthGraph) and [`Centroids`](Self::Centroids).
    HealthGraphCentroids,
    /// Acceleration structure, drawn as centroids.
    AabbTreeCentroids,
    /// Acceleration structure, drawn as segments.
    AabbTreeSegments,
}

impl DebugRenderMode {
    /// Whether this mode walks the bond graph.
    pub fn draws_health_graph(self) -> bool {
        matches!(
            self,
            Self::HealthGraph | Self::Centroids | Self::HealthGraphCentroids
        )
    }

    /// Whether this mode draws bond centroids.
    pub fn draws_centroids(self) -> bool {
        matches!(self, Self::Centroids | Self::HealthGraphCentroids)
    }

    /// Whether this mode draws chunk-to-chunk bond lines.
    pub fn draws_bond_lines(self) -> bool {
        matches!(self, Self::HealthGraph | Self::HealthGraphCentroids)
    }

    /// Whether this mode draws the acceleration structure.
    pub fn draws_accelerator(self) -> bool {
        matches!(self, Self::AabbTreeCentroids | Self::AabbTreeSegments)
    }
}

// ── Line generation ─────────────────────────────────────────────

const NORMAL_LENGTH: f32 = 0.5;

/// Push a square of `area` centered at `centroid` and facing `normal`,
/// followed by a normal line.
///
/// The square is skipped if its corners are not finite (a normal
/// pointing straight down -Z has no well-defined rotation from +Z).
pub fn push_centroid(
    lines: &mut Vec<DebugLine>,
    centroid: Vec3,
    color: Color,
    area: f32,
    normal: Vec3,
) {
    let axis = Vec3::Z.cross(normal);
    let d = Vec3::Z.dot(normal);
    let rotation = Quat::from_xyzw(axis.x, axis.y, axis.z, 1.0 + d).normalize();
    let frame = Transform::from_rotation_translation(rotation, centroid);

    let e = 0.5f32.sqrt();
    let r = area.sqrt();
    let corners = [
        frame.transform_point(Vec3::new(-e, e, 0.0) * r),
        frame.transform_point(Vec3::new(e, e, 0.0) * r),
        frame.transform_point(Vec3::new(e, -e, 0.0) * r),
        frame.transform_point(Vec3::new(-e, -e, 0.0) * r),
    ];
    if corners.iter().all(|c| c.is_finite()) {
        for i in 0..4 {
            lines.push(DebugLine::new(corners[(i + 3) % 4], corners[i], color));
        }
    }

    lines.push(DebugLine::new(
        centroid,
        centroid + normal * NORMAL_LENGTH,
        Color::BOND_NORMAL,
    ));
}

/// Push bond-graph lines for the support nodes `nodes` of one actor.
///
/// `bond_healths` is indexed by bond index. Each bond is visited once,
/// from its lower-numbered node. Malformed graph or asset indices skip
/// the affected bond.
pub fn fill_health_graph(
    lines: &mut Vec<DebugLine>,
    mode: DebugRenderMode,
    asset: &FractureAsset,
    nodes: &[u32],
    bond_healths: &[f32],
    bond_health_max: f32,
) {
    let graph = &asset.graph;
    for &node0 in nodes {
        let Some(&chunk0) = graph.chunk_indices.get(node0 as usize) else {
            continue;
        };
        for (node1, bond_index) in graph.neighbors(node0) {
            if node0 > node1 {
                continue;
            }
            let Some(&chunk1) = graph.chunk_indices.get(node1 as usize) else {
                continue;
            };
            let Some(bond) = asset.bonds.get(bond_index as usize) else {
                continue;
            };

            let c0 = asset.chunks.get(chunk0 as usize);
            let c1 = asset.chunks.get(chunk1 as usize);
            let visible = match (c0, c1) {
                (Some(c0), Some(c1)) => c0.visual_subchunk_count > 0 && c1.visual_subchunk_count > 0,
                _ => false,
            };

            let health = bond_healths.get(bond_index as usize).copied().unwrap_or(0.0);
            let fraction = (health / bond_health_max).clamp(0.0, 1.0);
            let color = bond_health_color(fraction);

            if mode.draws_centroids() {
                push_centroid(
                    lines,
                    bond.centroid,
                    if visible { color } else { Color::BOND_INVISIBLE },
                    bond.area,
                    bond.normal.normalize_or_zero(),
                );
            }

            if mode.draws_bond_lines() {
                if let (true, Some(c0), Some(c1)) = (visible, c0, c1) {
                    lines.push(DebugLine::new(c0.centroid, c1.centroid, color));
                }
            }
        }
    }
}

/// Push the asset's acceleration structure lines, if it has one.
pub fn fill_accelerator(lines: &mut Vec<DebugLine>, mode: DebugRenderMode, asset: &FractureAsset) {
    let Some(accelerator) = &asset.accelerator else {
        return;
    };
    let segments = mode == DebugRenderMode::AabbTreeSegments;
    lines.extend(
        accelerator
            .debug_lines(segments)
            .into_iter()
            .map(|raw| DebugLine::new(raw.p0, raw.p1, Color::from_u32(raw.color))),
    );
}

/// Move lines from local space to world space.
pub fn transform_lines(lines: &mut [DebugLine], local_to_world: &Transform) {
    for line in lines {
        line.p0 = local_to_world.transform_point(line.p0);
        line.p1 = local_to_world.transform_point(line.p1);
    }
}
