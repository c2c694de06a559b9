//! Rigid transform with uniform scale.
//!
//! Families are spawned with a single uniform scale factor that applies
//! to every descendant actor. Physics bodies report unscaled transforms,
//! so the family re-applies its scale exactly once when deriving child
//! state (see [`Transform::multiply_by_uniform_scale`]).

use glam::{Quat, Vec3};

/// Translation, rotation, and uniform scale.
///
/// Conventions:
/// - `scale` is applied first, then `rotation`, then `translation`.
/// - `rotation` is expected to be a unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
    /// Uniform scale factor.
    pub scale: f32,
}

impl Transform {
    /// Identity transform (no translation, no rotation, unit scale).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Creates a transform from components.
    pub fn new(translation: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation with unit scale.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotation and translation with unit scale.
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale: 1.0,
        }
    }

    /// The uniform scale factor.
    pub fn uniform_scale(&self) -> f32 {
        self.scale
    }

    /// Multiply the current scale by `factor`.
    pub fn multiply_by_uniform_scale(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Map a point from local space into the space this transform targets.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.translation
    }

    /// Rotate and scale a direction; translation is ignored.
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (vector * self.scale)
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
