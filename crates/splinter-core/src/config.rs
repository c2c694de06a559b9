//! Per-family material and actor configuration.

use crate::error::ConfigError;

/// Destruction material shared by every actor of a family.
///
/// Assets are authored with unit bond health; `health` scales them to the
/// material's strength when the solver family is created, and scales the
/// normalization range of the debug health graph.
#[derive(Clone, Debug, PartialEq)]
pub struct FractureMaterial {
    /// Health multiplier applied to the asset's default bond and
    /// lower-support chunk health. Default: 1.0.
    pub health: f32,
}

impl Default for FractureMaterial {
    fn default() -> Self {
        Self { health: 1.0 }
    }
}

impl FractureMaterial {
    /// Check that `health` is finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.health.is_finite() || self.health <= 0.0 {
            return Err(ConfigError::InvalidMaterialHealth { value: self.health });
        }
        Ok(())
    }
}

/// Rigid-body settings copied into every actor's body configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorConfiguration {
    /// Whether bodies start simulating as soon as they are created. Default: true.
    pub simulated: bool,
    /// Whether continuous collision detection is enabled. Default: false.
    pub ccd_enabled: bool,
}

impl Default for ActorConfiguration {
    fn default() -> Self {
        Self {
            simulated: true,
            ccd_enabled: false,
        }
    }
}
