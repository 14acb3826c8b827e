//! Read-only collaborators borrowed for a single update or render call.

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

/// Fallback room base radius when the configured one is unusable.
pub const DEFAULT_SPHERE_RADIUS: f32 = 0.6;

/// World placement of the expanded sphere the detail view lives in.
pub trait Expansion {
    /// Current world position of the sphere center.
    fn current_position(&self) -> Vec3;

    /// Uniform scale of the sphere. Non-positive values are ignored by the
    /// renderer.
    fn primary_scale(&self) -> f32;
}

/// Plain-value [`Expansion`] for hosts that already have the numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionSnapshot {
    pub position: Vec3,
    pub scale: f32,
}

impl Default for ExpansionSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl ExpansionSnapshot {
    pub fn new(position: Vec3, scale: f32) -> Self {
        Self { position, scale }
    }
}

impl Expansion for ExpansionSnapshot {
    fn current_position(&self) -> Vec3 {
        self.position
    }

    fn primary_scale(&self) -> f32 {
        self.scale
    }
}

/// Shared render tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base radius of a person sphere in world units.
    pub sphere_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_radius: DEFAULT_SPHERE_RADIUS,
        }
    }
}

impl RenderConfig {
    /// `sphere_radius`, or [`DEFAULT_SPHERE_RADIUS`] when non-positive or NaN.
    pub fn base_radius(&self) -> f32 {
        if self.sphere_radius > 0.0 {
            self.sphere_radius
        } else {
            DEFAULT_SPHERE_RADIUS
        }
    }
}

/// Camera state at render time. Passed through for backend symmetry; the
/// room geometry does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Default for CameraSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 4.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_radius_fallback() {
        let mut config = RenderConfig::default();
        assert_eq!(config.base_radius(), 0.6);

        config.sphere_radius = 1.5;
        assert_eq!(config.base_radius(), 1.5);

        config.sphere_radius = -1.0;
        assert_eq!(config.base_radius(), DEFAULT_SPHERE_RADIUS);

        config.sphere_radius = f32::NAN;
        assert_eq!(config.base_radius(), DEFAULT_SPHERE_RADIUS);
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = ExpansionSnapshot::new(Vec3::new(1.0, 2.0, 3.0), 2.5);
        assert_eq!(snapshot.current_position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snapshot.primary_scale(), 2.5);
    }
}
