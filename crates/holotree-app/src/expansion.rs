//! Stand-in expansion: a single sphere that grows when opened and shrinks
//! back when closed. Supplies the detail view's origin and scale.

use bevy::prelude::*;
use holotree_detail::Expansion;

/// Scale of the sphere while collapsed.
pub const COLLAPSED_SCALE: f32 = 0.25;

/// Scale of the sphere while fully expanded.
pub const EXPANDED_SCALE: f32 = 1.0;

#[derive(Resource, Debug, Clone)]
pub struct ExpansionState {
    pub position: Vec3,
    pub scale: f32,
    pub open: bool,
    /// Scale units per second.
    pub speed: f32,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.6, 0.0),
            scale: COLLAPSED_SCALE,
            open: false,
            speed: 1.5,
        }
    }
}

impl ExpansionState {
    fn target_scale(&self) -> f32 {
        if self.open {
            EXPANDED_SCALE
        } else {
            COLLAPSED_SCALE
        }
    }

    /// Ease the scale toward its target without overshooting.
    pub fn advance(&mut self, delta_seconds: f32) {
        let step = self.speed * delta_seconds.max(0.0);
        let target = self.target_scale();
        let remaining = target - self.scale;
        if remaining.abs() <= step {
            self.scale = target;
        } else {
            self.scale += step.copysign(remaining);
        }
    }

    /// 0 when collapsed, 1 when fully expanded.
    pub fn progress(&self) -> f32 {
        ((self.scale - COLLAPSED_SCALE) / (EXPANDED_SCALE - COLLAPSED_SCALE)).clamp(0.0, 1.0)
    }
}

impl Expansion for ExpansionState {
    fn current_position(&self) -> Vec3 {
        self.position
    }

    fn primary_scale(&self) -> f32 {
        self.scale
    }
}

/// Grow or shrink the sphere each frame.
pub fn advance_expansion(time: Res<Time>, mut expansion: ResMut<ExpansionState>) {
    expansion.advance(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_reaches_target_without_overshoot() {
        let mut expansion = ExpansionState {
            open: true,
            ..default()
        };
        for _ in 0..100 {
            expansion.advance(0.1);
        }
        assert_eq!(expansion.scale, EXPANDED_SCALE);
        assert_eq!(expansion.progress(), 1.0);

        expansion.open = false;
        expansion.advance(0.1);
        assert!(expansion.scale < EXPANDED_SCALE);
        assert!(expansion.scale > COLLAPSED_SCALE);
    }

    #[test]
    fn test_negative_delta_holds() {
        let mut expansion = ExpansionState {
            open: true,
            ..default()
        };
        expansion.advance(-1.0);
        assert_eq!(expansion.scale, COLLAPSED_SCALE);
    }
}
