//! Draw backend seam.
//!
//! The engine never rasterizes anything itself. It issues a small fixed
//! vocabulary of primitives into a [`DrawBackend`]; the host decides how they
//! reach the screen (immediate-mode gizmos, a mesh batcher, a recorder).

use bevy_math::{Vec2, Vec3};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channels normalized to `0.0..=1.0`.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Primitive vocabulary consumed by the detail view.
///
/// Positions are in the space of the current transform; `push_matrix` /
/// `pop_matrix` bracket nested transforms the way immediate-mode GL does.
/// Angles are radians.
pub trait DrawBackend {
    /// Filled sphere.
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Rgba);

    /// Circle outline in the plane perpendicular to `normal`.
    fn draw_circle_3d(&mut self, center: Vec3, radius: f32, normal: Vec3, color: Rgba);

    /// Tapered cylinder from `start` to `end`. A zero `end_radius` is a cone.
    fn draw_cylinder(
        &mut self,
        start: Vec3,
        end: Vec3,
        start_radius: f32,
        end_radius: f32,
        color: Rgba,
    );

    /// Filled axis-aligned box in the current transform.
    fn draw_cuboid(&mut self, center: Vec3, size: Vec3, color: Rgba);

    /// Box outline in the current transform.
    fn draw_cuboid_wires(&mut self, center: Vec3, size: Vec3, color: Rgba);

    /// Flat annulus on the ground plane; `center` is `(x, z)`.
    fn draw_ring(&mut self, center: Vec2, inner_radius: f32, outer_radius: f32, color: Rgba);

    fn push_matrix(&mut self);

    fn pop_matrix(&mut self);

    fn translate(&mut self, offset: Vec3);

    /// Rotate the current transform about `axis` by `angle` radians.
    fn rotate(&mut self, axis: Vec3, angle: f32);

    fn set_backface_culling(&mut self, enabled: bool);
}

// ============================================================================
// RECORDING BACKEND
// ============================================================================

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sphere {
        center: Vec3,
        radius: f32,
        color: Rgba,
    },
    Circle3d {
        center: Vec3,
        radius: f32,
        normal: Vec3,
        color: Rgba,
    },
    Cylinder {
        start: Vec3,
        end: Vec3,
        start_radius: f32,
        end_radius: f32,
        color: Rgba,
    },
    Cuboid {
        center: Vec3,
        size: Vec3,
        color: Rgba,
    },
    CuboidWires {
        center: Vec3,
        size: Vec3,
        color: Rgba,
    },
    Ring {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        color: Rgba,
    },
    PushMatrix,
    PopMatrix,
    Translate(Vec3),
    Rotate {
        axis: Vec3,
        angle: f32,
    },
    BackfaceCulling(bool),
}

impl DrawCommand {
    /// Color of a drawing command; `None` for state changes.
    pub fn color(&self) -> Option<Rgba> {
        match self {
            Self::Sphere { color, .. }
            | Self::Circle3d { color, .. }
            | Self::Cylinder { color, .. }
            | Self::Cuboid { color, .. }
            | Self::CuboidWires { color, .. }
            | Self::Ring { color, .. } => Some(*color),
            _ => None,
        }
    }
}

/// Backend that records every call, for tests and frame inspection.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count commands matching a predicate.
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// All recorded spheres as `(center, radius, color)`.
    pub fn spheres(&self) -> Vec<(Vec3, f32, Rgba)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sphere {
                    center,
                    radius,
                    color,
                } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    /// Current push depth after replaying the recorded commands.
    pub fn matrix_depth(&self) -> isize {
        self.commands.iter().fold(0, |depth, c| match c {
            DrawCommand::PushMatrix => depth + 1,
            DrawCommand::PopMatrix => depth - 1,
            _ => depth,
        })
    }
}

impl DrawBackend for RecordingBackend {
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Sphere {
            center,
            radius,
            color,
        });
    }

    fn draw_circle_3d(&mut self, center: Vec3, radius: f32, normal: Vec3, color: Rgba) {
        self.commands.push(DrawCommand::Circle3d {
            center,
            radius,
            normal,
            color,
        });
    }

    fn draw_cylinder(
        &mut self,
        start: Vec3,
        end: Vec3,
        start_radius: f32,
        end_radius: f32,
        color: Rgba,
    ) {
        self.commands.push(DrawCommand::Cylinder {
            start,
            end,
            start_radius,
            end_radius,
            color,
        });
    }

    fn draw_cuboid(&mut self, center: Vec3, size: Vec3, color: Rgba) {
        self.commands.push(DrawCommand::Cuboid {
            center,
            size,
            color,
        });
    }

    fn draw_cuboid_wires(&mut self, center: Vec3, size: Vec3, color: Rgba) {
        self.commands.push(DrawCommand::CuboidWires {
            center,
            size,
            color,
        });
    }

    fn draw_ring(&mut self, center: Vec2, inner_radius: f32, outer_radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Ring {
            center,
            inner_radius,
            outer_radius,
            color,
        });
    }

    fn push_matrix(&mut self) {
        self.commands.push(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        self.commands.push(DrawCommand::PopMatrix);
    }

    fn translate(&mut self, offset: Vec3) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.commands.push(DrawCommand::Rotate { axis, angle });
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        self.commands.push(DrawCommand::BackfaceCulling(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_normalized() {
        let c = Rgba::new(255, 0, 51, 255).to_f32_array();
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.2).abs() < 1e-6);
        assert_eq!(Rgba::new(1, 2, 3, 4).with_alpha(9).a, 9);
    }

    #[test]
    fn test_recording_tracks_matrix_depth() {
        let mut backend = RecordingBackend::new();
        backend.push_matrix();
        backend.translate(Vec3::X);
        backend.push_matrix();
        assert_eq!(backend.matrix_depth(), 2);
        backend.pop_matrix();
        backend.pop_matrix();
        assert_eq!(backend.matrix_depth(), 0);
        assert_eq!(backend.commands().len(), 5);
        assert!(backend.commands()[1].color().is_none());
    }
}
