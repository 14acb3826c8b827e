//! `DrawBackend` over Bevy immediate-mode gizmos.
//!
//! Gizmos are line-only, so filled primitives come out as outlines. The GL
//! style transform stack is kept here as a plain `Vec<Transform>`.

use bevy::math::Isometry3d;
use bevy::prelude::*;
use holotree_detail::{DrawBackend, Rgba};

/// Segments used to fake a cylinder's side walls.
const CYLINDER_SIDES: usize = 6;

/// World height of the ground plane for flat rings.
const GROUND_HEIGHT: f32 = 0.0;

pub fn to_bevy_color(color: Rgba) -> Color {
    Color::srgba_u8(color.r, color.g, color.b, color.a)
}

/// Draws detail view primitives through a borrowed `Gizmos`.
pub struct GizmoBackend<'g, 'w, 's> {
    gizmos: &'g mut Gizmos<'w, 's>,
    current: Transform,
    stack: Vec<Transform>,
}

impl<'g, 'w, 's> GizmoBackend<'g, 'w, 's> {
    pub fn new(gizmos: &'g mut Gizmos<'w, 's>) -> Self {
        Self {
            gizmos,
            current: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    fn point(&self, local: Vec3) -> Vec3 {
        self.current.transform_point(local)
    }

    /// Isometry for a circle centered at `center` facing `normal`.
    fn circle_isometry(&self, center: Vec3, normal: Vec3) -> Isometry3d {
        let world_normal = (self.current.rotation * normal).normalize_or(Vec3::Y);
        Isometry3d::new(
            self.point(center),
            Quat::from_rotation_arc(Vec3::Z, world_normal),
        )
    }
}

impl DrawBackend for GizmoBackend<'_, '_, '_> {
    fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Rgba) {
        let position = self.point(center);
        self.gizmos.sphere(
            Isometry3d::from_translation(position),
            radius * self.current.scale.x,
            to_bevy_color(color),
        );
    }

    fn draw_circle_3d(&mut self, center: Vec3, radius: f32, normal: Vec3, color: Rgba) {
        let isometry = self.circle_isometry(center, normal);
        self.gizmos.circle(isometry, radius, to_bevy_color(color));
    }

    fn draw_cylinder(
        &mut self,
        start: Vec3,
        end: Vec3,
        start_radius: f32,
        end_radius: f32,
        color: Rgba,
    ) {
        let start = self.point(start);
        let end = self.point(end);
        let axis = (end - start).normalize_or(Vec3::Y);
        let color = to_bevy_color(color);
        let rotation = Quat::from_rotation_arc(Vec3::Z, axis);

        if start_radius > 0.0 {
            self.gizmos
                .circle(Isometry3d::new(start, rotation), start_radius, color);
        }
        if end_radius > 0.0 {
            self.gizmos
                .circle(Isometry3d::new(end, rotation), end_radius, color);
        }

        for side in 0..CYLINDER_SIDES {
            let angle = side as f32 / CYLINDER_SIDES as f32 * std::f32::consts::TAU;
            let spoke = rotation * Vec3::new(angle.cos(), angle.sin(), 0.0);
            self.gizmos
                .line(start + spoke * start_radius, end + spoke * end_radius, color);
        }
    }

    fn draw_cuboid(&mut self, center: Vec3, size: Vec3, color: Rgba) {
        // No filled gizmo boxes; draw the outline plus a face diagonal cross.
        self.draw_cuboid_wires(center, size, color);
        let half = size * 0.5;
        let a = self.point(center + Vec3::new(-half.x, -half.y, 0.0));
        let b = self.point(center + Vec3::new(half.x, half.y, 0.0));
        let c = self.point(center + Vec3::new(-half.x, half.y, 0.0));
        let d = self.point(center + Vec3::new(half.x, -half.y, 0.0));
        let color = to_bevy_color(color);
        self.gizmos.line(a, b, color);
        self.gizmos.line(c, d, color);
    }

    fn draw_cuboid_wires(&mut self, center: Vec3, size: Vec3, color: Rgba) {
        let transform = Transform {
            translation: self.point(center),
            rotation: self.current.rotation,
            scale: size * self.current.scale,
        };
        self.gizmos.cube(transform, to_bevy_color(color));
    }

    fn draw_ring(&mut self, center: Vec2, inner_radius: f32, outer_radius: f32, color: Rgba) {
        let isometry = Isometry3d::new(
            Vec3::new(center.x, GROUND_HEIGHT, center.y),
            Quat::from_rotation_arc(Vec3::Z, Vec3::Y),
        );
        let color = to_bevy_color(color);
        self.gizmos.circle(isometry, inner_radius, color);
        self.gizmos.circle(isometry, outer_radius, color);
    }

    fn push_matrix(&mut self) {
        self.stack.push(self.current);
    }

    fn pop_matrix(&mut self) {
        match self.stack.pop() {
            Some(previous) => self.current = previous,
            None => warn!("gizmo backend: pop_matrix on empty stack"),
        }
    }

    fn translate(&mut self, offset: Vec3) {
        self.current = self.current * Transform::from_translation(offset);
    }

    fn rotate(&mut self, axis: Vec3, angle: f32) {
        let rotation = Quat::from_axis_angle(axis.normalize_or(Vec3::Y), angle);
        self.current = self.current * Transform::from_rotation(rotation);
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        // Gizmo lines are never culled.
        trace!("gizmo backend: backface culling {}", enabled);
    }
}
