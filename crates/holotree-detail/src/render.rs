//! Room rendering.
//!
//! Walks the precomputed slots and issues primitives positioned by the
//! current rotation, pulse clock and phases. Nothing is cached between
//! frames; every value below is recomputed from state plus the borrowed
//! collaborators.
//!
//! Emission order: interior sphere, depth rings, timeline markers (stem then
//! node), panels (cone, face, wireframe), exit ring.

use std::f32::consts::FRAC_PI_2;

use bevy_math::{Vec2, Vec3};

use crate::backend::{DrawBackend, Rgba};
use crate::clamp01;
use crate::inputs::{CameraSnapshot, Expansion, RenderConfig};
use crate::layout::{PanelSlot, TimelineSlot};
use crate::view::{DetailView, PANEL_ROTATION_FACTOR};

/// Room radius relative to the expanded sphere.
const ROOM_SCALE: f32 = 1.25;

/// Timeline ring radius as a fraction of the room radius.
const TIMELINE_RING: f32 = 0.72;

/// Inner depth ring relative to the timeline ring.
const INNER_RING: f32 = 0.88;

/// Panel ring radius as a fraction of the room radius.
const PANEL_RING: f32 = 0.58;

/// Vertical spread of timeline markers relative to the room radius.
const TIMELINE_HEIGHT_SCALE: f32 = 0.45;

/// Depth below the room center where marker stems start.
const STEM_DEPTH: f32 = 0.28;

/// Depth below the room center where panel light cones start.
const CONE_DEPTH: f32 = 0.45;

/// Panel sway amplitude (12°).
const SWAY_AMPLITUDE: f32 = 12.0 * std::f32::consts::PI / 180.0;

/// Forward tilt applied to every panel (12°).
const PANEL_TILT: f32 = 12.0 * std::f32::consts::PI / 180.0;

const INTERIOR: Rgba = Rgba::new(18, 24, 40, 0);
const RING_PRIMARY: Rgba = Rgba::new(72, 180, 255, 0);
const RING_SECONDARY: Rgba = Rgba::new(42, 120, 255, 0);
const TIMELINE_NODE: Rgba = Rgba::new(120, 220, 255, 0);
const PANEL_CONE: Rgba = Rgba::new(120, 210, 255, 0);
const PANEL_FACE: Rgba = Rgba::new(200, 232, 255, 0);
const PANEL_RIM: Rgba = Rgba::new(90, 165, 255, 0);
const EXIT_RING: Rgba = Rgba::new(255, 200, 140, 0);

/// Alpha interpolated from `base` to `top` by `t` in `[0, 1]`, truncated.
fn fade(base: u8, top: u8, t: f32) -> u8 {
    let value = base as f32 + (top as f32 - base as f32) * t;
    value.clamp(0.0, 255.0) as u8
}

/// Per-frame values shared by every slot.
struct Frame {
    origin: Vec3,
    room_radius: f32,
    rotation: f32,
    pulse_time: f64,
    activation: f32,
    panel_activation: f32,
}

impl DetailView {
    /// Draw the room into `backend`.
    ///
    /// A missing `config` draws nothing. A missing expansion places the room
    /// at the world origin with unit scale. `_camera` is accepted for
    /// symmetry with the backend and does not affect geometry.
    pub fn render(
        &self,
        expansion: Option<&dyn Expansion>,
        config: Option<&RenderConfig>,
        _camera: Option<&CameraSnapshot>,
        backend: &mut dyn DrawBackend,
    ) {
        let Some(config) = config else {
            return;
        };
        debug_assert!(
            self.is_initialized(),
            "detail view render requires initialized state; call update or reset first"
        );

        let origin = expansion.map_or(Vec3::ZERO, |e| e.current_position());
        let expansion_scale = match expansion.map(|e| e.primary_scale()) {
            Some(scale) if scale > 0.0 => scale,
            _ => 1.0,
        };

        let frame = Frame {
            origin,
            room_radius: config.base_radius() * expansion_scale * ROOM_SCALE,
            rotation: self.rotation(),
            pulse_time: self.pulse_time(),
            activation: clamp01(self.timeline_phase()),
            panel_activation: clamp01(self.panel_phase()),
        };

        draw_room(&frame, backend);
        for slot in self.timeline_slots() {
            draw_timeline_marker(&frame, slot, backend);
        }
        for slot in self.panel_slots() {
            draw_panel(&frame, slot, backend);
        }
        draw_exit_ring(&frame, backend);
    }
}

/// Interior sphere plus the two depth rings.
fn draw_room(frame: &Frame, backend: &mut dyn DrawBackend) {
    let interior = INTERIOR.with_alpha(fade(110, 230, frame.activation));
    backend.set_backface_culling(false);
    backend.draw_sphere(frame.origin, frame.room_radius, interior);
    backend.set_backface_culling(true);

    let ring_radius = frame.room_radius * TIMELINE_RING;
    backend.draw_circle_3d(
        frame.origin,
        ring_radius,
        Vec3::Y,
        RING_PRIMARY.with_alpha(fade(90, 230, frame.activation)),
    );
    backend.draw_circle_3d(
        frame.origin,
        ring_radius * INNER_RING,
        Vec3::Y,
        RING_SECONDARY.with_alpha(fade(70, 180, frame.activation)),
    );
}

/// `sin(time * speed + offset)`, evaluated at clock precision.
fn oscillate(time: f64, speed: f32, offset: f32) -> f32 {
    (time * f64::from(speed) + f64::from(offset)).sin() as f32
}

/// Marker node radius for a slot at the given pulse clock and activation.
///
/// Zero activation yields zero, which hides the marker.
pub(crate) fn node_radius(
    slot: &TimelineSlot,
    pulse_time: f64,
    activation: f32,
    room_radius: f32,
) -> f32 {
    let pulse = 0.36 + 0.24 * oscillate(pulse_time, slot.pulse_speed, slot.pulse_offset);
    (0.18 + pulse * 0.12) * activation * room_radius * 0.18
}

fn draw_timeline_marker(frame: &Frame, slot: &TimelineSlot, backend: &mut dyn DrawBackend) {
    let radius = node_radius(slot, frame.pulse_time, frame.activation, frame.room_radius);
    if radius.is_nan() || radius <= 0.0 {
        return;
    }

    let azimuth = slot.base_angle + frame.rotation;
    let ring = frame.room_radius * TIMELINE_RING * slot.radius;
    let node = frame.origin
        + Vec3::new(
            azimuth.cos() * ring,
            slot.height * frame.room_radius * TIMELINE_HEIGHT_SCALE,
            azimuth.sin() * ring,
        );
    let stem_base = Vec3::new(node.x, frame.origin.y - frame.room_radius * STEM_DEPTH, node.z);
    let stem_radius = 0.02 * frame.activation * frame.room_radius;
    let color = TIMELINE_NODE.with_alpha(fade(120, 255, frame.activation));

    backend.draw_cylinder(stem_base, node, stem_radius, stem_radius * 0.6, color);
    backend.draw_sphere(node, radius, color);
}

fn draw_panel(frame: &Frame, slot: &PanelSlot, backend: &mut dyn DrawBackend) {
    let azimuth = slot.base_angle + frame.rotation * PANEL_ROTATION_FACTOR;
    let ring = frame.room_radius * PANEL_RING;
    let center = frame.origin
        + Vec3::new(
            azimuth.cos() * ring,
            slot.height * frame.room_radius,
            azimuth.sin() * ring,
        );

    let sway = SWAY_AMPLITUDE * oscillate(frame.pulse_time, slot.sway_speed, slot.sway_offset);
    let visual_scale = slot.scale * (0.9 + 0.3 * frame.panel_activation);
    let width = visual_scale * frame.room_radius;
    let size = Vec3::new(width, width * 0.62, width * 0.04);

    let cone_base = Vec3::new(
        center.x,
        frame.origin.y - frame.room_radius * CONE_DEPTH,
        center.z,
    );
    backend.draw_cylinder(
        cone_base,
        center,
        width * 0.18,
        0.0,
        PANEL_CONE.with_alpha(fade(55, 185, frame.panel_activation)),
    );

    backend.push_matrix();
    backend.translate(center);
    backend.rotate(Vec3::Y, azimuth + FRAC_PI_2 + sway);
    backend.rotate(Vec3::X, -PANEL_TILT);
    backend.draw_cuboid(
        Vec3::ZERO,
        size,
        PANEL_FACE.with_alpha(fade(80, 220, frame.panel_activation)),
    );
    backend.draw_cuboid_wires(
        Vec3::ZERO,
        size,
        PANEL_RIM.with_alpha(fade(70, 220, frame.panel_activation)),
    );
    backend.pop_matrix();
}

fn draw_exit_ring(frame: &Frame, backend: &mut dyn DrawBackend) {
    backend.draw_ring(
        Vec2::new(frame.origin.x, frame.origin.z),
        frame.room_radius * 0.18,
        frame.room_radius * 0.21,
        EXIT_RING.with_alpha(fade(70, 220, frame.panel_activation)),
    );
}
