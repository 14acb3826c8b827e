//! Detail view engine: animation state, lifecycle and per-frame update.
//!
//! Rendering lives in `render.rs`; this module only mutates state.

use std::f32::consts::{PI, TAU};

use tracing::{debug, trace};

use crate::clamp01;
use crate::content::DetailViewContent;
use crate::inputs::Expansion;
use crate::layout::{self, LayoutConfig, PanelSlot, PanelSlots, TimelineSlot, TimelineSlots};

/// Base ring angular speed (rad/s) at zero timeline activation.
pub const BASE_ROTATION_SPEED: f32 = 0.45;

/// Extra angular speed (rad/s) at full timeline activation.
pub const ACTIVE_ROTATION_BOOST: f32 = 0.75;

/// Panel ring turns at this fraction of the timeline ring's speed.
pub const PANEL_ROTATION_FACTOR: f32 = 0.55;

/// Panel phase above which the focused panel is locked.
pub const FOCUS_LOCK_PHASE: f32 = 0.75;

/// Owned state of one detail view.
///
/// `Default` yields an uninitialized engine with empty rings; use
/// [`DetailView::new`] for a ready one. The first `update` on an
/// uninitialized engine resets it.
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    initialized: bool,
    rotation: f32,
    pulse_time: f64,
    timeline_phase: f32,
    panel_phase: f32,
    focus_index: usize,
    focus_locked: bool,
    layout: LayoutConfig,
    timeline: TimelineSlots,
    panels: PanelSlots,
    content: DetailViewContent,
    content_ready: bool,
}

/// Geometry of a timeline slot, for hosts that place labels on markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineInfo {
    pub base_angle: f32,
    pub height: f32,
    pub radius: f32,
}

/// Geometry of a panel slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelInfo {
    pub base_angle: f32,
    pub height: f32,
    pub scale: f32,
}

impl DetailView {
    /// Ready engine with the default layout (8 markers, 5 panels).
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    /// Ready engine with custom slot counts (clamped to capacity).
    pub fn with_layout(layout: LayoutConfig) -> Self {
        let mut view = Self {
            layout,
            ..Self::default()
        };
        view.reset();
        view
    }

    /// Heap-allocated ready engine, for hosts that pass it around by handle.
    pub fn create() -> Box<Self> {
        Box::new(Self::new())
    }

    /// Zero the animation, regenerate the rings and mark the engine ready.
    pub fn reset(&mut self) {
        let (timeline, panels) = layout::generate(self.layout);
        self.timeline = timeline;
        self.panels = panels;
        self.rotation = 0.0;
        self.pulse_time = 0.0;
        self.timeline_phase = 0.0;
        self.panel_phase = 0.0;
        self.focus_index = 0;
        self.focus_locked = false;
        if !self.initialized {
            self.content = DetailViewContent::placeholder();
            self.content_ready = true;
        }
        self.initialized = true;

        debug!(
            timeline = self.timeline.len(),
            panels = self.panels.len(),
            "detail view reset"
        );
    }

    /// Tear down to the uninitialized state. The next `update` resets.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        self.content_ready = false;
        self.timeline.clear();
        self.panels.clear();
        self.rotation = 0.0;
        self.pulse_time = 0.0;
        self.timeline_phase = 0.0;
        self.panel_phase = 0.0;
        self.focus_index = 0;
        self.focus_locked = false;
        debug!("detail view shut down");
    }

    /// Advance one frame.
    ///
    /// Negative (and NaN) deltas count as zero so time never rewinds. Phases
    /// are clamped to `[0, 1]`. `_expansion` is accepted for symmetry with
    /// [`DetailView::render`] and is not read.
    pub fn update(
        &mut self,
        delta_seconds: f32,
        _expansion: Option<&dyn Expansion>,
        timeline_phase: f32,
        panel_phase: f32,
    ) {
        if !self.initialized {
            self.reset();
        }
        debug_assert!(self.initialized, "detail view update requires initialized state");

        let safe_delta = if delta_seconds > 0.0 { delta_seconds } else { 0.0 };
        let activation = clamp01(timeline_phase);

        self.rotation += safe_delta * (BASE_ROTATION_SPEED + ACTIVE_ROTATION_BOOST * activation);
        self.pulse_time += f64::from(safe_delta);
        self.timeline_phase = activation;
        self.panel_phase = clamp01(panel_phase);

        if !self.panels.is_empty() {
            self.focus_index = self.nearest_panel(self.rotation * PANEL_ROTATION_FACTOR);
            self.focus_locked = self.panel_phase > FOCUS_LOCK_PHASE;
        }

        trace!(
            rotation = self.rotation,
            pulse_time = self.pulse_time,
            timeline_phase = self.timeline_phase,
            panel_phase = self.panel_phase,
            focus = self.focus_index,
            "detail view update"
        );
    }

    /// Index of the panel whose ring angle is closest to `view_angle`.
    /// Ties keep the lower index.
    fn nearest_panel(&self, view_angle: f32) -> usize {
        let view_angle = view_angle.rem_euclid(TAU);
        let mut best = (self.focus_index, f32::MAX);
        for (index, slot) in self.panels.iter().enumerate() {
            let mut diff = (view_angle - slot.base_angle.rem_euclid(TAU)).abs();
            if diff > PI {
                diff = TAU - diff;
            }
            if diff < best.1 {
                best = (index, diff);
            }
        }
        best.0
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replace the overlay content. `None` restores the placeholder and marks
    /// content as not ready.
    pub fn set_content(&mut self, content: Option<&DetailViewContent>) {
        if !self.initialized {
            self.reset();
        }
        match content {
            Some(content) => {
                self.content = content.sanitized();
                self.content_ready = true;
            }
            None => {
                self.content = DetailViewContent::placeholder();
                self.content_ready = false;
            }
        }
    }

    /// Overlay content, if the engine is initialized.
    pub fn content(&self) -> Option<&DetailViewContent> {
        self.initialized.then_some(&self.content)
    }

    pub fn content_ready(&self) -> bool {
        self.initialized && self.content_ready
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Accumulated ring rotation (radians, unwrapped).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Accumulated pulse clock (seconds).
    pub fn pulse_time(&self) -> f64 {
        self.pulse_time
    }

    /// Panel currently facing the viewer.
    pub fn focus_index(&self) -> usize {
        self.focus_index
    }

    /// True once the panel phase passes [`FOCUS_LOCK_PHASE`].
    pub fn focus_locked(&self) -> bool {
        self.initialized && self.focus_locked
    }

    /// Stored timeline phase; 0 when uninitialized.
    pub fn timeline_phase(&self) -> f32 {
        if self.initialized {
            clamp01(self.timeline_phase)
        } else {
            0.0
        }
    }

    /// Stored panel phase; 0 when uninitialized.
    pub fn panel_phase(&self) -> f32 {
        if self.initialized {
            clamp01(self.panel_phase)
        } else {
            0.0
        }
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    pub fn timeline_slots(&self) -> &[TimelineSlot] {
        self.timeline.as_slice()
    }

    pub fn panel_slots(&self) -> &[PanelSlot] {
        self.panels.as_slice()
    }

    pub fn timeline_info(&self, index: usize) -> Option<TimelineInfo> {
        self.timeline.get(index).map(|slot| TimelineInfo {
            base_angle: slot.base_angle,
            height: slot.height,
            radius: slot.radius,
        })
    }

    pub fn panel_info(&self, index: usize) -> Option<PanelInfo> {
        self.panels.get(index).map(|slot| PanelInfo {
            base_angle: slot.base_angle,
            height: slot.height,
            scale: slot.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::ExpansionSnapshot;
    use crate::Vec3;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_new_is_reset() {
        let view = DetailView::new();
        assert!(view.is_initialized());
        assert_eq!(view.rotation(), 0.0);
        assert_eq!(view.pulse_time(), 0.0);
        assert_eq!(view.timeline_phase(), 0.0);
        assert_eq!(view.panel_phase(), 0.0);
        assert_eq!(view.timeline_slots().len(), 8);
        assert_eq!(view.panel_slots().len(), 5);
    }

    #[test]
    fn test_rotation_speed_follows_activation() {
        for &activation in &[0.0_f32, 0.25, 0.5, 1.0] {
            let mut view = DetailView::new();
            view.update(0.5, None, 0.0, 0.0);
            let before = view.rotation();
            view.update(0.2, None, activation, 0.0);
            let expected = before + 0.2 * (0.45 + 0.75 * activation);
            assert!((view.rotation() - expected).abs() < EPS, "activation {activation}");
        }
    }

    #[test]
    fn test_full_activation_frame() {
        let mut view = DetailView::new();
        view.update(1.0, None, 1.0, 1.0);
        assert!((view.rotation() - 1.2).abs() < EPS);
        assert_eq!(view.pulse_time(), 1.0);
        assert_eq!(view.timeline_phase(), 1.0);
        assert_eq!(view.panel_phase(), 1.0);
    }

    #[test]
    fn test_negative_delta_is_zero_delta() {
        let mut negative = DetailView::new();
        let mut zero = DetailView::new();
        negative.update(0.3, None, 0.5, 0.5);
        zero.update(0.3, None, 0.5, 0.5);

        negative.update(-4.0, None, 0.8, 0.2);
        zero.update(0.0, None, 0.8, 0.2);

        assert_eq!(negative.rotation(), zero.rotation());
        assert_eq!(negative.pulse_time(), zero.pulse_time());
        assert_eq!(negative.timeline_phase(), zero.timeline_phase());
        assert_eq!(negative.panel_phase(), zero.panel_phase());
    }

    #[test]
    fn test_nan_delta_does_not_poison_state() {
        let mut view = DetailView::new();
        view.update(f32::NAN, None, f32::NAN, f32::NAN);
        assert_eq!(view.rotation(), 0.0);
        assert_eq!(view.pulse_time(), 0.0);
        assert_eq!(view.timeline_phase(), 0.0);
    }

    #[test]
    fn test_phases_clamped() {
        let mut view = DetailView::new();
        view.update(0.1, None, -5.0, 5.0);
        assert_eq!(view.timeline_phase(), 0.0);
        assert_eq!(view.panel_phase(), 1.0);

        view.update(0.1, None, 5.0, -5.0);
        assert_eq!(view.timeline_phase(), 1.0);
        assert_eq!(view.panel_phase(), 0.0);
    }

    #[test]
    fn test_expansion_not_consumed_by_update() {
        let expansion = ExpansionSnapshot::new(Vec3::new(4.0, 5.0, 6.0), 3.0);
        let mut with = DetailView::new();
        let mut without = DetailView::new();
        with.update(0.4, Some(&expansion), 0.6, 0.3);
        without.update(0.4, None, 0.6, 0.3);
        assert_eq!(with.rotation(), without.rotation());
        assert_eq!(with.pulse_time(), without.pulse_time());
    }

    #[test]
    fn test_update_self_heals_uninitialized() {
        let mut view = DetailView::default();
        assert!(!view.is_initialized());
        assert!(view.timeline_slots().is_empty());

        view.update(0.5, None, 1.0, 0.0);
        assert!(view.is_initialized());
        assert_eq!(view.timeline_slots().len(), 8);
        assert!((view.rotation() - 0.6).abs() < EPS);
    }

    #[test]
    fn test_shutdown_then_update_heals() {
        let mut view = DetailView::with_layout(LayoutConfig {
            timeline_count: 4,
            panel_count: 2,
        });
        view.update(2.0, None, 1.0, 1.0);
        view.shutdown();
        assert!(!view.is_initialized());
        assert_eq!(view.timeline_phase(), 0.0);
        assert!(view.content().is_none());

        view.update(0.0, None, 0.0, 0.0);
        assert!(view.is_initialized());
        assert_eq!(view.timeline_slots().len(), 4);
        assert_eq!(view.panel_slots().len(), 2);
        assert_eq!(view.rotation(), 0.0);
    }

    #[test]
    fn test_reset_zeroes_and_regenerates() {
        let mut view = DetailView::new();
        let slots_before = view.timeline_slots().to_vec();
        view.update(3.0, None, 1.0, 1.0);
        view.reset();
        assert_eq!(view.rotation(), 0.0);
        assert_eq!(view.pulse_time(), 0.0);
        assert_eq!(view.timeline_phase(), 0.0);
        assert_eq!(view.panel_phase(), 0.0);
        assert_eq!(view.timeline_slots(), slots_before.as_slice());
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = DetailView::new();
        let b = DetailView::new();
        a.update(1.0, None, 1.0, 1.0);
        assert_eq!(b.rotation(), 0.0);
        assert_eq!(b.timeline_phase(), 0.0);
    }

    #[test]
    fn test_content_lifecycle() {
        let mut view = DetailView::new();
        assert!(view.content_ready());
        assert_eq!(view.content().unwrap().name, "Select a person");

        let person = DetailViewContent::new("Ada Lovelace", "1815–1852")
            .with_fact("Wrote the first published algorithm.");
        view.set_content(Some(&person));
        assert!(view.content_ready());
        assert_eq!(view.content().unwrap(), &person);

        view.set_content(None);
        assert!(!view.content_ready());
        assert_eq!(view.content().unwrap().name, "Select a person");

        // Reset keeps whatever content was set.
        view.set_content(Some(&person));
        view.reset();
        assert_eq!(view.content().unwrap().name, "Ada Lovelace");
    }

    #[test]
    fn test_slot_info_bounds() {
        let view = DetailView::new();
        let info = view.timeline_info(1).unwrap();
        assert!(info.height < 0.0);
        assert!(view.timeline_info(8).is_none());
        assert!(view.panel_info(4).is_some());
        assert!(view.panel_info(5).is_none());
    }

    #[test]
    fn test_nearest_panel_wraps_around() {
        let view = DetailView::new();
        // Panels sit at 0.25 + k * TAU / 5; panel 4 is near 5.28.
        assert_eq!(view.nearest_panel(0.3), 0);
        assert_eq!(view.nearest_panel(TAU - 0.1), 0);
        assert_eq!(view.nearest_panel(-0.1), 0);
        assert_eq!(view.nearest_panel(5.2), 4);
        assert_eq!(view.nearest_panel(2.8), 2);
    }

    #[test]
    fn test_update_tracks_focus() {
        let mut view = DetailView::new();
        let target = view.panel_slots()[2].base_angle;
        let delta = target / PANEL_ROTATION_FACTOR / BASE_ROTATION_SPEED;
        view.update(delta, None, 0.0, 0.5);
        assert_eq!(view.focus_index(), 2);
        assert!(!view.focus_locked());

        view.reset();
        assert_eq!(view.focus_index(), 0);
    }

    #[test]
    fn test_focus_lock_threshold() {
        let mut view = DetailView::new();
        view.update(0.1, None, 0.0, FOCUS_LOCK_PHASE);
        assert!(!view.focus_locked());

        view.update(0.1, None, 0.0, 0.76);
        assert!(view.focus_locked());

        view.update(0.1, None, 0.0, 0.2);
        assert!(!view.focus_locked());
    }

    #[test]
    fn test_pulse_clock_keeps_advancing_after_long_runs() {
        let mut view = DetailView::new();
        // About 73 hours at 60 fps, past where an f32 clock stalls.
        view.pulse_time = 2f64.powi(18);
        let before = view.pulse_time();
        view.update(1.0 / 60.0, None, 0.0, 0.0);
        assert!(view.pulse_time() > before);
        assert!((view.pulse_time() - before - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_create_boxes_ready_engine() {
        let view = DetailView::create();
        assert!(view.is_initialized());
    }
}
