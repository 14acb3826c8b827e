//! Procedural slot layout for the timeline ring and the panel ring.
//!
//! Slots are generated once per reset from nothing but their index. Secondary
//! attributes cycle on small moduli so neighbouring markers differ without any
//! randomness, which keeps the layout bit-identical across runs.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hard capacity of the timeline ring.
pub const MAX_TIMELINE_SLOTS: usize = 12;

/// Hard capacity of the panel ring.
pub const MAX_PANEL_SLOTS: usize = 6;

/// Default number of timeline markers.
pub const DEFAULT_TIMELINE_COUNT: usize = 8;

/// Default number of floating panels.
pub const DEFAULT_PANEL_COUNT: usize = 5;

/// Azimuth offset of the panel ring relative to the timeline ring (radians).
pub const PANEL_PHASE_OFFSET: f32 = 0.25;

// ============================================================================
// SLOT TYPES
// ============================================================================

/// One marker on the timeline ring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimelineSlot {
    /// Fixed azimuth on the ring (radians).
    pub base_angle: f32,
    /// Vertical offset factor; sign alternates by index.
    pub height: f32,
    /// Ring radius factor; 1.0 keeps the node on the drawn timeline ring.
    pub radius: f32,
    pub pulse_speed: f32,
    pub pulse_offset: f32,
}

/// One floating panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelSlot {
    /// Fixed azimuth on the ring (radians).
    pub base_angle: f32,
    /// Height above the room center, as a fraction of the room radius.
    pub height: f32,
    /// Panel width as a fraction of the room radius.
    pub scale: f32,
    pub sway_speed: f32,
    pub sway_offset: f32,
}

// ============================================================================
// SLOT BUFFER
// ============================================================================

/// Fixed-capacity inline storage with a populated count.
///
/// Lives inside the engine so per-frame rendering never touches the heap.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBuffer<T, const N: usize> {
    slots: [T; N],
    len: usize,
}

impl<T: Copy + Default, const N: usize> Default for SlotBuffer<T, N> {
    fn default() -> Self {
        Self {
            slots: [T::default(); N],
            len: 0,
        }
    }
}

impl<T: Copy + Default, const N: usize> SlotBuffer<T, N> {
    /// Append a slot. Returns `false` and drops the slot when full.
    pub fn push(&mut self, slot: T) -> bool {
        if self.len >= N {
            return false;
        }
        self.slots[self.len] = slot;
        self.len += 1;
        true
    }

    /// Forget all populated slots.
    pub fn clear(&mut self) {
        self.slots = [T::default(); N];
        self.len = 0;
    }
}

impl<T, const N: usize> SlotBuffer<T, N> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Populated slots in generation order.
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SlotBuffer<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub type TimelineSlots = SlotBuffer<TimelineSlot, MAX_TIMELINE_SLOTS>;
pub type PanelSlots = SlotBuffer<PanelSlot, MAX_PANEL_SLOTS>;

// ============================================================================
// LAYOUT CONFIG
// ============================================================================

/// Requested slot counts. Values above capacity are clamped at generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub timeline_count: usize,
    pub panel_count: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            timeline_count: DEFAULT_TIMELINE_COUNT,
            panel_count: DEFAULT_PANEL_COUNT,
        }
    }
}

impl LayoutConfig {
    /// Counts capped to ring capacity.
    pub fn clamped(self) -> Self {
        Self {
            timeline_count: self.timeline_count.min(MAX_TIMELINE_SLOTS),
            panel_count: self.panel_count.min(MAX_PANEL_SLOTS),
        }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Evenly spaced angle for slot `index` of `count`, shifted by `phase`.
fn ring_angle(index: usize, count: usize, phase: f32) -> f32 {
    let step = TAU / count as f32;
    step * index as f32 + phase
}

/// Build the timeline ring. `count` is clamped to [`MAX_TIMELINE_SLOTS`].
pub fn generate_timeline(count: usize) -> TimelineSlots {
    let count = count.min(MAX_TIMELINE_SLOTS);
    let mut slots = TimelineSlots::default();
    for index in 0..count {
        slots.push(TimelineSlot {
            base_angle: ring_angle(index, count, 0.0),
            height: if index % 2 == 0 { 0.36 } else { -0.30 },
            radius: 1.0,
            pulse_speed: 0.85 + 0.12 * (index % 3) as f32,
            pulse_offset: index as f32 * 0.58,
        });
    }
    slots
}

/// Build the panel ring. `count` is clamped to [`MAX_PANEL_SLOTS`].
pub fn generate_panels(count: usize) -> PanelSlots {
    let count = count.min(MAX_PANEL_SLOTS);
    let mut slots = PanelSlots::default();
    for index in 0..count {
        slots.push(PanelSlot {
            base_angle: ring_angle(index, count, PANEL_PHASE_OFFSET),
            height: if index % 2 == 0 { 0.18 } else { 0.30 },
            scale: 0.30 + 0.04 * (index % 4) as f32,
            sway_speed: 0.6 + 0.15 * (index % 3) as f32,
            sway_offset: index as f32 * 0.9,
        });
    }
    slots
}

/// Generate both rings for a layout request.
pub fn generate(config: LayoutConfig) -> (TimelineSlots, PanelSlots) {
    let clamped = config.clamped();
    if clamped != config {
        warn!(
            "Layout request {}x{} exceeds capacity, clamped to {}x{}",
            config.timeline_count, config.panel_count, clamped.timeline_count, clamped.panel_count
        );
    }
    let config = clamped;
    (
        generate_timeline(config.timeline_count),
        generate_panels(config.panel_count),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let (timeline, panels) = generate(LayoutConfig::default());
        assert_eq!(timeline.len(), 8);
        assert_eq!(panels.len(), 5);
    }

    #[test]
    fn test_counts_clamped_to_capacity() {
        let (timeline, panels) = generate(LayoutConfig {
            timeline_count: 99,
            panel_count: 40,
        });
        assert_eq!(timeline.len(), MAX_TIMELINE_SLOTS);
        assert_eq!(panels.len(), MAX_PANEL_SLOTS);
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(generate_timeline(0).is_empty());
        assert!(generate_panels(0).is_empty());
    }

    #[test]
    fn test_angles_evenly_spaced() {
        let timeline = generate_timeline(8);
        let step = TAU / 8.0;
        for (index, slot) in timeline.iter().enumerate() {
            assert!((slot.base_angle - step * index as f32).abs() < 1e-6);
        }

        let panels = generate_panels(5);
        assert!((panels.as_slice()[0].base_angle - PANEL_PHASE_OFFSET).abs() < 1e-6);
        let gap = panels.as_slice()[1].base_angle - panels.as_slice()[0].base_angle;
        assert!((gap - TAU / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_height_alternates_sign() {
        let timeline = generate_timeline(6);
        for (index, slot) in timeline.iter().enumerate() {
            if index % 2 == 0 {
                assert!(slot.height > 0.0);
            } else {
                assert!(slot.height < 0.0);
            }
        }
    }

    #[test]
    fn test_secondary_attributes_cycle() {
        let timeline = generate_timeline(12);
        let slots = timeline.as_slice();
        assert_eq!(slots[0].pulse_speed, slots[3].pulse_speed);
        assert_ne!(slots[0].pulse_speed, slots[1].pulse_speed);
        assert!(slots.iter().all(|slot| slot.radius == 1.0));

        let panels = generate_panels(6);
        let panels = panels.as_slice();
        assert_eq!(panels[0].sway_speed, panels[3].sway_speed);
        assert_eq!(panels[1].scale, panels[5].scale);
        assert_ne!(panels[0].scale, panels[1].scale);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = LayoutConfig {
            timeline_count: 10,
            panel_count: 6,
        };
        let first = generate(config);
        let second = generate(config);
        assert_eq!(first, second);
        for (a, b) in first.0.iter().zip(second.0.iter()) {
            assert_eq!(a.base_angle.to_bits(), b.base_angle.to_bits());
            assert_eq!(a.pulse_offset.to_bits(), b.pulse_offset.to_bits());
        }
    }

    #[test]
    fn test_slot_buffer_rejects_overflow() {
        let mut buffer: SlotBuffer<PanelSlot, 2> = SlotBuffer::default();
        assert!(buffer.push(PanelSlot::default()));
        assert!(buffer.push(PanelSlot::default()));
        assert!(!buffer.push(PanelSlot::default()));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.capacity(), 2);

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.get(0).is_none());
    }
}
