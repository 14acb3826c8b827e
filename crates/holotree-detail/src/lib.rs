//! Detail view engine for Holotree.
//!
//! When a person in the tree is expanded, the camera flies into their sphere
//! and this crate draws the room inside it: a ring of pulsing timeline markers
//! and a ring of floating panels swaying in cones of light.
//!
//! # Frame contract
//!
//! The host calls [`DetailView::update`] once per frame with the elapsed time
//! and two activation phases, then [`DetailView::render`] with a
//! [`DrawBackend`]. The engine holds only a little animation state plus a
//! fixed procedural layout; everything drawn is derived fresh each frame.
//!
//! ```ignore
//! let mut view = DetailView::new();
//! view.update(dt, Some(&expansion), timeline_phase, panel_phase);
//! view.render(Some(&expansion), Some(&config), None, &mut backend);
//! ```
//!
//! # Collaborators
//!
//! - [`Expansion`]: world origin and uniform scale of the expanded sphere
//! - [`RenderConfig`]: base sphere radius
//! - [`DrawBackend`]: sphere/circle/cylinder/cuboid/ring primitives plus a
//!   transform stack and a culling toggle
//!
//! None of them are retained past a single call.

mod backend;
mod content;
mod error;
mod inputs;
pub mod layout;
mod render;
pub mod settings;
mod view;

pub use backend::{DrawBackend, DrawCommand, RecordingBackend, Rgba};
pub use content::{
    DetailViewContent, MAX_FACT_LEN, MAX_FACTS, MAX_LIFESPAN_LEN, MAX_NAME_LEN,
};
pub use error::SettingsError;
pub use inputs::{CameraSnapshot, Expansion, ExpansionSnapshot, RenderConfig};
pub use layout::{
    LayoutConfig, PanelSlot, SlotBuffer, TimelineSlot, MAX_PANEL_SLOTS, MAX_TIMELINE_SLOTS,
};
pub use settings::DetailViewSettings;
pub use view::{DetailView, PanelInfo, TimelineInfo};

/// Re-exported math types used across the public API.
pub use bevy_math::{Vec2, Vec3};

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-5.0), 0.0);
        assert_eq!(clamp01(5.0), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(f32::NAN), 0.0);
    }
}
