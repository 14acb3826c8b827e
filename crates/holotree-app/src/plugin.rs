//! Detail view plugin - owns the engine and drives it once per frame.
//!
//! ## Keys
//!
//! - Space: open/close the room (expansion + both phases)
//! - T / P: toggle the timeline / panel phase alone
//! - R: reset the engine
//! - Delete: destroy the engine (all frame systems become no-ops)
//! - Insert: recreate the engine

use bevy::prelude::*;
use holotree_detail::{
    CameraSnapshot, DetailView, DetailViewContent, DetailViewSettings, RenderConfig,
};

use crate::expansion::{advance_expansion, ExpansionState};
use crate::gizmo_backend::GizmoBackend;

/// Plugin wiring the detail view into the frame loop.
pub struct DetailViewPlugin {
    pub settings: DetailViewSettings,
    /// Start with the room open.
    pub open: bool,
    /// Person shown in the overlay; the placeholder when `None`.
    pub content: Option<DetailViewContent>,
}

impl Plugin for DetailViewPlugin {
    fn build(&self, app: &mut App) {
        let settings = self.settings.clone();
        let expansion = ExpansionState {
            speed: settings.expansion_speed,
            open: self.open,
            ..default()
        };
        let mut driver = PhaseDriver::new(settings.phase_speed);
        driver.set_targets(self.open, self.open);

        let mut view = DetailView::with_layout(settings.layout);
        if let Some(content) = &self.content {
            view.set_content(Some(content));
        }

        app.insert_resource(DetailViewSlot(Some(view)))
            .insert_resource(SceneConfig {
                render: settings.render,
                settings,
            })
            .insert_resource(expansion)
            .insert_resource(driver)
            .add_systems(
                Update,
                (
                    handle_view_keys,
                    drive_phases,
                    advance_expansion,
                    update_detail_view,
                    render_detail_view,
                )
                    .chain()
                    .in_set(DetailViewFrame),
            );
    }
}

/// System set for the per-frame detail view chain.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailViewFrame;

// ============================================================================
// RESOURCES
// ============================================================================

/// The engine handle. `None` is a destroyed engine; every system skips it.
#[derive(Resource, Default)]
pub struct DetailViewSlot(pub Option<DetailView>);

/// Settings the plugin was built with.
#[derive(Resource, Debug, Clone)]
pub struct SceneConfig {
    pub settings: DetailViewSettings,
    pub render: RenderConfig,
}

/// Host-side phase easing. The engine only ever sees the current values.
#[derive(Resource, Debug, Clone)]
pub struct PhaseDriver {
    pub timeline: f32,
    pub panel: f32,
    pub timeline_target: f32,
    pub panel_target: f32,
    /// Phase units per second.
    pub speed: f32,
}

impl PhaseDriver {
    pub fn new(speed: f32) -> Self {
        Self {
            timeline: 0.0,
            panel: 0.0,
            timeline_target: 0.0,
            panel_target: 0.0,
            speed,
        }
    }

    pub fn set_targets(&mut self, timeline: bool, panel: bool) {
        self.timeline_target = if timeline { 1.0 } else { 0.0 };
        self.panel_target = if panel { 1.0 } else { 0.0 };
    }

    /// Move both phases toward their targets.
    pub fn advance(&mut self, delta_seconds: f32) {
        let step = self.speed * delta_seconds.max(0.0);
        self.timeline = approach(self.timeline, self.timeline_target, step);
        self.panel = approach(self.panel, self.panel_target, step);
    }
}

fn approach(current: f32, target: f32, step: f32) -> f32 {
    let remaining = target - current;
    if remaining.abs() <= step {
        target
    } else {
        current + step.copysign(remaining)
    }
}

// ============================================================================
// SYSTEMS
// ============================================================================

/// Handle open/close, phase toggles and engine lifecycle keys.
fn handle_view_keys(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<SceneConfig>,
    mut slot: ResMut<DetailViewSlot>,
    mut driver: ResMut<PhaseDriver>,
    mut expansion: ResMut<ExpansionState>,
) {
    if keys.just_pressed(KeyCode::Space) {
        expansion.open = !expansion.open;
        driver.set_targets(expansion.open, expansion.open);
        info!("Detail view {}", if expansion.open { "opening" } else { "closing" });
    }

    if keys.just_pressed(KeyCode::KeyT) {
        driver.timeline_target = 1.0 - driver.timeline_target;
        info!("Timeline phase target: {}", driver.timeline_target);
    }

    if keys.just_pressed(KeyCode::KeyP) {
        driver.panel_target = 1.0 - driver.panel_target;
        info!("Panel phase target: {}", driver.panel_target);
    }

    if keys.just_pressed(KeyCode::KeyR) {
        if let Some(view) = slot.0.as_mut() {
            view.reset();
            info!("Detail view reset");
        }
    }

    if keys.just_pressed(KeyCode::Delete) && slot.0.take().is_some() {
        info!("Detail view destroyed");
    }

    if keys.just_pressed(KeyCode::Insert) && slot.0.is_none() {
        slot.0 = Some(DetailView::with_layout(config.settings.layout));
        info!("Detail view recreated");
    }
}

fn drive_phases(time: Res<Time>, mut driver: ResMut<PhaseDriver>) {
    driver.advance(time.delta_secs());
}

/// Advance the engine with this frame's delta and phases.
fn update_detail_view(
    time: Res<Time>,
    mut slot: ResMut<DetailViewSlot>,
    driver: Res<PhaseDriver>,
    expansion: Res<ExpansionState>,
) {
    let Some(view) = slot.0.as_mut() else {
        return;
    };
    view.update(
        time.delta_secs(),
        Some(&*expansion),
        driver.timeline,
        driver.panel,
    );
}

/// Draw the room through gizmos.
fn render_detail_view(
    slot: Res<DetailViewSlot>,
    config: Res<SceneConfig>,
    expansion: Res<ExpansionState>,
    camera: Query<&GlobalTransform, With<Camera3d>>,
    mut gizmos: Gizmos,
) {
    let Some(view) = slot.0.as_ref() else {
        return;
    };

    let camera = camera.single().ok().map(|transform| CameraSnapshot {
        position: transform.translation(),
        target: transform.translation() + transform.forward().as_vec3(),
        up: transform.up().as_vec3(),
        ..default()
    });

    let mut backend = GizmoBackend::new(&mut gizmos);
    view.render(
        Some(&*expansion),
        Some(&config.render),
        camera.as_ref(),
        &mut backend,
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;

    #[test]
    fn test_phase_driver_eases_and_settles() {
        let mut driver = PhaseDriver::new(2.0);
        driver.set_targets(true, false);
        driver.advance(0.25);
        assert_eq!(driver.timeline, 0.5);
        assert_eq!(driver.panel, 0.0);

        driver.advance(1.0);
        assert_eq!(driver.timeline, 1.0);

        driver.set_targets(false, true);
        driver.advance(-1.0);
        assert_eq!(driver.timeline, 1.0);
        assert_eq!(driver.panel, 0.0);
    }

    #[test]
    fn test_frame_chain_updates_engine() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.init_resource::<ButtonInput<KeyCode>>();
        app.insert_resource(SceneConfig {
            settings: DetailViewSettings::default(),
            render: RenderConfig::default(),
        });
        app.insert_resource(DetailViewSlot(Some(DetailView::new())));
        app.insert_resource(ExpansionState::default());
        let mut driver = PhaseDriver::new(2.0);
        driver.set_targets(true, false);
        app.insert_resource(driver);
        app.add_systems(
            Update,
            (handle_view_keys, drive_phases, update_detail_view).chain(),
        );

        let mut elapsed = 0.0_f64;
        for _ in 0..4 {
            app.update();
            elapsed += f64::from(app.world().resource::<Time>().delta_secs());
        }
        assert!(elapsed > 0.0);

        let driver = app.world().resource::<PhaseDriver>();
        let view = app.world().resource::<DetailViewSlot>().0.as_ref().unwrap();
        assert!(driver.timeline > 0.0);
        assert_eq!(view.timeline_phase(), driver.timeline);
        assert_eq!(view.panel_phase(), driver.panel);
        assert!((view.pulse_time() - elapsed).abs() < 1e-6);
    }

    #[test]
    fn test_destroyed_engine_is_skipped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(DetailViewSlot(None));
        app.insert_resource(ExpansionState::default());
        app.insert_resource(PhaseDriver::new(1.0));
        app.add_systems(Update, update_detail_view);

        app.update();

        assert!(app.world().resource::<DetailViewSlot>().0.is_none());
    }
}
