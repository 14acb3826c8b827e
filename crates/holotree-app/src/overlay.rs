//! Text overlay with the selected person's summary, plus a status line with
//! the live phases and key hints.

use bevy::prelude::*;
use holotree_detail::DetailView;

use crate::expansion::ExpansionState;
use crate::plugin::{DetailViewFrame, DetailViewSlot, PhaseDriver};

/// Below this panel phase the summary is fully hidden.
const MIN_VISIBLE_ALPHA: f32 = 0.01;

/// Marker for the person summary text node.
#[derive(Component)]
pub struct DetailOverlay;

/// Marker for the always-visible status line.
#[derive(Component)]
pub struct StatusLine;

/// Plugin for the overlay text.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_overlay)
            .add_systems(Update, update_overlay.after(DetailViewFrame));
    }
}

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        DetailOverlay,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgba(0.78, 0.94, 1.0, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(24.0),
            top: Val::Px(24.0),
            ..default()
        },
    ));

    commands.spawn((
        StatusLine,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.47, 0.76, 1.0, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(24.0),
            bottom: Val::Px(24.0),
            ..default()
        },
    ));
}

/// Person summary, or `None` when there is no engine or its content is not
/// ready.
pub fn overlay_text(view: Option<&DetailView>) -> Option<String> {
    let view = view?;
    if !view.content_ready() {
        return None;
    }
    let content = view.content()?;

    let mut lines = vec![content.name.clone(), content.lifespan.clone()];
    lines.extend(content.facts.iter().cloned());
    Some(lines.join("\n"))
}

/// Summary opacity: follows the panel phase, hidden at (near) zero.
pub fn overlay_alpha(view: Option<&DetailView>) -> f32 {
    let alpha = view.map_or(0.0, |view| view.panel_phase());
    if alpha <= MIN_VISIBLE_ALPHA { 0.0 } else { alpha }
}

/// Phases, focus and key hints, or a recreate hint when destroyed.
pub fn status_text(view: Option<&DetailView>, driver: &PhaseDriver, expansion: f32) -> String {
    let Some(view) = view else {
        return "Detail view destroyed - press Insert to recreate".to_string();
    };

    let focus = if view.focus_locked() { "locked" } else { "free" };
    format!(
        "expansion {:.2}   timeline {:.2} -> {:.0}   panels {:.2} -> {:.0}   focus {} ({})\n\
         Space: open/close   T/P: phases   R: reset   Delete: destroy",
        expansion,
        driver.timeline,
        driver.timeline_target,
        driver.panel,
        driver.panel_target,
        view.focus_index(),
        focus,
    )
}

fn update_overlay(
    slot: Res<DetailViewSlot>,
    driver: Res<PhaseDriver>,
    expansion: Res<ExpansionState>,
    mut summary: Query<(&mut Text, &mut TextColor), (With<DetailOverlay>, Without<StatusLine>)>,
    mut status: Query<&mut Text, (With<StatusLine>, Without<DetailOverlay>)>,
) {
    let view = slot.0.as_ref();
    let body = overlay_text(view).unwrap_or_default();
    let alpha = if body.is_empty() { 0.0 } else { overlay_alpha(view) };

    for (mut text, mut color) in summary.iter_mut() {
        if text.0 != body {
            text.0 = body.clone();
        }
        color.0 = color.0.with_alpha(alpha);
    }

    let line = status_text(view, &driver, expansion.progress());
    for mut text in status.iter_mut() {
        if text.0 != line {
            text.0 = line.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holotree_detail::DetailViewContent;

    #[test]
    fn test_overlay_text_lists_content() {
        let mut view = DetailView::new();
        let person = DetailViewContent::new("Ada Lovelace", "1815-1852")
            .with_fact("Wrote the first published algorithm.");
        view.set_content(Some(&person));

        let text = overlay_text(Some(&view)).unwrap();
        assert!(text.starts_with("Ada Lovelace\n1815-1852"));
        assert!(text.ends_with("algorithm."));
    }

    #[test]
    fn test_overlay_hidden_when_content_cleared() {
        let mut view = DetailView::new();
        assert!(overlay_text(Some(&view)).is_some());

        view.set_content(None);
        assert!(overlay_text(Some(&view)).is_none());
        assert!(overlay_text(None).is_none());
    }

    #[test]
    fn test_overlay_alpha_fades_out_at_zero_phase() {
        let mut view = DetailView::new();
        assert_eq!(overlay_alpha(Some(&view)), 0.0);

        view.update(0.1, None, 0.0, 0.005);
        assert_eq!(overlay_alpha(Some(&view)), 0.0);

        view.update(0.1, None, 0.0, 0.6);
        assert!((overlay_alpha(Some(&view)) - 0.6).abs() < 1e-6);
        assert_eq!(overlay_alpha(None), 0.0);
    }

    #[test]
    fn test_status_text() {
        let view = DetailView::new();
        let text = status_text(Some(&view), &PhaseDriver::new(1.0), 0.0);
        assert!(text.contains("timeline 0.00"));
        assert!(text.contains("focus 0 (free)"));

        let text = status_text(None, &PhaseDriver::new(1.0), 1.0);
        assert!(text.contains("Insert"));
    }
}
