//! Holotree App - detail view host
//!
//! Opens a window with one expanded sphere and the detail room inside it.
//! The room geometry comes from `holotree-detail`; this binary only drives
//! phases and draws the primitives with gizmos.

use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use holotree_detail::settings::{load_settings_or_default, write_default_settings};
use holotree_detail::DetailViewContent;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod expansion;
mod gizmo_backend;
mod overlay;
mod plugin;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(name = "holotree-app", about = "Holotree detail view")]
struct Cli {
    /// Settings file (defaults to ~/.config/holotree/detail_view.ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of timeline markers (max 12)
    #[arg(long)]
    timeline_count: Option<usize>,

    /// Override the number of floating panels (max 6)
    #[arg(long)]
    panel_count: Option<usize>,

    /// Start with the room already open
    #[arg(long)]
    open: bool,

    /// Name shown in the overlay (placeholder text when omitted)
    #[arg(long)]
    name: Option<String>,

    /// Lifespan line shown under the name
    #[arg(long, default_value = "")]
    lifespan: String,

    /// Extra fact line, repeatable
    #[arg(long = "fact")]
    facts: Vec<String>,

    /// Write default settings to the config directory and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up file logging
    let log_dir = std::env::var("HOLOTREE_LOG_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let file_appender = tracing_appender::rolling::never(&log_dir, "holotree-app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Debug for our crates, warn for everything else
            "holotree_app=debug,holotree_detail=debug,warn".into()
        }))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.write_default_config {
        match write_default_settings() {
            Ok(path) => info!("Wrote default settings to {:?}", path),
            Err(e) => {
                error!("Failed to write default settings: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut settings = load_settings_or_default(cli.config.as_deref());
    if let Some(count) = cli.timeline_count {
        settings.layout.timeline_count = count;
    }
    if let Some(count) = cli.panel_count {
        settings.layout.panel_count = count;
    }

    let content = cli.name.map(|name| DetailViewContent {
        name,
        lifespan: cli.lifespan,
        facts: cli.facts,
    });

    info!(
        "Starting Holotree App ({} markers, {} panels) - logging to {}/holotree-app.log",
        settings.layout.clamped().timeline_count,
        settings.layout.clamped().panel_count,
        log_dir
    );

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Holotree".into(),
                        resolution: (1280, 800).into(),
                        ..default()
                    }),
                    ..default()
                })
                // Our subscriber is already installed
                .disable::<LogPlugin>(),
        )
        .add_plugins(plugin::DetailViewPlugin {
            settings,
            open: cli.open,
            content,
        })
        .add_plugins(overlay::OverlayPlugin)
        .insert_resource(ClearColor(Color::srgb(0.02, 0.03, 0.06)))
        .add_systems(Startup, setup_camera)
        .run();
}

/// Fixed 3D camera looking into the room.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.6, 3.2).looking_at(Vec3::new(0.0, 0.6, 0.0), Vec3::Y),
    ));
}
