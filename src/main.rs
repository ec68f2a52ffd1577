//! Prototype loop-board game using Bevy. A rectangular ring of tiles is
//! generated from a config file, a single player token walks it to dice
//! rolls, and each tile carries an action line loaded from a text file.
//! Landing on a tile pops its action up; every full lap around the ring is
//! counted. This prototype focuses on a 2D view of the board, the token,
//! and the turn popups.

mod board;
mod config;
mod movement;
mod turn;
mod ui;

use anyhow::Context;
use bevy::{input::mouse::MouseWheel, prelude::*};

use crate::board::{ActionCatalog, BoardLayout};
use crate::config::GameConfig;
use crate::movement::{MovementPlugin, PlayerToken, TokenMotion, TokenMover, TOKEN_Z};
use crate::turn::TurnPlugin;
use crate::ui::UiPlugin;

const CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.16);
const TILE_COLOR: Color = Color::rgb(0.25, 0.55, 0.45);
const CORNER_TILE_COLOR: Color = Color::rgb(0.9, 0.8, 0.25);
const TOKEN_COLOR: Color = Color::rgb(0.9, 0.2, 0.9);
const TOKEN_SIZE: f32 = 22.0;

fn main() -> anyhow::Result<()> {
    let config =
        GameConfig::load_or_default(config::CONFIG_PATH).context("loading board configuration")?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Loop Board Prototype".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(CLEAR_COLOR))
        .insert_resource(config)
        .add_plugins((MovementPlugin, TurnPlugin, UiPlugin))
        .add_systems(
            Startup,
            (setup_camera, setup_board, spawn_board, ui::setup_ui).chain(),
        )
        .add_systems(Update, camera_controls)
        .run();

    Ok(())
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle {
        transform: Transform::from_xyz(0.0, 0.0, 999.0),
        projection: OrthographicProjection {
            scale: 1.0,
            ..Default::default()
        },
        ..Default::default()
    });
}

/// Loads the action catalog and generates the ring once; both are read-only
/// for the rest of the session. Runs inside the schedule so catalog warnings
/// go through the log plugin.
fn setup_board(mut commands: Commands, config: Res<GameConfig>) {
    let catalog = ActionCatalog::load(&config.actions_path);
    let layout = match board::generate(&config, &catalog) {
        Ok(layout) => layout,
        Err(err) => {
            // config was already validated in main; degrade to an empty board
            // that rejects every move rather than unwind the schedule
            error!("board generation failed: {err}");
            BoardLayout::default()
        }
    };
    info!(
        "generated {}x{} ring with {} tiles",
        config.horizontal_tiles,
        config.vertical_tiles,
        layout.tile_count()
    );
    commands.insert_resource(TokenMover::new(layout.tile_count()));
    commands.insert_resource(layout);
}

fn spawn_board(mut commands: Commands, config: Res<GameConfig>, layout: Res<BoardLayout>) {
    for tile in layout.tiles() {
        let color = if tile.is_corner {
            CORNER_TILE_COLOR
        } else {
            TILE_COLOR
        };

        commands
            .spawn(SpriteBundle {
                sprite: Sprite {
                    color,
                    custom_size: Some(Vec2::splat(config.tile_size)),
                    ..Default::default()
                },
                transform: Transform::from_translation(tile.position.extend(0.0)),
                ..Default::default()
            })
            .with_children(|parent| {
                parent.spawn(Text2dBundle {
                    text: Text::from_section(
                        format!("{}", tile.index),
                        TextStyle {
                            font_size: 16.0,
                            color: Color::WHITE,
                            ..Default::default()
                        },
                    ),
                    transform: Transform::from_xyz(0.0, 0.0, 1.0),
                    ..Default::default()
                });
            });
    }

    if let Some(origin) = layout.tile(0) {
        commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: TOKEN_COLOR,
                    custom_size: Some(Vec2::splat(TOKEN_SIZE)),
                    ..Default::default()
                },
                transform: Transform::from_translation(origin.position.extend(TOKEN_Z)),
                ..Default::default()
            },
            PlayerToken,
            TokenMotion::Idle,
        ));
    }
}

fn camera_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut query: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
    time: Res<Time>,
) {
    for (mut transform, mut projection) in query.iter_mut() {
        let mut direction = Vec3::ZERO;
        if keyboard.pressed(KeyCode::ArrowLeft) || keyboard.pressed(KeyCode::KeyA) {
            direction.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowRight) || keyboard.pressed(KeyCode::KeyD) {
            direction.x += 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowUp) || keyboard.pressed(KeyCode::KeyW) {
            direction.y += 1.0;
        }
        if keyboard.pressed(KeyCode::ArrowDown) || keyboard.pressed(KeyCode::KeyS) {
            direction.y -= 1.0;
        }
        let speed = 350.0 * time.delta_seconds();
        transform.translation += direction.normalize_or_zero() * speed;

        for ev in scroll_evr.read() {
            projection.scale = (projection.scale * (1.0 - ev.y * 0.1)).clamp(0.4, 3.0);
        }
    }
}
