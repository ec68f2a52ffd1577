//! UI glue: the sidebar readout, the dice and action popups, and the buttons
//! that drive the turn flow. Popups are plain nodes toggled between
//! `Display::Flex` and `Display::None` on phase transitions.

use bevy::prelude::*;

use crate::board::BoardLayout;
use crate::movement::TokenMover;
use crate::turn::{
    DiceAllowance, DiceRoll, LapCount, SelectedCharacter, TurnPhase, CHARACTER_COLORS,
    CHARACTER_NAMES,
};

const PANEL_COLOR: Color = Color::rgb(0.15, 0.15, 0.25);
const POPUP_COLOR: Color = Color::rgb(0.1, 0.1, 0.15);
const BUTTON_COLOR: Color = Color::rgb(0.22, 0.22, 0.32);
const BUTTON_HOVER_COLOR: Color = Color::rgb(0.3, 0.3, 0.42);
const BUTTON_PRESS_COLOR: Color = Color::rgb(0.42, 0.42, 0.58);
const BUTTON_DISABLED_COLOR: Color = Color::rgb(0.16, 0.16, 0.18);

#[derive(Component)]
pub struct InfoText;

#[derive(Component)]
pub struct DiceResultPopup;

#[derive(Component)]
pub struct DiceResultText;

#[derive(Component)]
pub struct ActionPopup;

#[derive(Component)]
pub struct ActionPopupText;

#[derive(Component)]
pub struct CharacterSelectPopup;

#[derive(Component)]
pub struct CharacterButton(pub usize);

#[derive(Component)]
pub struct RollButton;

#[derive(Component)]
pub struct ConfirmMoveButton;

#[derive(Component)]
pub struct CloseActionButton;

#[derive(Component)]
pub struct AddAttemptButton;

#[derive(Component)]
pub struct ExitButton;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (button_feedback, refresh_roll_button, update_info_text))
            .add_systems(OnEnter(TurnPhase::CharacterSelect), show::<CharacterSelectPopup>)
            .add_systems(OnExit(TurnPhase::CharacterSelect), hide::<CharacterSelectPopup>)
            .add_systems(
                OnEnter(TurnPhase::DiceResult),
                (show::<DiceResultPopup>, update_dice_text),
            )
            .add_systems(OnExit(TurnPhase::DiceResult), hide::<DiceResultPopup>)
            .add_systems(
                OnEnter(TurnPhase::TileAction),
                (show::<ActionPopup>, update_action_text),
            )
            .add_systems(OnExit(TurnPhase::TileAction), hide::<ActionPopup>);
    }
}

pub fn setup_ui(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font = asset_server.load("fonts/FiraSans-Bold.ttf");
    commands
        .spawn(NodeBundle {
            style: Style {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..Default::default()
            },
            background_color: BackgroundColor(Color::NONE),
            ..Default::default()
        })
        .with_children(|parent| {
            // left sidebar with the running game readout
            parent
                .spawn(NodeBundle {
                    style: Style {
                        width: Val::Percent(24.0),
                        height: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(10.0)),
                        row_gap: Val::Px(8.0),
                        ..Default::default()
                    },
                    background_color: BackgroundColor(PANEL_COLOR.with_a(0.5)),
                    ..Default::default()
                })
                .with_children(|sidebar| {
                    sidebar.spawn((
                        TextBundle::from_section(
                            "",
                            TextStyle {
                                font: font.clone(),
                                font_size: 18.0,
                                color: Color::WHITE,
                            },
                        ),
                        InfoText,
                    ));
                });

            // bottom control bar
            parent
                .spawn(NodeBundle {
                    style: Style {
                        position_type: PositionType::Absolute,
                        right: Val::Px(12.0),
                        bottom: Val::Px(12.0),
                        flex_direction: FlexDirection::Row,
                        column_gap: Val::Px(8.0),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .with_children(|bar| {
                    spawn_button(bar, font.clone(), "Roll Dice", RollButton);
                    spawn_button(bar, font.clone(), "+1 Roll", AddAttemptButton);
                    spawn_button(bar, font.clone(), "Exit", ExitButton);
                });

            // dice result popup, hidden until a roll happens
            parent
                .spawn((
                    NodeBundle {
                        style: popup_style(320.0, 170.0),
                        background_color: BackgroundColor(POPUP_COLOR),
                        ..Default::default()
                    },
                    DiceResultPopup,
                ))
                .with_children(|popup| {
                    popup.spawn((
                        TextBundle::from_section(
                            "",
                            TextStyle {
                                font: font.clone(),
                                font_size: 22.0,
                                color: Color::WHITE,
                            },
                        ),
                        DiceResultText,
                    ));
                    spawn_button(popup, font.clone(), "Move", ConfirmMoveButton);
                });

            // tile action popup, shown when the token lands
            parent
                .spawn((
                    NodeBundle {
                        style: popup_style(380.0, 200.0),
                        background_color: BackgroundColor(POPUP_COLOR),
                        ..Default::default()
                    },
                    ActionPopup,
                ))
                .with_children(|popup| {
                    popup.spawn((
                        TextBundle::from_section(
                            "",
                            TextStyle {
                                font: font.clone(),
                                font_size: 18.0,
                                color: Color::WHITE,
                            },
                        ),
                        ActionPopupText,
                    ));
                    spawn_button(popup, font.clone(), "Close", CloseActionButton);
                });

            // character selection, visible at launch
            parent
                .spawn((
                    NodeBundle {
                        style: Style {
                            display: Display::Flex,
                            ..popup_style(460.0, 190.0)
                        },
                        background_color: BackgroundColor(POPUP_COLOR),
                        ..Default::default()
                    },
                    CharacterSelectPopup,
                ))
                .with_children(|popup| {
                    popup.spawn(TextBundle::from_section(
                        "Choose your character",
                        TextStyle {
                            font: font.clone(),
                            font_size: 22.0,
                            color: Color::WHITE,
                        },
                    ));
                    popup
                        .spawn(NodeBundle {
                            style: Style {
                                flex_direction: FlexDirection::Row,
                                column_gap: Val::Px(8.0),
                                ..Default::default()
                            },
                            ..Default::default()
                        })
                        .with_children(|row| {
                            for (index, name) in CHARACTER_NAMES.iter().enumerate() {
                                row.spawn((
                                    ButtonBundle {
                                        style: button_style(),
                                        background_color: BackgroundColor(
                                            CHARACTER_COLORS[index],
                                        ),
                                        ..Default::default()
                                    },
                                    CharacterButton(index),
                                ))
                                .with_children(|button| {
                                    button.spawn(TextBundle::from_section(
                                        *name,
                                        TextStyle {
                                            font: font.clone(),
                                            font_size: 16.0,
                                            color: Color::WHITE,
                                        },
                                    ));
                                });
                            }
                        });
                });
        });
}

fn popup_style(width: f32, height: f32) -> Style {
    Style {
        position_type: PositionType::Absolute,
        left: Val::Percent(50.0),
        top: Val::Percent(40.0),
        margin: UiRect {
            left: Val::Px(-width / 2.0),
            ..Default::default()
        },
        width: Val::Px(width),
        height: Val::Px(height),
        display: Display::None,
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::SpaceAround,
        padding: UiRect::all(Val::Px(10.0)),
        ..Default::default()
    }
}

fn button_style() -> Style {
    Style {
        width: Val::Px(110.0),
        height: Val::Px(40.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..Default::default()
    }
}

fn spawn_button<M: Component>(parent: &mut ChildBuilder, font: Handle<Font>, label: &str, marker: M) {
    parent
        .spawn((
            ButtonBundle {
                style: button_style(),
                background_color: BackgroundColor(BUTTON_COLOR),
                ..Default::default()
            },
            marker,
        ))
        .with_children(|button| {
            button.spawn(TextBundle::from_section(
                label,
                TextStyle {
                    font,
                    font_size: 16.0,
                    color: Color::WHITE,
                },
            ));
        });
}

fn show<T: Component>(mut panels: Query<&mut Style, With<T>>) {
    for mut style in &mut panels {
        style.display = Display::Flex;
    }
}

fn hide<T: Component>(mut panels: Query<&mut Style, With<T>>) {
    for mut style in &mut panels {
        style.display = Display::None;
    }
}

fn button_feedback(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (
            Changed<Interaction>,
            With<Button>,
            Without<CharacterButton>,
            Without<RollButton>,
        ),
    >,
) {
    for (interaction, mut color) in &mut buttons {
        *color = match interaction {
            Interaction::Pressed => BUTTON_PRESS_COLOR.into(),
            Interaction::Hovered => BUTTON_HOVER_COLOR.into(),
            Interaction::None => BUTTON_COLOR.into(),
        };
    }
}

/// The roll button doubles as its own state display: greyed out while the
/// player has no rolls banked.
fn refresh_roll_button(
    allowance: Res<DiceAllowance>,
    mut buttons: Query<(&Interaction, &mut BackgroundColor), With<RollButton>>,
) {
    for (interaction, mut color) in &mut buttons {
        *color = if allowance.remaining() == 0 {
            BUTTON_DISABLED_COLOR.into()
        } else {
            match interaction {
                Interaction::Pressed => BUTTON_PRESS_COLOR.into(),
                Interaction::Hovered => BUTTON_HOVER_COLOR.into(),
                Interaction::None => BUTTON_COLOR.into(),
            }
        };
    }
}

fn update_dice_text(dice: Res<DiceRoll>, mut texts: Query<&mut Text, With<DiceResultText>>) {
    for mut text in &mut texts {
        text.sections[0].value = format!("You rolled a {}", dice.0);
    }
}

fn update_action_text(
    layout: Res<BoardLayout>,
    mover: Res<TokenMover>,
    mut texts: Query<&mut Text, With<ActionPopupText>>,
) {
    let tile = mover.current_tile();
    for mut text in &mut texts {
        text.sections[0].value = format!("Tile {tile}\n{}", layout.action_text(tile));
    }
}

fn update_info_text(
    allowance: Res<DiceAllowance>,
    laps: Res<LapCount>,
    mover: Res<TokenMover>,
    selected: Res<SelectedCharacter>,
    phase: Res<State<TurnPhase>>,
    mut texts: Query<&mut Text, With<InfoText>>,
) {
    if let Ok(mut text) = texts.get_single_mut() {
        let mut content = String::new();
        content.push_str("Loop Board\nBank a roll, throw the die, ride the ring.\n\n");
        if let Some(choice) = selected.0 {
            content.push_str(&format!("Playing as {}\n", CHARACTER_NAMES[choice]));
        }
        content.push_str(&format!("Rolls left: {}\n", allowance.remaining()));
        content.push_str(&format!("Laps: {}\n", laps.0));
        content.push_str(&format!("Tile: {}\n", mover.current_tile()));
        if mover.is_moving() {
            content.push_str("-- moving --\n");
        }
        let hint = match phase.get() {
            TurnPhase::CharacterSelect => "pick a character to start",
            TurnPhase::AwaitingRoll => "roll when ready",
            TurnPhase::DiceResult => "confirm to move",
            TurnPhase::Moving => "token on its way",
            TurnPhase::TileAction => "read the tile action",
        };
        content.push_str(&format!("\n{hint}\n"));
        text.sections[0].value = content;
    }
}
