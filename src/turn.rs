//! Turn flow: pick a character, earn and spend dice rolls, confirm the move,
//! then read the action of the tile the token landed on.

use bevy::app::AppExit;
use bevy::prelude::*;
use rand::Rng;

use crate::movement::{LapCompleted, MoveFinished, PlayerToken, TokenMover};
use crate::ui::{
    ActionPopup, AddAttemptButton, CharacterButton, CloseActionButton, ConfirmMoveButton,
    DiceResultPopup, ExitButton, RollButton,
};

pub const CHARACTER_COLORS: [Color; 4] = [
    Color::rgb(0.85, 0.3, 0.3),
    Color::rgb(0.3, 0.6, 0.9),
    Color::rgb(0.4, 0.8, 0.45),
    Color::rgb(0.9, 0.75, 0.3),
];

pub const CHARACTER_NAMES: [&str; 4] = ["Scarlet", "Azure", "Clover", "Amber"];

/// One roll-move-resolve cycle, plus the one-off character pick up front.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnPhase {
    #[default]
    CharacterSelect,
    AwaitingRoll,
    DiceResult,
    Moving,
    TileAction,
}

/// The value shown in the dice popup, pending confirmation.
#[derive(Resource, Default)]
pub struct DiceRoll(pub u32);

/// Rolls the player has banked. Starts empty; the grant button adds one at a
/// time and each roll spends one.
#[derive(Resource, Default)]
pub struct DiceAllowance {
    remaining: u32,
}

impl DiceAllowance {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn grant(&mut self) {
        self.remaining += 1;
    }

    pub fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Full perimeter traversals completed so far.
#[derive(Resource, Default)]
pub struct LapCount(pub u32);

#[derive(Resource, Default)]
pub struct SelectedCharacter(pub Option<usize>);

pub fn roll_die() -> u32 {
    rand::thread_rng().gen_range(1..=6)
}

pub struct TurnPlugin;

impl Plugin for TurnPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<TurnPhase>()
            .init_resource::<DiceRoll>()
            .init_resource::<DiceAllowance>()
            .init_resource::<LapCount>()
            .init_resource::<SelectedCharacter>()
            .add_systems(
                Update,
                (
                    handle_character_buttons.run_if(in_state(TurnPhase::CharacterSelect)),
                    handle_roll_button.run_if(in_state(TurnPhase::AwaitingRoll)),
                    handle_confirm_button.run_if(in_state(TurnPhase::DiceResult)),
                    watch_move_finished.run_if(in_state(TurnPhase::Moving)),
                    handle_close_action_button.run_if(in_state(TurnPhase::TileAction)),
                    handle_add_attempt_button.run_if(not(in_state(TurnPhase::CharacterSelect))),
                    handle_exit_button,
                    count_laps,
                ),
            );
    }
}

fn handle_character_buttons(
    interactions: Query<(&Interaction, &CharacterButton), Changed<Interaction>>,
    mut selected: ResMut<SelectedCharacter>,
    mut tokens: Query<&mut Sprite, With<PlayerToken>>,
    mut panels: Query<&mut BackgroundColor, Or<(With<DiceResultPopup>, With<ActionPopup>)>>,
    mut next: ResMut<NextState<TurnPhase>>,
) {
    for (interaction, button) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let choice = button.0;
        selected.0 = Some(choice);
        let color = CHARACTER_COLORS[choice];
        for mut sprite in &mut tokens {
            sprite.color = color;
        }
        // popup panels pick up the character's tint, all of them the same way
        for mut panel in &mut panels {
            *panel = panel_tint(color).into();
        }
        info!("playing as {}", CHARACTER_NAMES[choice]);
        next.set(TurnPhase::AwaitingRoll);
    }
}

fn panel_tint(color: Color) -> Color {
    Color::rgb(color.r() * 0.3, color.g() * 0.3, color.b() * 0.3)
}

fn handle_roll_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<RollButton>)>,
    mut allowance: ResMut<DiceAllowance>,
    mut dice: ResMut<DiceRoll>,
    mut next: ResMut<NextState<TurnPhase>>,
) {
    for interaction in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if !allowance.spend() {
            info!("no rolls left, grant one first");
            continue;
        }
        dice.0 = roll_die();
        info!("rolled a {}", dice.0);
        next.set(TurnPhase::DiceResult);
    }
}

fn handle_add_attempt_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<AddAttemptButton>)>,
    mut allowance: ResMut<DiceAllowance>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            allowance.grant();
            info!("rolls left: {}", allowance.remaining());
        }
    }
}

fn handle_confirm_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<ConfirmMoveButton>)>,
    dice: Res<DiceRoll>,
    mut mover: ResMut<TokenMover>,
    mut next: ResMut<NextState<TurnPhase>>,
) {
    for interaction in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match mover.start_move(dice.0) {
            Ok(()) => next.set(TurnPhase::Moving),
            Err(err) => {
                // hand control back so the roll button comes alive again
                warn!("move refused: {err}");
                next.set(TurnPhase::AwaitingRoll);
            }
        }
    }
}

fn watch_move_finished(
    mut finished: EventReader<MoveFinished>,
    mut next: ResMut<NextState<TurnPhase>>,
) {
    for event in finished.read() {
        info!(
            "landed on tile {} after {} lap(s) this move",
            event.tile, event.laps
        );
        next.set(TurnPhase::TileAction);
    }
}

fn handle_close_action_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<CloseActionButton>)>,
    mut next: ResMut<NextState<TurnPhase>>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            next.set(TurnPhase::AwaitingRoll);
        }
    }
}

fn count_laps(mut laps: EventReader<LapCompleted>, mut count: ResMut<LapCount>) {
    for _ in laps.read() {
        count.0 += 1;
        info!("lap {} completed", count.0);
    }
}

fn handle_exit_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<ExitButton>)>,
    mut exit: EventWriter<AppExit>,
) {
    for interaction in &interactions {
        if *interaction == Interaction::Pressed {
            exit.send(AppExit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_stays_in_bounds() {
        for _ in 0..1000 {
            let value = roll_die();
            assert!((1..=6).contains(&value), "rolled {value}");
        }
    }

    #[test]
    fn allowance_spends_down_to_zero_and_no_further() {
        let mut allowance = DiceAllowance::default();
        assert!(!allowance.spend());

        allowance.grant();
        allowance.grant();
        assert_eq!(allowance.remaining(), 2);
        assert!(allowance.spend());
        assert!(allowance.spend());
        assert!(!allowance.spend());
        assert_eq!(allowance.remaining(), 0);
    }
}
