//! Token movement around the ring: a small idle/moving state machine that
//! hops one tile at a time, plus the systems that animate each hop.
//!
//! The hop bookkeeping lives in [`TokenMover`] and is pure; the frame schedule
//! only decides when the next hop is committed. That keeps lap detection and
//! re-entrancy guarding independent of frame rate, and testable without an
//! `App`.

use bevy::prelude::*;
use thiserror::Error;

use crate::board::BoardLayout;
use crate::config::GameConfig;

pub const TOKEN_Z: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("a move is already in progress")]
    AlreadyMoving,
    #[error("no board tiles to move on")]
    EmptyBoard,
}

/// Result of one committed single-tile hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub from: usize,
    pub to: usize,
    /// True when this hop crossed the last-tile-to-origin boundary.
    pub lap_completed: bool,
}

/// Final result of a completed move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub tile: usize,
    pub laps: u32,
}

/// Owns the token's tile index and the moving flag. Exactly one exists.
#[derive(Resource, Debug)]
pub struct TokenMover {
    tile_count: usize,
    current: usize,
    has_left_origin: bool,
    moving: bool,
    remaining: u32,
    laps_this_move: u32,
}

impl TokenMover {
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            current: 0,
            has_left_origin: false,
            moving: false,
            remaining: 0,
            laps_this_move: 0,
        }
    }

    pub fn current_tile(&self) -> usize {
        self.current
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn next_tile(&self) -> usize {
        if self.tile_count == 0 {
            0
        } else {
            (self.current + 1) % self.tile_count
        }
    }

    /// Begins a move of `steps` single-tile hops. Rejected without any state
    /// change while a move is in flight or when no board is bound; overlapping
    /// requests are dropped, never queued. Zero steps is a valid move that
    /// finishes immediately.
    pub fn start_move(&mut self, steps: u32) -> Result<(), MoveRejected> {
        if self.moving {
            return Err(MoveRejected::AlreadyMoving);
        }
        if self.tile_count == 0 {
            return Err(MoveRejected::EmptyBoard);
        }
        self.moving = true;
        self.remaining = steps;
        self.laps_this_move = 0;
        Ok(())
    }

    /// Commits the next hop of the active move. A lap is detected on every
    /// wrap from the last tile back to the origin, but only once the token has
    /// genuinely left tile 0; the flag is never reset, so arriving at the
    /// origin any other way can never count as a lap.
    pub fn commit_step(&mut self) -> Option<StepOutcome> {
        if !self.moving || self.remaining == 0 {
            return None;
        }
        let from = self.current;
        let to = (self.current + 1) % self.tile_count;
        self.current = to;
        self.remaining -= 1;
        if to != 0 {
            self.has_left_origin = true;
        }
        let lap_completed = self.has_left_origin && to == 0 && from == self.tile_count - 1;
        if lap_completed {
            self.laps_this_move += 1;
        }
        Some(StepOutcome {
            from,
            to,
            lap_completed,
        })
    }

    /// Ends the active move once all hops are committed, reporting where the
    /// token landed and how many laps this move completed.
    pub fn try_finish(&mut self) -> Option<MoveOutcome> {
        if !self.moving || self.remaining > 0 {
            return None;
        }
        self.moving = false;
        Some(MoveOutcome {
            tile: self.current,
            laps: self.laps_this_move,
        })
    }
}

/// Fired once per completed move, after the last hop has been animated.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveFinished {
    pub tile: usize,
    pub laps: u32,
}

/// Fired synchronously at each wrap from the last tile to tile 0.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LapCompleted;

#[derive(Component)]
pub struct PlayerToken;

/// Animation state for the token sprite between committed hops.
#[derive(Component)]
pub enum TokenMotion {
    Idle,
    Stepping { target: Vec2 },
    Pausing { timer: Timer },
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveFinished>()
            .add_event::<LapCompleted>()
            .add_systems(Update, drive_token);
    }
}

/// Advances the token sprite toward the next tile at constant speed, commits
/// the hop on arrival, pauses between hops, and reports completion. The
/// mover's own state decides whether anything happens, so the system can run
/// every frame.
fn drive_token(
    time: Res<Time>,
    config: Res<GameConfig>,
    layout: Res<BoardLayout>,
    mut mover: ResMut<TokenMover>,
    mut finished: EventWriter<MoveFinished>,
    mut laps: EventWriter<LapCompleted>,
    mut tokens: Query<(&mut Transform, &mut TokenMotion), With<PlayerToken>>,
) {
    let Ok((mut transform, mut motion)) = tokens.get_single_mut() else {
        return;
    };

    match &mut *motion {
        TokenMotion::Idle => {
            if !mover.is_moving() {
                return;
            }
            if let Some(outcome) = mover.try_finish() {
                info!("token arrived at tile {}", outcome.tile);
                finished.send(MoveFinished {
                    tile: outcome.tile,
                    laps: outcome.laps,
                });
                return;
            }
            let Some(next) = layout.tile(mover.next_tile()) else {
                return;
            };
            *motion = TokenMotion::Stepping {
                target: next.position,
            };
        }
        TokenMotion::Stepping { target } => {
            let target = *target;
            let step = config.move_speed * time.delta_seconds();
            let position = transform.translation.truncate();
            let offset = target - position;
            if offset.length() <= step {
                transform.translation = target.extend(TOKEN_Z);
                if let Some(outcome) = mover.commit_step() {
                    if outcome.lap_completed {
                        laps.send(LapCompleted);
                    }
                }
                *motion = if config.step_delay > 0.0 {
                    TokenMotion::Pausing {
                        timer: Timer::from_seconds(config.step_delay, TimerMode::Once),
                    }
                } else {
                    TokenMotion::Idle
                };
            } else {
                transform.translation += (offset.normalize_or_zero() * step).extend(0.0);
            }
        }
        TokenMotion::Pausing { timer } => {
            if timer.tick(time.delta()).finished() {
                *motion = TokenMotion::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drains the active move hop by hop, the way the frame schedule would.
    fn run_to_completion(mover: &mut TokenMover) -> MoveOutcome {
        loop {
            if let Some(outcome) = mover.try_finish() {
                return outcome;
            }
            mover.commit_step().expect("move should still have hops left");
        }
    }

    #[test]
    fn zero_steps_is_a_completed_noop() {
        let mut mover = TokenMover::new(10);
        mover.start_move(0).unwrap();
        assert!(mover.is_moving());
        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome, MoveOutcome { tile: 0, laps: 0 });
        assert!(!mover.is_moving());
        assert_eq!(mover.current_tile(), 0);
    }

    #[test]
    fn lap_fires_exactly_on_the_wrap_to_origin() {
        let mut mover = TokenMover::new(10);

        mover.start_move(9).unwrap();
        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome, MoveOutcome { tile: 9, laps: 0 });

        mover.start_move(1).unwrap();
        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome, MoveOutcome { tile: 0, laps: 1 });
    }

    #[test]
    fn long_moves_count_every_wrap() {
        let mut mover = TokenMover::new(10);
        mover.start_move(25).unwrap();
        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome, MoveOutcome { tile: 5, laps: 2 });
    }

    #[test]
    fn each_full_ring_counts_one_lap() {
        let mut mover = TokenMover::new(10);
        for _ in 0..3 {
            mover.start_move(10).unwrap();
            let outcome = run_to_completion(&mut mover);
            assert_eq!(outcome, MoveOutcome { tile: 0, laps: 1 });
        }
    }

    #[test]
    fn overlapping_start_is_rejected_without_state_change() {
        let mut mover = TokenMover::new(10);
        mover.start_move(3).unwrap();
        mover.commit_step().unwrap();
        let before = mover.current_tile();

        assert_eq!(mover.start_move(2), Err(MoveRejected::AlreadyMoving));
        assert_eq!(mover.current_tile(), before);
        assert!(mover.is_moving());

        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome, MoveOutcome { tile: 3, laps: 0 });
    }

    #[test]
    fn empty_board_rejects_moves() {
        let mut mover = TokenMover::new(0);
        assert_eq!(mover.start_move(4), Err(MoveRejected::EmptyBoard));
        assert!(!mover.is_moving());
        assert_eq!(mover.current_tile(), 0);
    }

    #[test]
    fn commit_step_outside_a_move_is_none() {
        let mut mover = TokenMover::new(10);
        assert_eq!(mover.commit_step(), None);
        assert_eq!(mover.try_finish(), None);
    }

    #[test]
    fn hop_reports_the_boundary_it_crossed() {
        let mut mover = TokenMover::new(4);
        mover.start_move(4).unwrap();
        let hops: Vec<StepOutcome> = (0..4).map(|_| mover.commit_step().unwrap()).collect();
        assert_eq!(hops[0], StepOutcome { from: 0, to: 1, lap_completed: false });
        assert_eq!(hops[2], StepOutcome { from: 2, to: 3, lap_completed: false });
        assert_eq!(hops[3], StepOutcome { from: 3, to: 0, lap_completed: true });
    }

    #[test]
    fn sitting_on_the_origin_never_counts_as_a_lap() {
        // a fresh token at tile 0 that has not left it yet
        let mut mover = TokenMover::new(10);
        assert_eq!(mover.current_tile(), 0);
        mover.start_move(0).unwrap();
        let outcome = run_to_completion(&mut mover);
        assert_eq!(outcome.laps, 0);
    }
}
