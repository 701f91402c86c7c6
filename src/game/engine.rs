use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    action::{Action, Direction},
    collision::{is_near_food, is_out_of_bounds, random_food_position},
    config::GameConfig,
    state::{GameState, Phase, Snake},
};

/// What a single tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or already over; nothing changed
    Idle,
    /// The snake translated by one cell
    Moved,
    /// The snake grew, food moved and the score went up
    Ate,
    /// The head was found outside the bounds; the session just ended
    GameOver,
}

/// Drives a [`GameState`] through ticks and player actions
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Same as [`GameEngine::new`] but with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh session from the configured initial layout
    pub fn new_session(&self) -> GameState {
        GameState::new(
            Snake::new(self.config.initial_snake.clone(), Direction::Right),
            self.config.initial_food,
            self.config.bounds,
        )
    }

    /// Advance the session by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        if state.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        // Decided on the head as it stands, before this tick's move.
        if is_out_of_bounds(state.snake.head(), &state.bounds) {
            state.phase = Phase::GameOver;
            return TickOutcome::GameOver;
        }

        let new_head = state.snake.next_head();
        state.moves += 1;

        if is_near_food(new_head, state.food, self.config.food_threshold) {
            state.snake.advance(new_head, true);
            state.food = random_food_position(
                &mut self.rng,
                state.bounds.x_max,
                state.bounds.y_max,
            );
            state.score += self.config.score_increment;
            TickOutcome::Ate
        } else {
            state.snake.advance(new_head, false);
            TickOutcome::Moved
        }
    }

    /// Change the travel direction in place, in any phase
    ///
    /// Returns false only when the reversal guard is on and rejected the turn.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if self.config.guard_reversals && state.snake.direction.is_opposite(direction) {
            return false;
        }
        state.snake.direction = direction;
        true
    }

    /// Steer from a pan gesture's cumulative translation
    pub fn apply_gesture(&self, state: &mut GameState, dx: f32, dy: f32) -> bool {
        self.set_direction(state, Direction::from_translation(dx, dy))
    }

    /// Running <-> Paused. A finished session stays finished.
    pub fn toggle_pause(&self, state: &mut GameState) {
        state.phase = match state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => Phase::GameOver,
        };
    }

    /// Restore the initial layout and start running again
    ///
    /// The typed player name belongs to the screen and survives a reload.
    pub fn reload(&self, state: &mut GameState) {
        let player_name = std::mem::take(&mut state.player_name);
        *state = self.new_session();
        state.player_name = player_name;
    }

    /// Dispatch a player action
    pub fn apply(&self, state: &mut GameState, action: Action) {
        match action {
            Action::Turn(direction) => {
                self.set_direction(state, direction);
            }
            Action::Swipe { dx, dy } => {
                self.apply_gesture(state, dx, dy);
            }
            Action::TogglePause => self.toggle_pause(state),
            Action::Reload => self.reload(state),
        }
    }
}
