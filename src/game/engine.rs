use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use super::board::Board;
use super::config::{Difficulty, GameConfig};
use super::direction::Direction;
use super::food;
use super::state::{BonusFood, CollisionType, GameState, Position, Snake};

/// Information about a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    /// Whether the snake ate the main food this tick
    pub ate_food: bool,
    /// Whether the snake ate the bonus food this tick
    pub ate_bonus: bool,
    /// Whether an uneaten bonus food timed out this tick
    pub bonus_expired: bool,
    /// Whether the snake filled the entire board this tick
    pub board_cleared: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the game has ended
    pub terminated: bool,
    /// Additional information about the tick
    pub info: StepInfo,
}

/// The game engine that advances the state one tick at a time
///
/// The engine owns the configuration and the food RNG. The difficulty's
/// frame time and score values are sampled when a game starts, so changing
/// the selected difficulty never alters a game already in progress.
pub struct GameEngine {
    config: GameConfig,
    frame_time: Duration,
    food_score: u32,
    bonus_score: u32,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine, failing fast on an invalid configuration
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let difficulty = config.difficulty;
        Ok(Self {
            config,
            frame_time: Duration::from_millis(difficulty.frame_time_ms()),
            food_score: difficulty.food_score(),
            bonus_score: difficulty.bonus_score(),
            rng: rand::thread_rng(),
        })
    }

    /// Delay between ticks for the game in progress
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// The difficulty that will apply to the next game
    pub fn selected_difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Select the difficulty for the next game; sampled at `start_game`
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    /// State shown before any game has started: snake placed, nothing moving
    pub fn idle_state(&self) -> GameState {
        let board = Board::new(self.config.columns, self.config.rows);
        let mut state = GameState::new(board, Snake::new(self.config.start_path()));
        state.playing = false;
        state
    }

    /// Reset everything and begin a new game
    ///
    /// Fresh snake on the startup path, score 0, food counter 0, bonus food
    /// cleared, difficulty sampled, and a main food spawned off the body.
    pub fn start_game(&mut self) -> GameState {
        let difficulty = self.config.difficulty;
        self.frame_time = Duration::from_millis(difficulty.frame_time_ms());
        self.food_score = difficulty.food_score();
        self.bonus_score = difficulty.bonus_score();

        let board = Board::new(self.config.columns, self.config.rows);
        let mut state = GameState::new(board, Snake::new(self.config.start_path()));
        state.main_food = food::spawn_avoiding(&mut self.rng, board, &state.snake);
        state
    }

    /// Advance the game by one tick in the given direction
    pub fn step(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        let mut info = StepInfo::default();

        if !state.playing {
            return StepResult {
                terminated: true,
                info,
            };
        }

        // Bonus lifetime counts down in ticks; at zero it vanishes before
        // the snake moves.
        if let Some(bonus) = state.bonus_food.as_mut() {
            bonus.ttl -= 1;
            if bonus.ttl == 0 {
                state.bonus_food = None;
                info.bonus_expired = true;
            }
        }

        let candidate = state.snake.next_head(direction);

        if let Some(collision) = self.check_collision(state, candidate) {
            state.playing = false;
            info.collision = Some(collision);

            return StepResult {
                terminated: true,
                info,
            };
        }

        state.snake.push_head(candidate);

        if state.bonus_food.is_some_and(|bonus| bonus.position == candidate) {
            state.score.increase(self.bonus_score);
            state.bonus_food = None;
            info.ate_bonus = true;
        }

        if state.main_food == Some(candidate) {
            info.ate_food = true;
            state.score.increase(self.food_score);
            state.food_eaten += 1;

            state.main_food = food::spawn_avoiding(&mut self.rng, state.board, &state.snake);

            if state.food_eaten % GameConfig::BONUS_FOOD_INTERVAL == 0 {
                // Re-arming replaces any previous bonus and its countdown.
                state.bonus_food =
                    food::spawn_avoiding(&mut self.rng, state.board, &state.snake).map(
                        |position| BonusFood {
                            position,
                            ttl: GameConfig::BONUS_LIFETIME_TICKS,
                        },
                    );
            }

            if state.main_food.is_none() {
                // No free cell left for food: the snake owns the board.
                state.playing = false;
                state.bonus_food = None;
                info.board_cleared = true;

                return StepResult {
                    terminated: true,
                    info,
                };
            }
        } else {
            state.snake.cut_tail();
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    fn check_collision(&self, state: &GameState, candidate: Position) -> Option<CollisionType> {
        if state.board.is_out_of_view(candidate) {
            return Some(CollisionType::Wall);
        }

        // The whole body counts, tail included: moving into the tail cell
        // ends the game even though the tail would move away this tick.
        if state.snake.contains(candidate) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::new(config).unwrap()
    }

    fn body_of(state: &GameState) -> Vec<Position> {
        state.snake.segments().collect()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(GameEngine::new(GameConfig::new(0, 0, Difficulty::Easy)).is_err());
    }

    #[test]
    fn test_start_game_resets_everything() {
        let mut engine = engine(GameConfig::default());
        let state = engine.start_game();

        assert!(state.playing);
        assert_eq!(state.score.value(), 0);
        assert_eq!(state.food_eaten, 0);
        assert_eq!(state.snake.len(), 3);
        assert!(state.bonus_food.is_none());

        let food = state.main_food.unwrap();
        assert!(!state.snake.contains(food));
        assert!(!state.board.is_out_of_view(food));
    }

    #[test]
    fn test_idle_state_is_not_playing() {
        let engine = engine(GameConfig::default());
        let state = engine.idle_state();

        assert!(!state.playing);
        assert!(state.main_food.is_none());
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_tick_without_food_moves_without_growth() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();
        state.main_food = Some(Position::new(50, 30));

        let result = engine.step(&mut state, Direction::Down);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(
            body_of(&state),
            vec![Position::new(1, 2), Position::new(1, 3), Position::new(1, 4)]
        );
        assert_eq!(state.score.value(), 0);
    }

    #[test]
    fn test_eating_main_food_grows_and_scores() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();
        state.main_food = Some(Position::new(1, 4));

        let result = engine.step(&mut state, Direction::Down);

        assert!(result.info.ate_food);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(
            body_of(&state),
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(1, 4)
            ]
        );
        assert_eq!(state.score.value(), Difficulty::Hard.food_score());
        assert_eq!(state.food_eaten, 1);

        let respawned = state.main_food.unwrap();
        assert!(!state.snake.contains(respawned));
    }

    #[test]
    fn test_wall_collision_ends_game_without_mutating_body() {
        let mut engine = engine(GameConfig::small());
        let mut state = GameState::new(
            Board::new(10, 10),
            Snake::new([Position::new(2, 5), Position::new(1, 5), Position::new(0, 5)]),
        );

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::Wall));
        assert!(!state.playing);
        assert_eq!(
            body_of(&state),
            vec![Position::new(2, 5), Position::new(1, 5), Position::new(0, 5)]
        );
    }

    #[test]
    fn test_right_edge_is_a_wall() {
        let mut engine = engine(GameConfig::default());
        let mut state = GameState::new(
            Board::new(60, 35),
            Snake::new([Position::new(57, 5), Position::new(58, 5), Position::new(59, 5)]),
        );

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision_includes_tail_cell() {
        let mut engine = engine(GameConfig::small());
        // Head at (6,5) turning left into the tail at (5,5).
        let mut state = GameState::new(
            Board::new(10, 10),
            Snake::new([
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ]),
        );

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::SelfCollision));
        assert!(!state.playing);
    }

    #[test]
    fn test_no_further_ticks_after_game_over() {
        let mut engine = engine(GameConfig::small());
        let mut state = GameState::new(
            Board::new(10, 10),
            Snake::new([Position::new(2, 5), Position::new(1, 5), Position::new(0, 5)]),
        );

        engine.step(&mut state, Direction::Left);
        let body = body_of(&state);

        let result = engine.step(&mut state, Direction::Down);

        assert!(result.terminated);
        assert_eq!(body_of(&state), body);
    }

    #[test]
    fn test_fifth_food_spawns_bonus_with_lifetime() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();
        state.food_eaten = 4;
        state.main_food = Some(Position::new(1, 4));

        let result = engine.step(&mut state, Direction::Down);

        assert!(result.info.ate_food);
        assert_eq!(state.food_eaten, 5);

        let bonus = state.bonus_food.unwrap();
        assert_eq!(bonus.ttl, GameConfig::BONUS_LIFETIME_TICKS);
        assert!(!state.snake.contains(bonus.position));
    }

    #[test]
    fn test_bonus_counts_down_and_expires() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();
        state.main_food = Some(Position::new(50, 30));
        state.bonus_food = Some(BonusFood {
            position: Position::new(40, 20),
            ttl: 2,
        });

        let result = engine.step(&mut state, Direction::Down);
        assert!(!result.info.bonus_expired);
        assert_eq!(state.bonus_food.unwrap().ttl, 1);

        let result = engine.step(&mut state, Direction::Down);
        assert!(result.info.bonus_expired);
        assert!(state.bonus_food.is_none());
    }

    #[test]
    fn test_eating_bonus_scores_without_growth() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();
        state.main_food = Some(Position::new(50, 30));
        state.bonus_food = Some(BonusFood {
            position: Position::new(1, 4),
            ttl: 10,
        });

        let result = engine.step(&mut state, Direction::Down);

        assert!(result.info.ate_bonus);
        assert!(!result.info.ate_food);
        assert!(state.bonus_food.is_none());
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score.value(), Difficulty::Hard.bonus_score());
    }

    #[test]
    fn test_score_is_monotone_and_resets_on_new_game() {
        let mut engine = engine(GameConfig::default());
        let mut state = engine.start_game();

        let mut last_score = 0;
        for _ in 0..5 {
            let head = state.snake.head();
            state.main_food = Some(head.moved_in(Direction::Down));
            engine.step(&mut state, Direction::Down);
            assert!(state.score.value() >= last_score);
            last_score = state.score.value();
        }
        assert!(last_score > 0);

        let state = engine.start_game();
        assert_eq!(state.score.value(), 0);
    }

    #[test]
    fn test_body_never_contains_duplicates() {
        let mut engine = engine(GameConfig::small());
        let mut state = engine.start_game();

        // Walk a box: enough ticks to turn through every direction.
        let script = [
            Direction::Down,
            Direction::Right,
            Direction::Right,
            Direction::Up,
            Direction::Up,
            Direction::Left,
            Direction::Down,
        ];

        for direction in script {
            let result = engine.step(&mut state, direction);
            if result.terminated {
                break;
            }

            let unique: HashSet<Position> = state.snake.segments().collect();
            assert_eq!(unique.len(), state.snake.len());
        }
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let mut engine = engine(GameConfig::new(5, 5, Difficulty::Easy));
        let board = Board::new(5, 5);

        // Serpentine path over every cell except (4,4); head ends at (3,4).
        let mut path = Vec::new();
        for y in 0..5 {
            let row: Vec<i32> = if y % 2 == 0 {
                (0..5).collect()
            } else {
                (0..5).rev().collect()
            };
            for x in row {
                if !(x == 4 && y == 4) {
                    path.push(Position::new(x, y));
                }
            }
        }

        let mut state = GameState::new(board, Snake::new(path));
        state.main_food = Some(Position::new(4, 4));

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.terminated);
        assert!(result.info.board_cleared);
        assert!(result.info.collision.is_none());
        assert!(!state.playing);
        assert!(state.main_food.is_none());
        assert_eq!(state.snake.len(), board.cell_count());
    }

    #[test]
    fn test_difficulty_changes_apply_at_next_start() {
        let mut engine = engine(GameConfig::default());
        let _state = engine.start_game();
        assert_eq!(engine.frame_time(), Duration::from_millis(50));

        engine.set_difficulty(Difficulty::Easy);
        assert_eq!(engine.frame_time(), Duration::from_millis(50));

        let _state = engine.start_game();
        assert_eq!(engine.frame_time(), Duration::from_millis(100));
    }
}
