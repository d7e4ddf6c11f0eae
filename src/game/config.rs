use serde::{Deserialize, Serialize};

use super::state::Position;

/// Difficulty presets
///
/// Each preset fixes the tick interval and the points awarded per food and
/// per bonus food. The selection is read once when a game starts; changing
/// it mid-game only affects the next game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Delay between ticks, in milliseconds
    pub fn frame_time_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Normal => 75,
            Difficulty::Hard => 50,
        }
    }

    /// Points awarded for eating a main food
    pub fn food_score(&self) -> u32 {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Normal => 16,
            Difficulty::Hard => 32,
        }
    }

    /// Points awarded for eating a bonus food
    pub fn bonus_score(&self) -> u32 {
        match self {
            Difficulty::Easy => 32,
            Difficulty::Normal => 64,
            Difficulty::Hard => 128,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of grid columns
    pub columns: usize,
    /// Number of grid rows
    pub rows: usize,
    /// Active difficulty preset
    pub difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 60,
            rows: 35,
            difficulty: Difficulty::Hard,
        }
    }
}

impl GameConfig {
    /// A bonus food is spawned every this many main foods eaten
    pub const BONUS_FOOD_INTERVAL: u32 = 5;

    /// Ticks a bonus food stays on the board before it disappears
    ///
    /// One tick fires per frame time, so this equals 60 frame times of
    /// wall-clock lifetime.
    pub const BONUS_LIFETIME_TICKS: u32 = 60;

    /// Create a new configuration with a custom grid size
    pub fn new(columns: usize, rows: usize, difficulty: Difficulty) -> Self {
        Self {
            columns,
            rows,
            difficulty,
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10, Difficulty::Hard)
    }

    /// The fixed 3-cell startup path, tail to head
    ///
    /// The snake starts near the top-left corner heading down, matching the
    /// classic layout.
    pub fn start_path(&self) -> [Position; 3] {
        [
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(1, 3),
        ]
    }

    /// Validate the configuration
    ///
    /// Fails fast on degenerate grids: the startup path occupies column 1,
    /// rows 1 through 3, and the snake needs room to move off it.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns < 5 {
            return Err(format!(
                "grid must be at least 5 columns wide, got {}",
                self.columns
            ));
        }

        if self.rows < 5 {
            return Err(format!(
                "grid must be at least 5 rows tall, got {}",
                self.rows
            ));
        }

        Ok(())
    }
}
