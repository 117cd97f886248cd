// Cross-game statistics
//
// Bookkeeping that survives between games: which games are in progress and
// aggregate results persisted to a JSON file. Both live behind parking_lot
// mutexes created once at startup and handed to the Bot. Nothing in here is
// read by the move decision.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::types::Board;

/// Tracks a currently active game
#[derive(Debug, Clone)]
pub struct ActiveGame {
    /// Last turn number we answered
    pub last_turn: u32,
    pub started_at: DateTime<Utc>,
    pub starting_length: u32,
}

impl ActiveGame {
    pub fn new(starting_length: u32) -> Self {
        ActiveGame {
            last_turn: 0,
            started_at: Utc::now(),
            starting_length,
        }
    }
}

/// Shared map of game id to in-progress game
pub type ActiveGames = Arc<Mutex<HashMap<String, ActiveGame>>>;

pub fn create_active_games() -> ActiveGames {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Drops games whose /end never arrived. Returns how many were removed.
pub fn cleanup_stale_games(active_games: &ActiveGames, max_age_seconds: i64) -> usize {
    let mut games = active_games.lock();
    let now = Utc::now();
    let initial_count = games.len();

    games.retain(|game_id, game| {
        let age = now.signed_duration_since(game.started_at).num_seconds();
        if age > max_age_seconds {
            warn!("Cleaning up stale game {} (age: {} seconds)", game_id, age);
            false
        } else {
            true
        }
    });

    let removed = initial_count - games.len();
    if removed > 0 {
        info!("Cleaned up {} stale games", removed);
    }
    removed
}

/// How a finished game went for us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Loss,
    Draw,
}

impl GameOutcome {
    /// Reads the outcome off the final board sent with /end
    pub fn from_final_board(board: &Board, our_id: &str) -> Self {
        match board.snakes.as_slice() {
            [] => GameOutcome::Draw,
            [last] if last.id == our_id => GameOutcome::Win,
            _ => GameOutcome::Loss,
        }
    }
}

/// Aggregate performance over all games played
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GameStats {
    pub total_games: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Sum of turns survived across all games
    pub total_turns: u64,
    pub longest_game: u32,
    pub shortest_game: u32,
    pub total_food_eaten: u64,
    /// RFC 3339 timestamp of the last recorded game
    pub last_played: Option<String>,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            total_games: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            total_turns: 0,
            longest_game: 0,
            shortest_game: u32::MAX,
            total_food_eaten: 0,
            last_played: None,
        }
    }

    /// Load stats from a JSON file, or start fresh if it is missing or corrupt
    pub fn load_or_create(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create stats directory: {}", e);
                return Self::new();
            }
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(stats) => {
                    info!("Loaded stats from {}", path.display());
                    stats
                }
                Err(e) => {
                    error!("Failed to parse stats file: {}. Creating new stats.", e);
                    Self::new()
                }
            },
            Err(_) => {
                info!("Stats file not found. Creating new stats.");
                Self::new()
            }
        }
    }

    /// Writes to `<path>.tmp` then renames over `path`
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)?;
        let temp_file = path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_file)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_file, path)?;
        info!("Stats saved to {}", path.display());
        Ok(())
    }

    pub fn record_game(&mut self, turns: u32, food_eaten: u32, outcome: GameOutcome) {
        self.total_games += 1;
        self.total_turns += u64::from(turns);
        self.total_food_eaten += u64::from(food_eaten);

        match outcome {
            GameOutcome::Win => self.wins += 1,
            GameOutcome::Loss => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        self.longest_game = self.longest_game.max(turns);
        self.shortest_game = self.shortest_game.min(turns);
        self.last_played = Some(Utc::now().to_rfc3339());
    }

    /// Win rate as a percentage
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        (self.wins as f64 / self.total_games as f64) * 100.0
    }

    pub fn average_turns(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.total_games as f64
    }

    pub fn average_food_eaten(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.total_food_eaten as f64 / self.total_games as f64
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedStats = Arc<Mutex<GameStats>>;

pub fn create_shared_stats(stats: GameStats) -> SharedStats {
    Arc::new(Mutex::new(stats))
}
