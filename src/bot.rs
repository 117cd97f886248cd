// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The Bot ties the per-turn decision to the rest of the server: appearance,
// game lifecycle bookkeeping, the response deadline and the debug log.
// For more info see docs.battlesnake.com

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{Config, DecisionConfig};
use crate::debug_logger::DebugLogger;
use crate::selector::{decide, first_safe_direction};
use crate::stats::{
    cleanup_stale_games, create_active_games, create_shared_stats, ActiveGame, ActiveGames,
    GameOutcome, GameStats, SharedStats,
};
use crate::types::{Battlesnake, Board, Direction, Game, TurnContext};

/// Battlesnake Bot with OOP-style API
/// Exposes one method per API endpoint
pub struct Bot {
    config: Config,
    stats: SharedStats,
    active_games: ActiveGames,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates the bot, loading persisted statistics when they are enabled
    pub fn new(config: Config, debug_logger: DebugLogger) -> Self {
        let stats = if config.stats.enabled {
            GameStats::load_or_create(&PathBuf::from(config.stats.resolved_file_path()))
        } else {
            GameStats::new()
        };

        Bot {
            config,
            stats: create_shared_stats(stats),
            active_games: create_active_games(),
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": appearance.apiversion,
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
            "version": appearance.version,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, you: &Battlesnake) {
        info!("GAME START {}", game.id);

        let starting_length = u32::try_from(you.length).unwrap_or(0);
        self.active_games
            .lock()
            .insert(game.id.clone(), ActiveGame::new(starting_length));

        cleanup_stale_games(
            &self.active_games,
            self.config.stats.stale_game_max_age_seconds,
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, board: &Board, you: &Battlesnake) {
        let outcome = GameOutcome::from_final_board(board, &you.id);
        info!("GAME OVER {}, Turn {}, {:?}", game.id, turn, outcome);

        // /end reports the last turn of the game, not ours when we were
        // eliminated early; the last move we answered is our game length
        let final_length = u32::try_from(you.length).unwrap_or(0);
        let tracked = self.active_games.lock().remove(&game.id);
        let (starting_length, turns) = match tracked {
            Some(active) => (active.starting_length, active.last_turn),
            None => (final_length, u32::try_from(*turn).unwrap_or(0)),
        };
        let food_eaten = final_length.saturating_sub(starting_length);

        let snapshot = {
            let mut stats = self.stats.lock();
            stats.record_game(turns, food_eaten, outcome);
            stats.clone()
        };

        if self.config.stats.enabled {
            let path = PathBuf::from(self.config.stats.resolved_file_path());
            if let Err(e) = snapshot.save(&path) {
                error!("Failed to save stats: {}", e);
            }
        }
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The decision runs on tokio's blocking pool under the effective time
    /// budget. Missing the budget answers with the first safe move instead.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();
        let turn = *turn;

        if let Some(active) = self.active_games.lock().get_mut(&game.id) {
            active.last_turn = u32::try_from(turn).unwrap_or(0);
        }

        let fallback = first_safe_direction(&TurnContext::new(board, you, turn));
        let seed = self.turn_seed(turn);
        let decision = self.config.decision.clone();
        let board_owned = board.clone();
        let you_owned = you.clone();

        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let chosen_move = await_decision(turn, budget, fallback, move || {
            Bot::compute_move(&decision, &board_owned, &you_owned, turn, seed)
        })
        .await;

        info!(
            "Turn {}: Chose {} (seed: {}, time: {}ms)",
            turn,
            chosen_move.as_str(),
            seed,
            start_time.elapsed().as_millis()
        );

        self.debug_logger
            .log_move(turn, &you.id, board.clone(), chosen_move, seed);

        json!({ "move": chosen_move.as_str() })
    }

    /// Synchronous decision for one turn with a reproducible RNG
    pub fn compute_move(
        decision: &DecisionConfig,
        board: &Board,
        you: &Battlesnake,
        turn: i32,
        seed: u64,
    ) -> Direction {
        let ctx = TurnContext::new(board, you, turn);
        let mut rng = StdRng::seed_from_u64(seed);
        decide(&ctx, decision.distance_metric, &mut rng)
    }

    /// Aggregate statistics for GET /stats
    pub fn stats_summary(&self) -> Value {
        let stats = self.stats.lock().clone();
        let active_games = self.active_games.lock().len();
        let shortest_game = (stats.total_games > 0).then_some(stats.shortest_game);

        json!({
            "total_games": stats.total_games,
            "wins": stats.wins,
            "losses": stats.losses,
            "draws": stats.draws,
            "win_rate": stats.win_rate(),
            "average_turns": stats.average_turns(),
            "average_food_eaten": stats.average_food_eaten(),
            "longest_game": stats.longest_game,
            "shortest_game": shortest_game,
            "last_played": stats.last_played,
            "active_games": active_games,
        })
    }

    /// Configured seed offset by turn, or fresh entropy
    fn turn_seed(&self, turn: i32) -> u64 {
        match self.config.decision.rng_seed {
            Some(seed) => seed.wrapping_add(u64::from(turn.unsigned_abs())),
            None => rand::rng().random(),
        }
    }
}

/// Runs `compute` on the blocking pool and waits at most `budget` for it.
/// A timeout or a panicking task answers `fallback`.
pub async fn await_decision<F>(
    turn: i32,
    budget: Duration,
    fallback: Direction,
    compute: F,
) -> Direction
where
    F: FnOnce() -> Direction + Send + 'static,
{
    let task = tokio::task::spawn_blocking(compute);

    match tokio::time::timeout(budget, task).await {
        Ok(Ok(direction)) => direction,
        Ok(Err(e)) => {
            error!("Turn {}: decision task failed: {}", turn, e);
            fallback
        }
        Err(_) => {
            warn!(
                "Turn {}: no decision within {}ms, sending {}",
                turn,
                budget.as_millis(),
                fallback
            );
            fallback
        }
    }
}
