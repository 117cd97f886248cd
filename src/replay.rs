// Replay of recorded decisions
//
// Reads the JSONL debug log, runs the decision again on each recorded board
// and reports where the current code disagrees with what was sent. Logged
// RNG seeds make the random no-food branch replay exactly.

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DecisionRecord;
use crate::types::{Board, Direction};

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    /// False when the log carried no seed and the replay used seed 0
    pub seeded: bool,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all records from a JSONL file, skipping blank lines
    pub fn load_log_file<P: AsRef<Path>>(
        &self,
        log_path: P,
    ) -> Result<Vec<DecisionRecord>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: DecisionRecord = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;
            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the decision for `our_snake_id` on `board`
    pub fn replay_turn(
        &self,
        board: &Board,
        our_snake_id: &str,
        turn: i32,
        seed: u64,
    ) -> Result<Direction, String> {
        let our_snake = board
            .snakes
            .iter()
            .find(|s| s.id == our_snake_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", our_snake_id))?;

        Ok(Bot::compute_move(
            &self.config.decision,
            board,
            our_snake,
            turn,
            seed,
        ))
    }

    /// Replays a single record and compares the result
    pub fn replay_entry(&self, entry: &DecisionRecord) -> Result<ReplayResult, String> {
        // Older logs have no id; the first snake is then assumed to be ours
        let our_snake_id = match &entry.you_id {
            Some(id) => id.clone(),
            None => entry
                .board
                .snakes
                .first()
                .map(|s| s.id.clone())
                .ok_or("No snakes found in board state")?,
        };

        let original_move: Direction = entry.chosen_move.parse()?;
        let start = Instant::now();
        let replayed_move = self.replay_turn(
            &entry.board,
            &our_snake_id,
            entry.turn,
            entry.rng_seed.unwrap_or(0),
        )?;

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches: original_move == replayed_move,
            seeded: entry.rng_seed.is_some(),
            computation_time_us: start.elapsed().as_micros(),
        };

        if self.verbose {
            if result.matches {
                info!("Turn {}: MATCH {}", entry.turn, replayed_move);
            } else {
                warn!(
                    "Turn {}: MISMATCH logged {}, replayed {}",
                    entry.turn, original_move, replayed_move
                );
            }
        }

        Ok(result)
    }

    /// Replays every record; turns are independent so they run in parallel
    pub fn replay_all(&self, entries: &[DecisionRecord]) -> Vec<ReplayResult> {
        let mut results: Vec<ReplayResult> = entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect();

        results.sort_by_key(|r| r.turn);
        results
    }

    /// Replays only the listed turns
    pub fn replay_turns(
        &self,
        entries: &[DecisionRecord],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        turn_numbers
            .iter()
            .map(|turn| {
                let entry = entries
                    .iter()
                    .find(|e| e.turn == *turn)
                    .ok_or_else(|| format!("Turn {} not found in log file", turn))?;
                self.replay_entry(entry)
            })
            .collect()
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n===========================================================");
        println!("                    REPLAY REPORT");
        println!("===========================================================");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);

        let unseeded = results.iter().filter(|r| !r.seeded).count();
        if unseeded > 0 {
            println!("Unseeded turns: {} (random choices may differ)", unseeded);
        }

        if !results.is_empty() {
            let avg_time = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average decision time: {:.1}us", avg_time);
        }
        println!("===========================================================\n");

        for result in results.iter().filter(|r| !r.matches) {
            println!(
                "Turn {}: {} -> {}",
                result.turn, result.original_move, result.replayed_move
            );
        }
    }

    /// Checks the logged moves (not the replayed ones) against expectations
    pub fn validate_expected_moves(
        &self,
        entries: &[DecisionRecord],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move: Direction = entry.chosen_move.parse()?;
            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }
}
