// Move selection
//
// Picks one direction out of the annotated candidates. The branches are
// checked in a fixed order and the first one that applies decides the move:
//
//   1. nothing is safe        -> FALLBACK_DIRECTION
//   2. exactly one is safe    -> that one
//   3. no food on the board   -> uniform random among the safe moves
//   4. a safe move lands on food -> the first such move
//   5. otherwise              -> the safe move closest to any food
//
// Ties in (5) go to the earliest candidate in up, down, left, right order so
// that the only randomness is the injected RNG of branch (3).

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidates::{generate_candidates, Candidate};
use crate::safety;
use crate::types::{Coord, Direction, TurnContext};

/// Returned when every candidate is unsafe
pub const FALLBACK_DIRECTION: Direction = Direction::Down;

/// Distance used to rank safe moves against food
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Manhattan,
    /// Compared as squared distance, which orders cells the same way
    Euclidean,
}

impl DistanceMetric {
    pub fn measure(&self, a: &Coord, b: &Coord) -> i64 {
        let dx = i64::from(a.x - b.x);
        let dy = i64::from(a.y - b.y);
        match self {
            DistanceMetric::Manhattan => dx.abs() + dy.abs(),
            DistanceMetric::Euclidean => dx * dx + dy * dy,
        }
    }
}

/// Runs the full per-turn pipeline: generate, filter, select
pub fn decide<R: Rng + ?Sized>(
    ctx: &TurnContext,
    metric: DistanceMetric,
    rng: &mut R,
) -> Direction {
    let candidates = safety::filter(ctx, generate_candidates(ctx.head()));
    select(ctx, &candidates, metric, rng)
}

/// First safe move in up, down, left, right order, or FALLBACK_DIRECTION.
/// Cheap enough to compute before the full decision as a deadline answer.
pub fn first_safe_direction(ctx: &TurnContext) -> Direction {
    safety::filter(ctx, generate_candidates(ctx.head()))
        .iter()
        .find(|c| c.is_safe())
        .map_or(FALLBACK_DIRECTION, |c| c.direction)
}

/// Chooses a direction from already-filtered candidates. Never fails.
pub fn select<R: Rng + ?Sized>(
    ctx: &TurnContext,
    candidates: &[Candidate; 4],
    metric: DistanceMetric,
    rng: &mut R,
) -> Direction {
    let safe: Vec<&Candidate> = candidates.iter().filter(|c| c.is_safe()).collect();

    match safe.as_slice() {
        [] => {
            debug!(
                "Turn {}: no safe moves, falling back to {}",
                ctx.turn, FALLBACK_DIRECTION
            );
            return FALLBACK_DIRECTION;
        }
        [only] => {
            debug!("Turn {}: only safe move is {}", ctx.turn, only.direction);
            return only.direction;
        }
        _ => {}
    }

    let food = &ctx.board.food;

    if food.is_empty() {
        let picked = safe
            .choose(rng)
            .map(|c| c.direction)
            .unwrap_or(FALLBACK_DIRECTION);
        debug!("Turn {}: no food, picked {} at random", ctx.turn, picked);
        return picked;
    }

    if let Some(eat) = safe.iter().find(|c| food.contains(&c.target)) {
        debug!("Turn {}: food in reach, moving {}", ctx.turn, eat.direction);
        return eat.direction;
    }

    nearest_food_move(&safe, food, metric).unwrap_or(FALLBACK_DIRECTION)
}

/// Safe move minimising distance to any food item, earliest candidate on ties
fn nearest_food_move(
    safe: &[&Candidate],
    food: &[Coord],
    metric: DistanceMetric,
) -> Option<Direction> {
    let mut best: Option<(i64, Direction)> = None;

    for candidate in safe {
        for item in food {
            let distance = metric.measure(&candidate.target, item);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, candidate.direction));
            }
        }
    }

    if let Some((distance, dir)) = best {
        debug!("Nearest food is {} away via {}", distance, dir);
    }

    best.map(|(_, dir)| dir)
}
