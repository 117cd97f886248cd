// Safety filter
//
// Two independent passes clear the safety flag of candidates that would kill
// the snake this turn: running into a body segment next to the head, or
// leaving the board. Neither pass looks further than one step ahead.

use log::debug;

use crate::candidates::Candidate;
use crate::types::{Direction, TurnContext};

/// Applies both safety passes and returns the annotated candidates
pub fn filter(ctx: &TurnContext, mut candidates: [Candidate; 4]) -> [Candidate; 4] {
    mark_collisions(ctx, &mut candidates);
    mark_out_of_bounds(ctx, &mut candidates);

    debug!(
        "Turn {}: safe moves {:?}",
        ctx.turn,
        candidates
            .iter()
            .filter(|c| c.is_safe())
            .map(|c| c.direction.as_str())
            .collect::<Vec<_>>()
    );

    candidates
}

/// Marks a direction unsafe when any snake segment (our own included) sits
/// orthogonally adjacent to the head on that side
pub fn mark_collisions(ctx: &TurnContext, candidates: &mut [Candidate; 4]) {
    let head = ctx.head();

    for snake in &ctx.board.snakes {
        for segment in &snake.body {
            let blocked = if segment.y == head.y && segment.x == head.x - 1 {
                Some(Direction::Left)
            } else if segment.y == head.y && segment.x == head.x + 1 {
                Some(Direction::Right)
            } else if segment.x == head.x && segment.y == head.y - 1 {
                Some(Direction::Down)
            } else if segment.x == head.x && segment.y == head.y + 1 {
                Some(Direction::Up)
            } else {
                None
            };

            if let Some(dir) = blocked {
                mark(candidates, dir);
            }
        }
    }
}

/// Marks every candidate whose target lies outside `[0, width) x [0, height)`
pub fn mark_out_of_bounds(ctx: &TurnContext, candidates: &mut [Candidate; 4]) {
    for candidate in candidates.iter_mut() {
        if !ctx.in_bounds(&candidate.target) {
            candidate.mark_unsafe();
        }
    }
}

fn mark(candidates: &mut [Candidate; 4], dir: Direction) {
    if let Some(candidate) = candidates.iter_mut().find(|c| c.direction == dir) {
        candidate.mark_unsafe();
    }
}
