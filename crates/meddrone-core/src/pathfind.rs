//! Point-to-point pathfinder over the implicit 16-way step graph.
//!
//! Nodes are rounded coordinates, edges are the 16 fixed-angle
//! one-step moves, edge cost is the step length, and the heuristic is
//! straight-line distance to the goal (admissible and consistent, so
//! the first goal pop is optimal). The search is bounded: after the
//! expansion cap, or if the open set empties, a greedy walker takes
//! over and produces a best-effort partial path. The pathfinder never
//! fails; an unreachable goal degrades to the longest partial route.

use crate::config::PlannerConfig;
use crate::geo::{
    angular_difference, distance, grid_key, heading, is_close, step, GridKey, COMPASS, STEP_LENGTH,
};
use crate::models::{Coordinate, RestrictedArea};
use crate::zones::blocked;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Total-order wrapper so f64 scores can live in a BinaryHeap.
#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Search node stored in the arena; `parent` is an arena index, so the
/// reconstruction walk never chases owned pointers.
#[derive(Debug, Clone, Copy)]
struct ArenaNode {
    pos: Coordinate,
    parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: FloatOrd,
    g: FloatOrd,
    node: usize,
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Compute a flight path from `start` to `goal` that avoids the given
/// restricted areas.
///
/// The returned path starts at `start` exactly; consecutive points are
/// one step length apart; the final point is within the close threshold
/// of `goal` when the goal was reachable. If both the bounded A* and
/// the greedy fallback fail to reach the goal, the longest partial path
/// found is returned instead of an error.
pub fn find_path(
    start: Coordinate,
    goal: Coordinate,
    zones: &[RestrictedArea],
    config: &PlannerConfig,
) -> Vec<Coordinate> {
    if is_close(start, goal) {
        // Degenerate one-point path: no move needed.
        return vec![start];
    }

    if let Some(path) = astar(start, goal, zones, config) {
        return path;
    }

    tracing::debug!(
        ?start,
        ?goal,
        "A* exhausted, falling back to greedy walker"
    );
    greedy_walk(start, goal, zones, config)
}

fn astar(
    start: Coordinate,
    goal: Coordinate,
    zones: &[RestrictedArea],
    config: &PlannerConfig,
) -> Option<Vec<Coordinate>> {
    let mut arena: Vec<ArenaNode> = vec![ArenaNode {
        pos: start,
        parent: None,
    }];
    let mut g_score: HashMap<GridKey, f64> = HashMap::new();
    let mut closed: HashSet<GridKey> = HashSet::new();
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();

    g_score.insert(grid_key(start), 0.0);
    open.push(Reverse(OpenEntry {
        f: FloatOrd(distance(start, goal)),
        g: FloatOrd(0.0),
        node: 0,
    }));

    let mut expansions = 0usize;

    while let Some(Reverse(current)) = open.pop() {
        let node = arena[current.node];
        let key = grid_key(node.pos);
        if closed.contains(&key) {
            continue;
        }
        let best_g = g_score.get(&key).copied().unwrap_or(f64::INFINITY);
        if current.g.0 > best_g {
            // Stale entry superseded by a relaxation; the reinserted
            // duplicate carries the better score.
            continue;
        }

        if is_close(node.pos, goal) {
            return Some(reconstruct(&arena, current.node, goal));
        }

        expansions += 1;
        if expansions >= config.max_expansions {
            return None;
        }
        closed.insert(key);

        for &angle in &COMPASS {
            let next = step(node.pos, angle);
            let next_key = grid_key(next);
            if closed.contains(&next_key) {
                continue;
            }
            if blocked(node.pos, next, zones) {
                continue;
            }

            let tentative_g = best_g + STEP_LENGTH;
            if tentative_g < g_score.get(&next_key).copied().unwrap_or(f64::INFINITY) {
                arena.push(ArenaNode {
                    pos: next,
                    parent: Some(current.node),
                });
                let idx = arena.len() - 1;
                g_score.insert(next_key, tentative_g);
                open.push(Reverse(OpenEntry {
                    f: FloatOrd(tentative_g + distance(next, goal)),
                    g: FloatOrd(tentative_g),
                    node: idx,
                }));
            }
        }
    }

    None
}

fn reconstruct(arena: &[ArenaNode], end: usize, goal: Coordinate) -> Vec<Coordinate> {
    let mut path = Vec::new();
    let mut current = Some(end);
    while let Some(idx) = current {
        path.push(arena[idx].pos);
        current = arena[idx].parent;
    }
    path.reverse();
    if let Some(&last) = path.last() {
        if !is_close(last, goal) {
            path.push(goal);
        }
    }
    path
}

/// Best-effort walker used when the bounded search gives up: always
/// step in the compass direction closest to the goal bearing, prefer
/// unvisited nodes, never take a blocked move. Stops when close to the
/// goal, when no legal move exists, when the move cap is hit, or after
/// too many consecutive non-improving moves.
fn greedy_walk(
    start: Coordinate,
    goal: Coordinate,
    zones: &[RestrictedArea],
    config: &PlannerConfig,
) -> Vec<Coordinate> {
    let mut path = vec![start];
    let mut visited: HashSet<GridKey> = HashSet::new();
    visited.insert(grid_key(start));

    let mut current = start;
    let mut best_dist = distance(current, goal);
    let mut stalled = 0usize;

    for _ in 0..config.greedy_move_cap {
        if is_close(current, goal) {
            break;
        }

        let target_heading = heading(current, goal);
        let mut directions = COMPASS;
        directions.sort_by(|a, b| {
            angular_difference(*a, target_heading)
                .total_cmp(&angular_difference(*b, target_heading))
        });

        let mut chosen: Option<Coordinate> = None;
        let mut fallback: Option<Coordinate> = None;
        for &angle in &directions {
            let next = step(current, angle);
            if blocked(current, next, zones) {
                continue;
            }
            if visited.contains(&grid_key(next)) {
                if fallback.is_none() {
                    fallback = Some(next);
                }
                continue;
            }
            chosen = Some(next);
            break;
        }

        let Some(next) = chosen.or(fallback) else {
            // Fully walled in.
            break;
        };

        visited.insert(grid_key(next));
        path.push(next);
        current = next;

        let d = distance(current, goal);
        if d < best_dist {
            best_dist = d;
            stalled = 0;
        } else {
            stalled += 1;
            if stalled >= config.greedy_stuck_limit {
                break;
            }
        }
    }

    path
}

/// Straight-line estimate of a round trip from `base` to `target` and
/// back, in moves. Used by fleet assignment as the move-budget charge.
pub fn estimate_round_trip_moves(base: Coordinate, target: Coordinate) -> u32 {
    let moves = (2.0 * distance(base, target)) / STEP_LENGTH;
    moves.ceil() as u32
}
