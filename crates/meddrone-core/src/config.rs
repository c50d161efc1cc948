//! Planner configuration.

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// Tunables for one planning invocation.
///
/// Every field has a documented default; callers that don't care can use
/// `PlannerConfig::default()` and get the behavior of the reference data
/// set (Edinburgh service area).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    /// Where dispatches with an undefined location are assumed to be,
    /// and where planning starts when no service point is known.
    pub fallback_location: Coordinate,
    /// Per-move cost used when the drone catalogue carries none.
    pub default_cost_per_move: f64,
    /// Launch cost used when the drone catalogue carries none.
    pub default_cost_initial: f64,
    /// Landing cost used when the drone catalogue carries none.
    pub default_cost_final: f64,
    /// A* gives up after this many node expansions and falls back to
    /// the greedy walker.
    pub max_expansions: usize,
    /// Upper bound on greedy-walker moves per leg.
    pub greedy_move_cap: usize,
    /// Consecutive non-improving greedy moves before the walker
    /// declares itself stuck and returns its partial path.
    pub greedy_stuck_limit: usize,
    /// Whether the hover duplicate appended after each delivery counts
    /// as a move. The reference behavior is a zero-length marker, so
    /// this defaults to false.
    pub count_hover_as_move: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fallback_location: Coordinate::new(-3.186874, 55.944494),
            default_cost_per_move: 0.001,
            default_cost_initial: 0.1,
            default_cost_final: 0.1,
            max_expansions: 20_000,
            greedy_move_cap: 5_000,
            greedy_stuck_limit: 25,
            count_hover_as_move: false,
        }
    }
}
