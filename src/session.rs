use itertools::{Itertools, MinMaxResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::timer::Millis;
use crate::util::mean;

/// Coarse lifecycle shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Settings,
    Playing,
    GameOver,
}

/// Position in percent of the play area (0..=100 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn centre() -> Self {
        Self::new(50.0, 50.0)
    }

    /// Uniformly random position keeping `padding` percent away from every edge
    pub fn random_padded<R: Rng + ?Sized>(rng: &mut R, padding: f64) -> Self {
        let span = 100.0 - 2.0 * padding;
        Self {
            x: padding + rng.gen::<f64>() * span,
            y: padding + rng.gen::<f64>() * span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub position: Position,
    /// Diameter in pixels
    pub size: u32,
    pub spawned_at: Millis,
    pub expires_at: Option<Millis>,
}

/// Hands out target ids, monotonically increasing within one session
#[derive(Debug, Clone, Default)]
pub struct TargetIds {
    next: u32,
}

impl TargetIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub round: u32,
    pub reaction_time_ms: u64,
    pub hit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Hit,
    Miss,
    LifeLost,
}

/// End-of-game figures over a list of round results.
/// Timing figures only consider rounds that were hits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultSummary {
    pub rounds: usize,
    pub hits: usize,
    pub misses: usize,
    pub average_ms: u64,
    pub best_ms: u64,
    pub worst_ms: u64,
    /// Whole percent
    pub accuracy: u32,
}

impl ResultSummary {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let hit_times: Vec<f64> = results
            .iter()
            .filter(|r| r.hit)
            .map(|r| r.reaction_time_ms as f64)
            .collect();
        let hits = hit_times.len();
        let rounds = results.len();

        let (best_ms, worst_ms) = match results
            .iter()
            .filter(|r| r.hit)
            .map(|r| r.reaction_time_ms)
            .minmax()
        {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(t) => (t, t),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };

        let accuracy = if rounds > 0 {
            ((hits as f64 / rounds as f64) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            rounds,
            hits,
            misses: rounds - hits,
            average_ms: mean(&hit_times).map_or(0, |m| m.round() as u64),
            best_ms,
            worst_ms,
            accuracy,
        }
    }
}
