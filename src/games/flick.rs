//! Two targets a fixed distance apart: click the first to start the clock,
//! then flick to the second.

use std::convert::Infallible;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::session::{Phase, Position, ResultSummary, RoundResult, SoundCue};
use crate::settings::FlickSettings;
use crate::timer::{Millis, TimerQueue};

const EDGE_PADDING: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickTarget {
    pub id: u32,
    pub position: Position,
    /// Diameter in pixels
    pub size: u32,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct FlickEngine {
    settings: FlickSettings,
    phase: Phase,
    current_round: u32,
    pair: Option<[FlickTarget; 2]>,
    active_index: usize,
    first_click_at: Option<Millis>,
    results: Vec<RoundResult>,
    timers: TimerQueue<Infallible>,
    rng: StdRng,
    cues: Vec<SoundCue>,
}

impl FlickEngine {
    pub fn new(settings: FlickSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: FlickSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: Phase::Settings,
            current_round: 1,
            pair: None,
            active_index: 0,
            first_click_at: None,
            results: Vec::new(),
            timers: TimerQueue::new(),
            rng,
            cues: Vec::new(),
        }
    }

    pub fn settings(&self) -> FlickSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: FlickSettings) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.settings = FlickSettings {
            rounds: settings.rounds.max(1),
            ..settings
        };
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn targets(&self) -> Option<&[FlickTarget; 2]> {
        self.pair.as_ref()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// A round is in progress once the first target has been clicked
    pub fn first_click_at(&self) -> Option<Millis> {
        self.first_click_at
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(&self.results)
    }

    /// Most recent successful flick time
    pub fn last_hit_ms(&self) -> Option<u64> {
        self.results
            .iter()
            .rev()
            .find(|r| r.hit)
            .map(|r| r.reaction_time_ms)
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn start(&mut self, _now: Millis) {
        self.phase = Phase::Playing;
        self.current_round = 1;
        self.results.clear();
        self.cues.clear();
        self.begin_round();
        debug!(rounds = self.settings.rounds, distance = %self.settings.distance, "flick started");
    }

    pub fn quit(&mut self) {
        self.pair = None;
        self.first_click_at = None;
        self.phase = Phase::Settings;
    }

    /// Handles a click on target `index` (0 or 1)
    pub fn click_target(&mut self, index: usize, now: Millis) {
        if self.phase != Phase::Playing || self.pair.is_none() || index > 1 {
            return;
        }

        match (self.active_index, index) {
            (0, 0) => {
                self.cues.push(SoundCue::Hit);
                self.first_click_at = Some(now);
                self.set_active(1);
            }
            (1, 1) => {
                self.cues.push(SoundCue::Hit);
                let elapsed = self.elapsed_since_first_click(now);
                self.complete_round(elapsed, true);
            }
            _ => {
                self.cues.push(SoundCue::Miss);
                let elapsed = self.elapsed_since_first_click(now);
                self.complete_round(elapsed, false);
            }
        }
    }

    /// Handles a click on empty space inside the play area
    pub fn click_area(&mut self, now: Millis) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(first) = self.first_click_at else {
            return;
        };
        self.cues.push(SoundCue::Miss);
        self.complete_round(now.saturating_sub(first), false);
    }

    fn elapsed_since_first_click(&self, now: Millis) -> u64 {
        self.first_click_at
            .map_or(0, |first| now.saturating_sub(first))
    }

    fn set_active(&mut self, index: usize) {
        self.active_index = index;
        if let Some(pair) = self.pair.as_mut() {
            for (i, t) in pair.iter_mut().enumerate() {
                t.is_active = i == index;
            }
        }
    }

    fn begin_round(&mut self) {
        self.active_index = 0;
        self.first_click_at = None;
        self.pair = Some(self.generate_pair());
    }

    fn complete_round(&mut self, reaction_time_ms: u64, hit: bool) {
        self.results.push(RoundResult {
            round: self.current_round,
            reaction_time_ms,
            hit,
        });

        if self.current_round >= self.settings.rounds {
            self.phase = Phase::GameOver;
            self.pair = None;
            self.first_click_at = None;
            let summary = self.summary();
            info!(
                hits = summary.hits,
                misses = summary.misses,
                average_ms = summary.average_ms,
                "flick game over"
            );
        } else {
            self.current_round += 1;
            self.begin_round();
        }
    }

    fn generate_pair(&mut self) -> [FlickTarget; 2] {
        let distance = self.settings.distance.percent();
        let size = self.settings.target_size.px();
        let max = 100.0 - EDGE_PADDING;

        let x1 = EDGE_PADDING + self.rng.gen::<f64>() * (100.0 - 2.0 * EDGE_PADDING - distance);
        let y1 = EDGE_PADDING + self.rng.gen::<f64>() * (100.0 - 2.0 * EDGE_PADDING);

        let angle = self.rng.gen::<f64>() * std::f64::consts::TAU;
        let x2 = (x1 + angle.cos() * distance).clamp(EDGE_PADDING, max);
        let y2 = (y1 + angle.sin() * distance).clamp(EDGE_PADDING, max);

        [
            FlickTarget {
                id: 1,
                position: Position::new(x1, y1),
                size,
                is_active: true,
            },
            FlickTarget {
                id: 2,
                position: Position::new(x2, y2),
                size,
                is_active: false,
            },
        ]
    }
}

impl Engine for FlickEngine {
    type Timer = Infallible;

    fn timers_mut(&mut self) -> &mut TimerQueue<Infallible> {
        &mut self.timers
    }

    fn on_timer(&mut self, timer: Infallible, _at: Millis) {
        match timer {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FlickDistance, TargetSize};

    fn engine(rounds: u32) -> FlickEngine {
        FlickEngine::with_rng(
            FlickSettings {
                target_size: TargetSize::Small,
                distance: FlickDistance::Far,
                rounds,
            },
            StdRng::seed_from_u64(9),
        )
    }

    #[test]
    fn in_order_clicks_record_a_hit() {
        let mut e = engine(3);
        e.start(0);
        e.click_target(0, 1_000);
        assert_eq!(e.active_index(), 1);
        assert_eq!(e.first_click_at(), Some(1_000));
        e.click_target(1, 1_320);

        assert_eq!(
            e.results(),
            &[RoundResult {
                round: 1,
                reaction_time_ms: 320,
                hit: true
            }]
        );
        assert_eq!(e.current_round(), 2);
        assert_eq!(e.active_index(), 0);
        assert_eq!(e.first_click_at(), None);
        assert_eq!(e.last_hit_ms(), Some(320));
    }

    #[test]
    fn wrong_target_is_a_miss() {
        let mut e = engine(3);
        e.start(0);
        e.click_target(0, 100);
        e.click_target(0, 250);
        assert_eq!(e.results().len(), 1);
        assert!(!e.results()[0].hit);
        assert_eq!(e.results()[0].reaction_time_ms, 150);
    }

    #[test]
    fn wrong_target_before_first_click_is_a_zero_time_miss() {
        let mut e = engine(3);
        e.start(0);
        e.click_target(1, 500);
        assert_eq!(e.results()[0].reaction_time_ms, 0);
        assert!(!e.results()[0].hit);
        assert_eq!(e.drain_cues(), vec![SoundCue::Miss]);
    }

    #[test]
    fn empty_click_before_first_click_is_noop() {
        let mut e = engine(3);
        e.start(0);
        e.click_area(400);
        assert!(e.results().is_empty());
        assert_eq!(e.current_round(), 1);
    }

    #[test]
    fn empty_click_after_first_click_is_a_miss() {
        let mut e = engine(3);
        e.start(0);
        e.click_target(0, 100);
        e.click_area(400);
        assert_eq!(
            e.results(),
            &[RoundResult {
                round: 1,
                reaction_time_ms: 300,
                hit: false
            }]
        );
    }

    #[test]
    fn one_result_per_round_then_game_over() {
        let mut e = engine(2);
        e.start(0);
        e.click_target(0, 10);
        e.click_target(1, 200);
        e.click_target(0, 300);
        e.click_area(450);

        assert_eq!(e.phase(), Phase::GameOver);
        let rounds: Vec<u32> = e.results().iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2]);

        // clicks after the end are ignored
        e.click_target(0, 900);
        e.click_area(950);
        assert_eq!(e.results().len(), 2);

        let s = e.summary();
        assert_eq!((s.hits, s.misses, s.accuracy), (1, 1, 50));
    }

    #[test]
    fn pairs_stay_inside_padded_bounds() {
        let mut e = engine(1000);
        e.start(0);
        for round in 0..200u64 {
            let pair = *e.targets().unwrap();
            for t in pair {
                assert!((15.0..=85.0).contains(&t.position.x));
                assert!((15.0..=85.0).contains(&t.position.y));
                assert_eq!(t.size, 30);
            }
            assert!(pair[0].is_active && !pair[1].is_active);
            e.click_target(0, round * 10);
            e.click_target(1, round * 10 + 5);
        }
    }

    #[test]
    fn zero_rounds_clamped_to_one() {
        let mut e = engine(5);
        let mut s = e.settings();
        s.rounds = 0;
        assert!(e.set_settings(s));
        assert_eq!(e.settings().rounds, 1);
    }
}
