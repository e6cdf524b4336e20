//! One target at a time after a random pause. A single missed click ends the
//! run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::session::{Phase, Position, ResultSummary, RoundResult, SoundCue, Target, TargetIds};
use crate::settings::ReflexSettings;
use crate::timer::{Millis, TimerQueue};

pub const MIN_SPAWN_DELAY_MS: Millis = 1000;
pub const MAX_SPAWN_DELAY_MS: Millis = 3000;
const EDGE_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflexTimer {
    Spawn,
}

#[derive(Debug)]
pub struct ReflexEngine {
    settings: ReflexSettings,
    phase: Phase,
    completed_rounds: u32,
    target: Option<Target>,
    results: Vec<RoundResult>,
    ids: TargetIds,
    timers: TimerQueue<ReflexTimer>,
    rng: StdRng,
    cues: Vec<SoundCue>,
}

impl ReflexEngine {
    pub fn new(settings: ReflexSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: ReflexSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: Phase::Settings,
            completed_rounds: 0,
            target: None,
            results: Vec::new(),
            ids: TargetIds::default(),
            timers: TimerQueue::new(),
            rng,
            cues: Vec::new(),
        }
    }

    pub fn settings(&self) -> ReflexSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: ReflexSettings) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.settings = settings;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The round currently being played, 1-based
    pub fn round(&self) -> u32 {
        self.completed_rounds + 1
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(&self.results)
    }

    pub fn next_spawn_at(&self) -> Option<Millis> {
        self.timers.due_of(&ReflexTimer::Spawn)
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn start(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.phase = Phase::Playing;
        self.completed_rounds = 0;
        self.target = None;
        self.results.clear();
        self.ids.reset();
        self.cues.clear();
        debug!(size = %self.settings.target_size, "reflex started");
        self.schedule_next_target(now);
    }

    pub fn quit(&mut self) {
        self.timers.cancel_all();
        self.target = None;
        self.phase = Phase::Settings;
    }

    /// Click on the visible target. Returns false when nothing was showing.
    pub fn click_target(&mut self, now: Millis) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(target) = self.target.take() else {
            return false;
        };
        self.completed_rounds += 1;
        self.results.push(RoundResult {
            round: self.completed_rounds,
            reaction_time_ms: now.saturating_sub(target.spawned_at),
            hit: true,
        });
        self.cues.push(SoundCue::Hit);
        self.schedule_next_target(now);
        true
    }

    /// Click that missed. Only ends the run while a target is showing.
    pub fn click_area(&mut self, _now: Millis) {
        if self.phase != Phase::Playing || self.target.is_none() {
            return;
        }
        self.cues.push(SoundCue::Miss);
        self.timers.cancel_all();
        self.target = None;
        self.phase = Phase::GameOver;
        let summary = self.summary();
        info!(
            rounds = summary.rounds,
            average_ms = summary.average_ms,
            "reflex game over"
        );
    }

    fn schedule_next_target(&mut self, now: Millis) {
        let delay = self.rng.gen_range(MIN_SPAWN_DELAY_MS..MAX_SPAWN_DELAY_MS);
        self.timers.schedule_in(now, delay, ReflexTimer::Spawn);
    }
}

impl Engine for ReflexEngine {
    type Timer = ReflexTimer;

    fn timers_mut(&mut self) -> &mut TimerQueue<ReflexTimer> {
        &mut self.timers
    }

    fn on_timer(&mut self, timer: ReflexTimer, at: Millis) {
        if self.phase != Phase::Playing {
            return;
        }
        match timer {
            ReflexTimer::Spawn => {
                self.target = Some(Target {
                    id: self.ids.next_id(),
                    position: Position::random_padded(&mut self.rng, EDGE_PADDING),
                    size: self.settings.target_size.px(),
                    spawned_at: at,
                    expires_at: None,
                });
            }
        }
    }
}
