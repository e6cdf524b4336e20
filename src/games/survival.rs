//! Click targets before they expire. Three lives, no win condition; the spawn
//! interval shrinks the longer the player survives.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::engine::Engine;
use crate::scores::{now_timestamp, SurvivalScore};
use crate::session::{Phase, Position, SoundCue, Target, TargetIds};
use crate::settings::SurvivalSettings;
use crate::timer::{Millis, TimerId, TimerQueue};

pub const MAX_LIVES: u32 = 3;
const EDGE_PADDING: f64 = 10.0;
const CLOCK_MS: Millis = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivalTimer {
    Spawn,
    Clock,
    Expire(u32),
}

#[derive(Debug)]
pub struct SurvivalEngine {
    settings: SurvivalSettings,
    phase: Phase,
    score: u32,
    lives: u32,
    time_elapsed: u32,
    targets: Vec<Target>,
    expiry: HashMap<u32, TimerId>,
    ids: TargetIds,
    timers: TimerQueue<SurvivalTimer>,
    rng: StdRng,
    cues: Vec<SoundCue>,
    pending_score: Option<SurvivalScore>,
}

impl SurvivalEngine {
    pub fn new(settings: SurvivalSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: SurvivalSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: Phase::Settings,
            score: 0,
            lives: MAX_LIVES,
            time_elapsed: 0,
            targets: Vec::new(),
            expiry: HashMap::new(),
            ids: TargetIds::default(),
            timers: TimerQueue::new(),
            rng,
            cues: Vec::new(),
            pending_score: None,
        }
    }

    pub fn settings(&self) -> SurvivalSettings {
        self.settings
    }

    /// Rejected while a session is running
    pub fn set_settings(&mut self, settings: SurvivalSettings) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.settings = settings;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Whole seconds survived
    pub fn time_elapsed(&self) -> u32 {
        self.time_elapsed
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Delay before the next spawn at the current survival time
    pub fn spawn_interval_ms(&self) -> Millis {
        self.settings
            .difficulty
            .config()
            .spawn_interval_ms(self.time_elapsed as f64)
    }

    pub fn next_spawn_at(&self) -> Option<Millis> {
        self.timers.due_of(&SurvivalTimer::Spawn)
    }

    pub fn start(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.phase = Phase::Playing;
        self.score = 0;
        self.lives = MAX_LIVES;
        self.time_elapsed = 0;
        self.targets.clear();
        self.expiry.clear();
        self.ids.reset();
        self.cues.clear();
        self.pending_score = None;
        debug!(difficulty = %self.settings.difficulty, "survival started");

        self.spawn_target(now);
        self.schedule_next_spawn(now);
        self.timers.schedule_in(now, CLOCK_MS, SurvivalTimer::Clock);
    }

    /// Tears the session down without recording anything
    pub fn quit(&mut self) {
        self.timers.cancel_all();
        self.targets.clear();
        self.expiry.clear();
        self.phase = Phase::Settings;
    }

    /// Returns true when `id` was a live target
    pub fn click_target(&mut self, id: u32, _now: Millis) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(idx) = self.targets.iter().position(|t| t.id == id) else {
            return false;
        };
        self.targets.remove(idx);
        if let Some(timer) = self.expiry.remove(&id) {
            self.timers.cancel(timer);
        }
        self.score += 1;
        self.cues.push(SoundCue::Hit);
        true
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// The finished session's leaderboard record, handed out once
    pub fn take_score(&mut self) -> Option<SurvivalScore> {
        self.pending_score.take()
    }

    fn spawn_target(&mut self, now: Millis) {
        let lifetime = self.settings.difficulty.config().target_lifetime_ms();
        let id = self.ids.next_id();
        let target = Target {
            id,
            position: Position::random_padded(&mut self.rng, EDGE_PADDING),
            size: self.settings.target_size.px(),
            spawned_at: now,
            expires_at: Some(now + lifetime),
        };
        let timer = self
            .timers
            .schedule_in(now, lifetime, SurvivalTimer::Expire(id));
        self.expiry.insert(id, timer);
        self.targets.push(target);
    }

    fn schedule_next_spawn(&mut self, now: Millis) {
        let interval = self.spawn_interval_ms();
        self.timers.schedule_in(now, interval, SurvivalTimer::Spawn);
    }

    fn expire(&mut self, id: u32, at: Millis) {
        self.expiry.remove(&id);
        let Some(idx) = self.targets.iter().position(|t| t.id == id) else {
            return;
        };
        self.targets.remove(idx);
        self.lives = self.lives.saturating_sub(1);
        self.cues.push(SoundCue::LifeLost);
        if self.lives == 0 {
            self.game_over(at);
        }
    }

    fn game_over(&mut self, at: Millis) {
        self.timers.cancel_all();
        self.targets.clear();
        self.expiry.clear();
        self.phase = Phase::GameOver;
        self.pending_score = Some(SurvivalScore {
            hits: self.score,
            time: self.time_elapsed,
            timestamp: now_timestamp(),
            difficulty: self.settings.difficulty,
        });
        info!(
            hits = self.score,
            secs = self.time_elapsed,
            at,
            "survival game over"
        );
    }
}

impl Engine for SurvivalEngine {
    type Timer = SurvivalTimer;

    fn timers_mut(&mut self) -> &mut TimerQueue<SurvivalTimer> {
        &mut self.timers
    }

    fn on_timer(&mut self, timer: SurvivalTimer, at: Millis) {
        if self.phase != Phase::Playing {
            return;
        }
        match timer {
            SurvivalTimer::Spawn => {
                self.spawn_target(at);
                self.schedule_next_spawn(at);
            }
            SurvivalTimer::Clock => {
                self.time_elapsed += 1;
                self.timers.schedule_in(at, CLOCK_MS, SurvivalTimer::Clock);
            }
            SurvivalTimer::Expire(id) => self.expire(id, at),
        }
    }
}
