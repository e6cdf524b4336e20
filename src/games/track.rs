//! Keep the pointer on a drifting target. Accuracy is the share of simulation
//! ticks spent hovering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::engine::{pointer_over, Engine, PlayArea, Point};
use crate::scores::{now_timestamp, TrackScore};
use crate::session::{Phase, Position};
use crate::settings::TrackSettings;
use crate::timer::{Millis, TimerQueue};
use crate::util::percent;

pub const TICK_MS: Millis = 16;
pub const STEER_MS: Millis = 500;
const CLOCK_MS: Millis = 1000;
const WALL_PADDING: f64 = 5.0;
const MIN_SPEED: f64 = 0.3;
const SPEED_SPREAD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTimer {
    Tick,
    Steer,
    Clock,
}

/// Percent of the play area per tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, multiplier: f64) -> Self {
        let angle = rng.gen::<f64>() * std::f64::consts::TAU;
        let speed = (MIN_SPEED + rng.gen::<f64>() * SPEED_SPREAD) * multiplier;
        Self {
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
        }
    }

    fn blend(self, other: Velocity) -> Self {
        Self {
            dx: self.dx * 0.5 + other.dx * 0.5,
            dy: self.dy * 0.5 + other.dy * 0.5,
        }
    }
}

#[derive(Debug)]
pub struct TrackEngine {
    settings: TrackSettings,
    phase: Phase,
    position: Position,
    velocity: Velocity,
    score: u32,
    time_remaining: u32,
    total_ticks: u64,
    hovering_ticks: u64,
    is_hovering: bool,
    pointer: Option<Point>,
    play_area: Option<PlayArea>,
    timers: TimerQueue<TrackTimer>,
    rng: StdRng,
    pending_score: Option<TrackScore>,
}

impl TrackEngine {
    pub fn new(settings: TrackSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: TrackSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: Phase::Settings,
            position: Position::centre(),
            velocity: Velocity::default(),
            score: 0,
            time_remaining: settings.game_time.secs(),
            total_ticks: 0,
            hovering_ticks: 0,
            is_hovering: false,
            pointer: None,
            play_area: None,
            timers: TimerQueue::new(),
            rng,
            pending_score: None,
        }
    }

    pub fn settings(&self) -> TrackSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: TrackSettings) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.settings = settings;
        self.time_remaining = settings.game_time.secs();
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Ticks spent hovering; the HUD shows it as the score
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn hovering_ticks(&self) -> u64 {
        self.hovering_ticks
    }

    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    /// Percent of ticks spent on target, 0 before the first tick
    pub fn accuracy(&self) -> f64 {
        percent(self.hovering_ticks, self.total_ticks)
    }

    /// Latest pointer position in pixels, `None` once it left the window
    pub fn pointer_moved(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    /// Latest measurement of the play area, `None` while it is not laid out
    pub fn set_play_area(&mut self, area: Option<PlayArea>) {
        self.play_area = area;
    }

    pub fn take_score(&mut self) -> Option<TrackScore> {
        self.pending_score.take()
    }

    pub fn start(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.phase = Phase::Playing;
        self.score = 0;
        self.time_remaining = self.settings.game_time.secs();
        self.position = Position::centre();
        self.total_ticks = 0;
        self.hovering_ticks = 0;
        self.is_hovering = false;
        self.pending_score = None;
        self.velocity = Velocity::random(&mut self.rng, self.settings.speed.multiplier());
        debug!(speed = %self.settings.speed, secs = self.time_remaining, "track started");

        self.timers.schedule_in(now, TICK_MS, TrackTimer::Tick);
        self.timers.schedule_in(now, STEER_MS, TrackTimer::Steer);
        self.timers.schedule_in(now, CLOCK_MS, TrackTimer::Clock);
    }

    pub fn quit(&mut self) {
        self.timers.cancel_all();
        self.is_hovering = false;
        self.phase = Phase::Settings;
    }

    fn tick(&mut self) {
        let (x, dx) = bounce(self.position.x + self.velocity.dx, self.velocity.dx);
        let (y, dy) = bounce(self.position.y + self.velocity.dy, self.velocity.dy);
        self.position = Position::new(x, y);
        self.velocity = Velocity { dx, dy };

        self.total_ticks += 1;
        self.is_hovering = pointer_over(
            self.play_area.as_ref(),
            self.pointer,
            self.position,
            self.settings.target_size.px(),
        );
        if self.is_hovering {
            self.hovering_ticks += 1;
            self.score += 1;
        }
    }

    fn steer(&mut self) {
        let nudge = Velocity::random(&mut self.rng, self.settings.speed.multiplier());
        self.velocity = self.velocity.blend(nudge);
    }

    fn clock(&mut self) {
        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            self.game_over();
        } else {
            self.time_remaining -= 1;
        }
    }

    fn game_over(&mut self) {
        self.timers.cancel_all();
        self.phase = Phase::GameOver;
        self.is_hovering = false;
        if self.total_ticks > 0 {
            self.pending_score = Some(TrackScore::new(
                self.accuracy(),
                self.settings.speed,
                now_timestamp(),
            ));
        }
        info!(
            accuracy = self.accuracy(),
            ticks = self.total_ticks,
            speed = %self.settings.speed,
            "track game over"
        );
    }
}

/// Reflects off the padded walls. Returns the clamped coordinate and the
/// possibly reversed velocity component.
fn bounce(coord: f64, velocity: f64) -> (f64, f64) {
    let max = 100.0 - WALL_PADDING;
    if coord <= WALL_PADDING || coord >= max {
        (coord.clamp(WALL_PADDING, max), -velocity)
    } else {
        (coord, velocity)
    }
}

impl Engine for TrackEngine {
    type Timer = TrackTimer;

    fn timers_mut(&mut self) -> &mut TimerQueue<TrackTimer> {
        &mut self.timers
    }

    fn on_timer(&mut self, timer: TrackTimer, at: Millis) {
        if self.phase != Phase::Playing {
            return;
        }
        match timer {
            TrackTimer::Tick => {
                self.tick();
                self.timers.schedule_in(at, TICK_MS, TrackTimer::Tick);
            }
            TrackTimer::Steer => {
                self.steer();
                self.timers.schedule_in(at, STEER_MS, TrackTimer::Steer);
            }
            TrackTimer::Clock => {
                self.clock();
                if self.phase == Phase::Playing {
                    self.timers.schedule_in(at, CLOCK_MS, TrackTimer::Clock);
                }
            }
        }
    }
}
