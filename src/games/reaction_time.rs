//! Classic "wait for green" test. Clicking early forfeits nothing but time;
//! the round is simply replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::scores::{now_timestamp, ReactionTimeScore};
use crate::session::{ResultSummary, RoundResult, SoundCue};
use crate::settings::ReactionTimeSettings;
use crate::timer::{Millis, TimerId, TimerQueue};

pub const MIN_DELAY_MS: Millis = 1500;
pub const MAX_DELAY_MS: Millis = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionPhase {
    #[default]
    Settings,
    /// Red screen, Ready is pending
    Waiting,
    /// Green screen, the clock is running
    Ready,
    TooEarly,
    /// Showing the round's time
    Result,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTimer {
    Ready,
}

#[derive(Debug)]
pub struct ReactionTimeEngine {
    settings: ReactionTimeSettings,
    phase: ReactionPhase,
    current_round: u32,
    ready_at: Option<Millis>,
    pending_ready: Option<TimerId>,
    last_reaction_ms: Option<u64>,
    results: Vec<RoundResult>,
    timers: TimerQueue<ReactionTimer>,
    rng: StdRng,
    cues: Vec<SoundCue>,
    pending_score: Option<ReactionTimeScore>,
}

impl ReactionTimeEngine {
    pub fn new(settings: ReactionTimeSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: ReactionTimeSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: ReactionPhase::Settings,
            current_round: 1,
            ready_at: None,
            pending_ready: None,
            last_reaction_ms: None,
            results: Vec::new(),
            timers: TimerQueue::new(),
            rng,
            cues: Vec::new(),
            pending_score: None,
        }
    }

    pub fn settings(&self) -> ReactionTimeSettings {
        self.settings
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, ReactionPhase::Settings | ReactionPhase::GameOver)
    }

    pub fn set_settings(&mut self, settings: ReactionTimeSettings) -> bool {
        if self.is_running() {
            return false;
        }
        self.settings = settings;
        true
    }

    pub fn phase(&self) -> ReactionPhase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.settings.rounds.count()
    }

    pub fn is_last_round(&self) -> bool {
        self.current_round >= self.total_rounds()
    }

    pub fn last_reaction_ms(&self) -> Option<u64> {
        self.last_reaction_ms
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_results(&self.results)
    }

    pub fn ready_due_at(&self) -> Option<Millis> {
        self.timers.due_of(&ReactionTimer::Ready)
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn take_score(&mut self) -> Option<ReactionTimeScore> {
        self.pending_score.take()
    }

    pub fn start(&mut self, now: Millis) {
        self.timers.cancel_all();
        self.current_round = 1;
        self.results.clear();
        self.last_reaction_ms = None;
        self.cues.clear();
        self.pending_score = None;
        debug!(rounds = self.total_rounds(), "reaction time started");
        self.start_waiting(now);
    }

    pub fn quit(&mut self) {
        self.timers.cancel_all();
        self.pending_ready = None;
        self.ready_at = None;
        self.phase = ReactionPhase::Settings;
    }

    /// Click anywhere on the play area
    pub fn click(&mut self, now: Millis) {
        match self.phase {
            ReactionPhase::Waiting => {
                if let Some(id) = self.pending_ready.take() {
                    self.timers.cancel(id);
                }
                self.cues.push(SoundCue::Miss);
                self.phase = ReactionPhase::TooEarly;
                debug!(round = self.current_round, "clicked too early");
            }
            ReactionPhase::Ready => {
                let reaction = now.saturating_sub(self.ready_at.unwrap_or(now));
                self.ready_at = None;
                self.last_reaction_ms = Some(reaction);
                self.results.push(RoundResult {
                    round: self.current_round,
                    reaction_time_ms: reaction,
                    hit: true,
                });
                self.cues.push(SoundCue::Hit);
                self.phase = ReactionPhase::Result;
            }
            _ => {}
        }
    }

    /// Replays the waiting phase of the same round after a false start
    pub fn retry(&mut self, now: Millis) {
        if self.phase == ReactionPhase::TooEarly {
            self.start_waiting(now);
        }
    }

    /// Leaves the result screen for the next round or the summary
    pub fn continue_round(&mut self, now: Millis) {
        if self.phase != ReactionPhase::Result {
            return;
        }
        if self.is_last_round() {
            self.game_over();
        } else {
            self.current_round += 1;
            self.start_waiting(now);
        }
    }

    fn start_waiting(&mut self, now: Millis) {
        self.phase = ReactionPhase::Waiting;
        self.ready_at = None;
        let delay = self.rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS);
        self.pending_ready = Some(self.timers.schedule_in(now, delay, ReactionTimer::Ready));
    }

    fn game_over(&mut self) {
        self.timers.cancel_all();
        self.phase = ReactionPhase::GameOver;
        let summary = self.summary();
        self.pending_score = Some(ReactionTimeScore {
            average_time: summary.average_ms,
            rounds: self.settings.rounds,
            timestamp: now_timestamp(),
        });
        info!(
            rounds = summary.rounds,
            average_ms = summary.average_ms,
            best_ms = summary.best_ms,
            "reaction time game over"
        );
    }
}

impl Engine for ReactionTimeEngine {
    type Timer = ReactionTimer;

    fn timers_mut(&mut self) -> &mut TimerQueue<ReactionTimer> {
        &mut self.timers
    }

    fn on_timer(&mut self, timer: ReactionTimer, at: Millis) {
        match timer {
            ReactionTimer::Ready if self.phase == ReactionPhase::Waiting => {
                self.pending_ready = None;
                self.ready_at = Some(at);
                self.phase = ReactionPhase::Ready;
            }
            ReactionTimer::Ready => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::advance;
    use crate::settings::RoundsOption;

    fn engine(rounds: RoundsOption) -> ReactionTimeEngine {
        ReactionTimeEngine::with_rng(ReactionTimeSettings { rounds }, StdRng::seed_from_u64(11))
    }

    fn go_green(e: &mut ReactionTimeEngine) -> Millis {
        let at = e.ready_due_at().unwrap();
        advance(e, at);
        assert_eq!(e.phase(), ReactionPhase::Ready);
        at
    }

    #[test]
    fn waiting_delay_in_range() {
        let mut e = engine(RoundsOption::Three);
        e.start(1_000);
        assert_eq!(e.phase(), ReactionPhase::Waiting);
        let delay = e.ready_due_at().unwrap() - 1_000;
        assert!((MIN_DELAY_MS..MAX_DELAY_MS).contains(&delay));
    }

    #[test]
    fn early_click_records_nothing_and_keeps_round() {
        let mut e = engine(RoundsOption::Three);
        e.start(0);
        e.click(500);

        assert_eq!(e.phase(), ReactionPhase::TooEarly);
        assert!(e.results().is_empty());
        assert_eq!(e.current_round(), 1);
        assert!(e.ready_due_at().is_none());

        // the cancelled timer never turns the screen green
        advance(&mut e, 10_000);
        assert_eq!(e.phase(), ReactionPhase::TooEarly);

        e.retry(10_000);
        assert_eq!(e.phase(), ReactionPhase::Waiting);
        assert_eq!(e.current_round(), 1);
    }

    #[test]
    fn ready_click_appends_exactly_one_result() {
        let mut e = engine(RoundsOption::Three);
        e.start(0);
        let green = go_green(&mut e);
        e.click(green + 231);

        assert_eq!(e.phase(), ReactionPhase::Result);
        assert_eq!(e.last_reaction_ms(), Some(231));
        assert_eq!(
            e.results(),
            &[RoundResult {
                round: 1,
                reaction_time_ms: 231,
                hit: true
            }]
        );

        // clicking on the result screen does nothing
        e.click(green + 400);
        assert_eq!(e.results().len(), 1);
    }

    #[test]
    fn full_session_produces_a_score_once() {
        let mut e = engine(RoundsOption::Three);
        e.start(0);
        for (i, reaction) in [200, 250, 330].into_iter().enumerate() {
            assert_eq!(e.current_round(), i as u32 + 1);
            let green = go_green(&mut e);
            e.click(green + reaction);
            e.continue_round(green + 1_000);
        }

        assert_eq!(e.phase(), ReactionPhase::GameOver);
        assert_eq!(e.results().len(), 3);
        let score = e.take_score().unwrap();
        assert_eq!(score.average_time, 260);
        assert_eq!(score.rounds, RoundsOption::Three);
        assert!(e.take_score().is_none());
    }

    #[test]
    fn continue_only_from_result() {
        let mut e = engine(RoundsOption::One);
        e.start(0);
        e.continue_round(10);
        assert_eq!(e.phase(), ReactionPhase::Waiting);
        let green = go_green(&mut e);
        e.click(green + 180);
        assert!(e.is_last_round());
        e.continue_round(green + 500);
        assert_eq!(e.phase(), ReactionPhase::GameOver);
    }

    #[test]
    fn settings_locked_mid_session() {
        let mut e = engine(RoundsOption::One);
        e.start(0);
        assert!(!e.set_settings(ReactionTimeSettings {
            rounds: RoundsOption::Ten
        }));
        e.quit();
        assert!(e.set_settings(ReactionTimeSettings {
            rounds: RoundsOption::Ten
        }));
        assert_eq!(e.total_rounds(), 10);
    }
}
