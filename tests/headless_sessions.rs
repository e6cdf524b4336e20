use std::sync::mpsc;
use std::time::Duration;

use aimtrain::{
    advance,
    games::{FlickEngine, ReactionPhase, ReactionTimeEngine, SurvivalEngine, TrackEngine},
    runtime::{AppEvent, FixedTicker, Runner, TestEventSource},
    scores::{MemoryStore, ReactionTimeScore, ScoreBook, SurvivalScore, TrackScore},
    settings::{
        Difficulty, FlickSettings, ReactionTimeSettings, RoundsOption, SurvivalSettings,
        TargetSize, TrackGameTime, TrackSettings, TrackSpeed,
    },
    timer::{Clock, ManualClock},
    Phase, PlayArea, Point, SoundCue,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Headless sessions driven through Runner/TestEventSource with a hand-driven
// clock: every Tick moves the clock forward and fires whatever timers are due.

fn runner() -> (mpsc::Sender<AppEvent>, Runner<TestEventSource, FixedTicker>) {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    (tx, runner)
}

#[test]
fn survival_ignored_targets_end_the_run_and_file_a_score() {
    let mut engine = SurvivalEngine::with_rng(
        SurvivalSettings {
            difficulty: Difficulty::Hard,
            target_size: TargetSize::Medium,
        },
        StdRng::seed_from_u64(1),
    );
    let mut book = ScoreBook::new(MemoryStore::new());
    let clock = ManualClock::new(0);
    let (_tx, runner) = runner();

    engine.start(clock.now());
    let mut lives_lost = 0;
    for _ in 0..1_000u32 {
        if let AppEvent::Tick = runner.step() {
            advance(&mut engine, clock.advance(100));
        }
        lives_lost += engine
            .drain_cues()
            .iter()
            .filter(|c| **c == SoundCue::LifeLost)
            .count();
        if engine.phase() == Phase::GameOver {
            break;
        }
    }

    assert_eq!(engine.phase(), Phase::GameOver);
    assert_eq!(lives_lost, 3);
    assert!(engine.targets().is_empty());

    let score = engine.take_score().expect("game over files a score");
    assert_eq!(score.hits, 0);
    assert_eq!(score.difficulty, Difficulty::Hard);
    assert!(engine.take_score().is_none());

    book.save(score).unwrap();
    assert_eq!(book.best::<SurvivalScore>(Difficulty::Hard), Some(score));
    assert!(book.scores::<SurvivalScore>(Some(Difficulty::Easy)).is_empty());
}

#[test]
fn survival_clicking_everything_keeps_every_life() {
    let mut engine = SurvivalEngine::with_rng(SurvivalSettings::default(), StdRng::seed_from_u64(2));
    let clock = ManualClock::new(0);
    let (_tx, runner) = runner();

    engine.start(clock.now());
    for _ in 0..100u32 {
        if let AppEvent::Tick = runner.step() {
            let now = clock.advance(100);
            advance(&mut engine, now);
            let ids: Vec<u32> = engine.targets().iter().map(|t| t.id).collect();
            for id in ids {
                assert!(engine.click_target(id, now));
            }
        }
    }

    assert_eq!(engine.phase(), Phase::Playing);
    assert_eq!(engine.lives(), 3);
    assert!(engine.score() > 0);
    assert!(engine.time_elapsed() >= 9);

    engine.quit();
    assert_eq!(engine.phase(), Phase::Settings);
    assert!(engine.take_score().is_none());
}

#[test]
fn reaction_time_full_run_with_space_bar() {
    let mut engine = ReactionTimeEngine::with_rng(
        ReactionTimeSettings {
            rounds: RoundsOption::Three,
        },
        StdRng::seed_from_u64(3),
    );
    let clock = ManualClock::new(0);
    let (tx, runner) = runner();

    engine.start(clock.now());
    for _ in 0..10_000u32 {
        match runner.step() {
            AppEvent::Tick => {
                advance(&mut engine, clock.advance(10));
                match engine.phase() {
                    ReactionPhase::Ready | ReactionPhase::Result => tx
                        .send(AppEvent::Key(KeyEvent::new(
                            KeyCode::Char(' '),
                            KeyModifiers::NONE,
                        )))
                        .unwrap(),
                    _ => {}
                }
            }
            AppEvent::Key(_) => match engine.phase() {
                ReactionPhase::Ready => engine.click(clock.now()),
                ReactionPhase::Result => engine.continue_round(clock.now()),
                _ => {}
            },
            _ => {}
        }
        if engine.phase() == ReactionPhase::GameOver {
            break;
        }
    }

    assert_eq!(engine.phase(), ReactionPhase::GameOver);
    assert_eq!(engine.results().len(), 3);
    assert!(engine.results().iter().all(|r| r.hit && r.reaction_time_ms < 10));

    let score = engine.take_score().unwrap();
    assert_eq!(score.rounds, RoundsOption::Three);
    let mut book = ScoreBook::new(MemoryStore::new());
    book.save(score).unwrap();
    assert_eq!(
        book.scores::<ReactionTimeScore>(Some(RoundsOption::Three)),
        vec![score]
    );
}

#[test]
fn reaction_time_false_start_repeats_the_round() {
    let mut engine = ReactionTimeEngine::with_rng(
        ReactionTimeSettings {
            rounds: RoundsOption::One,
        },
        StdRng::seed_from_u64(4),
    );
    engine.start(0);
    engine.click(100);
    assert_eq!(engine.phase(), ReactionPhase::TooEarly);
    assert_eq!(engine.drain_cues(), vec![SoundCue::Miss]);

    // the cancelled timer must not fire into the next attempt
    assert_eq!(advance(&mut engine, 10_000), 0);
    assert_eq!(engine.phase(), ReactionPhase::TooEarly);

    engine.retry(10_000);
    assert_eq!(engine.phase(), ReactionPhase::Waiting);
    assert_eq!(engine.current_round(), 1);
    assert!(engine.results().is_empty());
}

#[test]
fn flick_perfect_run_reports_full_accuracy() {
    let mut engine = FlickEngine::with_rng(
        FlickSettings {
            rounds: 5,
            ..FlickSettings::default()
        },
        StdRng::seed_from_u64(5),
    );
    let clock = ManualClock::new(0);
    engine.start(clock.now());

    while engine.phase() == Phase::Playing {
        engine.click_target(0, clock.advance(400));
        engine.click_target(1, clock.advance(250));
    }

    let summary = engine.summary();
    assert_eq!(summary.rounds, 5);
    assert_eq!(summary.hits, 5);
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.average_ms, 250);
    assert!(engine.targets().is_none());
}

#[test]
fn track_pointer_following_the_target_scores_high() {
    let area = PlayArea::new(0.0, 0.0, 800.0, 600.0);
    let mut engine = TrackEngine::with_rng(
        TrackSettings {
            target_size: TargetSize::Medium,
            speed: TrackSpeed::Medium,
            game_time: TrackGameTime::Secs15,
        },
        StdRng::seed_from_u64(6),
    );
    engine.set_play_area(Some(area));
    let clock = ManualClock::new(0);
    let (_tx, runner) = runner();

    engine.start(clock.now());
    for _ in 0..10_000u32 {
        if let AppEvent::Tick = runner.step() {
            let pos = engine.position();
            engine.pointer_moved(Some(Point::new(
                pos.x / 100.0 * area.width,
                pos.y / 100.0 * area.height,
            )));
            advance(&mut engine, clock.advance(16));
        }
        if engine.phase() == Phase::GameOver {
            break;
        }
    }

    assert_eq!(engine.phase(), Phase::GameOver);
    assert_eq!(engine.time_remaining(), 0);
    let score = engine.take_score().unwrap();
    assert!(score.accuracy > 90.0, "accuracy was {}", score.accuracy);
    assert_eq!(score.speed, TrackSpeed::Medium);

    let mut book = ScoreBook::new(MemoryStore::new());
    book.save(score).unwrap();
    assert_eq!(book.best::<TrackScore>(TrackSpeed::Medium), Some(score));
}
