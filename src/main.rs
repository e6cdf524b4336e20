mod app;
mod ui;

use crate::app::{App, GameSettings};
use aimtrain::{
    app_dirs::AppDirs,
    config::FileConfigStore,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    scores::{FileStore, ScoreBook},
    settings::{
        Difficulty, FlickDistance, FlickSettings, ReactionTimeSettings, ReflexSettings,
        RoundsOption, SurvivalSettings, TargetSize, TrackGameTime, TrackSettings, TrackSpeed,
        FLICK_ROUND_CHOICES,
    },
    timer::{Clock, MonotonicClock},
    GameMode,
};
use anyhow::{anyhow, Context};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::{self, File},
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Redraw and timer resolution. Tracking moves its target every 16ms, so the
/// screen refreshes at roughly the same pace.
const TICK_RATE_MS: u64 = 16;

const LOG_ENV: &str = "AIMTRAIN_LOG";

/// terminal aim trainer with mouse-driven drills and local leaderboards
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal aim trainer. Survive an endless stream of shrinking targets, flick between pairs, react to sudden spawns, time your reflexes or track a moving target, all with the mouse."
)]
pub struct Cli {
    /// open a drill directly instead of the home menu
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// target size for every drill that has targets
    #[clap(short = 't', long, value_enum, default_value_t)]
    target_size: TargetSize,

    /// survival difficulty
    #[clap(short = 'd', long, value_enum, default_value_t)]
    difficulty: Difficulty,

    /// distance between the two flick targets
    #[clap(long, value_enum, default_value_t)]
    distance: FlickDistance,

    /// number of flick rounds (5, 10, 15 or 20)
    #[clap(long, default_value_t = 10, value_parser = parse_flick_rounds)]
    flick_rounds: u32,

    /// number of reaction-time rounds
    #[clap(short = 'r', long, value_enum, default_value_t)]
    rounds: RoundsOption,

    /// tracking target speed
    #[clap(short = 's', long, value_enum, default_value_t)]
    speed: TrackSpeed,

    /// tracking session length in seconds
    #[clap(short = 'g', long, value_enum, default_value_t)]
    game_time: TrackGameTime,

    /// directory holding the leaderboards
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// crosshair and sound settings file
    #[clap(long)]
    config: Option<PathBuf>,

    /// where to write the log (level via AIMTRAIN_LOG, default info)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_flick_rounds(s: &str) -> Result<u32, String> {
    let rounds: u32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if FLICK_ROUND_CHOICES.contains(&rounds) {
        Ok(rounds)
    } else {
        Err(format!("flick rounds must be one of {FLICK_ROUND_CHOICES:?}"))
    }
}

impl Cli {
    /// Seed every drill's settings form from the command line
    fn game_settings(&self) -> GameSettings {
        GameSettings {
            survival: SurvivalSettings {
                difficulty: self.difficulty,
                target_size: self.target_size,
            },
            flick: FlickSettings {
                target_size: self.target_size,
                distance: self.distance,
                rounds: self.flick_rounds,
            },
            reflex: ReflexSettings {
                target_size: self.target_size,
            },
            reaction_time: ReactionTimeSettings {
                rounds: self.rounds,
            },
            track: TrackSettings {
                target_size: self.target_size,
                speed: self.speed,
                game_time: self.game_time,
            },
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(AppDirs::data_dir)
    }

    fn log_path(&self) -> PathBuf {
        match (&self.log_file, &self.data_dir) {
            (Some(file), _) => file.clone(),
            (None, Some(dir)) => dir.join("aimtrain.log"),
            (None, None) => AppDirs::log_path(),
        }
    }

    fn build_app(&self) -> App {
        let mut app = App::new(
            self.game_settings(),
            ScoreBook::new(FileStore::new(self.data_dir())),
            self.config
                .as_ref()
                .map_or_else(FileConfigStore::new, FileConfigStore::with_path),
        );
        if let Some(mode) = self.mode {
            app.navigate(mode.route());
        }
        app
    }
}

/// Logs go to a file: the terminal belongs to the TUI
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli.log_path())?;
    info!(version = env!("CARGO_PKG_VERSION"), mode = ?cli.mode, "starting");

    let mut app = cli.build_app();

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering the alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = run_app(
        &mut terminal,
        &mut app,
        &runner,
        &MonotonicClock::new(),
        &mut io::stdout(),
    );

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("bye");
    result
}

/// Draw, wait for one event or tick, hand it to the app; until it asks to quit
fn run_app<B: Backend, E: EventSource, T: Ticker, C: Clock, W: Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    clock: &C,
    bell: &mut W,
) -> anyhow::Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    while !app.should_quit {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Key(key) => app.on_key(key, clock.now()),
            AppEvent::Mouse(mouse) => app.on_mouse(mouse, clock.now()),
            AppEvent::Resize(w, h) => {
                debug!(w, h, "resize");
                app.resize(w, h);
            }
            AppEvent::Tick => app.on_tick(clock.now()),
        }

        if app.take_bells() > 0 {
            bell.write_all(b"\x07")?;
            bell.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimtrain::{
        route::Route,
        runtime::TestEventSource,
        session::Phase,
        timer::ManualClock,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use tempfile::{tempdir, TempDir};

    fn cli_in(dir: &TempDir, args: &[&str]) -> Cli {
        let data = dir.path().join("data");
        let config = dir.path().join("config.json");
        let mut argv = vec![
            "aimtrain",
            "--data-dir",
            data.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui::draw(app, f)).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["aimtrain"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.target_size, TargetSize::Medium);
        assert_eq!(cli.difficulty, Difficulty::Medium);
        assert_eq!(cli.distance, FlickDistance::Medium);
        assert_eq!(cli.flick_rounds, 10);
        assert_eq!(cli.rounds, RoundsOption::Five);
        assert_eq!(cli.speed, TrackSpeed::Medium);
        assert_eq!(cli.game_time, TrackGameTime::Secs30);
        assert_eq!(cli.game_settings(), GameSettings::default());
    }

    #[test]
    fn test_cli_mode() {
        let cli = Cli::parse_from(["aimtrain", "--mode", "reaction-time"]);
        assert_eq!(cli.mode, Some(GameMode::ReactionTime));

        let cli = Cli::parse_from(["aimtrain", "-m", "track"]);
        assert_eq!(cli.mode, Some(GameMode::Track));

        assert!(Cli::try_parse_from(["aimtrain", "--mode", "aimbot"]).is_err());
    }

    #[test]
    fn test_cli_settings_flow_into_every_drill() {
        let cli = Cli::parse_from([
            "aimtrain",
            "-t",
            "small",
            "-d",
            "hard",
            "--distance",
            "far",
            "--flick-rounds",
            "20",
            "-r",
            "10",
            "-s",
            "fast",
            "-g",
            "45",
        ]);
        let settings = cli.game_settings();

        assert_eq!(settings.survival.difficulty, Difficulty::Hard);
        assert_eq!(settings.survival.target_size, TargetSize::Small);
        assert_eq!(settings.flick.distance, FlickDistance::Far);
        assert_eq!(settings.flick.rounds, 20);
        assert_eq!(settings.reflex.target_size, TargetSize::Small);
        assert_eq!(settings.reaction_time.rounds, RoundsOption::Ten);
        assert_eq!(settings.track.speed, TrackSpeed::Fast);
        assert_eq!(settings.track.game_time, TrackGameTime::Secs45);
    }

    #[test]
    fn test_cli_rejects_unoffered_choices() {
        assert!(Cli::try_parse_from(["aimtrain", "--flick-rounds", "7"]).is_err());
        assert!(Cli::try_parse_from(["aimtrain", "--flick-rounds", "ten"]).is_err());
        assert!(Cli::try_parse_from(["aimtrain", "--rounds", "4"]).is_err());
        assert!(Cli::try_parse_from(["aimtrain", "--game-time", "20"]).is_err());
    }

    #[test]
    fn test_parse_flick_rounds() {
        assert_eq!(parse_flick_rounds("15"), Ok(15));
        assert!(parse_flick_rounds("0").is_err());
    }

    #[test]
    fn test_log_path_defaults_into_data_dir() {
        let cli = Cli::parse_from(["aimtrain", "--data-dir", "/tmp/aim"]);
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/aim/aimtrain.log"));

        let cli = Cli::parse_from(["aimtrain", "--log-file", "/tmp/x.log"]);
        assert_eq!(cli.log_path(), PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_build_app_opens_the_requested_drill() {
        let dir = tempdir().unwrap();
        let app = cli_in(&dir, &["--mode", "flick"]).build_app();
        assert_eq!(app.route, Route::Flick);
        assert_eq!(app.game.as_ref().map(|g| g.mode()), Some(GameMode::Flick));

        let app = cli_in(&dir, &[]).build_app();
        assert_eq!(app.route, Route::Home);
        assert!(app.game.is_none());
    }

    #[test]
    fn test_ui_renders_each_menu() {
        let dir = tempdir().unwrap();
        let mut app = cli_in(&dir, &[]).build_app();
        app.resize(100, 30);
        assert!(draw(&app).contains("aimtrain"));

        app.navigate(Route::GameModes);
        let text = draw(&app);
        assert!(text.contains("Reaction Time"));
        assert!(text.contains("Survival"));

        app.navigate(Route::Settings);
        assert!(draw(&app).contains("Preview"));

        app.navigate(Route::Survival);
        assert!(draw(&app).contains("Difficulty"));
    }

    #[test]
    fn test_ui_shows_the_leaderboard_before_playing() {
        let dir = tempdir().unwrap();
        let mut app = cli_in(&dir, &["--mode", "track"]).build_app();
        app.resize(100, 30);
        let text = draw(&app);
        assert!(text.contains("Best tracking (medium)"));
        assert!(text.contains("No scores yet"));

        app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), 0);
        let text = draw(&app);
        assert!(text.contains("Best tracking (fast)"));
        assert!(text.contains("Speed"));

        app.navigate(Route::Flick);
        assert!(!draw(&app).contains("Best"));
    }

    #[test]
    fn test_ui_renders_a_running_drill() {
        let dir = tempdir().unwrap();
        let mut app = cli_in(&dir, &["--mode", "survival"]).build_app();
        app.resize(100, 30);
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), 0);
        assert_eq!(app.game.as_ref().map(|g| g.phase()), Some(Phase::Playing));

        let text = draw(&app);
        assert!(text.contains("Lives"));
        assert!(text.contains("♥♥♥"));
    }

    #[test]
    fn test_ui_renders_game_over_with_the_leaderboard() {
        let dir = tempdir().unwrap();
        let mut app = cli_in(&dir, &["--mode", "track", "--game-time", "15"]).build_app();
        app.resize(100, 30);
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), 0);
        app.on_tick(16_000);
        assert_eq!(app.game.as_ref().map(|g| g.phase()), Some(Phase::GameOver));

        let text = draw(&app);
        assert!(text.contains("Tracking: game over"));
        assert!(text.contains("Best tracking (medium)"));
        assert!(!text.contains("No scores yet"));
    }

    #[test]
    fn test_run_app_quits_from_the_home_menu() {
        let dir = tempdir().unwrap();
        let mut app = cli_in(&dir, &[]).build_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize(90, 30)).unwrap();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)))
            .unwrap();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        let clock = ManualClock::new(0);
        let mut bell = Vec::new();

        run_app(&mut terminal, &mut app, &runner, &clock, &mut bell).unwrap();

        assert!(app.should_quit);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.screen.width, 90);
        assert!(bell.is_empty());
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_MS, 16);
    }
}
