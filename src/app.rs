use aimtrain::{
    advance,
    config::{Config, ConfigStore, FileConfigStore},
    crosshair::{preset_name, presets},
    games::{
        FlickEngine, GameMode, ReactionPhase, ReactionTimeEngine, ReflexEngine, SurvivalEngine,
        TrackEngine,
    },
    route::Route,
    scores::{FileStore, ScoreBook, ScoreRecord},
    session::{Phase, SoundCue},
    settings::{
        Choice, Difficulty, FlickSettings, ReactionTimeSettings, ReflexSettings, RoundsOption,
        SurvivalSettings, TrackSettings, TrackSpeed,
    },
    sound::{dispatch, SoundSink},
    Millis, PlayArea, Point,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info, trace, warn};

use crate::ui;

pub const HOME_ITEMS: [&str; 3] = ["Play", "Settings", "Quit"];

/// Pre-game choices for every drill, seeded from the command line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameSettings {
    pub survival: SurvivalSettings,
    pub flick: FlickSettings,
    pub reflex: ReflexSettings,
    pub reaction_time: ReactionTimeSettings,
    pub track: TrackSettings,
}

impl GameSettings {
    /// Label and current value of every option the settings form shows
    pub fn rows(&self, mode: GameMode) -> Vec<(&'static str, String)> {
        match mode {
            GameMode::Survival => vec![
                ("Difficulty", self.survival.difficulty.to_string()),
                ("Target size", self.survival.target_size.to_string()),
            ],
            GameMode::Flick => vec![
                ("Target size", self.flick.target_size.to_string()),
                ("Distance", self.flick.distance.to_string()),
                ("Rounds", self.flick.rounds.to_string()),
            ],
            GameMode::Reflex => vec![("Target size", self.reflex.target_size.to_string())],
            GameMode::ReactionTime => {
                vec![("Rounds", self.reaction_time.rounds.count().to_string())]
            }
            GameMode::Track => vec![
                ("Target size", self.track.target_size.to_string()),
                ("Speed", self.track.speed.to_string()),
                ("Game time", self.track.game_time.to_string()),
            ],
        }
    }

    pub fn adjust(&mut self, mode: GameMode, row: usize, forward: bool) {
        fn step<C: Choice>(c: C, forward: bool) -> C {
            if forward {
                c.next()
            } else {
                c.prev()
            }
        }

        match (mode, row) {
            (GameMode::Survival, 0) => {
                self.survival.difficulty = step(self.survival.difficulty, forward)
            }
            (GameMode::Survival, 1) => {
                self.survival.target_size = step(self.survival.target_size, forward)
            }
            (GameMode::Flick, 0) => self.flick.target_size = step(self.flick.target_size, forward),
            (GameMode::Flick, 1) => self.flick.distance = step(self.flick.distance, forward),
            (GameMode::Flick, 2) => {
                self.flick.rounds = if forward {
                    self.flick.next_rounds()
                } else {
                    self.flick.prev_rounds()
                }
            }
            (GameMode::Reflex, 0) => {
                self.reflex.target_size = step(self.reflex.target_size, forward)
            }
            (GameMode::ReactionTime, 0) => {
                self.reaction_time.rounds = step(self.reaction_time.rounds, forward)
            }
            (GameMode::Track, 0) => self.track.target_size = step(self.track.target_size, forward),
            (GameMode::Track, 1) => self.track.speed = step(self.track.speed, forward),
            (GameMode::Track, 2) => self.track.game_time = step(self.track.game_time, forward),
            _ => {}
        }
    }
}

/// Facet each leaderboard is showing. Starts on the one the settings select.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardTabs {
    pub survival: Difficulty,
    pub track: TrackSpeed,
    pub reaction_time: RoundsOption,
}

impl BoardTabs {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            survival: settings.survival.difficulty,
            track: settings.track.speed,
            reaction_time: settings.reaction_time.rounds,
        }
    }

    /// Jump to the facet `mode` is about to be played at
    pub fn follow(&mut self, mode: GameMode, settings: &GameSettings) {
        let current = Self::from_settings(settings);
        match mode {
            GameMode::Survival => self.survival = current.survival,
            GameMode::Track => self.track = current.track,
            GameMode::ReactionTime => self.reaction_time = current.reaction_time,
            GameMode::Flick | GameMode::Reflex => {}
        }
    }

    pub fn cycle(&mut self, mode: GameMode) {
        match mode {
            GameMode::Survival => self.survival = self.survival.next(),
            GameMode::Track => self.track = self.track.next(),
            GameMode::ReactionTime => self.reaction_time = self.reaction_time.next(),
            GameMode::Flick | GameMode::Reflex => {}
        }
    }
}

/// The engine behind the current game route
#[derive(Debug)]
pub enum ActiveGame {
    Survival(SurvivalEngine),
    Flick(FlickEngine),
    Track(TrackEngine),
    Reflex(ReflexEngine),
    ReactionTime(ReactionTimeEngine),
}

impl ActiveGame {
    pub fn new(mode: GameMode, settings: &GameSettings) -> Self {
        match mode {
            GameMode::Survival => ActiveGame::Survival(SurvivalEngine::new(settings.survival)),
            GameMode::Flick => ActiveGame::Flick(FlickEngine::new(settings.flick)),
            GameMode::Track => ActiveGame::Track(TrackEngine::new(settings.track)),
            GameMode::Reflex => ActiveGame::Reflex(ReflexEngine::new(settings.reflex)),
            GameMode::ReactionTime => {
                ActiveGame::ReactionTime(ReactionTimeEngine::new(settings.reaction_time))
            }
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            ActiveGame::Survival(_) => GameMode::Survival,
            ActiveGame::Flick(_) => GameMode::Flick,
            ActiveGame::Track(_) => GameMode::Track,
            ActiveGame::Reflex(_) => GameMode::Reflex,
            ActiveGame::ReactionTime(_) => GameMode::ReactionTime,
        }
    }

    /// Coarse phase; the reaction-time sub-states all count as playing
    pub fn phase(&self) -> Phase {
        match self {
            ActiveGame::Survival(e) => e.phase(),
            ActiveGame::Flick(e) => e.phase(),
            ActiveGame::Track(e) => e.phase(),
            ActiveGame::Reflex(e) => e.phase(),
            ActiveGame::ReactionTime(e) => match e.phase() {
                ReactionPhase::Settings => Phase::Settings,
                ReactionPhase::GameOver => Phase::GameOver,
                _ => Phase::Playing,
            },
        }
    }

    pub fn apply_settings(&mut self, settings: &GameSettings) -> bool {
        match self {
            ActiveGame::Survival(e) => e.set_settings(settings.survival),
            ActiveGame::Flick(e) => e.set_settings(settings.flick),
            ActiveGame::Track(e) => e.set_settings(settings.track),
            ActiveGame::Reflex(e) => e.set_settings(settings.reflex),
            ActiveGame::ReactionTime(e) => e.set_settings(settings.reaction_time),
        }
    }

    pub fn start(&mut self, now: Millis) {
        match self {
            ActiveGame::Survival(e) => e.start(now),
            ActiveGame::Flick(e) => e.start(now),
            ActiveGame::Track(e) => e.start(now),
            ActiveGame::Reflex(e) => e.start(now),
            ActiveGame::ReactionTime(e) => e.start(now),
        }
    }

    pub fn quit(&mut self) {
        match self {
            ActiveGame::Survival(e) => e.quit(),
            ActiveGame::Flick(e) => e.quit(),
            ActiveGame::Track(e) => e.quit(),
            ActiveGame::Reflex(e) => e.quit(),
            ActiveGame::ReactionTime(e) => e.quit(),
        }
    }

    /// Fires every timer due by `now`
    pub fn advance(&mut self, now: Millis) -> usize {
        match self {
            ActiveGame::Survival(e) => advance(e, now),
            ActiveGame::Flick(e) => advance(e, now),
            ActiveGame::Track(e) => advance(e, now),
            ActiveGame::Reflex(e) => advance(e, now),
            ActiveGame::ReactionTime(e) => advance(e, now),
        }
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        match self {
            ActiveGame::Survival(e) => e.drain_cues(),
            ActiveGame::Flick(e) => e.drain_cues(),
            ActiveGame::Reflex(e) => e.drain_cues(),
            ActiveGame::ReactionTime(e) => e.drain_cues(),
            ActiveGame::Track(_) => Vec::new(),
        }
    }

    /// Resolves a click in the play area against whatever is on screen
    pub fn click(&mut self, area: &PlayArea, point: Point, now: Millis) {
        match self {
            ActiveGame::Survival(e) => {
                // topmost (newest) target wins when they overlap
                let hit = e
                    .targets()
                    .iter()
                    .rev()
                    .find(|t| area.hits(point, t.position, t.size))
                    .map(|t| t.id);
                if let Some(id) = hit {
                    e.click_target(id, now);
                }
            }
            ActiveGame::Flick(e) => {
                let active = e.active_index();
                let hit = e.targets().and_then(|pair| {
                    [active, 1 - active]
                        .into_iter()
                        .find(|&i| area.hits(point, pair[i].position, pair[i].size))
                });
                match hit {
                    Some(index) => e.click_target(index, now),
                    None => e.click_area(now),
                }
            }
            ActiveGame::Reflex(e) => {
                let on_target = e
                    .target()
                    .is_some_and(|t| area.hits(point, t.position, t.size));
                if on_target {
                    e.click_target(now);
                } else {
                    e.click_area(now);
                }
            }
            ActiveGame::ReactionTime(e) => reaction_click(e, now),
            ActiveGame::Track(_) => {}
        }
    }
}

/// A click anywhere does whatever the current screen asks for
fn reaction_click(e: &mut ReactionTimeEngine, now: Millis) {
    match e.phase() {
        ReactionPhase::Waiting | ReactionPhase::Ready => e.click(now),
        ReactionPhase::TooEarly => e.retry(now),
        ReactionPhase::Result => e.continue_round(now),
        ReactionPhase::Settings | ReactionPhase::GameOver => {}
    }
}

/// Rows of the crosshair and sound settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Preset,
    Opacity,
    Color,
    ShowLines,
    LineGap,
    LineLength,
    LineThickness,
    TStyle,
    ShowDot,
    DotRadius,
    SoundEnabled,
    Volume,
    HitSound,
    MissSound,
    LifeLostSound,
}

impl ConfigField {
    pub const ALL: [ConfigField; 15] = [
        ConfigField::Preset,
        ConfigField::Opacity,
        ConfigField::Color,
        ConfigField::ShowLines,
        ConfigField::LineGap,
        ConfigField::LineLength,
        ConfigField::LineThickness,
        ConfigField::TStyle,
        ConfigField::ShowDot,
        ConfigField::DotRadius,
        ConfigField::SoundEnabled,
        ConfigField::Volume,
        ConfigField::HitSound,
        ConfigField::MissSound,
        ConfigField::LifeLostSound,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Preset => "Preset",
            ConfigField::Opacity => "Opacity",
            ConfigField::Color => "Colour",
            ConfigField::ShowLines => "Show lines",
            ConfigField::LineGap => "Line gap",
            ConfigField::LineLength => "Line length",
            ConfigField::LineThickness => "Line thickness",
            ConfigField::TStyle => "T-style",
            ConfigField::ShowDot => "Centre dot",
            ConfigField::DotRadius => "Dot radius",
            ConfigField::SoundEnabled => "Sound",
            ConfigField::Volume => "Volume",
            ConfigField::HitSound => "Hit sound",
            ConfigField::MissSound => "Miss sound",
            ConfigField::LifeLostSound => "Life lost sound",
        }
    }

    pub fn value(self, cfg: &Config) -> String {
        let c = &cfg.crosshair;
        let s = &cfg.sound;
        let on_off = |b: bool| String::from(if b { "on" } else { "off" });
        match self {
            ConfigField::Preset => preset_name(c).unwrap_or("Custom").to_string(),
            ConfigField::Opacity => format!("{}%", c.opacity),
            ConfigField::Color => c.color.to_string(),
            ConfigField::ShowLines => on_off(c.show_lines),
            ConfigField::LineGap => format!("{}px", c.line_gap),
            ConfigField::LineLength => format!("{}px", c.line_length),
            ConfigField::LineThickness => format!("{}px", c.line_thickness),
            ConfigField::TStyle => on_off(c.t_style),
            ConfigField::ShowDot => on_off(c.show_dot),
            ConfigField::DotRadius => format!("{}px", c.dot_radius),
            ConfigField::SoundEnabled => on_off(s.enabled),
            ConfigField::Volume => format!("{}%", s.volume),
            ConfigField::HitSound => on_off(s.hit_sound),
            ConfigField::MissSound => on_off(s.miss_sound),
            ConfigField::LifeLostSound => on_off(s.life_lost_sound),
        }
    }

    /// Steps the value one notch; the caller clamps afterwards
    pub fn adjust(self, cfg: &mut Config, forward: bool) {
        let delta: i16 = if forward { 1 } else { -1 };
        let nudge = |v: u8, by: i16| (i16::from(v) + by).clamp(0, i16::from(u8::MAX)) as u8;
        let c = &mut cfg.crosshair;
        let s = &mut cfg.sound;
        match self {
            ConfigField::Preset => {
                let all = presets();
                let current = all.iter().position(|p| p.config == *c);
                let next = match (current, forward) {
                    (Some(i), true) => (i + 1) % all.len(),
                    (Some(i), false) => (i + all.len() - 1) % all.len(),
                    (None, _) => 0,
                };
                *c = all[next].config;
            }
            ConfigField::Opacity => c.opacity = nudge(c.opacity, delta * 10).min(100),
            ConfigField::Color => {
                c.color = if forward {
                    c.color.next()
                } else {
                    c.color.prev()
                }
            }
            ConfigField::ShowLines => c.show_lines = !c.show_lines,
            ConfigField::LineGap => c.line_gap = nudge(c.line_gap, delta),
            ConfigField::LineLength => c.line_length = nudge(c.line_length, delta),
            ConfigField::LineThickness => c.line_thickness = nudge(c.line_thickness, delta),
            ConfigField::TStyle => c.t_style = !c.t_style,
            ConfigField::ShowDot => c.show_dot = !c.show_dot,
            ConfigField::DotRadius => c.dot_radius = nudge(c.dot_radius, delta),
            ConfigField::SoundEnabled => s.enabled = !s.enabled,
            ConfigField::Volume => s.volume = nudge(s.volume, delta * 10).min(100),
            ConfigField::HitSound => s.hit_sound = !s.hit_sound,
            ConfigField::MissSound => s.miss_sound = !s.miss_sound,
            ConfigField::LifeLostSound => s.life_lost_sound = !s.life_lost_sound,
        }
    }
}

/// Sound collaborator for a terminal: every audible cue rings the bell
#[derive(Debug, Default)]
pub struct TerminalBell {
    pending: usize,
}

impl TerminalBell {
    pub fn take(&mut self) -> usize {
        std::mem::take(&mut self.pending)
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, cue: SoundCue, gain: f32) {
        trace!(?cue, gain, "bell");
        self.pending += 1;
    }
}

#[derive(Debug)]
pub struct App {
    pub route: Route,
    /// Highlighted row of whatever list the screen shows
    pub cursor: usize,
    pub settings: GameSettings,
    pub tabs: BoardTabs,
    pub game: Option<ActiveGame>,
    pub config: Config,
    config_store: FileConfigStore,
    pub scores: ScoreBook<FileStore>,
    pub screen: Rect,
    pub pointer: Option<Point>,
    pub now: Millis,
    bell: TerminalBell,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        settings: GameSettings,
        scores: ScoreBook<FileStore>,
        config_store: FileConfigStore,
    ) -> Self {
        let config = config_store.load();
        Self {
            route: Route::Home,
            cursor: 0,
            tabs: BoardTabs::from_settings(&settings),
            settings,
            game: None,
            config,
            config_store,
            scores,
            screen: Rect::default(),
            pointer: None,
            now: 0,
            bell: TerminalBell::default(),
            should_quit: false,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        if let Some(game) = self.game.as_mut() {
            game.quit();
        }
        debug!(from = self.route.path(), to = route.path(), "navigate");
        self.route = route;
        self.cursor = 0;
        self.game = route
            .game()
            .map(|mode| ActiveGame::new(mode, &self.settings));
        self.sync_play_area();
    }

    /// Esc: abandon a running game, otherwise go up one screen
    pub fn back(&mut self) {
        if let Some(game) = self.game.as_mut() {
            if game.phase() != Phase::Settings {
                game.quit();
                self.cursor = 0;
                return;
            }
        }
        match self.route.parent() {
            Some(parent) => self.navigate(parent),
            None => self.should_quit = true,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        self.sync_play_area();
    }

    /// Pixel rectangle of the play field, if the terminal has room for one
    pub fn play_area(&self) -> Option<PlayArea> {
        let rect = ui::play_rect(self.screen);
        if rect.width == 0 || rect.height == 0 {
            return None;
        }
        Some(ui::pixel_area(rect))
    }

    fn sync_play_area(&mut self) {
        let area = self.play_area();
        if let Some(ActiveGame::Track(e)) = self.game.as_mut() {
            e.set_play_area(area);
            e.pointer_moved(self.pointer);
        }
    }

    pub fn on_tick(&mut self, now: Millis) {
        self.now = now;
        if let Some(game) = self.game.as_mut() {
            game.advance(now);
        }
        self.collect();
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Millis) {
        self.on_tick(now);
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Esc {
            self.back();
            return;
        }

        match self.route {
            Route::Home => self.home_key(key),
            Route::GameModes => self.modes_key(key),
            Route::Settings => self.config_key(key),
            _ => self.game_key(key, now),
        }
        self.collect();
    }

    pub fn on_mouse(&mut self, ev: MouseEvent, now: Millis) {
        self.on_tick(now);
        let point = ui::cell_point(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.pointer_moved(point),
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_moved(point);
                if let (Some(area), Some(game)) = (self.play_area(), self.game.as_mut()) {
                    if area.contains(point) && game.phase() == Phase::Playing {
                        game.click(&area, point, now);
                    }
                }
            }
            _ => {}
        }
        self.collect();
    }

    fn pointer_moved(&mut self, point: Point) {
        self.pointer = Some(point);
        if let Some(ActiveGame::Track(e)) = self.game.as_mut() {
            e.pointer_moved(Some(point));
        }
    }

    /// Plays pending cues and files finished sessions on the leaderboard
    fn collect(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let played = dispatch(game.drain_cues(), &self.config.sound, &mut self.bell);
        if played > 0 {
            trace!(played, "cues");
        }
        match game {
            ActiveGame::Survival(e) => {
                if let Some(score) = e.take_score() {
                    submit(&mut self.scores, score);
                }
            }
            ActiveGame::Track(e) => {
                if let Some(score) = e.take_score() {
                    submit(&mut self.scores, score);
                }
            }
            ActiveGame::ReactionTime(e) => {
                if let Some(score) = e.take_score() {
                    submit(&mut self.scores, score);
                }
            }
            ActiveGame::Flick(_) | ActiveGame::Reflex(_) => {}
        }
    }

    /// Number of bell rings owed to the terminal since the last call
    pub fn take_bells(&mut self) -> usize {
        self.bell.take()
    }

    fn move_cursor(&mut self, len: usize, down: bool) {
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(HOME_ITEMS.len(), false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(HOME_ITEMS.len(), true),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') => match self.cursor {
                0 => self.navigate(Route::GameModes),
                1 => self.navigate(Route::Settings),
                _ => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn modes_key(&mut self, key: KeyEvent) {
        let len = GameMode::ALL.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(len, false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(len, true),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.navigate(GameMode::ALL[idx].route());
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(mode) = GameMode::ALL.get(self.cursor) {
                    self.navigate(mode.route());
                }
            }
            _ => {}
        }
    }

    fn config_key(&mut self, key: KeyEvent) {
        let len = ConfigField::ALL.len();
        let forward = match key.code {
            KeyCode::Up | KeyCode::Char('k') => return self.move_cursor(len, false),
            KeyCode::Down | KeyCode::Char('j') => return self.move_cursor(len, true),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => true,
            KeyCode::Left | KeyCode::Char('h') => false,
            KeyCode::Char('r') => {
                self.config = Config::default();
                return self.save_config();
            }
            _ => return,
        };
        if let Some(field) = ConfigField::ALL.get(self.cursor) {
            field.adjust(&mut self.config, forward);
            self.config = self.config.clone().normalized();
            self.save_config();
        }
    }

    fn save_config(&mut self) {
        match self.config_store.save(&self.config) {
            Ok(()) => debug!(path = %self.config_store.path().display(), "config saved"),
            Err(e) => warn!(error = %e, "could not save config"),
        }
    }

    fn game_key(&mut self, key: KeyEvent, now: Millis) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let mode = game.mode();
        match game.phase() {
            Phase::Settings => {
                let rows = self.settings.rows(mode).len();
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.move_cursor(rows, false),
                    KeyCode::Down | KeyCode::Char('j') => self.move_cursor(rows, true),
                    KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
                        let forward = matches!(key.code, KeyCode::Right | KeyCode::Char('l'));
                        self.settings.adjust(mode, self.cursor, forward);
                        game.apply_settings(&self.settings);
                        self.tabs.follow(mode, &self.settings);
                    }
                    KeyCode::Tab => self.tabs.cycle(mode),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        game.start(now);
                        self.tabs.follow(mode, &self.settings);
                        self.sync_play_area();
                    }
                    _ => {}
                }
            }
            Phase::Playing => {
                if let (ActiveGame::ReactionTime(e), KeyCode::Char(' ') | KeyCode::Enter) =
                    (game, key.code)
                {
                    reaction_click(e, now);
                }
            }
            Phase::GameOver => match key.code {
                KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char(' ') => {
                    game.start(now);
                    self.tabs.follow(mode, &self.settings);
                    self.sync_play_area();
                }
                KeyCode::Tab => self.tabs.cycle(mode),
                KeyCode::Char('s') => {
                    game.quit();
                    self.cursor = 0;
                }
                _ => {}
            },
        }
    }
}

fn submit<R: ScoreRecord + std::fmt::Debug>(book: &mut ScoreBook<FileStore>, record: R) {
    info!(key = R::STORAGE_KEY, ?record, "saving score");
    if let Err(e) = book.save(record) {
        warn!(key = R::STORAGE_KEY, error = %e, "could not save score");
    }
}
