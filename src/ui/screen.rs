use aimtrain::{games::GameMode, route::Route, session::Phase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app::{App, ConfigField, HOME_ITEMS},
    ui::{
        centered_rect, key_hint,
        play::{render_hud, render_playing, CrosshairWidget},
        scoreboard::{board_for, render_board, render_game_over},
        text_width,
    },
};

/// A UI Screen boundary: responsible for rendering one route
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let mut lines = vec![
            Line::from(Span::styled(
                "aimtrain",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "sharpen your aim in the terminal",
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )),
            Line::default(),
        ];
        lines.extend(
            HOME_ITEMS
                .iter()
                .enumerate()
                .map(|(i, item)| menu_line(item, i == app.cursor)),
        );
        render_centered(f, f.area(), lines);
        render_footer(
            f,
            [("↑↓", "select"), ("enter", "open"), ("q", "quit")].as_slice(),
        );
    }
}

pub struct GameModesScreen;

impl Screen for GameModesScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let mut lines = vec![
            Line::from(Span::styled(
                "Game modes",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        for (i, mode) in GameMode::ALL.iter().enumerate() {
            let selected = i == app.cursor;
            lines.push(menu_line(&format!("{}. {}", i + 1, mode.title()), selected));
            let mut blurb = vec![Span::styled(
                mode.blurb(),
                Style::default().fg(Color::DarkGray),
            )];
            if mode.has_leaderboard() {
                blurb.push(Span::styled(" ★", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(blurb));
        }
        render_centered(f, f.area(), lines);
        render_footer(
            f,
            [("↑↓", "select"), ("1-5", "jump"), ("enter", "play"), ("esc", "back")].as_slice(),
        );
    }
}

pub struct ConfigScreen;

impl Screen for ConfigScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(f.area());

        let lines: Vec<Line> = ConfigField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                value_line(field.label(), &field.value(&app.config), i == app.cursor)
            })
            .collect();
        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Crosshair & sound "),
        );
        f.render_widget(form, chunks[0]);

        let preview = Block::default().borders(Borders::ALL).title(" Preview ");
        let inner = preview.inner(chunks[1]);
        f.render_widget(preview, chunks[1]);
        let centre = (inner.x + inner.width / 2, inner.y + inner.height / 2);
        f.render_widget(
            CrosshairWidget {
                config: &app.config.crosshair,
                at: centre,
            },
            inner,
        );

        render_footer(
            f,
            [("↑↓", "select"), ("←→", "change"), ("r", "reset"), ("esc", "back")].as_slice(),
        );
    }
}

pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let Some(game) = app.game.as_ref() else {
            return;
        };
        match game.phase() {
            Phase::Settings => render_settings_form(app, game.mode(), f),
            Phase::Playing => {
                render_hud(app, game, f);
                render_playing(app, game, f);
            }
            Phase::GameOver => render_game_over(app, game, f),
        }
    }
}

fn render_settings_form(app: &App, mode: GameMode, f: &mut Frame) {
    let mut lines = vec![
        Line::from(Span::styled(
            mode.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            mode.blurb(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];
    lines.extend(
        app.settings
            .rows(mode)
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| value_line(label, &value, i == app.cursor)),
    );
    let Some(board) = board_for(app, mode) else {
        render_centered(f, f.area(), lines);
        render_footer(
            f,
            [("↑↓", "select"), ("←→", "change"), ("enter", "start"), ("esc", "back")].as_slice(),
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Percentage(45), Constraint::Min(0)])
        .split(f.area());
    render_centered(f, chunks[0], lines);
    render_board(f, chunks[1], &board);
    render_footer(
        f,
        [
            ("↑↓", "select"),
            ("←→", "change"),
            ("tab", "scores"),
            ("enter", "start"),
            ("esc", "back"),
        ]
        .as_slice(),
    );
}

pub fn menu_line(label: &str, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("> {label} <"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("  {label}  "))
    }
}

fn value_line(label: &str, value: &str, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<16}"), style),
        Span::styled(format!("< {value} >"), style.fg(Color::Cyan)),
    ])
}

pub fn render_centered(f: &mut Frame, area: Rect, lines: Vec<Line>) {
    let width = text_width(&lines).saturating_add(4);
    let height = lines.len() as u16;
    let rect = centered_rect(area, width, height);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

pub fn render_footer(f: &mut Frame, hints: &[(&str, &str)]) {
    let area = f.area();
    if area.height == 0 {
        return;
    }
    let rect = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| key_hint(key, action))
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        rect,
    );
}

/// Helper to construct the appropriate screen for the current route
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match app.route {
        Route::Home => Box::new(HomeScreen),
        Route::GameModes => Box::new(GameModesScreen),
        Route::Settings => Box::new(ConfigScreen),
        Route::Survival | Route::Flick | Route::Track | Route::Reflex | Route::ReactionTime => {
            Box::new(GameScreen)
        }
    }
}
