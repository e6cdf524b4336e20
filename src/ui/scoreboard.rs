use aimtrain::{
    scores::{
        format_accuracy, format_reaction_time, format_relative_time, format_survival_time,
        now_timestamp, ReactionTimeScore, ScoreRecord, SurvivalScore, TrackScore,
    },
    GameMode,
    session::ResultSummary,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

use crate::{
    app::{ActiveGame, App},
    ui::screen::{render_centered, render_footer},
};

/// One leaderboard, already formatted: a header and one row per entry
pub struct Board {
    pub title: String,
    pub header: [&'static str; 3],
    pub rows: Vec<[String; 3]>,
    /// One label per facet; `selected` is the one shown
    pub tabs: Vec<String>,
    pub selected: usize,
}

pub fn render_game_over(app: &App, game: &ActiveGame, f: &mut Frame) {
    let area = f.area();
    let board = board_for(app, game.mode());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(if board.is_some() {
            [Constraint::Percentage(45), Constraint::Min(0)]
        } else {
            [Constraint::Min(0), Constraint::Length(0)]
        })
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}: game over", game.mode().title()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(summary_lines(game));
    render_centered(f, chunks[0], lines);

    if let Some(board) = board {
        render_board(f, chunks[1], &board);
    }

    let hints: &[(&str, &str)] = if game.mode().has_leaderboard() {
        &[("enter", "play again"), ("tab", "scores"), ("s", "settings"), ("esc", "back")]
    } else {
        &[("enter", "play again"), ("s", "settings"), ("esc", "back")]
    };
    render_footer(f, hints);
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn timing_lines(s: &ResultSummary) -> Vec<Line<'static>> {
    vec![
        stat_line("Average", format_reaction_time(s.average_ms)),
        stat_line("Best", format_reaction_time(s.best_ms)),
        stat_line("Worst", format_reaction_time(s.worst_ms)),
    ]
}

pub fn summary_lines(game: &ActiveGame) -> Vec<Line<'static>> {
    match game {
        ActiveGame::Survival(e) => vec![
            stat_line("Targets hit", e.score().to_string()),
            stat_line("Time survived", format_survival_time(e.time_elapsed())),
            stat_line("Difficulty", e.settings().difficulty.to_string()),
        ],
        ActiveGame::Flick(e) => {
            let s = e.summary();
            let mut lines = vec![
                stat_line("Hits", format!("{}/{}", s.hits, s.rounds)),
                stat_line("Accuracy", format!("{}%", s.accuracy)),
            ];
            lines.extend(timing_lines(&s));
            lines
        }
        ActiveGame::Reflex(e) => {
            let s = e.summary();
            let mut lines = vec![stat_line("Targets hit", s.hits.to_string())];
            if s.hits > 0 {
                lines.extend(timing_lines(&s));
            }
            lines
        }
        ActiveGame::ReactionTime(e) => {
            let s = e.summary();
            let mut lines = timing_lines(&s);
            lines.push(Line::default());
            lines.extend(e.results().iter().map(|r| {
                stat_line(
                    &format!("Round {}", r.round),
                    format_reaction_time(r.reaction_time_ms),
                )
            }));
            lines
        }
        ActiveGame::Track(e) => vec![
            stat_line("Accuracy", format_accuracy(e.accuracy())),
            stat_line("Score", e.score().to_string()),
            stat_line("Speed", e.settings().speed.to_string()),
        ],
    }
}

fn tab_labels<R: ScoreRecord>(label: impl Fn(R::Facet) -> String, selected: R::Facet) -> (Vec<String>, usize) {
    let labels = R::FACETS.iter().map(|f| label(*f)).collect();
    let index = R::FACETS.iter().position(|f| *f == selected).unwrap_or(0);
    (labels, index)
}

/// Top scores for the facet the leaderboard tab currently shows
pub fn board_for(app: &App, mode: GameMode) -> Option<Board> {
    let now = now_timestamp();
    match mode {
        GameMode::Survival => {
            let difficulty = app.tabs.survival;
            let rows = app
                .scores
                .scores::<SurvivalScore>(Some(difficulty))
                .into_iter()
                .map(|s| {
                    [
                        s.hits.to_string(),
                        format_survival_time(s.time),
                        format_relative_time(s.timestamp, now),
                    ]
                })
                .collect();
            let (tabs, selected) = tab_labels::<SurvivalScore>(|d| d.to_string(), difficulty);
            Some(Board {
                title: format!(" Best runs ({difficulty}) "),
                header: ["Hits", "Time", "When"],
                rows,
                tabs,
                selected,
            })
        }
        GameMode::Track => {
            let speed = app.tabs.track;
            let rows = app
                .scores
                .scores::<TrackScore>(Some(speed))
                .into_iter()
                .map(|s| {
                    [
                        format_accuracy(s.accuracy),
                        s.speed.to_string(),
                        format_relative_time(s.timestamp, now),
                    ]
                })
                .collect();
            let (tabs, selected) = tab_labels::<TrackScore>(|s| s.to_string(), speed);
            Some(Board {
                title: format!(" Best tracking ({speed}) "),
                header: ["Accuracy", "Speed", "When"],
                rows,
                tabs,
                selected,
            })
        }
        GameMode::ReactionTime => {
            let rounds = app.tabs.reaction_time;
            let rows = app
                .scores
                .scores::<ReactionTimeScore>(Some(rounds))
                .into_iter()
                .map(|s| {
                    [
                        format_reaction_time(s.average_time),
                        s.rounds.count().to_string(),
                        format_relative_time(s.timestamp, now),
                    ]
                })
                .collect();
            let (tabs, selected) = tab_labels::<ReactionTimeScore>(
                |r| match r.count() {
                    1 => "1 round".to_string(),
                    n => format!("{n} rounds"),
                },
                rounds,
            );
            Some(Board {
                title: format!(" Best averages ({} rounds) ", rounds.count()),
                header: ["Average", "Rounds", "When"],
                rows,
                tabs,
                selected,
            })
        }
        GameMode::Flick | GameMode::Reflex => None,
    }
}

pub fn render_board(f: &mut Frame, area: Rect, board: &Board) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(board.title.clone());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let tabs = Tabs::new(board.tabs.clone())
        .select(board.selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, chunks[0]);

    if board.rows.is_empty() {
        let empty = Paragraph::new("No scores yet").style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from("#"))
            .chain(board.header.iter().map(|h| Cell::from(*h)))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = board
        .rows
        .iter()
        .enumerate()
        .map(|(i, cols)| {
            let style = if i == 0 {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(
                std::iter::once(Cell::from(format!("{}", i + 1)))
                    .chain(cols.iter().map(|c| Cell::from(c.clone())))
                    .collect::<Vec<_>>(),
            )
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(14),
        ],
    )
    .header(header);
    f.render_widget(table, chunks[1]);
}
