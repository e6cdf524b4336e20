use aimtrain::{
    crosshair::CrosshairConfig,
    games::{survival::MAX_LIVES, ReactionPhase},
    scores::{format_accuracy, format_reaction_time, format_survival_time},
    session::Position,
    PlayArea,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::{
    app::{ActiveGame, App},
    ui::{
        cell_point, centered_rect, game_layout, key_hint, pixel_area, text_width, CELL_H_PX,
        CELL_W_PX,
    },
};

const TARGET_CELL: &str = "█";

/// One-line status bar above the play field
pub fn render_hud(app: &App, game: &ActiveGame, f: &mut Frame) {
    let layout = game_layout(f.area());
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let stat = |name: &'static str, v: String| {
        vec![
            Span::styled(format!("{name} "), label),
            Span::styled(v, value),
            Span::raw("    "),
        ]
    };

    let spans: Vec<Span> = match game {
        ActiveGame::Survival(e) => {
            let hearts = format!(
                "{}{}",
                "♥".repeat(e.lives() as usize),
                "♡".repeat((MAX_LIVES - e.lives()) as usize)
            );
            [
                stat("Score", e.score().to_string()),
                vec![
                    Span::styled("Lives ", label),
                    Span::styled(hearts, Style::default().fg(Color::Red)),
                    Span::raw("    "),
                ],
                stat("Time", format_survival_time(e.time_elapsed())),
            ]
            .concat()
        }
        ActiveGame::Flick(e) => [
            stat(
                "Round",
                format!("{}/{}", e.current_round(), e.settings().rounds),
            ),
            stat(
                "Last",
                e.last_hit_ms()
                    .map_or_else(|| "-".to_string(), format_reaction_time),
            ),
        ]
        .concat(),
        ActiveGame::Reflex(e) => [
            stat("Round", e.round().to_string()),
            stat(
                "Last",
                e.results()
                    .last()
                    .map_or_else(|| "-".to_string(), |r| format_reaction_time(r.reaction_time_ms)),
            ),
        ]
        .concat(),
        ActiveGame::ReactionTime(e) => [stat(
            "Round",
            format!("{}/{}", e.current_round(), e.total_rounds()),
        )]
        .concat(),
        ActiveGame::Track(e) => [
            stat("Score", e.score().to_string()),
            stat("Time", format!("{}s", e.time_remaining())),
            stat("Accuracy", format_accuracy(e.accuracy())),
        ]
        .concat(),
    };

    let hud = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", game.mode().title())),
        );
    f.render_widget(hud, layout.hud);

    let hints: Vec<Span> = key_hint("esc", "abandon");
    f.render_widget(
        Paragraph::new(Line::from(hints)).alignment(Alignment::Center),
        layout.footer,
    );
}

pub fn render_playing(app: &App, game: &ActiveGame, f: &mut Frame) {
    let layout = game_layout(f.area());
    f.render_widget(Block::default().borders(Borders::ALL), layout.frame);
    f.render_widget(PlayField { app, game }, layout.play);
}

/// Targets and crosshair, painted cell by cell through the same hit test the
/// mouse uses
struct PlayField<'a> {
    app: &'a App,
    game: &'a ActiveGame,
}

impl Widget for PlayField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let px = pixel_area(area);

        match self.game {
            ActiveGame::Survival(e) => {
                for t in e.targets() {
                    let left = t.expires_at.map_or(1.0, |end| {
                        let total = end.saturating_sub(t.spawned_at).max(1) as f64;
                        end.saturating_sub(self.app.now) as f64 / total
                    });
                    let color = if left > 0.66 {
                        Color::Red
                    } else if left > 0.33 {
                        Color::LightRed
                    } else {
                        Color::Yellow
                    };
                    paint_disc(buf, area, &px, t.position, t.size, Style::default().fg(color));
                }
            }
            ActiveGame::Flick(e) => {
                if let Some(pair) = e.targets() {
                    for t in pair.iter().filter(|t| !t.is_active) {
                        paint_disc(
                            buf,
                            area,
                            &px,
                            t.position,
                            t.size,
                            Style::default().fg(Color::DarkGray),
                        );
                    }
                    for t in pair.iter().filter(|t| t.is_active) {
                        paint_disc(buf, area, &px, t.position, t.size, Style::default().fg(Color::Cyan));
                    }
                }
            }
            ActiveGame::Reflex(e) => {
                if let Some(t) = e.target() {
                    paint_disc(buf, area, &px, t.position, t.size, Style::default().fg(Color::Red));
                }
            }
            ActiveGame::Track(e) => {
                let color = if e.is_hovering() {
                    Color::Green
                } else {
                    Color::Red
                };
                paint_disc(
                    buf,
                    area,
                    &px,
                    e.position(),
                    e.settings().target_size.px(),
                    Style::default().fg(color),
                );
            }
            ActiveGame::ReactionTime(e) => render_reaction_panel(
                e.phase(),
                e.last_reaction_ms(),
                e.is_last_round(),
                area,
                buf,
            ),
        }

        if let Some(pointer) = self.app.pointer {
            if px.contains(pointer) {
                let col = (pointer.x / CELL_W_PX) as u16;
                let row = (pointer.y / CELL_H_PX) as u16;
                CrosshairWidget {
                    config: &self.app.config.crosshair,
                    at: (col, row),
                }
                .render(area, buf);
            }
        }
    }
}

fn paint_disc(
    buf: &mut Buffer,
    area: Rect,
    px: &PlayArea,
    centre: Position,
    size: u32,
    style: Style,
) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if px.hits(cell_point(x, y), centre, size) {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(TARGET_CELL).set_style(style);
                }
            }
        }
    }
}

fn render_reaction_panel(
    phase: ReactionPhase,
    last_ms: Option<u64>,
    last_round: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let (bg, lines): (Color, Vec<&str>) = match phase {
        ReactionPhase::Waiting => (Color::Red, vec!["Wait for green..."]),
        ReactionPhase::Ready => (Color::Green, vec!["CLICK!"]),
        ReactionPhase::TooEarly => (
            Color::Blue,
            vec!["Too early!", "Click or press space to try again"],
        ),
        ReactionPhase::Result if last_round => (Color::Blue, vec!["", "Click to see your results"]),
        ReactionPhase::Result => (Color::Blue, vec!["", "Click or press space to continue"]),
        ReactionPhase::Settings | ReactionPhase::GameOver => return,
    };
    buf.set_style(area, Style::default().bg(bg));

    let headline = last_ms
        .filter(|_| phase == ReactionPhase::Result)
        .map(format_reaction_time);
    let text: Vec<Line> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| match (&headline, i) {
            (Some(h), 0) => Line::from(Span::styled(
                h.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            _ => Line::from(*l),
        })
        .collect();
    let rect = centered_rect(area, text_width(&text) + 2, text.len() as u16);
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD))
        .render(rect, buf);
}

/// Crosshair centred on cell `at`. Pixel lengths are converted to whole cells.
pub struct CrosshairWidget<'a> {
    pub config: &'a CrosshairConfig,
    pub at: (u16, u16),
}

impl Widget for CrosshairWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cfg = self.config;
        if !cfg.is_visible() {
            return;
        }
        let (r, g, b) = cfg.color.rgb();
        let mut style = Style::default().fg(Color::Rgb(r, g, b));
        if cfg.opacity < 50 {
            style = style.add_modifier(Modifier::DIM);
        }
        let heavy = cfg.line_thickness >= 5;
        let (col, row) = (i32::from(self.at.0), i32::from(self.at.1));

        let mut put = |x: i32, y: i32, symbol: &str| {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                return;
            };
            if x < area.left() || x >= area.right() || y < area.top() || y >= area.bottom() {
                return;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        };

        if cfg.show_lines {
            let (h, v) = if heavy { ("━", "┃") } else { ("─", "│") };
            let gap = f64::from(cfg.line_gap);
            let len = f64::from(cfg.line_length);
            let span = |unit: f64| {
                let start = ((gap / unit).round() as i32).max(1);
                let end = (((gap + len) / unit).round() as i32).max(start);
                start..=end
            };
            for k in span(CELL_W_PX) {
                put(col - k, row, h);
                put(col + k, row, h);
            }
            for k in span(CELL_H_PX) {
                if !cfg.t_style {
                    put(col, row - k, v);
                }
                put(col, row + k, v);
            }
        }
        if cfg.show_dot {
            put(col, row, if cfg.dot_radius >= 5 { "●" } else { "•" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimtrain::crosshair::CrosshairColor;

    fn symbols(buf: &Buffer) -> String {
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn disc_covers_its_centre_cell() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        let px = pixel_area(area);
        paint_disc(&mut buf, area, &px, Position::centre(), 50, Style::default());
        assert_eq!(buf[(20, 5)].symbol(), TARGET_CELL);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn t_style_crosshair_has_no_top_arm() {
        let area = Rect::new(0, 0, 21, 11);
        let mut buf = Buffer::empty(area);
        let cfg = CrosshairConfig {
            t_style: true,
            color: CrosshairColor::White,
            ..CrosshairConfig::default()
        };
        CrosshairWidget {
            config: &cfg,
            at: (10, 5),
        }
        .render(area, &mut buf);

        assert_eq!(buf[(10, 5)].symbol(), "•");
        assert_eq!(buf[(10, 4)].symbol(), " ");
        assert_eq!(buf[(10, 6)].symbol(), "│");
        assert_eq!(buf[(9, 5)].symbol(), "─");
    }

    #[test]
    fn invisible_crosshair_draws_nothing() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        let cfg = CrosshairConfig {
            opacity: 0,
            ..CrosshairConfig::default()
        };
        CrosshairWidget {
            config: &cfg,
            at: (5, 2),
        }
        .render(area, &mut buf);
        assert!(symbols(&buf).trim().is_empty());
    }

    #[test]
    fn crosshair_clips_at_the_edges() {
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        CrosshairWidget {
            config: &CrosshairConfig::default(),
            at: (0, 0),
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "•");
    }
}
