pub mod play;
pub mod scoreboard;
pub mod screen;

use aimtrain::{PlayArea, Point};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

/// A terminal cell stands for this many virtual pixels, so target sizes keep
/// roughly their on-screen proportions
pub const CELL_W_PX: f64 = 8.0;
pub const CELL_H_PX: f64 = 16.0;

const HUD_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

pub struct GameLayout {
    pub hud: Rect,
    /// Bordered frame around the play field
    pub frame: Rect,
    pub play: Rect,
    pub footer: Rect,
}

pub fn game_layout(area: Rect) -> GameLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HUD_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    let frame = chunks[1];
    GameLayout {
        hud: chunks[0],
        frame,
        play: Block::default().borders(Borders::ALL).inner(frame),
        footer: chunks[2],
    }
}

/// Cells the play field occupies on a screen of size `area`
pub fn play_rect(area: Rect) -> Rect {
    game_layout(area).play
}

pub fn pixel_area(rect: Rect) -> PlayArea {
    PlayArea::new(
        f64::from(rect.x) * CELL_W_PX,
        f64::from(rect.y) * CELL_H_PX,
        f64::from(rect.width) * CELL_W_PX,
        f64::from(rect.height) * CELL_H_PX,
    )
}

/// Pixel at the centre of a cell
pub fn cell_point(col: u16, row: u16) -> Point {
    Point::new(
        (f64::from(col) + 0.5) * CELL_W_PX,
        (f64::from(row) + 0.5) * CELL_H_PX,
    )
}

/// Vertically centres `height` lines inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Widest of a set of lines, for sizing a centred box
pub fn text_width(lines: &[Line]) -> u16 {
    lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.width()).sum::<usize>())
        .max()
        .unwrap_or(0) as u16
}

pub fn key_hint<'a>(key: &'a str, action: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::styled(key, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {action}   "), Style::default().fg(Color::DarkGray)),
    ]
}

pub fn draw(app: &App, f: &mut Frame) {
    let screen = screen::current_screen(app);
    screen.render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_field_sits_inside_the_frame() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = game_layout(area);
        assert_eq!(layout.hud.height, HUD_HEIGHT);
        assert_eq!(layout.play, Rect::new(1, HUD_HEIGHT + 1, 98, 30 - HUD_HEIGHT - 1 - 2));
    }

    #[test]
    fn cell_centres_map_into_the_pixel_area() {
        let rect = Rect::new(1, 4, 98, 24);
        let area = pixel_area(rect);
        assert!(area.contains(cell_point(1, 4)));
        assert!(area.contains(cell_point(98, 27)));
        assert!(!area.contains(cell_point(0, 4)));
        assert!(!area.contains(cell_point(99, 4)));
    }

    #[test]
    fn centered_rect_fits() {
        let r = centered_rect(Rect::new(0, 0, 20, 10), 6, 2);
        assert_eq!(r, Rect::new(7, 4, 6, 2));
        let r = centered_rect(Rect::new(0, 0, 4, 1), 6, 2);
        assert_eq!(r, Rect::new(0, 0, 4, 1));
    }
}
