//! Cosmetic rotating board view. Reads no simulation state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::canvas::{Canvas, Line, Points};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::style;

/// Radians added per frame.
const SPIN_STEP: f64 = 0.05;
/// Board half-extents in canvas units (85 x 56 mm footprint).
const HALF_WIDTH: f64 = 0.85;
const HALF_HEIGHT: f64 = 0.56;
/// Header pin row offset from the board center.
const HEADER_Y: f64 = 0.46;
/// Pins drawn along the header row.
const HEADER_PINS: usize = 20;
/// Smallest area the canvas is drawn into.
const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

/// Rotation state for the board outline.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoardView {
    angle: f64,
}

impl BoardView {
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Spins the board by one step, wrapping at a full turn.
    pub fn advance(&mut self) {
        self.angle = (self.angle + SPIN_STEP) % std::f64::consts::TAU;
    }

    /// Outline corners projected after rotation about the vertical axis.
    pub fn outline(&self) -> [(f64, f64); 4] {
        let w = HALF_WIDTH * self.angle.cos();
        [
            (-w, -HALF_HEIGHT),
            (w, -HALF_HEIGHT),
            (w, HALF_HEIGHT),
            (-w, HALF_HEIGHT),
        ]
    }

    /// Projected positions for `count` header pins.
    pub fn pin_coords(&self, count: usize) -> Vec<(f64, f64)> {
        if count == 0 {
            return Vec::new();
        }
        let span = 2.0 * (HALF_WIDTH - 0.1);
        let gap = if count > 1 { span / (count - 1) as f64 } else { 0.0 };
        let cos = self.angle.cos();
        (0..count)
            .map(|i| ((-span / 2.0 + gap * i as f64) * cos, HEADER_Y))
            .collect()
    }
}

/// Draws the board; falls back to a placeholder when the area is too small.
pub fn render(frame: &mut Frame, view: &BoardView, area: Rect) {
    let block = Block::default().title(" Board ").borders(Borders::ALL);
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        frame.render_widget(Paragraph::new("(enlarge)").block(block), area);
        return;
    }

    let corners = view.outline();
    let pins = view.pin_coords(HEADER_PINS);

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            for i in 0..corners.len() {
                let (x1, y1) = corners[i];
                let (x2, y2) = corners[(i + 1) % corners.len()];
                ctx.draw(&Line::new(x1, y1, x2, y2, style::BOARD_COLOR));
            }
            ctx.draw(&Points {
                coords: &pins,
                color: style::BOARD_PIN_COLOR,
            });
        });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_at_full_turn() {
        let mut view = BoardView::default();
        for _ in 0..1000 {
            view.advance();
        }
        assert!((0.0..std::f64::consts::TAU).contains(&view.angle()));
    }

    #[test]
    fn outline_narrows_as_board_turns() {
        let flat = BoardView::default().outline();
        let mut view = BoardView::default();
        for _ in 0..10 {
            view.advance();
        }
        let turned = view.outline();
        assert_eq!(flat[1].0, HALF_WIDTH);
        assert!(turned[1].0 < flat[1].0);
        assert_eq!(turned[2].1, HALF_HEIGHT);
    }

    #[test]
    fn pin_coords_span_the_header() {
        let coords = BoardView::default().pin_coords(26);
        assert_eq!(coords.len(), 26);
        assert!(coords[0].0 < 0.0 && coords[25].0 > 0.0);
        assert!(BoardView::default().pin_coords(0).is_empty());
    }
}
