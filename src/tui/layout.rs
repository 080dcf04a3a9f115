//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph, Wrap};

use super::board;
use super::runtime::App;
use super::style;

/// Pins per row in the GPIO grid.
const GRID_COLUMNS: usize = 7;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // header
            Constraint::Length(12), // controls, board, gpio
            Constraint::Min(8),     // chart
            Constraint::Length(3),  // status
            Constraint::Length(1),  // footer
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_controls(frame, app, middle[0]);
    board::render(frame, &app.board, middle[1]);
    render_gpio(frame, app, middle[2]);
    render_chart(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: title, sim time, sample count, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let running = app.sim.is_running();
    let state_icon = if running { "▶" } else { "‖" };

    let header = Line::from(vec![
        Span::styled(
            " PI-ENERGY-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={:.1}s │ {}/{} samples │ ",
            app.sim.time(),
            app.sim.history().len(),
            app.sim.history().capacity(),
        )),
        Span::styled(
            format!("{state_icon} {}", app.sim.run_state()),
            Style::default()
                .fg(style::run_color(running))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Input parameters with their noise-free readout.
fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let params = app.sim.parameters();
    let ideal = app.sim.ideal_readout();
    let latest = app.sim.history().latest();

    let mut lines = vec![
        Line::from(format!("  Voltage     {:>8.1} V", params.voltage)),
        Line::from(format!("  Resistance  {:>8.0} Ω", params.resistance)),
        Line::from(""),
        Line::from(Span::styled(
            "  Ideal",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  Current     {:>8.3} mA", ideal.current_ma())),
        Line::from(format!("  Power       {:>8.3} mW", ideal.power_mw())),
    ];
    if let Some(s) = latest {
        lines.push(Line::from(Span::styled(
            "  Measured",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "  {:.3} V  {:.3} mA  {:.3} mW",
            s.voltage, s.current_ma, s.power_mw
        )));
    }

    let block = Block::default().title(" Controls ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// GPIO grid with the cursor highlighted.
fn render_gpio(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.sim.gpio().snapshot();
    let lines: Vec<Line> = snapshot
        .chunks(GRID_COLUMNS)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&(pin, asserted)| {
                    let mut s = Style::default().fg(if asserted {
                        style::PIN_HIGH
                    } else {
                        style::PIN_LOW
                    });
                    if pin == app.selected_pin {
                        s = s.add_modifier(Modifier::REVERSED);
                    }
                    let mark = if asserted { '●' } else { '○' };
                    Span::styled(format!("{:>3}{mark} ", pin.number()), s)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!(" GPIO ({} high) ", app.sim.gpio().asserted_count());
    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Voltage, current and power over the retained history.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.sim.history();
    let voltage: Vec<(f64, f64)> = history.iter().map(|s| (s.time, s.voltage)).collect();
    let current: Vec<(f64, f64)> = history.iter().map(|s| (s.time, s.current_ma)).collect();
    let power: Vec<(f64, f64)> = history.iter().map(|s| (s.time, s.power_mw)).collect();

    let y_bounds = style::auto_bounds_y(&[&voltage[..], &current[..], &power[..]]);
    let x_lo = voltage.first().map_or(0.0, |p| p.0);
    let x_hi = voltage.last().map_or(1.0, |p| p.0).max(x_lo + 1.0);

    let datasets = vec![
        Dataset::default()
            .name("V")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::VOLTAGE_COLOR))
            .data(&voltage),
        Dataset::default()
            .name("mA")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::CURRENT_COLOR))
            .data(&current),
        Dataset::default()
            .name("mW")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::POWER_COLOR))
            .data(&power),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Voltage / Current / Power ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("s")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{x_lo:.1}"), format!("{x_hi:.1}")]),
        )
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Status line: last notification or the pin under the cursor.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status {
        Some(msg) => format!("  {msg}"),
        None => {
            let pin = app.selected_pin;
            let state = if app.sim.gpio().read(pin) { "HIGH" } else { "LOW" };
            format!("  {pin} {state}")
        }
    };
    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Start/Pause  r:Reset  ↑↓:Voltage  ←→:Resistance  Tab:Pin  Enter:Toggle  e:Export",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
