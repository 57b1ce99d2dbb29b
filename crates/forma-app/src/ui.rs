mod generation_panel;
mod params_panel;
mod preview_panel;
mod top_panel;

pub use generation_panel::GenerationPanel;
pub use params_panel::ParamsPanel;
pub use preview_panel::PreviewPanel;
pub use top_panel::TopPanel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, Focus};

pub trait Panel {
    fn draw(&self, frame: &mut Frame, area: Rect, app: &App);
}

pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    TopPanel.draw(frame, rows[0], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(40),
            Constraint::Percentage(32),
        ])
        .split(rows[1]);

    ParamsPanel.draw(frame, cols[0], app);
    GenerationPanel.draw(frame, cols[1], app);
    PreviewPanel.draw(frame, cols[2], app);

    let hints = Paragraph::new(
        " Tab focus · Enter submit/select · Esc cancel · Ctrl+T mode · Ctrl+S save · Ctrl+D delete · Ctrl+C quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, rows[2]);
}

/// Border style shared by all panels: highlighted when focused
pub(crate) fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

pub(crate) fn is_focused(app: &App, focus: Focus) -> bool {
    app.focus == focus
}
