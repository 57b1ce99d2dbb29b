use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::Panel;

pub struct TopPanel;

impl Panel for TopPanel {
    fn draw(&self, frame: &mut Frame, area: Rect, app: &App) {
        let status_color = match &app.task_status {
            s if s.is_active() => Color::Yellow,
            forma_core::TaskStatus::Failed { .. } => Color::Red,
            forma_core::TaskStatus::Completed { .. } => Color::Green,
            _ => Color::Gray,
        };

        let line = Line::from(vec![
            Span::styled(
                " Forma ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("· text & image to 3D · "),
            Span::styled(app.task_status.label(), Style::default().fg(status_color)),
        ]);

        let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
    }
}
