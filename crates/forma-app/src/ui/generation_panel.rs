use forma_core::TaskStatus;
use forma_core::request::GenerationMode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use crate::app::{App, Focus};
use crate::ui::{Panel, is_focused, panel_block};

pub struct GenerationPanel;

impl Panel for GenerationPanel {
    fn draw(&self, frame: &mut Frame, area: Rect, app: &App) {
        let input_focused = is_focused(app, Focus::Input);

        let outer = panel_block("Generation", input_focused);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(inner);

        self.draw_mode_line(frame, rows[0], app);
        self.draw_input(frame, rows[1], app, input_focused);
        self.draw_status(frame, rows[2], app);
        self.draw_inspiration(frame, rows[3], app);
    }
}

impl GenerationPanel {
    fn draw_mode_line(&self, frame: &mut Frame, area: Rect, app: &App) {
        let (text_style, image_style) = match app.mode {
            GenerationMode::Text => (
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::DarkGray),
            ),
            GenerationMode::Image => (
                Style::default().fg(Color::DarkGray),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        let line = Line::from(vec![
            Span::styled(" Text to 3D ", text_style),
            Span::raw("│"),
            Span::styled(" Image to 3D ", image_style),
            Span::styled("  (Ctrl+T)", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect, app: &App, focused: bool) {
        let (title, content, remaining) = match app.mode {
            GenerationMode::Text => (
                "Prompt",
                app.prompt.as_str(),
                Some(
                    forma_core::request::MAX_PROMPT_CHARS.saturating_sub(app.prompt.chars().count()),
                ),
            ),
            GenerationMode::Image => ("Image file (png/jpeg)", app.image_path.as_str(), None),
        };

        let title = match remaining {
            Some(n) => format!("{title} ({n} left)"),
            None => title.to_string(),
        };

        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            );
        frame.render_widget(input, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, app: &App) {
        match &app.task_status {
            TaskStatus::Processing {
                progress,
                eta,
                message,
            } => {
                let label = match (eta, message) {
                    (_, Some(msg)) => msg.clone(),
                    (Some(eta), None) => format!("~{eta}s remaining"),
                    (None, None) => "Generating".to_string(),
                };
                let gauge = Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .percent(u16::from(progress.unwrap_or(0)))
                    .label(label);
                frame.render_widget(gauge, shrink(area));
            }
            TaskStatus::Unzipping => {
                let gauge = Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .percent(99)
                    .label("Unpacking model archive");
                frame.render_widget(gauge, shrink(area));
            }
            TaskStatus::Failed { error } => {
                let widget = Paragraph::new(error.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true });
                frame.render_widget(widget, shrink(area));
            }
            TaskStatus::Completed { .. } => {
                let widget = Paragraph::new("Generation complete")
                    .style(Style::default().fg(Color::Green));
                frame.render_widget(widget, shrink(area));
            }
            TaskStatus::Idle => {
                let widget = Paragraph::new("Press Enter to generate")
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(widget, shrink(area));
            }
        }
    }

    fn draw_inspiration(&self, frame: &mut Frame, area: Rect, app: &App) {
        let focused = is_focused(app, Focus::Inspiration);
        let items: Vec<ListItem> = app
            .inspiration
            .iter()
            .enumerate()
            .map(|(i, model)| {
                let style = if focused && i == app.inspiration_cursor {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(format!(" {}", short_name(&model.url)), style))
            })
            .collect();
        let list = List::new(items).block(panel_block("Inspiration", focused));
        frame.render_widget(list, area);
    }
}

/// Drop one line of padding so gauges do not touch the input box
fn shrink(area: Rect) -> Rect {
    Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(1),
        ..area
    }
}

pub(crate) fn short_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
