use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use crate::app::{App, Focus};
use crate::ui::generation_panel::short_name;
use crate::ui::{Panel, is_focused, panel_block};

pub struct PreviewPanel;

impl Panel for PreviewPanel {
    fn draw(&self, frame: &mut Frame, area: Rect, app: &App) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(area);

        self.draw_model(frame, rows[0], app);
        self.draw_history(frame, rows[1], app);
    }
}

impl PreviewPanel {
    fn draw_model(&self, frame: &mut Frame, area: Rect, app: &App) {
        let source = if app.displayed.local {
            "bundled"
        } else if app.is_saved() {
            "saved"
        } else {
            "generated"
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Asset:  ", Style::default().fg(Color::DarkGray)),
                Span::raw(app.displayed.url.as_str()),
            ]),
            Line::from(vec![
                Span::styled("Source: ", Style::default().fg(Color::DarkGray)),
                Span::raw(source),
            ]),
        ];
        if let Some(poster) = &app.displayed.poster {
            lines.push(Line::from(vec![
                Span::styled("Poster: ", Style::default().fg(Color::DarkGray)),
                Span::raw(poster.as_str()),
            ]));
        }
        if !app.displayed.local && !app.is_saved() {
            lines.push(Line::from(Span::styled(
                "Ctrl+S to keep this model",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel_block("Preview", false));
        frame.render_widget(widget, area);
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect, app: &App) {
        let focused = is_focused(app, Focus::History);
        let items: Vec<ListItem> = if app.history.is_empty() {
            vec![ListItem::new(Span::styled(
                " nothing saved yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            app.history
                .entries()
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let style = if focused && i == app.history_cursor {
                        Style::default().fg(Color::Black).bg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    let stamp = entry.saved_at.format("%Y-%m-%d %H:%M");
                    ListItem::new(Line::from(vec![
                        Span::styled(format!(" {}", short_name(&entry.model.url)), style),
                        Span::styled(format!("  {stamp}"), style.fg(Color::DarkGray)),
                    ]))
                })
                .collect()
        };

        let title = format!("History ({})", app.history.len());
        let list = List::new(items).block(panel_block(&title, focused));
        frame.render_widget(list, area);
    }
}
