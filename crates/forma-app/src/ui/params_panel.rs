use forma_core::request::GenerationMode;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem};

use crate::app::{App, Focus};
use crate::ui::{Panel, is_focused, panel_block};

pub struct ParamsPanel;

impl Panel for ParamsPanel {
    fn draw(&self, frame: &mut Frame, area: Rect, app: &App) {
        let focused = is_focused(app, Focus::Params);

        let seed = app
            .params
            .model_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string());

        let negative = if app.mode != GenerationMode::Text {
            "n/a (image mode)".to_string()
        } else if app.params.negative_prompt.is_empty() {
            "none".to_string()
        } else {
            app.params.negative_prompt.clone()
        };

        let rows: [(&str, String); crate::app::PARAM_ROWS] = [
            ("Detail", app.params.face_limit.label().to_string()),
            ("Texture", on_off(app.params.texture)),
            ("Quality", app.params.texture_quality.label().to_string()),
            ("Alignment", app.params.texture_alignment.label().to_string()),
            ("Style", app.params.style.label().to_string()),
            ("Quad mesh", on_off(app.params.quad)),
            ("Avoid", negative),
            ("Seed", seed),
        ];

        let items: Vec<ListItem> = rows
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                let style = if focused && i == app.param_cursor {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {label:<10}"), style),
                    Span::styled(format!("{value} "), style.fg(value_color(style, focused))),
                ]))
            })
            .collect();

        let list = List::new(items).block(panel_block("Parameters", focused));
        frame.render_widget(list, area);
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn value_color(style: Style, focused: bool) -> Color {
    match style.bg {
        Some(_) => Color::Black,
        None if focused => Color::White,
        None => Color::Gray,
    }
}
