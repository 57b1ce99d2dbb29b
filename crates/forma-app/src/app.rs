use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use forma_core::model::Model;
use forma_core::params::{
    FaceLimitPreset, GenerationParams, ModelStyle, TextureAlignment, TextureQuality,
};
use forma_core::progress;
use forma_core::request::{GenerationMode, GenerationRequest};
use forma_core::task::TaskStatus;
use log::debug;

use crate::events::{GenEvent, TaskEvent};
use crate::generator::Generator;
use crate::history::HistoryStore;

/// Which panel keyboard input lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Params,
    History,
    Inspiration,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Input => Self::Params,
            Self::Params => Self::History,
            Self::History => Self::Inspiration,
            Self::Inspiration => Self::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Input => Self::Inspiration,
            Self::Params => Self::Input,
            Self::History => Self::Params,
            Self::Inspiration => Self::History,
        }
    }
}

/// Rows of the params panel, top to bottom
pub const PARAM_ROWS: usize = 8;

/// Central application state. All mutation happens on the UI event loop:
/// key events and generator events both land here, and the panels render
/// from a shared borrow.
pub struct App {
    pub task_status: TaskStatus,
    pub displayed: Model,
    pub inspiration: Vec<Model>,
    pub history: HistoryStore,
    pub mode: GenerationMode,
    pub prompt: String,
    pub image_path: String,
    pub params: GenerationParams,
    pub focus: Focus,
    pub param_cursor: usize,
    pub history_cursor: usize,
    pub inspiration_cursor: usize,
    pub session_expired: bool,
    pub should_quit: bool,
    generator: Generator,
    models_dir: PathBuf,
    default_model: Model,
    /// Extraction output currently backing the display; removed when a new
    /// extraction supersedes it, unless saved into history.
    last_extracted: Option<PathBuf>,
}

impl App {
    pub fn new(generator: Generator, history: HistoryStore, models_dir: PathBuf) -> Self {
        let mut bundled = Model::bundled_defaults();
        let default_model = bundled.remove(0);
        Self {
            task_status: TaskStatus::Idle,
            displayed: default_model.clone(),
            inspiration: bundled,
            history,
            mode: GenerationMode::Text,
            prompt: String::new(),
            image_path: String::new(),
            params: GenerationParams::default(),
            focus: Focus::Input,
            param_cursor: 0,
            history_cursor: 0,
            inspiration_cursor: 0,
            session_expired: false,
            should_quit: false,
            generator,
            models_dir,
            default_model,
            last_extracted: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.history.contains(&self.displayed.url)
    }

    /// Build a request from the panels and hand it to the generator.
    /// Invalid input or a task already in flight leaves the status alone.
    pub fn submit(&mut self) {
        if self.task_status.is_active() {
            return;
        }
        let request = match self.mode {
            GenerationMode::Text => {
                GenerationRequest::text(self.prompt.clone(), self.params.clone())
            }
            GenerationMode::Image => GenerationRequest::image(
                PathBuf::from(self.image_path.trim()),
                self.params.clone(),
            ),
        };
        if self.generator.submit(request) {
            self.task_status = TaskStatus::processing(
                Some(progress::BASELINE),
                None,
                Some("Creating task".to_string()),
            );
        }
    }

    pub fn cancel(&mut self) {
        if self.generator.cancel() {
            self.task_status = TaskStatus::Idle;
        }
    }

    pub fn on_task_event(&mut self, ev: TaskEvent) {
        if ev.seq != self.generator.current_seq() {
            debug!("dropping event from stale task seq {}", ev.seq);
            return;
        }
        match ev.event {
            GenEvent::SessionExpired => {
                self.generator.task_finished(ev.seq);
                self.session_expired = true;
                self.should_quit = true;
            }
            GenEvent::Status(status) => {
                if status.is_terminal() {
                    self.generator.task_finished(ev.seq);
                }
                if let TaskStatus::Completed { model } = &status {
                    self.display_generated(model.clone());
                }
                self.task_status = status;
            }
        }
    }

    fn display_generated(&mut self, model: Model) {
        if let Some(old) = self.last_extracted.take() {
            if !self.history.contains(&old.to_string_lossy()) {
                let _ = std::fs::remove_file(&old);
            }
        }
        let path = PathBuf::from(&model.url);
        if path.starts_with(&self.models_dir) {
            self.last_extracted = Some(path);
        }
        self.displayed = model;
    }

    /// Swap the preview to a history or inspiration model. Ignored while a
    /// generation is in flight so the preview cannot change under the
    /// progress overlay.
    pub fn select_model(&mut self, model: Model) {
        if self.task_status.is_active() {
            return;
        }
        self.displayed = model;
        if self.task_status.is_terminal() {
            self.task_status = TaskStatus::Idle;
        }
    }

    pub fn save_displayed(&mut self) {
        let model = self.displayed.clone();
        if self.history.save(&model)
            && self
                .last_extracted
                .as_ref()
                .is_some_and(|p| p.to_string_lossy() == model.url)
        {
            // History owns the file now
            self.last_extracted = None;
        }
    }

    pub fn delete_displayed(&mut self) {
        let url = self.displayed.url.clone();
        if !self.history.remove(&url) {
            return;
        }
        let path = PathBuf::from(&url);
        if path.starts_with(&self.models_dir) {
            let _ = std::fs::remove_file(&path);
        }
        self.displayed = self.default_model.clone();
        self.history_cursor = self.history_cursor.min(self.history.len().saturating_sub(1));
    }

    pub fn toggle_mode(&mut self) {
        if self.task_status.is_active() {
            return;
        }
        self.mode = self.mode.toggled();
        self.prompt.clear();
        self.image_path.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('s') => self.save_displayed(),
                KeyCode::Char('d') => self.delete_displayed(),
                KeyCode::Char('t') => self.toggle_mode(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Esc => self.cancel(),
            code => match self.focus {
                Focus::Input => self.handle_input_key(code),
                Focus::Params => self.handle_params_key(code),
                Focus::History => self.handle_history_key(code),
                Focus::Inspiration => self.handle_inspiration_key(code),
            },
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => self.input_buffer().push(c),
            KeyCode::Backspace => {
                self.input_buffer().pop();
            }
            _ => {}
        }
    }

    fn input_buffer(&mut self) -> &mut String {
        match self.mode {
            GenerationMode::Text => &mut self.prompt,
            GenerationMode::Image => &mut self.image_path,
        }
    }

    fn handle_params_key(&mut self, code: KeyCode) {
        let negative_row = self.param_cursor == 6 && self.mode == GenerationMode::Text;
        match code {
            KeyCode::Up => self.param_cursor = self.param_cursor.saturating_sub(1),
            KeyCode::Down => self.param_cursor = (self.param_cursor + 1).min(PARAM_ROWS - 1),
            KeyCode::Left => self.adjust_param(-1),
            KeyCode::Right => self.adjust_param(1),
            KeyCode::Char(c) if negative_row => self.params.negative_prompt.push(c),
            KeyCode::Backspace if negative_row => {
                self.params.negative_prompt.pop();
            }
            KeyCode::Backspace if self.param_cursor == 7 => self.params.model_seed = None,
            KeyCode::Char(c) if self.param_cursor == 7 && c.is_ascii_digit() => {
                let digit = i64::from(c as u8 - b'0');
                let seed = self.params.model_seed.unwrap_or(0);
                self.params.model_seed = Some(seed.saturating_mul(10).saturating_add(digit));
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn adjust_param(&mut self, direction: i32) {
        match self.param_cursor {
            0 => self.params.face_limit = cycle(&FaceLimitPreset::all(), self.params.face_limit, direction),
            1 => self.params.texture = !self.params.texture,
            2 => {
                self.params.texture_quality =
                    cycle(&TextureQuality::all(), self.params.texture_quality, direction)
            }
            3 => {
                self.params.texture_alignment = cycle(
                    &TextureAlignment::all(),
                    self.params.texture_alignment,
                    direction,
                )
            }
            4 => self.params.style = cycle(&ModelStyle::all(), self.params.style, direction),
            5 => self.params.quad = !self.params.quad,
            // 6 is the negative prompt, edited by typing
            7 => {
                let seed = self.params.model_seed.unwrap_or(0);
                self.params.model_seed = Some(seed.saturating_add(i64::from(direction)));
            }
            _ => {}
        }
    }

    fn handle_history_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.history_cursor = self.history_cursor.saturating_sub(1),
            KeyCode::Down => {
                self.history_cursor =
                    (self.history_cursor + 1).min(self.history.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(entry) = self.history.entries().get(self.history_cursor) {
                    self.select_model(entry.model.clone());
                }
            }
            _ => {}
        }
    }

    fn handle_inspiration_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.inspiration_cursor = self.inspiration_cursor.saturating_sub(1),
            KeyCode::Down => {
                self.inspiration_cursor =
                    (self.inspiration_cursor + 1).min(self.inspiration.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(model) = self.inspiration.get(self.inspiration_cursor) {
                    self.select_model(model.clone());
                }
            }
            _ => {}
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i32) -> T {
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    let len = all.len() as i32;
    all[((index + direction).rem_euclid(len)) as usize]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use uuid::Uuid;

    use super::*;
    use crate::generator::testing::MockBackend;

    fn make_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let models_dir = std::env::temp_dir().join(format!("forma-app-{}", Uuid::new_v4()));
        let generator = Generator::new(
            Arc::new(MockBackend::new(vec![])),
            tx,
            Duration::from_secs(5),
            60,
            models_dir.clone(),
        );
        let history_path = models_dir.join("history.json");
        App::new(generator, HistoryStore::load(history_path), models_dir)
    }

    fn completed_event(url: &str) -> TaskEvent {
        TaskEvent::new(
            0,
            GenEvent::Status(TaskStatus::Completed {
                model: Model::new(url),
            }),
        )
    }

    #[test]
    fn test_selection_blocked_while_processing() {
        let mut app = make_app();
        let original = app.displayed.clone();
        app.task_status = TaskStatus::processing(Some(10), None, None);

        app.select_model(Model::new("https://x/other.glb"));
        assert_eq!(app.displayed, original);
    }

    #[test]
    fn test_selection_resets_stale_terminal_status() {
        let mut app = make_app();
        app.task_status = TaskStatus::failed("boom");

        app.select_model(Model::new("https://x/other.glb"));
        assert_eq!(app.displayed.url, "https://x/other.glb");
        assert_eq!(app.task_status, TaskStatus::Idle);
    }

    #[test]
    fn test_completed_event_replaces_display() {
        let mut app = make_app();
        app.on_task_event(completed_event("https://x/bear.glb"));
        assert_eq!(app.displayed.url, "https://x/bear.glb");
        assert!(app.task_status.is_terminal());
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let mut app = make_app();
        let before = app.displayed.clone();
        app.on_task_event(TaskEvent::new(
            7,
            GenEvent::Status(TaskStatus::failed("late")),
        ));
        assert_eq!(app.displayed, before);
        assert_eq!(app.task_status, TaskStatus::Idle);
    }

    #[test]
    fn test_delete_falls_back_to_default() {
        let mut app = make_app();
        let default = app.displayed.clone();
        app.on_task_event(completed_event("https://x/bear.glb"));
        app.save_displayed();
        assert!(app.is_saved());

        app.delete_displayed();
        assert!(!app.history.contains("https://x/bear.glb"));
        assert_eq!(app.displayed, default);
    }

    #[test]
    fn test_save_skips_bundled_models() {
        let mut app = make_app();
        app.save_displayed();
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_mode_toggle_clears_inputs_and_blocks_while_active() {
        let mut app = make_app();
        app.prompt = "a bear".to_string();
        app.toggle_mode();
        assert_eq!(app.mode, GenerationMode::Image);
        assert!(app.prompt.is_empty());

        app.image_path = "cat.png".to_string();
        app.task_status = TaskStatus::Unzipping;
        app.toggle_mode();
        assert_eq!(app.mode, GenerationMode::Image);
        assert_eq!(app.image_path, "cat.png");
    }

    #[test]
    fn test_session_expired_quits() {
        let mut app = make_app();
        app.on_task_event(TaskEvent::new(0, GenEvent::SessionExpired));
        assert!(app.session_expired);
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_sets_processing_immediately() {
        let mut app = make_app();
        app.prompt = "a brown bear".to_string();
        app.submit();
        assert!(matches!(
            app.task_status,
            TaskStatus::Processing { progress: Some(p), .. } if p == progress::BASELINE
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submit_leaves_status_unchanged() {
        let mut app = make_app();
        app.mode = GenerationMode::Image;
        app.image_path = String::new();
        app.submit();
        assert_eq!(app.task_status, TaskStatus::Idle);
    }

    #[test]
    fn test_negative_prompt_typed_on_its_params_row() {
        let mut app = make_app();
        app.focus = Focus::Params;
        app.param_cursor = 6;

        app.handle_params_key(KeyCode::Char('b'));
        app.handle_params_key(KeyCode::Char('l'));
        app.handle_params_key(KeyCode::Char('q'));
        assert_eq!(app.params.negative_prompt, "blq");
        assert!(!app.should_quit);

        app.handle_params_key(KeyCode::Backspace);
        assert_eq!(app.params.negative_prompt, "bl");

        // Text-mode only: in image mode the row is inert
        app.mode = GenerationMode::Image;
        app.handle_params_key(KeyCode::Char('x'));
        assert_eq!(app.params.negative_prompt, "bl");
    }

    #[test]
    fn test_seed_digits_on_seed_row() {
        let mut app = make_app();
        app.focus = Focus::Params;
        app.param_cursor = 7;

        app.handle_params_key(KeyCode::Char('4'));
        app.handle_params_key(KeyCode::Char('2'));
        assert_eq!(app.params.model_seed, Some(42));

        app.handle_params_key(KeyCode::Backspace);
        assert_eq!(app.params.model_seed, None);
    }

    #[test]
    fn test_param_cycling_wraps() {
        let mut app = make_app();
        app.param_cursor = 0;
        assert_eq!(app.params.face_limit, FaceLimitPreset::Low);
        app.adjust_param(-1);
        assert_eq!(app.params.face_limit, FaceLimitPreset::High);
        app.adjust_param(1);
        assert_eq!(app.params.face_limit, FaceLimitPreset::Low);
    }
}
