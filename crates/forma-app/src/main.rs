mod app;
mod config;
mod error;
mod events;
mod extract;
mod generator;
mod history;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use futures::StreamExt;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::events::TaskEvent;
use crate::generator::Generator;
use crate::generator::backend::HttpBackend;
use crate::history::HistoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)?;
    init_logging(&config.log_path())?;
    info!("starting forma against {}", config.api_url);

    let backend = Arc::new(HttpBackend::new(
        config.api_url.clone(),
        config.token.clone(),
    ));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let generator = Generator::new(
        backend,
        tx,
        config.poll_interval,
        config.max_polls,
        config.models_dir(),
    );
    let history = HistoryStore::load(config.history_path());
    let mut app = App::new(generator, history, config.models_dir());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.session_expired {
        eprintln!("Session expired: set a fresh FORMA_TOKEN and restart.");
    }
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<TaskEvent>,
) -> anyhow::Result<()> {
    let mut input = EventStream::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            maybe = rx.recv() => {
                if let Some(ev) = maybe {
                    app.on_task_event(ev);
                }
            }
            maybe = input.next() => {
                match maybe {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
