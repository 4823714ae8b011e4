use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use digital_timer::{
    app::{App, Settings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, EventSource, Runner, Scheduler, ThreadScheduler},
    timer::TimerWidget,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// Upper bound on how long the loop blocks waiting for input or ticks
const POLL_INTERVAL_MS: u64 = 250;

/// digital countdown timer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A digital countdown timer for the terminal. Start or pause it, reset it, and adjust the limit in whole minutes before it starts counting."
)]
pub struct Cli {
    /// config file to read (default: platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// file to write logs to (default: ~/.local/state/digital-timer/digital-timer.log)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// hide the key hints footer
    #[clap(long)]
    no_hints: bool,

    /// do not capture the mouse; controls are then keyboard-only
    #[clap(long)]
    no_mouse: bool,
}

impl Cli {
    /// Flags override the config file
    fn settings(&self, config: &Config) -> Settings {
        let mut settings = Settings::from(config);
        if self.no_hints {
            settings.key_hints = false;
        }
        if self.no_mouse {
            settings.mouse = false;
        }
        settings
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let config = store.load();
    let settings = cli.settings(&config);

    match cli.log_file.clone().or_else(AppDirs::log_path) {
        Some(path) if logging::init(&path, &config.log_filter) => {
            info!(config = %store.path().display(), ?settings, "starting digital-timer");
        }
        _ => {}
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if settings.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let scheduler = ThreadScheduler::new(events.sender());
    let mut app = App::new(TimerWidget::new(scheduler), settings);
    let runner = Runner::new(events, Duration::from_millis(POLL_INTERVAL_MS));

    let result = start_tui(&mut terminal, &mut app, &runner);
    if let Err(e) = &result {
        warn!(error = %e, "event loop failed");
    }
    app.teardown();

    disable_raw_mode()?;
    if settings.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("exiting");

    result
}

fn start_tui<B: Backend, E: EventSource, S: Scheduler>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        let Some(event) = runner.step() else {
            continue;
        };

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if app.handle_event(event, area) {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
