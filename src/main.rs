//! caper - movie and TV detail pages in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch the interactive detail page
//! caper open movie 438631
//!
//! # Print it once (JSON when piped)
//! caper info tv 94605 --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use caper::api::ShowFetcher;
use caper::app::{dispatch, App};
use caper::cli::{Cli, Command, ExitCode, OpenCmd, Output};
use caper::commands;
use caper::config::Config;
use caper::logging::{self, LogTarget, Verbosity};
use caper::title::{DocumentTitle, TerminalTitle};
use caper::ui;
use caper::ui::detail::derive_fetch_key;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new(&cli);
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error).into(),
    };

    let code = match cli.command {
        Command::Open(cmd) => {
            let log_path = config.log_path();
            let target = match log_path.as_deref() {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Off,
            };
            if let Err(e) = logging::init(verbosity, target) {
                output.info(format!("Logging disabled: {:#}", e));
            }

            match run_tui(cmd, &config).await {
                Ok(()) => ExitCode::Success,
                Err(e) => output.error(format!("{:#}", e), ExitCode::Error),
            }
        }
        Command::Info(cmd) => {
            if let Err(e) = logging::init(verbosity, LogTarget::Stderr) {
                output.info(format!("Logging disabled: {:#}", e));
            }
            commands::info_cmd(cmd, &config, &output).await
        }
    };

    code.into()
}

// =============================================================================
// Terminal Setup
// =============================================================================

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// =============================================================================
// Event Loop
// =============================================================================

async fn run_tui(cmd: OpenCmd, config: &Config) -> Result<()> {
    let fetcher: Arc<dyn ShowFetcher> = Arc::new(commands::tmdb_client(config)?);
    let route = derive_fetch_key(&cmd.route.category, &cmd.route.id);
    info!(route = %route, "opening detail page");

    let mut terminal = init_terminal()?;
    let title = DocumentTitle::with_sink(TerminalTitle);
    let mut app = App::with_ttl(route, title, config.cache_ttl());

    let result = run_event_loop(&mut terminal, &mut app, fetcher).await;

    // Restores the default title even when the loop failed
    app.quit();
    restore_terminal(&mut terminal)?;

    result
}

async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    fetcher: Arc<dyn ShowFetcher>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut last_tick = Instant::now();

    while app.running {
        for request in app.take_requests() {
            dispatch(fetcher.clone(), request, tx.clone());
        }
        while let Ok(outcome) = rx.try_recv() {
            app.handle_outcome(outcome);
        }
        app.sync_effects();

        terminal.draw(|frame| ui::render(frame, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
