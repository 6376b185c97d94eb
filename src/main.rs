mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::{App, MenuItem};
use crate::state::app_settings::{AppSettings, SourceKind};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use phl_api::store::LeagueStore;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Instant;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    seed: bool,
    admin: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Run(CliOptions),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = match parse_cli_args(std::env::args().skip(1)) {
        Ok(CliCommand::Run(options)) => options,
        Ok(CliCommand::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliCommand::Version) => {
            println!("phltui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(arg) => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let mut settings = AppSettings::load();
    if options.seed {
        settings.source = SourceKind::Seed;
    }
    let store = LeagueStore::new(settings.data_source()?);
    let source_label = settings.source_label();

    let mut app = App::new(settings);
    info!("data source: {source_label}");
    if options.admin {
        app.update_tab(MenuItem::Admin);
    }
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(store, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Tick thread, expires notifications
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Trigger league load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    tick_task.abort();
    cleanup_terminal();

    Ok(())
}

/// `Err` carries the first argument that was not understood.
fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "--seed" => options.seed = true,
            "--admin" => options.admin = true,
            _ => return Err(arg),
        }
    }
    Ok(CliCommand::Run(options))
}

fn usage_text() -> &'static str {
    "phltui - PHL hockey league terminal client

Usage:
  phltui [--seed] [--admin]
  phltui --help
  phltui --version

Options:
  --seed      Use the built-in league snapshot (read-only)
  --admin     Start on the Admin tab

Environment:
  PHL_API_URL         Read API base (default http://127.0.0.1:8080)
  PHL_ADMIN_URL       Admin API base (default PHL_API_URL)
  PHL_SCORES_URL      Score entry endpoint (default PHL_API_URL/matches)
  PHL_ADMIN_ROUTING   path | query (default path)
  PHL_DATA_SOURCE     remote | seed (default remote)
  PHL_LOG             error | warn | info | debug | trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let app_guard = app.lock().await;
                    draw::draw(&mut terminal, &app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let app_guard = app.lock().await;
                    draw::draw(&mut terminal, &app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadLeague).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::Tick => app.lock().await.on_tick(Instant::now()),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::LeagueLoaded { league } => {
            app.lock().await.on_league_loaded(league);
        }
        NetworkResponse::LoadFailed { message } => {
            error!("League load failed: {message}");
            app.lock().await.on_load_failed(message);
        }
        NetworkResponse::MutationCommitted { mutation, league } => {
            app.lock().await.on_mutation_committed(mutation, league);
        }
        NetworkResponse::MutationFailed { mutation, message } => {
            app.lock().await.on_mutation_failed(mutation, message);
        }
        NetworkResponse::ReloadFailed { mutation, message } => {
            app.lock().await.on_reload_failed(mutation, message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where there is nobody to
/// report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
