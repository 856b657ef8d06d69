//! Library search entry point.

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use libsearch_core::QueryParams;
use libsearch_tui::api_client::RestClient;
use libsearch_tui::config::TuiConfig;
use libsearch_tui::controller::{InviewEvent, SearchResultsController, SearchSettings, VisibleCard};
use libsearch_tui::error::TuiError;
use libsearch_tui::events::TuiEvent;
use libsearch_tui::keys::{map_key, Action};
use libsearch_tui::logging::{init_logging, LogTarget};
use libsearch_tui::nav::{ChannelNavigator, Location, NavError, Navigator, Route};
use libsearch_tui::notifications::NotificationLevel;
use libsearch_tui::player::RoutePlayer;
use libsearch_tui::runtime::{spawn_input_reader, spawn_search};
use libsearch_tui::state::App;
use libsearch_tui::views::{render_view, results_viewport_rows};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "libsearch", version, about = "Browse library content search results")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "LIBSEARCH_CONFIG")]
    config: PathBuf,

    /// Page to open.
    #[arg(long)]
    page: Option<u32>,

    /// Full search location, e.g. `/search/Library/2?board=CBSE`.
    #[arg(long, conflicts_with_all = ["page", "query"])]
    location: Option<String>,

    /// Run one search, print the page as JSON and exit.
    #[arg(long)]
    once: bool,

    /// Query parameters as `key=value`; repeat a key for multiple values.
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let cli = Cli::parse();
    let config = TuiConfig::load(&cli.config)?;

    let target = if cli.once {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.error_log_path.clone())
    };
    init_logging(&target)?;

    let route = match &cli.location {
        Some(location) => Location::parse_search(location)?,
        None => Route {
            page_param: cli.page.map(|page| page.to_string()),
            query_params: QueryParams::parse_pairs(&cli.query)?,
        },
    };

    let backend = Arc::new(RestClient::new(&config)?);
    tracing::info!(url = %route.url(), backend = backend.search_url(), "library search starting");

    if cli.once {
        run_once(config, backend, &route).await
    } else {
        run_tui(config, backend, &route).await
    }
}

/// Navigator for one-shot runs, where there is nowhere to go.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, location: Location) -> Result<(), NavError> {
        tracing::info!(url = %location.url(), "navigation requested");
        Ok(())
    }
}

async fn run_once(config: TuiConfig, backend: Arc<RestClient>, route: &Route) -> Result<(), TuiError> {
    let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
    let player = Arc::new(RoutePlayer::new(navigator.clone()));
    let (mut controller, pending) =
        SearchResultsController::init(SearchSettings::from(&config), navigator, player, route);
    controller.run_search(backend.as_ref(), pending).await;

    let state = controller.state();
    if !state.no_result {
        let inview = state
            .search_list
            .iter()
            .enumerate()
            .map(|(index, card)| VisibleCard::from_card(index, card))
            .collect();
        controller.on_card_visible(&InviewEvent { inview });
    }

    let state = controller.state();
    let output = serde_json::json!({
        "page": state.page,
        "totalCount": state.total_count,
        "noResult": state.no_result,
        "noResultMessage": state.no_result_message,
        "pager": state.pager,
        "cards": state.search_list,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    tracing::info!(impression = %serde_json::to_string(controller.impression().as_ref())?, "page exit");
    Ok(())
}

async fn run_tui(config: TuiConfig, backend: Arc<RestClient>, route: &Route) -> Result<(), TuiError> {
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let navigator: Arc<dyn Navigator> = Arc::new(ChannelNavigator::new(event_tx.clone()));
    let player = Arc::new(RoutePlayer::new(navigator.clone()));
    let (controller, pending) =
        SearchResultsController::init(SearchSettings::from(&config), navigator, player, route);
    let mut app = App::new(config, controller);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    spawn_search(backend.clone(), pending, event_tx.clone());
    spawn_input_reader(event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        let size = terminal.size()?;
        app.set_viewport_rows(results_viewport_rows(size.height));
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.prune_notifications();
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, &backend, &event_tx, event) {
                    break;
                }
                app.report_visible();
            }
        }
    }

    let impression = app.controller.impression();
    tracing::info!(impression = %serde_json::to_string(impression.as_ref())?, "page exit");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

/// Returns true when the app should exit.
fn handle_event(
    app: &mut App,
    backend: &Arc<RestClient>,
    sender: &mpsc::Sender<TuiEvent>,
    event: TuiEvent,
) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key) {
                return handle_action(app, action);
            }
        }
        TuiEvent::Navigate(Location::Search(route)) => {
            let pending = app.controller.on_route_change(&route);
            app.reset_selection();
            spawn_search(backend.clone(), pending, sender.clone());
        }
        TuiEvent::Navigate(Location::Other(path)) => {
            app.controller
                .notify(NotificationLevel::Info, format!("Opened {}", path));
            app.location = Some(path);
        }
        TuiEvent::SearchCompleted { generation, outcome } => {
            app.controller.complete(generation, outcome);
            app.clamp_selection();
        }
        TuiEvent::Resize { .. } => {}
    }
    false
}

fn handle_action(app: &mut App, action: Action) -> bool {
    match action {
        Action::Quit => return true,
        Action::Close => {
            if let Err(err) = app.controller.close() {
                tracing::warn!(error = %err, "close navigation dropped");
            }
            return true;
        }
        Action::MoveDown => app.select_next(),
        Action::MoveUp => app.select_previous(),
        Action::NextPage => {
            app.next_page();
        }
        Action::PrevPage => {
            app.previous_page();
        }
        Action::JumpToStrip(index) => {
            app.jump_to_strip(index);
        }
        Action::Play => app.play_selected(),
        Action::Dismiss => app.controller.dismiss_notifications(),
    }
    false
}
