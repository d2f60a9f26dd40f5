// Native binary for neowatch - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use neowatch::{
    apod, config::{load, Config}, dates::today_local, highlights, neo_api,
    prefs::{save_unit, FileStore, UnitStore},
    ui, App, InputMode, LoadTicket, PanelEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; redirect it when running the TUI (RUST_LOG=debug 2>neowatch.log)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = load().context("Failed to load configuration")?;
    log::info!("neowatch starting (feed {})", cfg.neo_feed_url);
    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let mut store = FileStore::open(&cfg.prefs_path);
    log::debug!("Unit preference file: {}", store.path().display());
    if let Some(units) = cfg.units {
        save_unit(&mut store, units);
    }

    if cfg.plain {
        return run_plain(&cfg, Box::new(store)).await;
    }

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (tx, rx) = unbounded_channel::<PanelEvent>();
    let mut app = App::new(Box::new(store), cfg.date.clone(), cfg.highlights);

    let first = app.load_initial();
    spawn_neo_fetch(&cfg, first, tx.clone());
    if cfg.highlights {
        spawn_extras(&cfg, tx.clone());
    }

    // main loop
    let result = run_loop(&mut app, &mut terminal, &cfg, rx, tx).await;

    // cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// Fetch once, print the panel (and highlights) as text, exit.
async fn run_plain(cfg: &Config, store: Box<dyn UnitStore>) -> Result<()> {
    let mut panel = neowatch::NeoPanel::new(store, cfg.date.clone());
    let ticket = panel.refresh();
    let result = neo_api::fetch_neo_feed(&cfg.neo_feed_url, &cfg.nasa_api_key, &ticket.date).await;
    panel.finish_load(&ticket, result);

    let items = if cfg.highlights {
        Some(highlights::build_highlights(cfg, &today_local()).await)
    } else {
        None
    };

    for line in ui::plain_lines(&panel.snapshot(), items.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

fn spawn_neo_fetch(cfg: &Config, ticket: LoadTicket, tx: UnboundedSender<PanelEvent>) {
    let endpoint = cfg.neo_feed_url.clone();
    let key = cfg.nasa_api_key.clone();
    tokio::spawn(async move {
        let result = neo_api::fetch_neo_feed(&endpoint, &key, &ticket.date).await;
        if tx.send(PanelEvent::NeoFeed { ticket, result }).is_err() {
            log::debug!("UI gone before NeoWs fetch finished");
        }
    });
}

fn spawn_extras(cfg: &Config, tx: UnboundedSender<PanelEvent>) {
    let cfg_hl = cfg.clone();
    let tx_hl = tx.clone();
    tokio::spawn(async move {
        let items = highlights::build_highlights(&cfg_hl, &today_local()).await;
        let _ = tx_hl.send(PanelEvent::Highlights(items));
    });

    let apod_url = cfg.apod_url.clone();
    let key = cfg.nasa_api_key.clone();
    tokio::spawn(async move {
        let result = apod::fetch_apod(&apod_url, &key).await;
        let _ = tx.send(PanelEvent::Apod(result));
    });
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: &Config,
    mut rx: UnboundedReceiver<PanelEvent>,
    tx: UnboundedSender<PanelEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(cfg.render_fps) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    if let Some(ticket) = handle_key(app, k) {
                        spawn_neo_fetch(cfg, ticket, tx.clone());
                    }
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

/// Returns the NeoWs fetch to start, if the key triggered one.
fn handle_key(app: &mut App, k: KeyEvent) -> Option<LoadTicket> {
    if app.input_mode() == InputMode::DateEdit {
        match k.code {
            KeyCode::Char(c) => app.date_add_char(c),
            KeyCode::Backspace => app.date_backspace(),
            KeyCode::Enter => return app.apply_date_edit(),
            KeyCode::Esc => app.cancel_date_edit(),
            _ => {}
        }
        return None;
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.request_quit();
            None
        }
        (KeyCode::Char('r'), _) | (KeyCode::F(5), _) => Some(app.refresh()),
        (KeyCode::Char('['), _) | (KeyCode::Left, _) => Some(app.shift_day(-1)),
        (KeyCode::Char(']'), _) | (KeyCode::Right, _) => Some(app.shift_day(1)),
        (KeyCode::Char('t'), _) => Some(app.jump_today()),
        (KeyCode::Char('d'), _) | (KeyCode::Char('/'), _) => {
            app.start_date_edit();
            None
        }
        (KeyCode::Char('u'), _) => app.toggle_unit(),
        (KeyCode::Char('m'), _) => app.select_unit(neowatch::UnitPreference::Metric),
        (KeyCode::Char('i'), _) => app.select_unit(neowatch::UnitPreference::Imperial),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            app.up();
            None
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            app.down();
            None
        }
        _ => None,
    }
}
