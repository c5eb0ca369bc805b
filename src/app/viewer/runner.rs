use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};

use crate::args::ViewArgs;
use crate::error::AppResult;
use crate::track::load_dataset;
use crate::ui::{TerminalGuard, Ui, UiActions};

use super::session::{ViewerOptions, ViewerSession, action_for_key};

/// Upper bound on how long the loop sleeps between input checks.
const UI_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Non-blocking poll interval for keyboard events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(0);

/// True when the viewer should draw the interactive terminal UI.
pub(crate) fn is_interactive(args: &ViewArgs) -> bool {
    io::stdout().is_terminal() && !args.no_ui
}

pub(crate) async fn run_view(args: &ViewArgs) -> AppResult<()> {
    let options = ViewerOptions::from_args(args)?;
    let dataset = load_dataset(&args.data_dir)?;
    let mut session = ViewerSession::new(dataset, options)?;

    if !is_interactive(args) {
        return render_once(&session, args.image_out.is_some());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handle = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_handle.store(true, Ordering::SeqCst);
        }
    });

    let mut terminal = Ui::setup_terminal()?;
    let _guard = TerminalGuard;
    let mut dirty = true;

    loop {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        if event::poll(EVENT_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = action_for_key(key.code)
        {
            if !session.apply(action, Instant::now()) {
                break;
            }
            dirty = true;
        }

        if session.tick_if_due(Instant::now()) {
            dirty = true;
        }

        if dirty {
            if let Err(err) = Ui::render(&mut terminal, &session.ui_data()) {
                warn!("Render failed: {}", err);
                session.report_render_error(&err);
            }
            dirty = false;
        }

        let wait = session.deadline().map_or(UI_POLL_INTERVAL, |deadline| {
            deadline
                .saturating_duration_since(Instant::now())
                .min(UI_POLL_INTERVAL)
        });
        tokio::time::sleep(wait).await;
    }

    info!("Viewer closed");
    Ok(())
}

/// Prints the statistics of the initial view and writes the map document,
/// plus the image when one was requested.
pub(crate) fn render_once(session: &ViewerSession, export_image: bool) -> AppResult<()> {
    for line in session.summary_lines() {
        println!("{line}");
    }
    if session.view().is_empty() {
        warn!("Nothing to render for {}", session.view().subject());
        return Ok(());
    }
    let map_path = session.write_map()?;
    println!("Map: {}", map_path.display());
    if export_image {
        let image_path = session.export_image()?;
        println!("Image: {}", image_path.display());
    }
    Ok(())
}
