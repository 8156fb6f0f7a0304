use std::env;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioOutput;
use crate::library::FsCatalog;
use crate::mpris::ControlCmd;
use crate::player::Controller;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

/// Start the player and block until the user quits.
///
/// Errors returned here are fatal startup failures (no audio device, missing
/// music folder) or terminal I/O errors.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings.logging);
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let root = startup::resolve_music_folder(env::args().nth(1), &settings);

    let output = RodioOutput::open(settings.playback.volume)?;
    let mut controller = Controller::new(
        output,
        settings.playback.volume,
        settings.playback.volume_step,
    );
    startup::apply_playback_defaults(&mut controller, &settings);

    let catalog = FsCatalog::new(settings.library.clone());
    let mut app = App::new(root.clone(), settings.ui.page_size);
    app.refresh(&catalog)?;
    info!(root = %root.display(), tracks = app.tracks.len(), "library opened");

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &catalog,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller
        .port_mut()
        .fade_out(Duration::from_millis(settings.audio.quit_fade_out_ms));

    match startup::session(&controller, &root).save() {
        Ok(path) => info!(path = %path.display(), "session saved"),
        Err(e) => warn!(error = %e, "failed to save session"),
    }

    info!("shutdown");
    run_result
}
