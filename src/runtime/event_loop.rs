use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, Command, Entry};
use crate::audio::OutputPort;
use crate::config;
use crate::error::Result;
use crate::library::Catalog;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Controller, PlaybackStatus};
use crate::runtime::mpris_sync::{MprisSnapshot, update_mpris};
use crate::ui;

/// Main terminal event loop: completion polling, drawing, MPRIS commands and
/// keyboard input, one at a time. Returns `Ok(())` when quit is requested.
pub fn run<P: OutputPort, C: Catalog>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller<P>,
    catalog: &C,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut last_mpris = MprisSnapshot::default();

    loop {
        controller.poll();
        surface_failures(app, controller);
        update_mpris(mpris, controller, &mut last_mpris);

        terminal.draw(|f| ui::draw(f, app, controller, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
            surface_failures(app, controller);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, controller, catalog) {
                    break;
                }
                surface_failures(app, controller);
            }
        }
    }

    Ok(())
}

/// Apply one MPRIS command. Returns true on quit.
pub(crate) fn handle_control_cmd<P: OutputPort>(cmd: ControlCmd, controller: &mut Controller<P>) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => controller.play(),
        ControlCmd::Pause => controller.pause(),
        ControlCmd::PlayPause => match controller.state().status {
            PlaybackStatus::Stopped => controller.play(),
            _ => controller.toggle_pause(),
        },
        ControlCmd::Stop => controller.stop(),
        ControlCmd::Next => controller.next(),
        ControlCmd::Prev => controller.previous(),
    }
    false
}

/// Returns true on quit.
fn handle_key_event<P: OutputPort, C: Catalog>(
    key: KeyEvent,
    app: &mut App,
    controller: &mut Controller<P>,
    catalog: &C,
) -> bool {
    let buffer_empty = app.input.is_empty();

    let line = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char(c) if buffer_empty && matches!(c, '+' | '-' | '<' | '>' | ' ') => {
            c.to_string()
        }
        KeyCode::Char(c) => {
            app.push_input(c);
            return false;
        }
        KeyCode::Backspace => {
            app.pop_input();
            return false;
        }
        KeyCode::Esc => {
            app.take_input();
            return false;
        }
        KeyCode::Enter => app.take_input(),
        _ => return false,
    };

    if line.trim().is_empty() && line != " " {
        return false;
    }

    app.clear_message();
    match Command::parse(&line).and_then(|cmd| apply_command(cmd, app, controller, catalog)) {
        Ok(quit) => quit,
        Err(e) => {
            debug!(input = %line, error = %e, "command rejected");
            app.set_message(e.to_string());
            false
        }
    }
}

/// Apply one parsed command. Returns `Ok(true)` on quit.
pub(crate) fn apply_command<P: OutputPort, C: Catalog>(
    cmd: Command,
    app: &mut App,
    controller: &mut Controller<P>,
    catalog: &C,
) -> Result<bool> {
    match cmd {
        Command::Quit => return Ok(true),
        Command::Select(n) => match app.select_by_number(n)? {
            Entry::Parent => app.go_parent(catalog)?,
            Entry::Folder(dir) => app.enter(dir, catalog)?,
            Entry::Track(i) => {
                let track = app.tracks[i].clone();
                let stale = controller.order().tracks() != app.tracks.as_slice();
                if stale || !app.order_is_current_dir() {
                    controller.set_tracks(app.tracks.clone())?;
                    app.order_dir = Some(app.current_dir.clone());
                    info!(dir = %app.current_dir.display(), "play order replaced");
                }
                controller.select_track(&track)?;
            }
        },
        Command::Enqueue(n) => {
            let track = app.resolve_track(n)?.clone();
            app.set_message(format!("Queued: {}", track.display));
            controller.enqueue(track);
        }
        Command::ClearQueue => {
            controller.clear_queue();
            app.set_message("Queue cleared");
        }
        Command::VolumeUp => controller.volume_up(),
        Command::VolumeDown => controller.volume_down(),
        Command::Next => controller.next(),
        Command::Previous => controller.previous(),
        Command::ToggleShuffle => {
            let on = controller.toggle_shuffle();
            app.set_message(if on { "Shuffle on" } else { "Shuffle off" });
        }
        Command::ShuffleNow => {
            controller.shuffle_now();
            app.set_message("Play order reshuffled");
        }
        Command::TogglePause => controller.toggle_pause(),
        Command::NextPage => app.next_page(),
        Command::PrevPage => app.prev_page(),
    }
    Ok(false)
}

/// Move playback errors from the controller into the message line.
fn surface_failures<P: OutputPort>(app: &mut App, controller: &mut Controller<P>) {
    if let Some(last) = controller.take_failures().pop() {
        app.set_message(last.to_string());
    }
}
