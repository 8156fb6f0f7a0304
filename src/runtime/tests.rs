use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::event_loop::{apply_command, handle_control_cmd};
use super::startup;
use crate::app::{App, Command};
use crate::audio::OutputPort;
use crate::config::{LibrarySettings, Settings};
use crate::error::{PlayerError, Result};
use crate::library::FsCatalog;
use crate::mpris::ControlCmd;
use crate::player::{Controller, PlaybackStatus};

#[derive(Debug, Default)]
struct RecordingPort {
    loads: Vec<PathBuf>,
    finished: bool,
}

impl OutputPort for RecordingPort {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.loads.push(path.to_path_buf());
        Ok(())
    }
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {}
    fn set_volume(&mut self, _level: u8) {}
    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// root/{a,b}.mp3 and root/sub/c.mp3. The files are empty, so titles fall
/// back to file stems.
fn library() -> (TempDir, FsCatalog, App) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"").unwrap();
    fs::write(dir.path().join("b.mp3"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("c.mp3"), b"").unwrap();

    let catalog = FsCatalog::new(LibrarySettings::default());
    let mut app = App::new(dir.path().to_path_buf(), 10);
    app.refresh(&catalog).unwrap();
    (dir, catalog, app)
}

fn controller() -> Controller<RecordingPort> {
    Controller::new(RecordingPort::default(), 50, 10)
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn selecting_a_song_adopts_its_folder_as_play_order() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();

    // 1 = sub/, 2 = a.mp3, 3 = b.mp3
    assert!(!apply_command(Command::Select(3), &mut app, &mut c, &catalog).unwrap());
    assert_eq!(c.state().status, PlaybackStatus::Playing);
    assert_eq!(c.state().current.as_ref().unwrap().title, "b");
    assert_eq!(c.order().len(), 2);
    assert!(app.order_is_current_dir());
}

#[test]
fn browsing_does_not_interrupt_playback() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();

    apply_command(Command::Select(1), &mut app, &mut c, &catalog).unwrap();
    assert!(app.current_dir.ends_with("sub"));
    assert_eq!(c.state().current.as_ref().unwrap().title, "a");

    // `>` still walks the folder the order came from.
    apply_command(Command::Next, &mut app, &mut c, &catalog).unwrap();
    assert_eq!(c.state().current.as_ref().unwrap().title, "b");
}

#[test]
fn selecting_from_another_folder_replaces_the_order() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();
    apply_command(Command::Select(1), &mut app, &mut c, &catalog).unwrap();

    // In sub/: 1 = .., 2 = c.mp3
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();
    assert_eq!(c.state().current.as_ref().unwrap().title, "c");
    assert_eq!(c.order().len(), 1);
    assert_eq!(names(&c.port().loads), vec!["a.mp3", "c.mp3"]);

    apply_command(Command::Select(1), &mut app, &mut c, &catalog).unwrap();
    assert!(app.at_root());
}

#[test]
fn song_added_after_the_order_was_built_can_be_selected() {
    let (dir, catalog, mut app) = library();
    let mut c = controller();
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();

    fs::write(dir.path().join("z.mp3"), b"").unwrap();
    apply_command(Command::Select(1), &mut app, &mut c, &catalog).unwrap();
    apply_command(Command::Select(1), &mut app, &mut c, &catalog).unwrap();
    assert!(app.at_root());

    // 1 = sub/, 2 = a.mp3, 3 = b.mp3, 4 = z.mp3
    apply_command(Command::Select(4), &mut app, &mut c, &catalog).unwrap();
    assert_eq!(c.state().current.as_ref().unwrap().title, "z");
    assert_eq!(c.order().len(), 3);
    assert_eq!(names(&c.port().loads), vec!["a.mp3", "z.mp3"]);
}

#[test]
fn enqueue_needs_a_song_number() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();

    let err = apply_command(Command::Enqueue(1), &mut app, &mut c, &catalog).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidInput(_)));

    apply_command(Command::Enqueue(3), &mut app, &mut c, &catalog).unwrap();
    assert_eq!(c.queue().len(), 1);
    assert!(app.message.as_deref().unwrap().contains("b"));

    apply_command(Command::ClearQueue, &mut app, &mut c, &catalog).unwrap();
    assert!(c.queue().is_empty());
}

#[test]
fn queued_song_plays_after_current_finishes() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();
    apply_command(Command::Enqueue(2), &mut app, &mut c, &catalog).unwrap();

    c.port_mut().finished = true;
    assert!(c.poll());
    assert_eq!(names(&c.port().loads), vec!["a.mp3", "a.mp3"]);
}

#[test]
fn quit_is_reported_from_any_state() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();
    assert!(apply_command(Command::Quit, &mut app, &mut c, &catalog).unwrap());

    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();
    apply_command(Command::TogglePause, &mut app, &mut c, &catalog).unwrap();
    assert_eq!(c.state().status, PlaybackStatus::Paused);
    assert!(apply_command(Command::Quit, &mut app, &mut c, &catalog).unwrap());
}

#[test]
fn out_of_range_selection_leaves_state_alone() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();

    let err = apply_command(Command::Select(9), &mut app, &mut c, &catalog).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidInput(_)));
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.port().loads.is_empty());
}

#[test]
fn control_commands_drive_the_controller() {
    let (_dir, catalog, mut app) = library();
    let mut c = controller();
    apply_command(Command::Select(2), &mut app, &mut c, &catalog).unwrap();

    assert!(!handle_control_cmd(ControlCmd::PlayPause, &mut c));
    assert_eq!(c.state().status, PlaybackStatus::Paused);
    assert!(!handle_control_cmd(ControlCmd::Play, &mut c));
    assert_eq!(c.state().status, PlaybackStatus::Playing);
    assert!(!handle_control_cmd(ControlCmd::Next, &mut c));
    assert_eq!(c.state().current.as_ref().unwrap().title, "b");
    assert!(!handle_control_cmd(ControlCmd::Prev, &mut c));
    assert_eq!(c.state().current.as_ref().unwrap().title, "a");
    assert!(!handle_control_cmd(ControlCmd::Stop, &mut c));
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(handle_control_cmd(ControlCmd::Quit, &mut c));
}

#[test]
fn music_folder_argument_beats_config() {
    let mut settings = Settings::default();
    settings.library.music_folder = PathBuf::from("/configured");

    assert_eq!(
        startup::resolve_music_folder(Some("/cli".to_string()), &settings),
        PathBuf::from("/cli")
    );
    assert_eq!(
        startup::resolve_music_folder(None, &settings),
        PathBuf::from("/configured")
    );
}

#[test]
fn shuffle_default_and_session_roundtrip_through_settings() {
    let mut settings = Settings::default();
    settings.playback.shuffle = true;
    let mut c = controller();

    startup::apply_playback_defaults(&mut c, &settings);
    assert!(c.state().shuffle);

    c.volume_up();
    c.toggle_shuffle();
    let dir = tempfile::tempdir().unwrap();
    let session = startup::session(&c, dir.path());
    assert_eq!(session.volume, 60);
    assert!(!session.shuffle);
    assert_eq!(session.music_folder, fs::canonicalize(dir.path()).unwrap());
}
