use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::audio::OutputPort;
use crate::error::{PlayerError, Result};
use crate::library::Track;

/// Records every call; paths in `failing` refuse to load.
#[derive(Debug, Default)]
struct MockPort {
    loads: Vec<PathBuf>,
    failing: HashSet<PathBuf>,
    loaded: Option<PathBuf>,
    playing: bool,
    finished: bool,
    volume: u8,
}

impl OutputPort for MockPort {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.stop();
        self.loads.push(path.to_path_buf());
        if self.failing.contains(path) {
            return Err(PlayerError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "corrupt".to_string(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.finished = false;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = self.loaded.is_some();
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) {
        self.play();
    }

    fn stop(&mut self) {
        self.loaded = None;
        self.playing = false;
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

fn track(name: &str, index: usize) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}.mp3")),
        title: name.to_string(),
        artist: None,
        album: None,
        duration: None,
        index,
        display: name.to_string(),
    }
}

fn tracks(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| track(n, i))
        .collect()
}

fn controller(names: &[&str]) -> Controller<MockPort> {
    let mut c = Controller::new(MockPort::default(), 50, 10);
    c.set_tracks(tracks(names)).unwrap();
    c
}

fn current_title(c: &Controller<MockPort>) -> Option<&str> {
    c.state().current.as_ref().map(|t| t.title.as_str())
}

// ---- play order ----

#[test]
fn shuffle_on_then_off_restores_catalog_order() {
    let mut order = PlayOrder::new();
    order.set_tracks(tracks(&["a", "b", "c", "d", "e", "f"]));
    let mut rng = StdRng::seed_from_u64(7);

    assert!(order.toggle_shuffle_with(&mut rng));
    assert!(!order.toggle_shuffle_with(&mut rng));

    let played: Vec<&Track> = order.iter().collect();
    let catalog: Vec<&Track> = order.tracks().iter().collect();
    assert_eq!(played, catalog);
}

#[test]
fn reshuffle_now_keeps_the_flag() {
    let mut order = PlayOrder::new();
    order.set_tracks(tracks(&["a", "b", "c"]));

    order.reshuffle_now();
    assert!(!order.is_shuffled());

    order.toggle_shuffle();
    order.reshuffle_now();
    assert!(order.is_shuffled());
    assert_eq!(order.len(), 3);
}

#[test]
fn next_and_previous_stop_at_the_edges() {
    let mut order = PlayOrder::new();
    assert_eq!(order.next(0), None);
    assert_eq!(order.previous(0), None);
    assert_eq!(order.get(0), None);

    order.set_tracks(tracks(&["solo"]));
    assert_eq!(order.next(0), None);
    assert_eq!(order.previous(0), None);

    order.set_tracks(tracks(&["a", "b", "c"]));
    assert_eq!(order.next(0), Some(1));
    assert_eq!(order.next(2), None);
    assert_eq!(order.previous(2), Some(1));
    assert_eq!(order.previous(0), None);
    assert_eq!(order.previous(9), None);
}

#[test]
fn index_of_matches_by_path() {
    let mut order = PlayOrder::new();
    order.set_tracks(tracks(&["a", "b", "c"]));

    let mut b = track("b", 42);
    b.title = "retagged".to_string();
    assert_eq!(order.index_of(&b), Some(1));
    assert_eq!(order.index_of(&track("z", 0)), None);
}

proptest! {
    #[test]
    fn shuffle_never_drops_or_duplicates_tracks(n in 0usize..64, seed in any::<u64>()) {
        let names: Vec<String> = (0..n).map(|i| format!("{i:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut order = PlayOrder::new();
        order.set_tracks(tracks(&refs));

        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert!(order.toggle_shuffle_with(&mut rng));

        let mut shuffled: Vec<PathBuf> = order.iter().map(|t| t.path.clone()).collect();
        let mut catalog: Vec<PathBuf> = order.tracks().iter().map(|t| t.path.clone()).collect();
        shuffled.sort();
        catalog.sort();
        prop_assert_eq!(shuffled, catalog);
    }
}

// ---- queue ----

#[test]
fn queue_is_fifo() {
    let mut q = Queue::new();
    q.add(track("a", 0));
    q.add(track("b", 1));
    q.add(track("a", 0));
    assert_eq!(q.len(), 3);
    assert_eq!(q.peek_front().map(|t| t.title.as_str()), Some("a"));

    assert_eq!(q.pop_front().map(|t| t.title), Some("a".to_string()));
    assert_eq!(q.pop_front().map(|t| t.title), Some("b".to_string()));
    assert_eq!(q.pop_front().map(|t| t.title), Some("a".to_string()));
    assert_eq!(q.pop_front(), None);
    assert!(q.is_empty());
}

#[test]
fn queue_clear_empties_it() {
    let mut q = Queue::new();
    q.add(track("a", 0));
    q.clear();
    assert!(q.is_empty());
    assert_eq!(q.peek_front(), None);
}

// ---- controller ----

#[test]
fn starts_stopped_with_configured_volume() {
    let c = Controller::new(MockPort::default(), 70, 10);
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert_eq!(c.state().volume, 70);
    assert_eq!(c.port().volume, 70);
    assert!(c.state().current.is_none());
    assert!(!c.state().shuffle);
}

#[test]
fn select_plays_the_track_and_sets_cursor() {
    let mut c = controller(&["a", "b", "c"]);
    c.select_track(&track("b", 1)).unwrap();

    assert_eq!(c.state().status, PlaybackStatus::Playing);
    assert_eq!(current_title(&c), Some("b"));
    assert_eq!(c.state().cursor, Some(1));
    assert!(c.port().playing);
}

#[test]
fn selecting_an_unknown_track_is_not_found() {
    let mut c = controller(&["a", "b"]);
    let err = c.select_track(&track("zz", 0)).unwrap_err();
    assert!(matches!(err, PlayerError::NotFound(_)));
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.port().loads.is_empty());
}

#[test]
fn play_from_stopped_starts_at_the_top() {
    let mut c = controller(&["a", "b"]);
    c.play();
    assert_eq!(current_title(&c), Some("a"));
    assert_eq!(c.state().cursor, Some(0));

    let mut empty = Controller::new(MockPort::default(), 50, 10);
    empty.play();
    assert_eq!(empty.state().status, PlaybackStatus::Stopped);
}

#[test]
fn next_prefers_the_queue_and_keeps_the_cursor() {
    let mut c = controller(&["a", "b", "c"]);
    c.select_track(&track("a", 0)).unwrap();
    c.enqueue(track("elsewhere", 0));

    c.next();
    assert_eq!(current_title(&c), Some("elsewhere"));
    assert_eq!(c.state().cursor, Some(0));
    assert!(c.queue().is_empty());

    c.next();
    assert_eq!(current_title(&c), Some("b"));
    assert_eq!(c.state().cursor, Some(1));
}

#[test]
fn next_at_the_end_with_empty_queue_stops() {
    let mut c = controller(&["a", "b", "c"]);
    c.select_track(&track("c", 2)).unwrap();

    c.next();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());
    assert_eq!(c.state().cursor, Some(2));
    assert!(c.port().loaded.is_none());
}

#[test]
fn volume_is_clamped_to_0_and_100() {
    let mut c = Controller::new(MockPort::default(), 95, 10);
    for _ in 0..5 {
        c.volume_up();
    }
    assert_eq!(c.state().volume, 100);
    assert_eq!(c.port().volume, 100);

    for _ in 0..15 {
        c.volume_down();
    }
    assert_eq!(c.state().volume, 0);
    assert_eq!(c.port().volume, 0);
}

#[test]
fn pause_and_play_round_trip_keeps_track_and_cursor() {
    let mut c = controller(&["a", "b"]);
    c.select_track(&track("b", 1)).unwrap();

    c.pause();
    assert_eq!(c.state().status, PlaybackStatus::Paused);
    assert!(!c.port().playing);

    c.play();
    assert_eq!(c.state().status, PlaybackStatus::Playing);
    assert!(c.port().playing);
    assert_eq!(current_title(&c), Some("b"));
    assert_eq!(c.state().cursor, Some(1));
    assert_eq!(c.port().loads.len(), 1);
}

#[test]
fn toggle_pause_flips_and_ignores_stopped() {
    let mut c = controller(&["a"]);
    c.toggle_pause();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.port().loads.is_empty());

    c.play();
    c.toggle_pause();
    assert_eq!(c.state().status, PlaybackStatus::Paused);
    c.toggle_pause();
    assert_eq!(c.state().status, PlaybackStatus::Playing);
}

#[test]
fn all_tracks_failing_gives_exactly_one_attempt_each() {
    let mut port = MockPort::default();
    for name in ["a", "b", "c"] {
        port.failing.insert(PathBuf::from(format!("/music/{name}.mp3")));
    }
    let mut c = Controller::new(port, 50, 10);
    c.set_tracks(tracks(&["a", "b", "c"])).unwrap();

    c.play();
    assert_eq!(c.port().loads.len(), 3);
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());

    let failures = c.take_failures();
    assert_eq!(failures.len(), 3);
    assert!(failures.iter().all(|e| matches!(e, PlayerError::Playback { .. })));
    assert!(c.take_failures().is_empty());
}

#[test]
fn a_failing_selection_skips_to_the_next_track() {
    let mut port = MockPort::default();
    port.failing.insert(PathBuf::from("/music/b.mp3"));
    let mut c = Controller::new(port, 50, 10);
    c.set_tracks(tracks(&["a", "b", "c"])).unwrap();

    c.select_track(&track("b", 1)).unwrap();
    assert_eq!(current_title(&c), Some("c"));
    assert_eq!(c.state().cursor, Some(2));
    assert_eq!(c.take_failures().len(), 1);
}

#[test]
fn a_failing_queued_track_is_consumed_and_skipped() {
    let mut port = MockPort::default();
    port.failing.insert(PathBuf::from("/music/bad.mp3"));
    let mut c = Controller::new(port, 50, 10);
    c.set_tracks(tracks(&["a", "b"])).unwrap();
    c.enqueue(track("bad", 0));
    c.enqueue(track("good", 0));

    c.play();
    assert_eq!(current_title(&c), Some("good"));
    assert!(c.queue().is_empty());
    assert_eq!(c.state().cursor, None);
}

#[test]
fn failures_across_queue_and_order_try_every_track_once() {
    let mut port = MockPort::default();
    for name in ["q1", "q2", "a", "b"] {
        port.failing.insert(PathBuf::from(format!("/music/{name}.mp3")));
    }
    let mut c = Controller::new(port, 50, 10);
    c.set_tracks(tracks(&["a", "b", "c"])).unwrap();
    c.enqueue(track("q1", 0));
    c.enqueue(track("q2", 0));

    c.play();
    assert_eq!(current_title(&c), Some("c"));
    assert_eq!(c.state().cursor, Some(2));
    let loaded: Vec<PathBuf> = c.port().loads.clone();
    assert_eq!(
        loaded,
        ["q1", "q2", "a", "b", "c"]
            .iter()
            .map(|n| PathBuf::from(format!("/music/{n}.mp3")))
            .collect::<Vec<_>>()
    );
    assert_eq!(c.take_failures().len(), 4);

    c.port_mut().failing.insert(PathBuf::from("/music/q3.mp3"));
    c.enqueue(track("q3", 0));
    c.next();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());
    assert_eq!(c.port().loads.len(), 6);
    assert_eq!(c.take_failures().len(), 1);
}

#[test]
fn previous_walks_back_and_ignores_the_start() {
    let mut c = controller(&["a", "b", "c"]);
    c.select_track(&track("a", 0)).unwrap();

    c.previous();
    assert_eq!(current_title(&c), Some("a"));
    assert_eq!(c.port().loads.len(), 1);

    c.select_track(&track("c", 2)).unwrap();
    c.previous();
    assert_eq!(current_title(&c), Some("b"));
    assert_eq!(c.state().cursor, Some(1));
}

#[test]
fn previous_without_history_is_a_no_op() {
    let mut c = controller(&["a", "b"]);
    c.previous();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.port().loads.is_empty());
}

#[test]
fn natural_completion_advances_only_while_playing() {
    let mut c = controller(&["a", "b"]);
    c.play();

    assert!(!c.poll());
    c.port_mut().finished = true;
    c.pause();
    assert!(!c.poll());

    c.play();
    assert!(c.poll());
    assert_eq!(current_title(&c), Some("b"));

    c.port_mut().finished = true;
    assert!(c.poll());
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(!c.poll());
}

#[test]
fn toggling_shuffle_does_not_interrupt_and_keeps_cursor_on_current() {
    let mut c = controller(&["a", "b", "c", "d", "e"]);
    c.select_track(&track("c", 2)).unwrap();

    assert!(c.toggle_shuffle());
    assert!(c.state().shuffle);
    assert_eq!(c.port().loads.len(), 1);
    assert_eq!(current_title(&c), Some("c"));
    let cursor = c.state().cursor.unwrap();
    assert_eq!(c.order().get(cursor).map(|t| t.title.as_str()), Some("c"));

    c.shuffle_now();
    assert!(c.state().shuffle);
    let cursor = c.state().cursor.unwrap();
    assert_eq!(c.order().get(cursor).map(|t| t.title.as_str()), Some("c"));

    assert!(!c.toggle_shuffle());
    assert_eq!(c.state().cursor, Some(2));
    assert_eq!(c.state().status, PlaybackStatus::Playing);
}

#[test]
fn set_tracks_resets_position_but_keeps_the_queue() {
    let mut c = controller(&["a", "b"]);
    c.select_track(&track("b", 1)).unwrap();
    c.enqueue(track("a", 0));

    c.set_tracks(tracks(&["x", "y"])).unwrap();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());
    assert_eq!(c.state().cursor, None);
    assert_eq!(c.queue().len(), 1);

    let err = c.set_tracks(Vec::new()).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidInput(_)));
}

#[test]
fn clear_queue_drops_pending_tracks() {
    let mut c = controller(&["a", "b"]);
    c.enqueue(track("b", 1));
    c.enqueue(track("b", 1));
    c.clear_queue();

    c.play();
    assert_eq!(current_title(&c), Some("a"));
}

#[test]
fn stop_clears_current_but_keeps_cursor() {
    let mut c = controller(&["a", "b"]);
    c.select_track(&track("b", 1)).unwrap();
    c.stop();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());
    assert_eq!(c.state().cursor, Some(1));
}

#[test]
fn select_next_end_then_previous_ignores_the_queue() {
    let mut c = controller(&["A", "B", "C"]);

    c.select_track(&track("B", 1)).unwrap();
    assert_eq!(c.state().cursor, Some(1));

    c.next();
    assert_eq!(current_title(&c), Some("C"));
    assert_eq!(c.state().cursor, Some(2));

    c.next();
    assert_eq!(c.state().status, PlaybackStatus::Stopped);
    assert!(c.state().current.is_none());

    c.enqueue(track("A", 0));
    c.previous();
    assert_eq!(current_title(&c), Some("B"));
    assert_eq!(c.state().cursor, Some(1));
    assert_eq!(c.queue().len(), 1);
}

#[test]
fn up_next_prefers_the_queue_then_the_order() {
    let mut c = controller(&["a", "b", "c"]);
    assert_eq!(c.up_next().map(|t| t.title.as_str()), Some("a"));

    c.select_track(&track("a", 0)).unwrap();
    assert_eq!(c.up_next().map(|t| t.title.as_str()), Some("b"));

    c.enqueue(track("c", 2));
    assert_eq!(c.up_next().map(|t| t.title.as_str()), Some("c"));

    c.clear_queue();
    c.select_track(&track("c", 2)).unwrap();
    assert!(c.up_next().is_none());
}
