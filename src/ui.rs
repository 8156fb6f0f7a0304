//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It
//! only reads: the browser model and the controller are never mutated here.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Entry};
use crate::audio::OutputPort;
use crate::config::UiSettings;
use crate::library::Track;
use crate::player::{Controller, PlaybackStatus};

const CONTROLS: [(&str, &str); 10] = [
    ("N", "open/play item"),
    ("add N", "queue song"),
    ("clear", "clear queue"),
    ("+/-", "volume"),
    ("</>", "prev/next song"),
    ("space", "play/pause"),
    ("t", "toggle shuffle"),
    ("s", "reshuffle"),
    ("n/p", "page"),
    ("q", "quit"),
];

/// Most queued tracks shown before the panel is cut off.
const QUEUE_ROWS: usize = 5;

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn track_label(track: &Track) -> String {
    match track.duration {
        Some(d) => format!("{} [{}]", track.display, format_mmss(d)),
        None => track.display.clone(),
    }
}

/// One status line per concern, joined the way the header shows them.
fn status_text<P: OutputPort>(app: &App, controller: &Controller<P>) -> String {
    let state = controller.state();
    let mut parts: Vec<String> = Vec::new();

    let transport = match state.status {
        PlaybackStatus::Playing => "Playing",
        PlaybackStatus::Paused => "Paused",
        PlaybackStatus::Stopped => "Stopped",
    };
    match &state.current {
        Some(track) => parts.push(format!("{transport}: {}", track_label(track))),
        None => parts.push(transport.to_string()),
    }

    if let Some(next) = controller.up_next() {
        parts.push(format!("Next: {}", next.display));
    }
    parts.push(format!("Volume: {}%", state.volume));
    parts.push(format!(
        "Shuffle: {}",
        if state.shuffle { "ON" } else { "OFF" }
    ));
    parts.push(format!("Dir: {}", app.location()));

    if let Some(name) = app
        .album_art
        .as_ref()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
    {
        parts.push(format!("Art: {name}"));
    }

    parts.join(" • ")
}

fn entry_item<'a>(number: usize, entry: &Entry, app: &'a App, current: Option<&Track>) -> ListItem<'a> {
    let label = match entry {
        Entry::Parent => "..".to_string(),
        Entry::Folder(path) => format!(
            "{}/",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
        ),
        Entry::Track(i) => track_label(&app.tracks[*i]),
    };
    let line = format!("{number:>3}. {label}");

    let playing = match (entry, current) {
        (Entry::Track(i), Some(cur)) => app.tracks[*i].same_file(cur),
        _ => false,
    };
    if playing {
        ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
    } else if matches!(entry, Entry::Track(_)) {
        ListItem::new(line)
    } else {
        ListItem::new(line).style(Style::default().add_modifier(Modifier::BOLD))
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw<P: OutputPort>(frame: &mut Frame, app: &App, controller: &Controller<P>, ui: &UiSettings) {
    let queue = controller.queue();
    let queue_height = if queue.is_empty() {
        0
    } else {
        queue.len().min(QUEUE_ROWS) as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(queue_height),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" reaganplayer ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status
    let status = Paragraph::new(status_text(app, controller))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Browser
    let current = controller.state().current.as_ref();
    let items: Vec<ListItem> = app
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| entry_item(i + 1, entry, app, current))
        .collect();
    let title = if app.has_pages() {
        format!(" {} (page {}/{}) ", app.location(), app.page + 1, app.page_count())
    } else {
        format!(" {} ", app.location())
    };
    let browser = Block::default().borders(Borders::ALL).title(title);
    let inner = browser.inner(chunks[2]);
    frame.render_widget(browser, chunks[2]);

    // Entries that overflow the height continue in further columns.
    let rows = usize::from(inner.height.max(1));
    let cols = items.len().div_ceil(rows).max(1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
        .split(inner);
    let mut items = items.into_iter();
    for area in columns.iter() {
        let column: Vec<ListItem> = items.by_ref().take(rows).collect();
        frame.render_widget(List::new(column), *area);
    }

    // Queue
    if !queue.is_empty() {
        let mut rows: Vec<ListItem> = queue
            .iter()
            .take(QUEUE_ROWS)
            .enumerate()
            .map(|(i, t)| ListItem::new(format!("{:>3}. {}", i + 1, t.display)))
            .collect();
        if queue.len() > QUEUE_ROWS {
            if let Some(last) = rows.last_mut() {
                *last = ListItem::new(format!("     ... {} more", queue.len() - QUEUE_ROWS + 1));
            }
        }
        let queue_list = List::new(rows).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" queue ({}) ", queue.len())),
        );
        frame.render_widget(queue_list, chunks[3]);
    }

    // Controls
    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Message + prompt
    let message = Line::from(app.message.as_deref().unwrap_or_default().italic());
    let prompt = Line::from(vec![
        Span::raw("> "),
        Span::raw(app.input.as_str()),
        Span::raw("_").slow_blink(),
    ]);
    let prompt = Paragraph::new(vec![message, prompt])
        .block(Block::default().borders(Borders::ALL).title(" command "));
    frame.render_widget(prompt, chunks[5]);
}
