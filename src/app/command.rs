use crate::error::{PlayerError, Result};

/// One user command, as typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a folder or play a track by its listing number.
    Select(usize),
    /// Append the track with this listing number to the queue.
    Enqueue(usize),
    ClearQueue,
    VolumeUp,
    VolumeDown,
    Next,
    Previous,
    ToggleShuffle,
    ShuffleNow,
    TogglePause,
    NextPage,
    PrevPage,
    Quit,
}

impl Command {
    /// Parse a prompt line. A lone space means pause/resume.
    pub fn parse(line: &str) -> Result<Self> {
        if line == " " {
            return Ok(Self::TogglePause);
        }

        let line = line.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();
        let head = words
            .next()
            .ok_or_else(|| PlayerError::InvalidInput("empty command".to_string()))?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(PlayerError::InvalidInput(format!("too many arguments: {line}")));
        }

        let cmd = match (head, arg) {
            ("add" | "a", Some(n)) => Self::Enqueue(parse_number(n)?),
            ("add" | "a", None) => {
                return Err(PlayerError::InvalidInput(
                    "add needs a song number, e.g. `add 3`".to_string(),
                ));
            }
            (_, Some(_)) => return Err(PlayerError::InvalidInput(format!("unknown command: {line}"))),
            ("clear", None) => Self::ClearQueue,
            ("+", None) => Self::VolumeUp,
            ("-", None) => Self::VolumeDown,
            (">", None) => Self::Next,
            ("<", None) => Self::Previous,
            ("t", None) => Self::ToggleShuffle,
            ("s", None) => Self::ShuffleNow,
            ("pause", None) => Self::TogglePause,
            ("n", None) => Self::NextPage,
            ("p", None) => Self::PrevPage,
            ("q" | "quit", None) => Self::Quit,
            (n, None) if n.chars().all(|c| c.is_ascii_digit()) => Self::Select(parse_number(n)?),
            _ => return Err(PlayerError::InvalidInput(format!("unknown command: {line}"))),
        };
        Ok(cmd)
    }
}

fn parse_number(s: &str) -> Result<usize> {
    s.parse::<usize>()
        .map_err(|_| PlayerError::InvalidInput(format!("not a number: {s}")))
}
