use std::path::Path;
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use crate::error::{PlayerError, Result};

use super::port::OutputPort;
use super::sink::{create_sink, gain};

/// `OutputPort` backed by the default rodio output device.
pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    volume: u8,
}

impl RodioOutput {
    /// Open the default output device. Failing here means nothing can play.
    pub fn open(volume: u8) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::NoAudioDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            volume: volume.min(100),
        })
    }

    /// Ramp the current track down over `fade_out`, then release it.
    pub fn fade_out(&mut self, fade_out: Duration) {
        if let Some(sink) = self.sink.take() {
            if !sink.is_paused() && !fade_out.is_zero() {
                let steps: u32 = 20;
                let step = (fade_out / steps).max(Duration::from_millis(1));
                let start = gain(self.volume);
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    sink.set_volume(start * (1.0 - t));
                    thread::sleep(step);
                }
            }
            sink.stop();
        }
    }
}

impl OutputPort for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<()> {
        // Release the previous track before touching the next file, so a
        // failed open never leaves the old one playing.
        self.stop();

        let sink = create_sink(&self.stream, path)?;
        sink.set_volume(gain(self.volume));
        debug!(path = %path.display(), "track loaded");
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn resume(&mut self) {
        self.play();
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = level.min(100);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(gain(self.volume));
        }
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_some_and(Sink::empty)
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
