//! Simulated media player.
//!
//! Stands in for a browser video element: it tracks the paused flag, the
//! source and a position advanced by [`SimulatedPlayer::advance`], without
//! decoding anything.

use std::time::Duration;

use crate::{
    error::MediaError,
    media::{MediaElement, MediaEvent},
};

#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    source: Option<String>,
    paused: bool,
    position: f64,
    /// Length reported once a source is loaded
    media_length: f64,
    loaded: bool,
    autoplay_allowed: bool,
    events: Vec<MediaEvent>,
}

impl SimulatedPlayer {
    /// Create a paused player without a source.
    ///
    /// `media_length` is the duration (seconds) reported for any source.
    pub fn new(media_length: f64) -> Self {
        Self {
            source: None,
            paused: true,
            position: 0.0,
            media_length: media_length.max(0.0),
            loaded: false,
            autoplay_allowed: true,
            events: Vec::new(),
        }
    }

    /// Refuse `play` with [`MediaError::NotAllowed`] while `allowed` is false
    pub fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.autoplay_allowed = allowed;
    }

    /// Advance the position while playing.
    ///
    /// Fires [`MediaEvent::TimeUpdate`] when the position moved, and pauses at
    /// the end of the media.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.paused || !self.loaded {
            return;
        }
        let next = (self.position + elapsed.as_secs_f64()).min(self.media_length);
        if next > self.position {
            self.position = next;
            self.events.push(MediaEvent::TimeUpdate);
        }
        if self.position >= self.media_length {
            self.pause();
        }
    }
}

impl MediaElement for SimulatedPlayer {
    fn play(&mut self) -> Result<(), MediaError> {
        if !self.autoplay_allowed {
            return Err(MediaError::NotAllowed);
        }
        if self.paused {
            self.paused = false;
            self.events.push(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.loaded = true;
        self.events.push(MediaEvent::LoadedMetadata);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        let upper = if self.loaded { self.media_length } else { 0.0 };
        self.position = seconds.clamp(0.0, upper);
        self.events.push(MediaEvent::Seeking);
        self.events.push(MediaEvent::Seeked);
    }

    fn duration(&self) -> Option<f64> {
        self.loaded.then_some(self.media_length)
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}
