//! Media element abstraction.
//!
//! Models the subset of an HTML media element the reconciler relies on.
//! Operations that change playback state record the events a browser would
//! fire; the owner collects them with [`MediaElement::take_events`].

use crate::error::MediaError;

/// Event fired by a media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Seeking,
    Seeked,
    LoadedMetadata,
    TimeUpdate,
}

pub trait MediaElement {
    /// Start playback. Fires [`MediaEvent::Play`] when the element was paused.
    fn play(&mut self) -> Result<(), MediaError>;

    /// Pause playback. Fires [`MediaEvent::Pause`] when the element was playing.
    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Current media resource, if any
    fn source(&self) -> Option<&str>;

    /// Replace the media resource. Resets the position to zero.
    fn set_source(&mut self, url: &str);

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    /// Seek to `seconds`. Fires [`MediaEvent::Seeking`] then [`MediaEvent::Seeked`].
    fn set_current_time(&mut self, seconds: f64);

    /// Media length in seconds, `None` until metadata is loaded
    fn duration(&self) -> Option<f64>;

    /// Drain the events fired since the last call
    fn take_events(&mut self) -> Vec<MediaEvent>;
}
