//! Client Reconciler.
//!
//! Applies server-pushed channel state to a local [`MediaElement`] and turns
//! genuine local gestures into outbound commands, without echoing changes it
//! made itself.
//!
//! The reconciler is always in exactly one [`SyncPhase`]:
//!
//! - `Idle`: local play/pause events become commands (when connected).
//! - `Seeking`: a scrub is in flight. Server pushes are stored but not
//!   applied, and local events are not sent.
//! - `SyncingFromServer`: held only while a server update is applied. Events
//!   the media element fires meanwhile are drained and dropped.
//!
//! Timers are not owned here. A released seek yields a [`SeekRelease`] that
//! the caller hands back through [`Reconciler::settle_seek`] after the
//! debounce delay.

use tandem_server::{
    domain::{PlaybackStatus, value_object::PRIMARY_CHANNEL_ID},
    infrastructure::dto::websocket::{ChannelStateDto, ClientCommandDto},
};

use crate::{
    error::MediaError,
    media::{MediaElement, MediaEvent},
};

/// Seconds moved by one skip gesture
pub const SKIP_SECONDS: f64 = 10.0;

/// Synchronization phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Seeking {
        /// A pointer/touch drag of the progress control is active
        dragging: bool,
        /// Incremented by every seek start; identifies the release that ends it
        generation: u64,
    },
    SyncingFromServer,
}

/// Token returned when a seek is released.
///
/// Hand it back to [`Reconciler::settle_seek`] after the debounce delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekRelease {
    generation: u64,
}

impl SeekRelease {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Where a click on the progress track landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The track around the scrub control
    Track,
    /// The scrub control itself, which handles its own input
    ScrubControl,
}

/// Work the caller must carry out after a reconciler call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Effects {
    /// Commands to send to the server, in order
    pub commands: Vec<ClientCommandDto>,
    /// Seek release to schedule after the debounce delay
    pub seek_release: Option<SeekRelease>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.seek_release.is_none()
    }

    fn merge(&mut self, other: Effects) {
        self.commands.extend(other.commands);
        if other.seek_release.is_some() {
            self.seek_release = other.seek_release;
        }
    }
}

pub struct Reconciler<M: MediaElement> {
    media: M,
    phase: SyncPhase,
    connected: bool,
    /// Last channel state pushed by the server
    server_state: Option<ChannelStateDto>,
    /// Progress bar position in percent
    progress: f64,
    generation: u64,
}

impl<M: MediaElement> Reconciler<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            phase: SyncPhase::Idle,
            connected: false,
            server_state: None,
            progress: 0.0,
            generation: 0,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Connection-status signal for the surrounding UI
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            tracing::debug!("Connection status: {}", connected);
        }
        self.connected = connected;
    }

    pub fn server_state(&self) -> Option<&ChannelStateDto> {
        self.server_state.as_ref()
    }

    /// Playback status as observed on the media element
    pub fn local_status(&self) -> PlaybackStatus {
        if self.media.is_paused() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Store a server-pushed state and apply it unless a seek is in flight.
    pub fn apply_server_state(&mut self, state: ChannelStateDto) -> Effects {
        self.server_state = Some(state);
        self.sync_from_server()
    }

    /// Toggle play/pause. Requires a live connection.
    pub fn toggle_play_pause(&mut self) -> Effects {
        if !self.connected {
            tracing::debug!("Toggle ignored while disconnected");
            return Effects::default();
        }

        if self.media.is_paused() {
            if let Err(e) = self.media.play() {
                tracing::error!("Error playing video: {}", e);
            }
        } else {
            self.media.pause();
        }
        self.pump_media_events()
    }

    /// Skip by `delta` seconds, clamped to `[0, duration]`. Requires a live connection.
    pub fn skip(&mut self, delta: f64) -> Effects {
        if !self.connected {
            tracing::debug!("Skip ignored while disconnected");
            return Effects::default();
        }

        let mut target = (self.media.current_time() + delta).max(0.0);
        if let Some(duration) = self.media.duration() {
            target = target.min(duration);
        }
        self.media.set_current_time(target);
        self.pump_media_events()
    }

    /// Progress control moved to `percent`.
    pub fn progress_input(&mut self, percent: f64) -> Effects {
        let Some(duration) = self.known_duration() else {
            return Effects::default();
        };

        self.begin_seek(false);
        self.seek_to_percent(percent, duration)
    }

    /// Pointer-down or touch-start on the progress control.
    pub fn drag_start(&mut self) {
        self.begin_seek(true);
    }

    /// Drag moved to `fraction` of the control width.
    pub fn drag_move(&mut self, fraction: f64) -> Effects {
        let Some(duration) = self.known_duration() else {
            return Effects::default();
        };

        let percent = (fraction * 100.0).clamp(0.0, 100.0);
        self.seek_to_percent(percent, duration)
    }

    /// Pointer-up or touch-end. Returns the release to schedule.
    pub fn drag_end(&mut self) -> Effects {
        match self.phase {
            SyncPhase::Seeking {
                dragging: true,
                generation,
            } => {
                self.phase = SyncPhase::Seeking {
                    dragging: false,
                    generation,
                };
                Effects {
                    seek_release: Some(SeekRelease { generation }),
                    ..Effects::default()
                }
            }
            _ => Effects::default(),
        }
    }

    /// Click on the progress track at `fraction` of its width.
    pub fn click_track(&mut self, target: ClickTarget, fraction: f64) -> Effects {
        if target == ClickTarget::ScrubControl {
            return Effects::default();
        }
        let Some(duration) = self.known_duration() else {
            return Effects::default();
        };

        self.begin_seek(false);
        let mut effects = self.seek_to_percent(fraction * 100.0, duration);
        if effects.seek_release.is_none()
            && let SyncPhase::Seeking {
                dragging: false,
                generation,
            } = self.phase
        {
            effects.seek_release = Some(SeekRelease { generation });
        }
        effects
    }

    /// End the seek identified by `release` and re-apply the stored server state.
    ///
    /// Stale releases, and releases arriving while a drag is still active,
    /// are ignored.
    pub fn settle_seek(&mut self, release: SeekRelease) -> Effects {
        match self.phase {
            SyncPhase::Seeking {
                dragging: false,
                generation,
            } if generation == release.generation => {
                self.phase = SyncPhase::Idle;
                tracing::debug!("Seek settled (generation {})", generation);
                self.sync_from_server()
            }
            _ => {
                tracing::debug!("Ignoring stale seek release {}", release.generation);
                Effects::default()
            }
        }
    }

    /// Process the events the media element fired since the last call.
    pub fn pump_media_events(&mut self) -> Effects {
        let mut effects = Effects::default();
        for event in self.media.take_events() {
            match event {
                MediaEvent::Play => self.emit(PlaybackStatus::Playing, &mut effects),
                MediaEvent::Pause => self.emit(PlaybackStatus::Paused, &mut effects),
                MediaEvent::Seeking => self.begin_seek(false),
                MediaEvent::Seeked => {
                    if let SyncPhase::Seeking {
                        dragging: false,
                        generation,
                    } = self.phase
                    {
                        effects.seek_release = Some(SeekRelease { generation });
                    }
                }
                MediaEvent::LoadedMetadata => effects.merge(self.sync_from_server()),
                MediaEvent::TimeUpdate => self.update_progress(),
            }
        }
        effects
    }

    fn sync_from_server(&mut self) -> Effects {
        if matches!(self.phase, SyncPhase::Seeking { .. }) {
            tracing::debug!("Seek in progress, server state deferred");
            return Effects::default();
        }
        let Some(state) = self.server_state.clone() else {
            return Effects::default();
        };

        self.phase = SyncPhase::SyncingFromServer;

        let url = state.metadata.video_url.as_str();
        if self.media.source() != Some(url) {
            self.media.set_source(url);
        }

        match (state.metadata.video_status, self.local_status()) {
            (PlaybackStatus::Playing, PlaybackStatus::Paused) => match self.media.play() {
                Ok(()) => {}
                // autoplay policy; the user has to start playback
                Err(MediaError::NotAllowed) => {}
                Err(e) => tracing::error!("Error playing video: {}", e),
            },
            (PlaybackStatus::Paused, PlaybackStatus::Playing) => self.media.pause(),
            _ => {}
        }

        let suppressed = self.media.take_events();
        if !suppressed.is_empty() {
            tracing::trace!("Suppressed media events from server sync: {:?}", suppressed);
        }
        self.update_progress();

        self.phase = SyncPhase::Idle;
        Effects::default()
    }

    fn emit(&self, status: PlaybackStatus, effects: &mut Effects) {
        if self.phase != SyncPhase::Idle {
            tracing::debug!("Not sending '{}' during {:?}", status.as_command(), self.phase);
            return;
        }
        if !self.connected {
            tracing::warn!("Not connected to server, '{}' not sent", status.as_command());
            return;
        }
        effects
            .commands
            .push(ClientCommandDto::request(PRIMARY_CHANNEL_ID, status));
    }

    /// Enter or re-arm the seeking phase. An active drag stays active.
    fn begin_seek(&mut self, dragging: bool) {
        let was_dragging = matches!(self.phase, SyncPhase::Seeking { dragging: true, .. });
        self.generation += 1;
        self.phase = SyncPhase::Seeking {
            dragging: dragging || was_dragging,
            generation: self.generation,
        };
    }

    fn seek_to_percent(&mut self, percent: f64, duration: f64) -> Effects {
        self.media.set_current_time(percent / 100.0 * duration);
        self.progress = percent;
        self.pump_media_events()
    }

    fn update_progress(&mut self) {
        if matches!(self.phase, SyncPhase::Seeking { dragging: true, .. }) {
            return;
        }
        if let Some(duration) = self.known_duration() {
            self.progress = self.media.current_time() / duration * 100.0;
        }
    }

    fn known_duration(&self) -> Option<f64> {
        self.media.duration().filter(|d| *d > 0.0)
    }
}
