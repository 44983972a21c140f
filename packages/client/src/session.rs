//! WebSocket client session management.
//!
//! One session is one connection. Everything runs on a single task: a
//! `tokio::select!` loop over server frames, user actions, debounced seek
//! releases and the playback tick.
//!
//! Seek releases outlive a session: a seek started before a disconnect, or
//! while waiting to reconnect, is still settled on the next connection.

use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{
    error::ClientError,
    formatter::{MessageFormatter, StatusView},
    frame::{ServerFrame, parse_server_frame},
    input::UserAction,
    media::MediaElement,
    player::SimulatedPlayer,
    reconciler::{Effects, Reconciler, SeekRelease},
    ui::redisplay_prompt,
};

/// Interval of the playback tick
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Debounced seek releases of one client.
///
/// Created once per client and shared by every session, so a release never
/// lands in the queue of a session that has already ended.
pub struct SeekReleases {
    debounce: Duration,
    tx: mpsc::UnboundedSender<SeekRelease>,
    rx: mpsc::UnboundedReceiver<SeekRelease>,
}

impl SeekReleases {
    pub fn new(debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { debounce, tx, rx }
    }

    /// Hand `release` back through [`SeekReleases::recv`] after the debounce delay.
    pub fn schedule(&self, release: SeekRelease) {
        let tx = self.tx.clone();
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // the client may have exited meanwhile
            let _ = tx.send(release);
        });
    }

    /// Next release whose delay has elapsed.
    pub async fn recv(&mut self) -> Option<SeekRelease> {
        self.rx.recv().await
    }
}

/// How a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    UserQuit,
}

/// Run one WebSocket session until the user quits or the connection drops.
///
/// # Errors
///
/// `ClientError::ConnectionError` when the connection cannot be established,
/// `ClientError::ConnectionLost` when an established connection drops.
pub async fn run_client_session(
    url: &str,
    reconciler: &mut Reconciler<SimulatedPlayer>,
    actions: &mut mpsc::UnboundedReceiver<UserAction>,
    releases: &mut SeekReleases,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    reconciler.set_connected(true);
    tracing::info!("Connected to sync server at {}", url);
    print!("{}", MessageFormatter::format_connection(true, url));
    redisplay_prompt();

    let (mut write, mut read) = ws_stream.split();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    let result = loop {
        let effects = tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_server_text(reconciler, text.as_str()),
                Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                    Ok(text) => handle_server_text(reconciler, text),
                    Err(_) => {
                        tracing::warn!("Ignoring {} bytes of non UTF-8 binary data", data.len());
                        Effects::default()
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    break Err(ClientError::ConnectionLost("server closed the connection".to_string()));
                }
                Some(Ok(_)) => Effects::default(),
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break Err(ClientError::ConnectionLost(e.to_string()));
                }
            },
            action = actions.recv() => match action {
                Some(UserAction::Quit) | None => break Ok(SessionEnd::UserQuit),
                Some(UserAction::Relay(payload)) => {
                    if let Err(e) = write.send(Message::Text(payload.to_string().into())).await {
                        break Err(ClientError::ConnectionLost(e.to_string()));
                    }
                    Effects::default()
                }
                Some(action) => apply_action(reconciler, action),
            },
            Some(release) = releases.recv() => reconciler.settle_seek(release),
            _ = ticker.tick() => {
                let now = Instant::now();
                reconciler.media_mut().advance(now - last_tick);
                last_tick = now;
                reconciler.pump_media_events()
            }
        };

        if let Err(e) = deliver(&mut write, effects, releases).await {
            tracing::warn!("Failed to send command: {}", e);
            break Err(ClientError::ConnectionLost(e.to_string()));
        }
    };

    reconciler.set_connected(false);
    print!("{}", MessageFormatter::format_connection(false, url));
    result
}

/// Apply a user action to the reconciler.
///
/// Connection-independent actions (status, help) print and return no effects.
pub fn apply_action(
    reconciler: &mut Reconciler<SimulatedPlayer>,
    action: UserAction,
) -> Effects {
    let effects = match action {
        UserAction::Play if reconciler.media().is_paused() => reconciler.toggle_play_pause(),
        UserAction::Pause if !reconciler.media().is_paused() => reconciler.toggle_play_pause(),
        UserAction::Play | UserAction::Pause => Effects::default(),
        UserAction::Toggle => reconciler.toggle_play_pause(),
        UserAction::Skip(delta) => reconciler.skip(delta),
        UserAction::Seek(percent) => reconciler.progress_input(percent),
        UserAction::DragStart => {
            reconciler.drag_start();
            Effects::default()
        }
        UserAction::DragMove(fraction) => reconciler.drag_move(fraction),
        UserAction::DragEnd => reconciler.drag_end(),
        UserAction::Click(target, fraction) => reconciler.click_track(target, fraction),
        UserAction::Status => {
            print!("{}", MessageFormatter::format_status(&status_view(reconciler)));
            Effects::default()
        }
        UserAction::Help => {
            println!("{}", MessageFormatter::format_help());
            Effects::default()
        }
        UserAction::Relay(_) | UserAction::Quit => Effects::default(),
    };
    redisplay_prompt();
    effects
}

pub fn status_view(reconciler: &Reconciler<SimulatedPlayer>) -> StatusView {
    StatusView {
        connected: reconciler.is_connected(),
        status: reconciler.local_status(),
        phase: reconciler.phase(),
        position: reconciler.media().current_time(),
        duration: reconciler.media().duration(),
        progress: reconciler.progress(),
    }
}

fn handle_server_text(reconciler: &mut Reconciler<SimulatedPlayer>, text: &str) -> Effects {
    let frame = match parse_server_frame(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Error parsing WebSocket message: {}", e);
            return Effects::default();
        }
    };

    match frame {
        ServerFrame::ChannelState(state) => {
            print!("{}", MessageFormatter::format_channel_state(&state));
            redisplay_prompt();
            reconciler.apply_server_state(state)
        }
        ServerFrame::Relay { data, timestamp } => {
            print!("{}", MessageFormatter::format_relay(&data, &timestamp));
            redisplay_prompt();
            Effects::default()
        }
        ServerFrame::Error(message) => {
            print!("{}", MessageFormatter::format_server_error(&message));
            redisplay_prompt();
            Effects::default()
        }
        ServerFrame::Other(_) => {
            tracing::debug!("Ignoring frame: {}", text);
            Effects::default()
        }
    }
}

/// Send the commands and schedule the seek release carried by `effects`.
async fn deliver<S>(
    write: &mut S,
    effects: Effects,
    releases: &SeekReleases,
) -> Result<(), WsError>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    for command in effects.commands {
        let json = match serde_json::to_string(&command) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize command: {}", e);
                continue;
            }
        };
        tracing::info!("Sending command: {}", json);
        write.send(Message::Text(json.into())).await?;
    }

    if let Some(release) = effects.seek_release {
        releases.schedule(release);
    }
    Ok(())
}
