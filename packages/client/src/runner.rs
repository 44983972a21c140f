//! Client execution logic with reconnection support.

use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    domain::{should_attempt_reconnect, was_connected},
    error::ClientError,
    input::{UserAction, spawn_input_thread},
    player::SimulatedPlayer,
    reconciler::Reconciler,
    session::{SeekReleases, SessionEnd, apply_action, run_client_session},
};

/// Run the interactive client until the user quits or reconnection gives up
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<UserAction>();
    let _input_handle = spawn_input_thread(action_tx);

    let mut reconciler = Reconciler::new(SimulatedPlayer::new(config.media_length));
    run_with_reconnect(&config, &mut reconciler, &mut action_rx).await
}

/// Reconnect loop shared by the binary and tests.
///
/// A connection that was established and then lost resets the attempt
/// counter; the server pushes a fresh snapshot on every reconnect. Seek
/// releases are shared across sessions and the waits between them.
pub async fn run_with_reconnect(
    config: &ClientConfig,
    reconciler: &mut Reconciler<SimulatedPlayer>,
    actions: &mut mpsc::UnboundedReceiver<UserAction>,
) -> Result<(), ClientError> {
    let policy = config.reconnect;
    let mut attempts: u32 = 0;
    let mut releases = SeekReleases::new(config.seek_debounce);

    loop {
        tracing::info!("Attempting to connect to {}", config.url);

        let error = match run_client_session(&config.url, reconciler, actions, &mut releases).await
        {
            Ok(SessionEnd::UserQuit) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        if was_connected(&error) {
            attempts = 0;
        }
        tracing::warn!("{}", error);

        if !should_attempt_reconnect(&error, attempts, policy.max_attempts) {
            tracing::error!("Failed to reconnect after {} attempts. Exiting.", attempts);
            return Err(error);
        }
        attempts += 1;

        match policy.max_attempts {
            Some(max) => tracing::info!(
                "Reconnecting in {:?}... (attempt {}/{})",
                policy.delay,
                attempts,
                max
            ),
            None => tracing::info!("Reconnecting in {:?}... (attempt {})", policy.delay, attempts),
        }

        if wait_before_reconnect(policy.delay, reconciler, actions, &mut releases).await
            == Some(SessionEnd::UserQuit)
        {
            return Ok(());
        }
    }
}

/// Sleep for `delay`, still serving user input and seek releases.
/// Returns early on quit.
async fn wait_before_reconnect(
    delay: std::time::Duration,
    reconciler: &mut Reconciler<SimulatedPlayer>,
    actions: &mut mpsc::UnboundedReceiver<UserAction>,
    releases: &mut SeekReleases,
) -> Option<SessionEnd> {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        // Commands are never emitted while disconnected
        let effects = tokio::select! {
            _ = &mut sleep => return None,
            action = actions.recv() => match action {
                Some(UserAction::Quit) | None => return Some(SessionEnd::UserQuit),
                Some(action) => apply_action(reconciler, action),
            },
            Some(release) = releases.recv() => reconciler.settle_seek(release),
        };
        if let Some(release) = effects.seek_release {
            releases.schedule(release);
        }
    }
}
