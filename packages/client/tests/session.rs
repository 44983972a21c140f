//! Integration tests for the client session against an in-process server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{sleep, timeout},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, accept_async, connect_async, tungstenite::protocol::Message,
};

use tandem_client::{
    ClientError, MediaElement, Reconciler, SimulatedPlayer, SyncPhase,
    config::{ClientConfig, ReconnectPolicy},
    input::UserAction,
    runner::run_with_reconnect,
    session::{SeekReleases, SessionEnd, run_client_session},
};
use tandem_server::{
    app::build_server, config::ServerConfig, domain::PlaybackStatus,
};

type RawClient = WebSocketStream<MaybeTlsStream<TcpStream>>;
type ServerSide = WebSocketStream<TcpStream>;
type SessionHandle = JoinHandle<(Result<SessionEnd, ClientError>, Reconciler<SimulatedPlayer>)>;
type ClientHandle = JoinHandle<(Result<(), ClientError>, Reconciler<SimulatedPlayer>)>;

const SETTLE: Duration = Duration::from_millis(300);
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_server() -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(build_server(&ServerConfig::default()).serve(listener, async move {
        let _ = rx.await;
    }));
    (format!("ws://{}/ws", addr), tx)
}

fn spawn_session(url: String) -> (mpsc::UnboundedSender<UserAction>, SessionHandle) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let mut reconciler = Reconciler::new(SimulatedPlayer::new(600.0));
        let mut releases = SeekReleases::new(Duration::from_millis(50));
        let result = run_client_session(&url, &mut reconciler, &mut rx, &mut releases).await;
        (result, reconciler)
    });
    (tx, handle)
}

/// Run the reconnecting client against `addr` with the given timings.
fn spawn_client(
    addr: std::net::SocketAddr,
    reconnect_delay: Duration,
    seek_debounce: Duration,
) -> (mpsc::UnboundedSender<UserAction>, ClientHandle) {
    let config = ClientConfig {
        url: format!("ws://{}/ws", addr),
        reconnect: ReconnectPolicy {
            delay: reconnect_delay,
            max_attempts: None,
        },
        seek_debounce,
        media_length: 600.0,
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let mut reconciler = Reconciler::new(SimulatedPlayer::new(config.media_length));
        let result = run_with_reconnect(&config, &mut reconciler, &mut rx).await;
        (result, reconciler)
    });
    (tx, handle)
}

fn snapshot(status: &str) -> Message {
    Message::Text(
        json!({
            "channel_1": {
                "type": "video",
                "metadata": {"video_url": "https://example.com/v.mp4", "video_status": status}
            }
        })
        .to_string()
        .into(),
    )
}

/// Accept the next connection on a hand-driven server and push a snapshot.
async fn accept_with_snapshot(listener: &TcpListener, status: &str) -> ServerSide {
    let (stream, _) = timeout(RECV_TIMEOUT, listener.accept())
        .await
        .expect("Timed out waiting for the client")
        .expect("Failed to accept");
    let mut ws = accept_async(stream).await.expect("Handshake failed");
    ws.send(snapshot(status)).await.expect("Failed to send snapshot");
    ws
}

/// Keep a server-side connection open until the client goes away.
async fn drain(mut ws: ServerSide) {
    while let Some(Ok(_)) = ws.next().await {}
}

async fn connect_raw(url: &str) -> RawClient {
    let (mut client, _) = connect_async(url).await.expect("Failed to connect");
    let _snapshot = recv_json(&mut client).await;
    client
}

async fn recv_json(client: &mut RawClient) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

async fn assert_silent(client: &mut RawClient) {
    let result = timeout(SETTLE, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = result {
        panic!("Expected no frame, received: {}", text);
    }
}

#[tokio::test]
async fn test_session_follows_server_without_echo() {
    // テスト項目: セッションはサーバーの状態変更に追従し、それをコマンドとして送り返さない
    // given (前提条件):
    let (url, _shutdown) = start_server().await;
    let (actions, handle) = spawn_session(url.clone());
    sleep(SETTLE).await;
    let mut remote = connect_raw(&url).await;

    // when (操作):
    remote
        .send(Message::Text(
            json!({"channel": "channel_1", "command": "pause"}).to_string().into(),
        ))
        .await
        .expect("Failed to send frame");
    let broadcast = recv_json(&mut remote).await;
    assert_silent(&mut remote).await;
    actions.send(UserAction::Quit).expect("session alive");
    let (result, reconciler) = handle.await.expect("session task panicked");

    // then (期待する結果):
    assert_eq!(broadcast["channel_1"]["metadata"]["video_status"], "paused");
    assert_eq!(result.expect("session failed"), SessionEnd::UserQuit);
    assert!(reconciler.media().is_paused());
    assert_eq!(
        reconciler.server_state().map(|s| s.metadata.video_status),
        Some(PlaybackStatus::Paused)
    );
    assert!(!reconciler.is_connected());
}

#[tokio::test]
async fn test_local_toggle_is_sent_to_server() {
    // テスト項目: ローカルのトグル操作がコマンドとしてサーバーに届き、全員にブロードキャストされる
    // given (前提条件):
    let (url, _shutdown) = start_server().await;
    let (actions, handle) = spawn_session(url.clone());
    sleep(SETTLE).await;
    let mut remote = connect_raw(&url).await;

    // when (操作):
    actions.send(UserAction::Toggle).expect("session alive");
    let broadcast = recv_json(&mut remote).await;
    sleep(SETTLE).await;
    actions.send(UserAction::Quit).expect("session alive");
    let (_result, reconciler) = handle.await.expect("session task panicked");

    // then (期待する結果):
    assert_eq!(broadcast["channel_1"]["metadata"]["video_status"], "paused");
    assert!(reconciler.media().is_paused());
}

#[tokio::test]
async fn test_relay_action_reaches_other_clients() {
    // テスト項目: say で送った任意のペイロードが他のクライアントにリレーされる
    // given (前提条件):
    let (url, _shutdown) = start_server().await;
    let (actions, handle) = spawn_session(url.clone());
    sleep(SETTLE).await;
    let mut remote = connect_raw(&url).await;

    // when (操作):
    actions
        .send(UserAction::Relay(json!({"hello": "world"})))
        .expect("session alive");
    let envelope = recv_json(&mut remote).await;
    actions.send(UserAction::Quit).expect("session alive");
    let _ = handle.await;

    // then (期待する結果):
    assert_eq!(envelope["type"], "broadcast");
    assert_eq!(envelope["data"], json!({"hello": "world"}));
}

#[tokio::test]
async fn test_reconnect_gives_up_after_max_attempts() {
    // テスト項目: 再接続上限に達すると ConnectionError で終了する
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = ClientConfig {
        url: format!("ws://{}/ws", addr),
        reconnect: ReconnectPolicy {
            delay: Duration::from_millis(10),
            max_attempts: Some(2),
        },
        ..ClientConfig::default()
    };
    let (_tx, mut rx) = mpsc::unbounded_channel();
    let mut reconciler = Reconciler::new(SimulatedPlayer::new(600.0));

    // when (操作):
    let result = timeout(
        Duration::from_secs(10),
        run_with_reconnect(&config, &mut reconciler, &mut rx),
    )
    .await
    .expect("reconnect loop did not end");

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ConnectionError(_))));
}

#[tokio::test]
async fn test_quit_while_waiting_to_reconnect() {
    // テスト項目: 再接続待ちの間に quit すると即座に正常終了する
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = ClientConfig {
        url: format!("ws://{}/ws", addr),
        reconnect: ReconnectPolicy {
            delay: Duration::from_secs(60),
            max_attempts: None,
        },
        ..ClientConfig::default()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut reconciler = Reconciler::new(SimulatedPlayer::new(600.0));
    tx.send(UserAction::Status).unwrap();

    // when (操作):
    let quitter = tokio::spawn(async move {
        sleep(SETTLE).await;
        let _ = tx.send(UserAction::Quit);
    });
    let result = timeout(
        Duration::from_secs(10),
        run_with_reconnect(&config, &mut reconciler, &mut rx),
    )
    .await
    .expect("reconnect loop did not end");
    let _ = quitter.await;

    // then (期待する結果):
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_reconnect_applies_fresh_snapshot() {
    // テスト項目: 切断後に再接続すると、新しいスナップショットがメディアに反映される
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (actions, handle) = spawn_client(addr, Duration::from_millis(200), Duration::from_millis(50));

    // when (操作):
    let mut first = accept_with_snapshot(&listener, "playing").await;
    sleep(SETTLE).await;
    first.close(None).await.expect("Failed to close");
    let second = accept_with_snapshot(&listener, "paused").await;
    let server = tokio::spawn(drain(second));
    sleep(SETTLE).await;
    actions.send(UserAction::Quit).expect("client alive");
    let (result, reconciler) = timeout(RECV_TIMEOUT, handle)
        .await
        .expect("client did not quit")
        .expect("client task panicked");
    let _ = server.await;

    // then (期待する結果):
    assert!(result.is_ok());
    assert!(reconciler.media().is_paused());
    assert_eq!(
        reconciler.server_state().map(|s| s.metadata.video_status),
        Some(PlaybackStatus::Paused)
    );
    assert_eq!(reconciler.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_seek_during_reconnect_wait_settles() {
    // テスト項目: 再接続待ちの間に始めたシークは待機中に終了し、再接続後のスナップショットが適用される
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (actions, handle) = spawn_client(addr, Duration::from_millis(600), Duration::from_millis(50));
    let mut first = accept_with_snapshot(&listener, "playing").await;
    sleep(SETTLE).await;
    first.close(None).await.expect("Failed to close");
    drop(first);
    sleep(Duration::from_millis(100)).await;

    // when (操作):
    actions.send(UserAction::Seek(50.0)).expect("client alive");
    let second = accept_with_snapshot(&listener, "paused").await;
    let server = tokio::spawn(drain(second));
    sleep(SETTLE).await;
    actions.send(UserAction::Quit).expect("client alive");
    let (result, reconciler) = timeout(RECV_TIMEOUT, handle)
        .await
        .expect("client did not quit")
        .expect("client task panicked");
    let _ = server.await;

    // then (期待する結果):
    assert!(result.is_ok());
    assert_eq!(reconciler.phase(), SyncPhase::Idle);
    assert!(reconciler.media().is_paused());
}

#[tokio::test]
async fn test_pending_seek_release_survives_session_end() {
    // テスト項目: セッション終了時に待機中だったシーク解除が次のセッションで処理される
    // given (前提条件):
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (actions, handle) = spawn_client(addr, Duration::from_millis(100), Duration::from_millis(500));
    let mut first = accept_with_snapshot(&listener, "playing").await;
    sleep(SETTLE).await;

    // when (操作):
    actions.send(UserAction::Seek(50.0)).expect("client alive");
    sleep(Duration::from_millis(50)).await;
    first.close(None).await.expect("Failed to close");
    drop(first);
    let second = accept_with_snapshot(&listener, "paused").await;
    let server = tokio::spawn(drain(second));
    sleep(Duration::from_millis(1000)).await;
    actions.send(UserAction::Quit).expect("client alive");
    let (result, reconciler) = timeout(RECV_TIMEOUT, handle)
        .await
        .expect("client did not quit")
        .expect("client task panicked");
    let _ = server.await;

    // then (期待する結果):
    assert!(result.is_ok());
    assert_eq!(reconciler.phase(), SyncPhase::Idle);
    assert!(reconciler.media().is_paused());
    assert_eq!(
        reconciler.server_state().map(|s| s.metadata.video_status),
        Some(PlaybackStatus::Paused)
    );
}
