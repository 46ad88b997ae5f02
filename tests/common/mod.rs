#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use rust_poll_chat::common::{NetworkCommand, NetworkEvent};
use rust_poll_chat::network::{ApiClient, PollingClient};
use rust_poll_chat::server::{self, AppState};
use rust_poll_chat::storage::{CursorOptions, MemoryStore, MessageStore};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<dyn MessageStore>,
    _shutdown: oneshot::Sender<()>,
}

/// Serves a fresh in-memory store on an ephemeral port.
pub async fn spawn_server(options: CursorOptions) -> TestServer {
    let store: Arc<dyn MessageStore> = Arc::new(MemoryStore::with_options(options));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, stopped) = oneshot::channel::<()>();

    tokio::spawn(server::run(listener, AppState::new(store.clone()), async move {
        stopped.await.ok();
    }));

    TestServer {
        base_url: format!("http://{addr}"),
        store,
        _shutdown: shutdown,
    }
}

/// Serves an arbitrary router, for scripted server behaviour.
pub async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.ok() });
    format!("http://{addr}")
}

pub fn api(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(2)).unwrap()
}

pub fn start_client(
    base_url: &str,
    poll_interval: Duration,
) -> (mpsc::Sender<NetworkCommand>, mpsc::Receiver<NetworkEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);
    let client = PollingClient::new(api(base_url), poll_interval, event_tx, cmd_rx);
    tokio::spawn(client.run());
    (cmd_tx, event_rx)
}

/// Receives events until one satisfies `matches`, failing after five seconds.
pub async fn wait_for<F>(events: &mut mpsc::Receiver<NetworkEvent>, mut matches: F) -> NetworkEvent
where
    F: FnMut(&NetworkEvent) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("polling loop stopped");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
