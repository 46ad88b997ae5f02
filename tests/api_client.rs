mod common;

use reqwest::StatusCode;
use rust_poll_chat::network::ClientError;
use rust_poll_chat::storage::CursorOptions;

#[tokio::test]
async fn send_and_fetch_round_trip() {
    let server = common::spawn_server(CursorOptions::default()).await;
    let api = common::api(&format!("{}/", server.base_url));

    let sent = api.send_message("alice", "hi").await.unwrap();
    assert_eq!(sent.username, "alice");
    assert_eq!(sent.text, "hi");

    let page = api.fetch_messages(None).await.unwrap();
    assert_eq!(page.messages, vec![sent.clone()]);
    assert_eq!(page.last_message_id.as_deref(), Some(sent.id.as_str()));

    let page = api.fetch_messages(Some(&sent.id)).await.unwrap();
    assert!(page.messages.is_empty());
    assert_eq!(server.store.len().unwrap(), 1);
}

#[tokio::test]
async fn validation_error_is_surfaced() {
    let server = common::spawn_server(CursorOptions::default()).await;
    let api = common::api(&server.base_url);

    let err = api.send_message("", "hi").await.unwrap_err();
    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(server.store.is_empty().unwrap());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = common::api(&format!("http://{addr}"));
    let err = api.fetch_messages(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
