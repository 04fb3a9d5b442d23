//! Inbound frames routed to connected peers.

use waypoint::transport::{frame, PeerWorker, Server};
use waypoint::workers::start_reference_workers;
use waypoint::{Bytes, Node, Route, ServerConfig};

#[tokio::test]
async fn test_plain_text_is_broadcast_to_other_peers() {
    let node = Node::new();
    let server = Server::new(node.clone(), ServerConfig::default()).expect("server");
    let hub = server.hub().clone();

    let (alice, mut alice_rx) = hub.join();
    let (_bob, mut bob_rx) = hub.join();
    let (_carol, mut carol_rx) = hub.join();

    let default_route = ServerConfig::default().default_route();
    let msg = frame::decode_text("hi everyone", &alice, &default_route).expect("decode");
    node.route(msg).await.expect("route");

    assert_eq!(bob_rx.recv().await, Some(Bytes::from_static(b"hi everyone")));
    assert_eq!(carol_rx.recv().await, Some(Bytes::from_static(b"hi everyone")));
    assert!(alice_rx.try_recv().is_err(), "sender does not hear itself");
}

#[tokio::test]
async fn test_json_frame_echoes_back_to_sender() {
    let node = Node::new();
    start_reference_workers(&node).expect("reference workers");
    let server = Server::new(node.clone(), ServerConfig::default()).expect("server");
    let hub = server.hub().clone();

    let (alice, mut alice_rx) = hub.join();
    node.start_worker(alice.clone(), PeerWorker::new(hub.clone()))
        .expect("register peer");

    let text = r#"{"onward_route": ["h1", "h2", "echoer"], "payload": "hello"}"#;
    let msg = frame::decode_text(text, &alice, &Route::new()).expect("decode");
    node.route(msg).await.expect("route");

    assert_eq!(alice_rx.recv().await, Some(Bytes::from_static(b"hello")));
}

#[tokio::test]
async fn test_broadcast_after_hops_still_skips_origin() {
    let node = Node::new();
    start_reference_workers(&node).expect("reference workers");
    let config = ServerConfig {
        default_route: vec!["h1".into(), "h2".into(), "broadcast".into()],
        ..ServerConfig::default()
    };
    let server = Server::new(node.clone(), config.clone()).expect("server");
    let hub = server.hub().clone();

    let (alice, mut alice_rx) = hub.join();
    let (_bob, mut bob_rx) = hub.join();

    let msg = frame::decode_text("via hops", &alice, &config.default_route()).expect("decode");
    node.route(msg).await.expect("route");

    assert_eq!(bob_rx.recv().await, Some(Bytes::from_static(b"via hops")));
    assert!(alice_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_reply_to_departed_peer_fails() {
    let node = Node::new();
    let server = Server::new(node.clone(), ServerConfig::default()).expect("server");
    let hub = server.hub().clone();

    let (alice, _alice_rx) = hub.join();
    node.start_worker(alice.clone(), PeerWorker::new(hub.clone()))
        .expect("register peer");
    hub.leave(&alice);

    let err = node
        .send([alice.clone()], "too late")
        .await
        .expect_err("connection is gone");
    assert!(matches!(err, waypoint::RoutingError::WorkerFailed { .. }));
}

#[tokio::test]
async fn test_broadcast_with_explicit_return_route_skips_sender() {
    let node = Node::new();
    let server = Server::new(node.clone(), ServerConfig::default()).expect("server");
    let hub = server.hub().clone();

    let (alice, mut alice_rx) = hub.join();
    let (_bob, mut bob_rx) = hub.join();

    let text = r#"{"onward_route": ["broadcast"], "return_route": ["app"], "payload": "news"}"#;
    let msg = frame::decode_text(text, &alice, &Route::new()).expect("decode");
    node.route(msg).await.expect("route");

    assert_eq!(bob_rx.recv().await, Some(Bytes::from_static(b"news")));
    assert!(alice_rx.try_recv().is_err(), "sender does not hear itself");
}
