//! WebSocket sessions against a live listener.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use waypoint::transport::{Server, PEER_PREFIX, WELCOME_TEXT};
use waypoint::{Node, ServerConfig};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(2);

async fn start(node: &Node) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = Server::new(node.clone(), ServerConfig::default()).expect("server");
    tokio::spawn(server.serve(listener));
    addr
}

/// Connect and consume the welcome frame.
async fn connect(addr: SocketAddr) -> Client {
    let (mut client, _) = connect_async(format!("ws://{addr}/"))
        .await
        .expect("connect");
    assert_eq!(next_text(&mut client).await, WELCOME_TEXT);
    client
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let frame = tokio::time::timeout(WAIT, client.next())
            .await
            .expect("frame in time")
            .expect("connection open")
            .expect("valid frame");
        if let WsMessage::Text(text) = frame {
            return text;
        }
    }
}

fn peers(node: &Node) -> usize {
    node.workers()
        .iter()
        .filter(|a| a.as_str().starts_with(PEER_PREFIX))
        .count()
}

#[tokio::test]
async fn test_client_is_welcomed_and_registered() {
    let node = Node::new();
    let addr = start(&node).await;

    let _client = connect(addr).await;
    assert_eq!(peers(&node), 1);
}

#[tokio::test]
async fn test_text_reaches_other_clients() {
    let node = Node::new();
    let addr = start(&node).await;

    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;

    alice
        .send(WsMessage::Text("hello bob".into()))
        .await
        .expect("send");
    assert_eq!(next_text(&mut bob).await, "hello bob");
}

#[tokio::test]
async fn test_bad_frames_are_answered_and_connection_stays_open() {
    let node = Node::new();
    let addr = start(&node).await;
    let mut client = connect(addr).await;

    client
        .send(WsMessage::Text("{not json".into()))
        .await
        .expect("send");
    let reply = next_text(&mut client).await;
    assert!(reply.starts_with("error: invalid frame"), "got: {reply}");

    client
        .send(WsMessage::Text(
            r#"{"onward_route": ["nowhere"], "payload": "x"}"#.into(),
        ))
        .await
        .expect("send");
    let reply = next_text(&mut client).await;
    assert!(reply.starts_with("error: routing failed"), "got: {reply}");
    assert!(reply.contains("nowhere"), "got: {reply}");
}

#[tokio::test]
async fn test_disconnect_stops_peer_worker() {
    let node = Node::new();
    let addr = start(&node).await;
    let mut client = connect(addr).await;
    assert_eq!(peers(&node), 1);

    client.close(None).await.expect("close");

    tokio::time::timeout(WAIT, async {
        while peers(&node) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("peer worker removed after disconnect");
    assert!(node.has_worker(&"broadcast".into()));
}
