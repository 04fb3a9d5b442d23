//! Plain HTTP surface of the listener.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use waypoint::transport::{Server, STATUS_TEXT};
use waypoint::{Node, ServerConfig};

#[tokio::test]
async fn test_root_serves_status_text() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let server = Server::new(Node::new(), ServerConfig::default()).expect("server");
    let serving = tokio::spawn(server.serve(listener));

    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.ends_with(STATUS_TEXT), "got: {response}");

    serving.abort();
}
