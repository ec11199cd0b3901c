//! End-to-end tests against a hand-rolled TCP fixture standing in for a
//! server: enough of the wire protocol to exercise `connect`/`send`/`wait`
//! without pulling in `posframe-server`.

use std::time::Duration;

use posframe_client::{ClientConfig, ClientSession};
use posframe_proto::{IsoMessage, Packager};
use posframe_testkit::{PosMessage, TlvPackager};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn read_request_and_reply(socket: &mut tokio::net::TcpStream, reply_mti: &str) -> PosMessage {
    let mut len_buf = [0u8; 4];
    socket.read_exact(&mut len_buf).await.expect("read length");
    let len: usize = std::str::from_utf8(&len_buf).unwrap().parse().unwrap();
    let mut body = vec![0u8; len];
    socket.read_exact(&mut body).await.expect("read body");

    let request = TlvPackager.unpack(&body).expect("unpack request");

    let mut response = request.clone();
    response.set_field(0, reply_mti);
    let packed = TlvPackager.pack(&response).expect("pack response");
    let frame = format!("{:04}", packed.len());
    socket.write_all(frame.as_bytes()).await.expect("write length");
    socket.write_all(&packed).await.expect("write body");
    request
}

#[tokio::test]
async fn happy_path_request_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        read_request_and_reply(&mut socket, "0210").await;
    });

    let config = ClientConfig::new("test-client", addr.ip().to_string(), addr.port());
    let session = ClientSession::new(config, TlvPackager);
    session.connect().await.expect("connect");

    let request = PosMessage::new([(0, "0200"), (7, "0227152417")]);
    let response = session.request(request).await.expect("request");

    assert_eq!(response.get_field(0), Some("0210"));
}

#[tokio::test]
async fn wait_times_out_when_no_response_arrives() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        // Accept the connection but never reply — hold it open past the
        // client's timeout.
        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(socket);
    });

    let config = ClientConfig::new("test-client", addr.ip().to_string(), addr.port()).with_timeout(Duration::from_millis(100));
    let session = ClientSession::new(config, TlvPackager);
    session.connect().await.expect("connect");

    let request = PosMessage::new([(0, "0200"), (7, "0227152417")]);
    let err = session.request(request).await.unwrap_err();

    assert!(matches!(err, posframe_client::ClientError::Timeout { .. }));
    assert_eq!(session.pending_count().await, 0, "timed-out slot must be cleaned up");
}

#[tokio::test]
async fn unmatched_response_does_not_wake_an_unrelated_waiter() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        // Reply with an MTI the client never registered a slot for.
        let reply = PosMessage::new([(0, "0430"), (7, "0227152417")]);
        let packed = TlvPackager.pack(&reply).expect("pack");
        let frame = format!("{:04}", packed.len());
        socket.write_all(frame.as_bytes()).await.expect("write length");
        socket.write_all(&packed).await.expect("write body");
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let config = ClientConfig::new("test-client", addr.ip().to_string(), addr.port()).with_timeout(Duration::from_millis(100));
    let session = ClientSession::new(config, TlvPackager);
    session.connect().await.expect("connect");

    let request = PosMessage::new([(0, "0200"), (7, "0227152417")]);
    let err = session.request(request).await.unwrap_err();

    assert!(matches!(err, posframe_client::ClientError::Timeout { .. }));
}

#[tokio::test]
async fn disconnect_is_idempotent_and_leaves_the_session_unconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let config = ClientConfig::new("test-client", addr.ip().to_string(), addr.port());
    let session = ClientSession::new(config, TlvPackager);
    session.connect().await.expect("connect");

    session.disconnect().await.expect("first disconnect");
    session.disconnect().await.expect("second disconnect is a no-op");

    let request = PosMessage::new([(0, "0200"), (7, "0227152417")]);
    let err = session.send(request).await.unwrap_err();
    assert!(matches!(err, posframe_client::ClientError::NotConnected));
}
