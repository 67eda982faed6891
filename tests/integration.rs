use std::net::SocketAddr;
use std::time::Duration;

use mc_chat_server::{Registry, Server, ServerConfig};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::{sleep, timeout};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

// Start a server on an ephemeral port in a background task
async fn start_test_server() -> (SocketAddr, Registry) {
    let server = Server::bind(ServerConfig::ephemeral()).await.unwrap();
    let addr = server.local_addr().unwrap();
    let registry = server.registry().clone();
    tokio::spawn(async move { server.start().await });
    (addr, registry)
}

struct Peer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Peer {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    // Connect and register, consuming the listing acknowledgment
    async fn register(addr: SocketAddr, handle: &str) -> (Self, String) {
        let mut peer = Self::connect(addr).await;
        peer.send_command(handle).await;
        let ack = peer.read_response().await;
        (peer, ack)
    }

    async fn send_command(&mut self, command: &str) {
        self.writer
            .write_all(format!("{}\n", command).as_bytes())
            .await
            .unwrap();
    }

    async fn read_response(&mut self) -> String {
        let mut line = String::new();
        timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for server")
            .unwrap();
        line.trim_end_matches('\n').to_string()
    }

    // Asserts nothing arrives within a short window
    async fn assert_silent(&mut self) {
        let mut buf = [0u8; 64];
        let read = timeout(Duration::from_millis(200), self.reader.read(&mut buf)).await;
        assert!(read.is_err(), "unexpected data: {:?}", read);
    }
}

async fn wait_until_offline(registry: &Registry, handle: &str) {
    for _ in 0..100 {
        if !registry.list_handles().iter().any(|h| h == handle) {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("{} still registered", handle);
}

#[tokio::test]
async fn test_registration_lists_online_users() {
    let (addr, _registry) = start_test_server().await;

    let (_alice, ack) = Peer::register(addr, "alice").await;
    assert_eq!(ack, "Online Users alice");

    let (_bob, ack) = Peer::register(addr, "bob").await;
    assert_eq!(ack, "Online Users alice bob");
}

#[tokio::test]
async fn test_duplicate_handle_closes_connection() {
    let (addr, registry) = start_test_server().await;
    let (_alice, _) = Peer::register(addr, "alice").await;

    let (mut imposter, response) = Peer::register(addr, "alice").await;
    assert_eq!(response, "Handle Already In Use");

    let mut rest = String::new();
    imposter.reader.read_to_string(&mut rest).await.unwrap();
    assert!(rest.is_empty());
    assert_eq!(registry.list_handles(), vec!["alice"]);
}

#[tokio::test]
async fn test_routing_reaches_only_the_recipient() {
    let (addr, _registry) = start_test_server().await;
    let (mut a, _) = Peer::register(addr, "A").await;
    let (mut b, _) = Peer::register(addr, "B").await;
    let (mut c, _) = Peer::register(addr, "C").await;

    a.send_command("B: hello").await;

    assert_eq!(b.read_response().await, "A : hello");
    a.assert_silent().await;
    c.assert_silent().await;
}

#[tokio::test]
async fn test_unknown_recipient() {
    let (addr, _registry) = start_test_server().await;
    let (mut a, _) = Peer::register(addr, "A").await;
    let (mut b, _) = Peer::register(addr, "B").await;

    a.send_command("ghost: hi").await;

    assert_eq!(a.read_response().await, "User Not Online: ghost");
    b.assert_silent().await;
}

#[tokio::test]
async fn test_malformed_input_then_valid_command() {
    let (addr, _registry) = start_test_server().await;
    let (mut a, _) = Peer::register(addr, "A").await;
    let (mut b, _) = Peer::register(addr, "B").await;

    a.send_command("just words").await;
    assert_eq!(a.read_response().await, "Please Enter ValidUser: Message");

    a.send_command("B:  ").await;
    assert_eq!(a.read_response().await, "Please Enter ValidUser: Message");

    a.send_command("B: second try").await;
    assert_eq!(b.read_response().await, "A : second try");
}

#[tokio::test]
async fn test_disconnect_removes_handle() {
    let (addr, registry) = start_test_server().await;
    let (mut a, _) = Peer::register(addr, "A").await;
    let (b, _) = Peer::register(addr, "B").await;

    drop(b);
    wait_until_offline(&registry, "B").await;

    a.send_command("SHOW USERS").await;
    assert_eq!(a.read_response().await, "Online Users A");

    // The freed handle can be taken again
    let (_b2, ack) = Peer::register(addr, "B").await;
    assert_eq!(ack, "Online Users A B");
}

#[tokio::test]
async fn test_concurrent_registration_admits_one() {
    let (addr, registry) = start_test_server().await;

    let attempts: Vec<_> = (0..16)
        .map(|_| tokio::spawn(async move { Peer::register(addr, "contested").await }))
        .collect();

    let mut peers = Vec::new();
    let mut admitted = 0;
    for attempt in attempts {
        let (peer, response) = attempt.await.unwrap();
        if response.starts_with("Online Users") {
            admitted += 1;
        } else {
            assert_eq!(response, "Handle Already In Use");
        }
        peers.push(peer);
    }

    assert_eq!(admitted, 1);
    assert_eq!(registry.list_handles(), vec!["contested"]);
}

#[tokio::test]
async fn test_crlf_clients_are_understood() {
    let (addr, _registry) = start_test_server().await;
    let (mut a, _) = Peer::register(addr, "A\r").await;
    let (mut b, _) = Peer::register(addr, "B").await;

    a.writer.write_all(b"SHOW USERS\r\n").await.unwrap();
    assert_eq!(a.read_response().await, "Online Users A B");

    a.writer.write_all(b"B: over\r\n").await.unwrap();
    assert_eq!(b.read_response().await, "A : over");
}
