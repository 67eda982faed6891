use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::client::{Outbound, Registry, Session};
use crate::config::ServerConfig;
use crate::error::{ChatServerError, handle_error};

/// Handles one chat client over TCP.
///
/// - Splits the stream so other sessions can write to this client while its
///   own task waits on reads.
/// - Runs a `Session` to completion; errors stay local to this connection.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    registry: Registry,
    config: Arc<ServerConfig>,
) {
    info!("Client connected: {}", client_addr);

    let (read_half, write_half) = stream.into_split();
    let session = Session::new(
        read_half,
        Outbound::new(write_half),
        registry,
        config.max_line_length,
        client_addr.to_string(),
    );

    match session.run().await {
        Ok(()) => {}
        Err(ChatServerError::IoError(e)) => {
            info!("Client {} dropped: {}", client_addr, e);
        }
        Err(e) => handle_error(&e),
    }

    info!("Client {} disconnected", client_addr);
}
