//! socket.io push channel using socketioxide.
//!
//! Clients only listen; every feed mutation is emitted to all of them as a
//! `posts` event.

use std::time::Duration;

use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use socketioxide::{SocketIo, extract::SocketRef};
use tokio::net::{TcpListener, ToSocketAddrs};

use agora_core::domain::FeedEvent;
use agora_core::ports::FeedNotifier;

/// Name of the event carrying feed mutations.
pub const POSTS_EVENT: &str = "posts";

/// Pause after a failed `accept` before retrying.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// [`FeedNotifier`] that emits to every connected socket.io client.
#[derive(Clone)]
pub struct SocketIoNotifier {
    io: SocketIo,
}

impl SocketIoNotifier {
    pub fn new(io: SocketIo) -> Self {
        Self { io }
    }
}

impl FeedNotifier for SocketIoNotifier {
    fn publish(&self, event: FeedEvent) {
        let action = event.action();
        if let Err(e) = self.io.emit(POSTS_EVENT, &event) {
            tracing::warn!(action, error = %e, "Failed to emit feed event");
        } else {
            tracing::debug!(action, "Feed event emitted");
        }
    }
}

/// Configure WebSocket handlers.
pub fn configure_socket_handlers(io: &SocketIo) {
    io.ns("/", |socket: SocketRef| {
        tracing::info!(socket_id = %socket.id, "Client connected");

        socket.on_disconnect(|socket: SocketRef| {
            tracing::info!(socket_id = %socket.id, "Client disconnected");
        });
    });
}

/// Bind the socket.io listener and serve it in the background.
pub async fn serve(addr: impl ToSocketAddrs) -> std::io::Result<SocketIoNotifier> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener)
}

/// Serve socket.io on an already bound listener. Must run inside a Tokio runtime.
pub fn serve_listener(listener: TcpListener) -> std::io::Result<SocketIoNotifier> {
    let (svc, io) = SocketIo::new_svc();
    configure_socket_handlers(&io);

    tracing::info!(addr = %listener.local_addr()?, "socket.io listening");

    tokio::spawn(async move {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept socket.io connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            let svc = svc.clone();
            tokio::spawn(async move {
                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .with_upgrades()
                    .await
                {
                    tracing::debug!(peer = %peer, error = %e, "socket.io connection closed");
                }
            });
        }
    });

    Ok(SocketIoNotifier::new(io))
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_publish_without_clients() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let notifier = serve_listener(listener).unwrap();

        notifier.publish(FeedEvent::Delete {
            post_id: Uuid::new_v4(),
        });
    }

    #[tokio::test]
    async fn test_serves_socket_io_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _notifier = serve_listener(listener).unwrap();

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                format!(
                    "GET /socket.io/?EIO=4&transport=polling HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
                )
                .as_bytes(),
            )
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("\"sid\""), "{response}");
    }
}
