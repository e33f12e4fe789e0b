//! Accept loop and per-connection request handling.

use crate::config::ServerConfig;
use crate::error::{Result, SwiftQueueError};
use crate::observability::observability;
use crate::protocol::{build_minimal_response, frame_len, handle_request};
use bytes::BytesMut;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Bind `config.address()` and serve until the process exits.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    run_server_on_listener(Arc::new(config), listener).await
}

/// Serve on an existing listener (e.g. from bind("127.0.0.1:0")).
pub async fn run_server_on_listener(
    config: Arc<ServerConfig>,
    listener: TcpListener,
) -> Result<()> {
    serve_with_shutdown(config, listener, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then stop accepting and give in-flight
/// connections up to `shutdown_timeout` to finish.
pub async fn serve_with_shutdown<F>(
    config: Arc<ServerConfig>,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let addr = listener.local_addr()?;
    info!("SwiftQueue server listening on {}", addr);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(x) => x,
                    Err(e) => {
                        error!("accept error: {}", e);
                        continue;
                    }
                };
                observability().record_connection();
                while connections.try_join_next().is_some() {}
                let config = Arc::clone(&config);
                connections.spawn(async move {
                    info!(%peer, "new connection");
                    if let Err(e) = handle_connection(config, stream).await {
                        error!("connection {} error: {}", peer, e);
                    }
                });
            }
        }
    }

    drop(listener);
    info!(
        open = connections.len(),
        "shutting down, waiting for open connections"
    );
    let drain = async { while connections.join_next().await.is_some() {} };
    let drained = tokio::time::timeout(config.shutdown_timeout, drain)
        .await
        .is_ok();
    if drained {
        info!("all connections closed");
    } else {
        warn!("shutdown timeout exceeded, aborting open connections");
        connections.abort_all();
    }
    Ok(())
}

async fn handle_connection(config: Arc<ServerConfig>, mut stream: TcpStream) -> Result<()> {
    let mut read_buf = BytesMut::with_capacity(config.max_buffer_size);
    loop {
        read_buf.reserve(config.max_buffer_size);
        let read = stream.read_buf(&mut read_buf);
        let n = match tokio::time::timeout(config.read_timeout, read).await {
            Ok(n) => n?,
            Err(_) => {
                info!("read timeout, closing connection");
                return Ok(());
            }
        };
        if n == 0 {
            debug!("client closed connection");
            break;
        }

        while let Some(len) = frame_len(&read_buf)? {
            let frame = read_buf.split_to(len);
            let (api_key, version) = peek_api(&frame);
            let span = tracing::info_span!("swiftqueue.request", api_key, version);
            let response = {
                let _entered = span.enter();
                let started = Instant::now();
                let (response, ok) = match handle_request(&config, &frame) {
                    Ok(r) => (Some(r), true),
                    Err(e @ (SwiftQueueError::Truncated(_) | SwiftQueueError::Malformed(_))) => {
                        error!("dropping request: {}", e);
                        (None, false)
                    }
                    Err(e) => {
                        error!("request error: {}", e);
                        (Some(build_minimal_response()), false)
                    }
                };
                observability().record_request(started.elapsed(), ok);
                response
            };
            let Some(response) = response else {
                continue;
            };

            debug!(len = response.len(), "response");
            match tokio::time::timeout(config.write_timeout, stream.write_all(&response)).await {
                Ok(written) => written?,
                Err(_) => {
                    return Err(SwiftQueueError::Io(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "write timeout",
                    )))
                }
            }
            stream.flush().await?;
        }
    }
    Ok(())
}

fn peek_api(frame: &[u8]) -> (i16, i16) {
    if frame.len() < 8 {
        return (-1, -1);
    }
    (
        i16::from_be_bytes([frame[4], frame[5]]),
        i16::from_be_bytes([frame[6], frame[7]]),
    )
}
