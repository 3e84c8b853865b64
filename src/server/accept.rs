// Accept loop module
// Accepts connections until the shutdown signal fires

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use super::signal::ShutdownSignal;
use crate::cli::ServeContext;
use crate::logger;

/// Accept connections until interrupted.
///
/// Each accepted stream is served on its own task. Accept errors are logged
/// and the loop keeps going; a single bad connection never stops the
/// server. The loop exits only when the shutdown signal fires, dropping the
/// listener and leaving in-flight responses to finish or be abandoned with
/// the process.
pub async fn run_accept_loop(
    listener: TcpListener,
    ctx: Arc<ServeContext>,
    shutdown: Arc<ShutdownSignal>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&ctx));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.wait() => {
                logger::log_shutdown();
                break;
            }
        }
    }

    // Dropping the listener closes the socket; nothing else to tear down.
    drop(listener);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::bind_listener;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    #[tokio::test]
    async fn loop_exits_on_shutdown() {
        let listener =
            bind_listener(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).expect("ephemeral bind");
        let ctx = Arc::new(ServeContext {
            root: PathBuf::from("."),
            port: 0,
        });
        let shutdown = Arc::new(ShutdownSignal::new());

        shutdown.request();
        run_accept_loop(listener, ctx, shutdown)
            .await
            .expect("clean exit");
    }
}
