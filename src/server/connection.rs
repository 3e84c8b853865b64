// Connection handling module
// Serves one accepted TCP connection over HTTP/1.1

use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::cli::ServeContext;
use crate::handler;
use crate::logger;

/// Per-connection serve budget. Every request is a bounded read from disk;
/// a connection open longer than this is idle keep-alive.
const SERVE_TIMEOUT: Duration = Duration::from_secs(60);

/// Handle a single connection in a spawned task.
///
/// The stream is wrapped in `TokioIo` and served with hyper's HTTP/1.1
/// connection driver. Serve errors cover unparsable requests as well as
/// clients hanging up mid-response; both are logged and end only this
/// connection, never the process.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    ctx: Arc<ServeContext>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let ctx = Arc::clone(&ctx);
                async move { handler::handle_request(req, peer_addr, &ctx).await }
            }),
        );

        match tokio::time::timeout(SERVE_TIMEOUT, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} closed after {}s",
                    SERVE_TIMEOUT.as_secs()
                ));
            }
        }
    });
}
