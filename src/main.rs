use std::sync::Arc;

use clap::Parser;

mod cli;
mod handler;
mod http;
mod logger;
mod server;

use server::signal::ShutdownSignal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Args::parse();
    let ctx = args.into_context()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(ctx))
}

async fn async_main(ctx: cli::ServeContext) -> Result<(), Box<dyn std::error::Error>> {
    let addr = ctx.socket_addr();

    // Bind before any output: a port already in use fails here and the
    // accept loop never starts.
    let listener = server::bind_listener(addr)?;

    let shutdown = Arc::new(ShutdownSignal::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    logger::log_server_start(ctx.port);

    server::run_accept_loop(listener, Arc::new(ctx), shutdown).await
}
