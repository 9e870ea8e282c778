use std::net::{Ipv4Addr, SocketAddr};

use todo_core::config::DEFAULT_PORT;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    setup_logging();

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    todo_server::run_until(listener, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server just runs until killed.
        tracing::error!(%err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}
