use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::site::Site;

/// Accepts connections forever.
///
/// By default each connection is served to completion before the next one is
/// accepted. With `server.concurrent` every connection gets its own task.
/// Failures on one connection are logged and never stop the loop.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, Arc::new(Site::from_config(cfg)), cfg.server.concurrent).await
}

pub async fn serve(listener: TcpListener, site: Arc<Site>, concurrent: bool) -> anyhow::Result<()> {
    match &site.resolver {
        Some(resolver) => info!(root = %resolver.document_root().display(), "Serving static files"),
        None => info!("Serving canned greeting"),
    }

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let mut conn = Connection::new(socket, Arc::clone(&site));

        if concurrent {
            tokio::spawn(async move {
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {:#}", peer, e);
                }
            });
        } else if let Err(e) = conn.run().await {
            tracing::error!("Connection error from {}: {:#}", peer, e);
        }
    }
}
