use clap::Parser;
use tracing_subscriber::EnvFilter;

use webserv::config::{Cli, Config};
use webserv::console;
use webserv::server::Server;
use webserv::tls::{Plaintext, SecureTransport, TlsTransport};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let code = match start().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    // Exit straight away: in-flight sessions and the blocking stdin reader
    // are not waited for.
    std::process::exit(code);
}

async fn start() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_config()?;

    if cfg.tls.enabled {
        tracing::info!(cert = %cfg.tls.cert.display(), key = %cfg.tls.key.display(), "loading TLS material");
        let transport = TlsTransport::from_pem_files(&cfg.tls.cert, &cfg.tls.key)?;
        serve(cfg, transport).await
    } else {
        tracing::warn!("TLS disabled, serving plain HTTP");
        serve(cfg, Plaintext).await
    }
}

async fn serve<T: SecureTransport>(cfg: Config, transport: T) -> anyhow::Result<()> {
    tracing::info!("Attempting to create socket on {}", cfg.listen_addr());

    let server = Server::new(cfg, transport);
    let status = server.status();

    tokio::select! {
        res = server.run() => {
            res?;
        }

        res = console::run(status) => {
            res?;
            tracing::info!("Server closed");
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
