//! Folio IIIF Server - IIIF Image API front door for an FSI-style renderer.
//!
//! This binary serves the IIIF Image API request grammar on top of
//! `folio-iiif-http`, resolving image geometry against the renderer's
//! metadata and proxying rendered bytes back to the caller. It exposes a
//! health check endpoint for orchestration systems.
//!
//! # Usage
//!
//! ```text
//! IIIF_LISTEN=0.0.0.0:8182 folio-iiif-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IIIF_LISTEN` | `0.0.0.0:8182` | Bind address |
//! | `IIIF_PUBLIC_BASE_URL` | `http://localhost:8182/iiif` | Base of `@id` URLs |
//! | `IIIF_BACKEND_URL` | `http://localhost:8080/fsi/server` | Renderer base URL |
//! | `IIIF_BACKEND_TIMEOUT_SECS` | `30` | Renderer fetch timeout |
//! | `IIIF_COMPLIANCE_LEVEL` | `level2` | Advertised compliance level |
//! | `IIIF_DEFAULT_FORMAT` | `jpg` | Format for bare-identifier requests |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use folio_iiif_backend::FsiBackend;
use folio_iiif_core::{FolioIiif, ServiceConfig};
use folio_iiif_http::IiifHttpService;

use crate::handler::FolioHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the engine provider from the service configuration.
///
/// The FSI-style backend serves both collaborator roles: it answers
/// dimension lookups from the renderer's metadata endpoint and fetches
/// rendered image bytes.
fn build_provider(config: &ServiceConfig) -> Result<FolioIiif> {
    let backend = Arc::new(
        FsiBackend::new(
            &config.backend_base_url,
            Duration::from_secs(config.backend_timeout_secs),
        )
        .context("failed to build render backend client")?,
    );

    Ok(FolioIiif::new(config.clone(), backend.clone(), backend))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: folio_iiif_http::IiifHandler>(
    listener: TcpListener,
    service: IiifHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the
/// health endpoint.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = ServiceConfig::from_env();
        let addr = config.listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = ServiceConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        listen = %config.listen,
        public_base_url = %config.public_base_url,
        backend_base_url = %config.backend_base_url,
        compliance_level = %config.compliance_level.uri(),
        version = VERSION,
        "starting Folio IIIF Server",
    );

    let provider = build_provider(&config)?;
    let handler = FolioHandler(provider);
    let service = IiifHttpService::new(handler, config.default_format);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
