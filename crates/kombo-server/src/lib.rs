//! Local static file server for the Koala Kombo web bundle.
//!
//! Serves the staging directory over plain HTTP for manual browser testing.
//! There is no authentication, TLS or caching policy; this is not meant for
//! production hosting.

pub mod error;
mod listing;

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{ServerError, ServerResult};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

/// Router serving files under `root`.
///
/// Directory requests resolve to their `index.html`, or to a generated
/// listing when there is none. Content types are guessed from file
/// extensions.
pub fn create_router(root: impl AsRef<Path>) -> Router {
    let root = Arc::new(root.as_ref().to_path_buf());

    Router::new()
        .fallback(serve_bundle)
        .layer(TraceLayer::new_for_http())
        .with_state(root)
}

async fn serve_bundle(State(root): State<Arc<PathBuf>>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    let files = ServeDir::new(root.as_path()).append_index_html_on_directories(true);

    let response = match files.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND && path.ends_with('/') {
        if let Some(listing) = listing::render(&root, &path).await {
            return listing.into_response();
        }
    }

    response.map(Body::new)
}

/// Bind the listener for `config`.
pub async fn bind(config: &ServerConfig) -> ServerResult<TcpListener> {
    let addr = config.socket_addr()?;
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve `root` on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(listener: TcpListener, root: &Path, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if !root.is_dir() {
        return Err(ServerError::RootMissing(root.to_path_buf()));
    }

    let app = create_router(root);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    Ok(())
}

/// Serve `root` until Ctrl+C.
pub async fn serve(root: impl AsRef<Path>, config: ServerConfig) -> ServerResult<()> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ServerError::RootMissing(root.to_path_buf()));
    }

    let listener = bind(&config).await?;
    serve_until_interrupt(listener, root).await
}

/// Serve `root` on an already bound listener until Ctrl+C.
pub async fn serve_until_interrupt(listener: TcpListener, root: &Path) -> ServerResult<()> {
    tracing::info!(
        "Serving {} at http://{}",
        root.display(),
        listener.local_addr()?
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    serve_with_shutdown(listener, root, async move {
        let _ = shutdown_rx.await;
    })
    .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            port: 8080,
        };
        assert!(matches!(config.socket_addr(), Err(ServerError::InvalidAddress(_))));
    }
}
