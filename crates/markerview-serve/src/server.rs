//! Web server setup and routing

use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use markerview_core::Catalog;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::{ServeConfig, TlsConfig};

/// Shared state for API handlers
#[derive(Debug)]
pub struct ServerState {
    /// Models in the catalog embedded in the page
    pub models: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub models: usize,
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        models: state.models,
    })
}

/// Build the router: API, marker datasets and the page itself
pub fn router(config: &ServeConfig, state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Compiled marker datasets
        .nest_service("/targets", ServeDir::new(&config.dataset_dir))
        // Static files (WASM frontend) - must be fallback for root
        .fallback_service(ServeDir::new(&config.web_root))
        // CORS, so pages hosted elsewhere can load our datasets via ?dataset=
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the web server (HTTP or HTTPS depending on config)
pub async fn run(config: &ServeConfig) -> Result<()> {
    let catalog = Catalog::builtin()?;
    info!(models = catalog.len(), "Catalog loaded");

    if !config.web_root.join("index.html").exists() {
        warn!(web_root = %config.web_root.display(), "No index.html in web root");
    }
    if !config.dataset_dir.is_dir() {
        warn!(dataset_dir = %config.dataset_dir.display(), "Marker dataset directory not found");
    }

    let state = Arc::new(ServerState {
        models: catalog.len(),
    });
    let app = router(config, state);

    if let Some(tls_config) = &config.tls {
        run_https(app, &config.bind, tls_config).await
    } else {
        warn!("Serving over plain HTTP; mobile browsers only allow the camera on localhost or HTTPS");
        run_http(app, &config.bind).await
    }
}

/// Run plain HTTP server
async fn run_http(app: Router, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, protocol = "HTTP", "Starting web server");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Run HTTPS server with TLS
async fn run_https(app: Router, bind: &str, tls: &TlsConfig) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::path::PathBuf;

    let cert_path = PathBuf::from(&tls.cert);
    let key_path = PathBuf::from(&tls.key);

    if !cert_path.exists() {
        anyhow::bail!("TLS certificate file not found: {}", tls.cert);
    }
    if !key_path.exists() {
        anyhow::bail!("TLS key file not found: {}", tls.key);
    }

    let rustls_config = RustlsConfig::from_pem_file(&cert_path, &key_path).await?;

    let addr: std::net::SocketAddr = bind.parse()?;
    info!(address = %bind, protocol = "HTTPS", cert = %tls.cert, "Starting web server with TLS");

    axum_server::bind_rustls(addr, rustls_config)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(temp_dir: &TempDir) -> Router {
        let web_root = temp_dir.path().join("web");
        let dataset_dir = temp_dir.path().join("targets");
        std::fs::create_dir_all(&web_root).unwrap();
        std::fs::create_dir_all(&dataset_dir).unwrap();
        std::fs::write(web_root.join("index.html"), "<html>markerview</html>").unwrap();
        std::fs::write(dataset_dir.join("targets.mind"), [0u8, 1, 2, 3]).unwrap();

        let config = ServeConfig {
            web_root,
            dataset_dir,
            ..ServeConfig::default()
        };
        router(&config, Arc::new(ServerState { models: 9 }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let temp_dir = TempDir::new().unwrap();
        let (status, body) = get(test_app(&temp_dir), "/api/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["models"], 9);
    }

    #[tokio::test]
    async fn test_serves_page_and_datasets() {
        let temp_dir = TempDir::new().unwrap();

        let (status, body) = get(test_app(&temp_dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>markerview</html>");

        let (status, body) = get(test_app(&temp_dir), "/targets/targets.mind").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, vec![0u8, 1, 2, 3]);

        let (status, _) = get(test_app(&temp_dir), "/targets/missing.mind").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
