//! Web server setup and routing

use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::api;
use crate::config::TlsConfig;
use crate::state::AppState;

/// Build the router: API routes, the asset directory and the web bundle
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // API routes
        .route("/api", get(api::api_status))
        .route("/api/health", get(api::health))
        .route("/api/config", get(api::get_viewer_config))
        // Avatar and other model assets
        .nest_service("/assets", ServeDir::new(&state.config.assets.path))
        // Static files (WASM frontend) - must be fallback for root
        .fallback_service(ServeDir::new(&state.config.web.path))
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the web server (HTTP or HTTPS depending on config)
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let bind = state.config.server.bind.clone();
    let tls = state.config.server.tls.clone();
    let app = router(state);

    if let Some(tls_config) = tls {
        run_https(app, &bind, &tls_config).await
    } else {
        run_http(app, &bind).await
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
    use crate::config::{AssetsConfig, Config, WebConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Fixture {
        _dir: TempDir,
        app: Router,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("web");
        let assets = dir.path().join("assets");
        std::fs::create_dir_all(&web).unwrap();
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(web.join("index.html"), "<canvas id=\"twin-canvas\"></canvas>").unwrap();
        std::fs::write(assets.join("avatar.glb"), b"glTF").unwrap();

        let config = Config {
            web: WebConfig {
                path: web.to_string_lossy().into_owned(),
            },
            assets: AssetsConfig {
                path: assets.to_string_lossy().into_owned(),
            },
            ..Config::default()
        };
        Fixture {
            _dir: dir,
            app: router(AppState::new(config)),
        }
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> serde_json::Value {
        let (status, body) = get(app, uri).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_and_health() {
        let f = fixture();
        assert_eq!(
            get_json(&f.app, "/api").await,
            serde_json::json!({"status": "ok", "message": "BodyClone API is running"})
        );
        assert_eq!(
            get_json(&f.app, "/api/health").await,
            serde_json::json!({"status": "healthy"})
        );
    }

    #[tokio::test]
    async fn test_viewer_config() {
        let f = fixture();
        let config = get_json(&f.app, "/api/config").await;
        assert_eq!(config["default_mood"], "calm");
        assert_eq!(config["asset_path"], "/avatar.glb");
        assert_eq!(config["selector"].as_array().map(Vec::len), Some(4));
        assert_eq!(config["selector"][2]["label"], "Medication");
        assert_eq!(config["selector"][2]["mood"], "care");
    }

    #[tokio::test]
    async fn test_serves_avatar_and_bundle() {
        let f = fixture();
        assert_eq!(get(&f.app, "/assets/avatar.glb").await, (StatusCode::OK, b"glTF".to_vec()));

        let (status, body) = get(&f.app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("twin-canvas"));

        let (status, _) = get(&f.app, "/assets/missing.glb").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let f = fixture();
        let response = f
            .app
            .clone()
            .oneshot(
                Request::get("/api/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_https_requires_cert_files() {
        let f = fixture();
        let tls = TlsConfig {
            cert: "/nonexistent/cert.pem".to_string(),
            key: "/nonexistent/key.pem".to_string(),
        };
        let err = run_https(f.app, "127.0.0.1:0", &tls).await.unwrap_err();
        assert!(err.to_string().contains("certificate"));
    }
}
