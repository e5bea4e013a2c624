use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context as _;
use axum::{
    handler::HandlerWithoutStateExt, http::StatusCode, routing::get, Router,
};
use tokio::net::TcpListener;
use toml::{map::Map, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

pub fn init_config(config: &Map<String, Value>) -> anyhow::Result<Config> {
    let Some(port) = config.get("server").and_then(|server| server.get("port"))
    else {
        return Ok(Config::default());
    };

    let port = port.as_integer().context("failed to parse port config")?;
    let port = u16::try_from(port).context("port config is out of range")?;

    Ok(Config { port })
}

/// Serves an exported site. `/` answers with `index.html`.
pub fn router(out_dir: PathBuf) -> Router {
    let exported =
        ServeDir::new(out_dir).not_found_service(get_404.into_service());

    Router::new()
        .route("/healthz", get(get_health))
        .fallback_service(exported)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(out_dir: PathBuf, config: Config) -> anyhow::Result<()> {
    info!(
        task = "start preview serving",
        out_dir = %out_dir.display(),
        port = config.port,
    );

    let address = SocketAddr::from((Ipv4Addr::LOCALHOST, config.port));
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    Ok(axum::serve(listener, router(out_dir)).await?)
}

async fn get_health() -> StatusCode {
    StatusCode::OK
}

async fn get_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod test {
    use std::fs;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use tower::ServiceExt;

    use super::*;

    fn exported() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<title>Warp</title>")
            .unwrap();
        fs::write(dir.path().join("globals.css"), "body {}").unwrap();
        dir
    }

    async fn request(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index() {
        let dir = exported();

        let (status, body) =
            request(router(dir.path().to_path_buf()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<title>Warp</title>");
    }

    #[tokio::test]
    async fn test_stylesheet() {
        let dir = exported();

        let (status, body) =
            request(router(dir.path().to_path_buf()), "/globals.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");
    }

    #[tokio::test]
    async fn test_healthz() {
        let dir = exported();

        let (status, _) =
            request(router(dir.path().to_path_buf()), "/healthz").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_found() {
        let dir = exported();

        let (status, _) =
            request(router(dir.path().to_path_buf()), "/getting-started").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_init_config() {
        let config =
            toml::from_str::<Map<String, Value>>("[server]\nport = 8080\n")
                .unwrap();
        let invalid =
            toml::from_str::<Map<String, Value>>("[server]\nport = 70000\n")
                .unwrap();

        assert_eq!(init_config(&config).unwrap(), Config { port: 8080 });
        assert_eq!(init_config(&Map::new()).unwrap(), Config::default());
        assert!(init_config(&invalid).is_err());
    }
}
