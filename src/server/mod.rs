//! Development server: static files from the project root plus live reload.
//!
//! HTML pages get the live-reload client injected; everything else is
//! handed to [`ServeDir`] unchanged.

pub mod livereload;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    extract::{Request, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt as _;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use livereload::{ReloadEvent, SCRIPT_PATH, SOCKET_PATH};

/// Shared server state.
#[derive(Debug)]
pub struct ServerState {
    root: PathBuf,
    events: broadcast::Sender<ReloadEvent>,
}

impl ServerState {
    /// Serve `root`, forwarding everything sent on `events` to browsers.
    #[must_use]
    pub const fn new(root: PathBuf, events: broadcast::Sender<ReloadEvent>) -> Self {
        Self { root, events }
    }

    fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.events.subscribe()
    }
}

/// Build the router.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(SOCKET_PATH, get(livereload::websocket_handler))
        .route(SCRIPT_PATH, get(livereload::client_script))
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails or the task is aborted.
///
/// # Errors
///
/// Returns an error if the server stops on an I/O error.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Serve a file from the root, injecting the live-reload script into HTML.
async fn serve_file(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    if let Some(path) = html_path(&state.root, request.uri().path()) {
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => {
                return (
                    [(header::CACHE_CONTROL, "no-cache")],
                    Html(livereload::inject_livereload(&html)),
                )
                    .into_response();
            }
            Err(e) => debug!("not injecting into {}: {e}", path.display()),
        }
    }

    match ServeDir::new(&state.root).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// The HTML file a request path refers to, if it looks like one.
///
/// The path is percent-decoded first, as [`ServeDir`] does, so
/// `/about%20us.html` names `about us.html`.  Paths ending in `/` map to
/// their `index.html`.  A `..` segment or a path that is not UTF-8 once
/// decoded is rejected so the result always stays under `root`;
/// [`ServeDir`] then answers those requests itself.
fn html_path(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let uri_path = percent_decode_str(uri_path).decode_utf8().ok()?;
    let mut path = root.to_path_buf();
    for segment in uri_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => path.push(s),
        }
    }
    if uri_path.ends_with('/') || uri_path.is_empty() {
        path.push("index.html");
    }
    is_html(&path).then_some(path)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{self, StatusCode};
    use tower::ServiceExt as _;

    fn app(root: &Path) -> Router {
        let (events, _) = broadcast::channel(4);
        router(Arc::new(ServerState::new(root.to_path_buf(), events)))
    }

    async fn get_body(root: &Path, uri: &str) -> (StatusCode, String) {
        let response = app(root)
            .oneshot(http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn html_path_mapping() {
        let root = Path::new("/site");
        assert_eq!(html_path(root, "/"), Some(PathBuf::from("/site/index.html")));
        assert_eq!(
            html_path(root, "/about/"),
            Some(PathBuf::from("/site/about/index.html"))
        );
        assert_eq!(
            html_path(root, "/about.HTML"),
            Some(PathBuf::from("/site/about.HTML"))
        );
        assert_eq!(html_path(root, "/css/site.css"), None);
        assert_eq!(html_path(root, "/../etc/passwd.html"), None);
    }

    #[test]
    fn html_path_is_percent_decoded() {
        let root = Path::new("/site");
        assert_eq!(
            html_path(root, "/about%20us.html"),
            Some(PathBuf::from("/site/about us.html"))
        );
        assert_eq!(html_path(root, "/%2e%2e/etc/passwd.html"), None);
        assert_eq!(html_path(root, "/a%2F..%2F..%2Fsecret.html"), None);
        assert_eq!(html_path(root, "/%ff.html"), None);
    }

    #[tokio::test]
    async fn encoded_page_name_gets_livereload_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("about us.html"),
            "<html><body><h2>About</h2></body></html>",
        )
        .unwrap();

        let (status, body) = get_body(dir.path(), "/about%20us.html").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(livereload::SCRIPT_TAG), "{body}");
    }

    #[tokio::test]
    async fn index_gets_livereload_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.html"),
            "<html><body><h1>Agency</h1></body></html>",
        )
        .unwrap();

        let (status, body) = get_body(dir.path(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(livereload::SCRIPT_TAG), "{body}");
        assert!(body.find(livereload::SCRIPT_TAG) < body.find("</body>"));
    }

    #[tokio::test]
    async fn stylesheets_are_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.min.css"), ".a{color:red}").unwrap();

        let (status, body) = get_body(dir.path(), "/css/site.min.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, ".a{color:red}");
    }

    #[tokio::test]
    async fn client_script_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_body(dir.path(), SCRIPT_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, livereload::CLIENT_SCRIPT);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get_body(dir.path(), "/nope.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
