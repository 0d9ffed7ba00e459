//! Development server with live reload and a live graph endpoint

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::graph::GraphSnapshot;
use crate::helpers::decode;
use crate::watcher;
use crate::Garden;

/// Injected before `</body>`; reloads when told to, or once the server
/// comes back after a restart
const LIVE_RELOAD_SNIPPET: &str = r#"<script>
(function connect(retry) {
  var socket = new WebSocket('ws://' + location.host + '/__livereload');
  socket.onopen = function () { if (retry) { location.reload(); } };
  socket.onmessage = function (event) { if (event.data === 'reload') { location.reload(); } };
  socket.onclose = function () { setTimeout(function () { connect(true); }, 1000); };
})(false);
</script>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    /// Replaced wholesale after every rebuild
    snapshot: RwLock<Arc<GraphSnapshot>>,
}

impl ServerState {
    fn snapshot(&self) -> Arc<GraphSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    fn replace_snapshot(&self, snapshot: GraphSnapshot) {
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(snapshot);
    }
}

/// Start the development server over an already generated site
pub async fn start(
    garden: &Garden,
    snapshot: GraphSnapshot,
    ip: &str,
    port: u16,
    watch: bool,
    open: bool,
) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: garden.public_dir.clone(),
        reload_tx,
        live_reload: watch,
        snapshot: RwLock::new(Arc::new(snapshot)),
    });

    let app = Router::new()
        .route("/api/content-graph", get(content_graph_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let garden = garden.clone();
        let state = Arc::clone(&state);

        tokio::task::spawn_blocking(move || {
            let rebuilt = |snapshot: GraphSnapshot| {
                state.replace_snapshot(snapshot);
                let _ = state.reload_tx.send(());
            };
            if let Err(e) = watcher::watch(&garden, rebuilt) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The current graph snapshot as `{"graph": [...]}`
async fn content_graph_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.snapshot().to_json() {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize snapshot: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Forward rebuild notifications to one browser until either side hangs up
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        let keep_open = tokio::select! {
            notified = reload_rx.recv() => match notified {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => socket
                    .send(Message::Text("reload".to_string()))
                    .await
                    .is_ok(),
                Err(broadcast::error::RecvError::Closed) => false,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Ping(payload))) => socket.send(Message::Pong(payload)).await.is_ok(),
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => false,
                Some(Ok(_)) => true,
            },
        };
        if !keep_open {
            break;
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serves pages with the live reload script injected, everything else
/// through tower-http
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let html_path = resolve_page(&state.public_dir, request.uri().path());

    match html_path {
        Some(file_path) if state.live_reload => match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        },
        _ => {
            let mut service =
                ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
            match service.try_call(request).await {
                Ok(response) => response.into_response(),
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
            }
        }
    }
}

/// The HTML file a request path maps to, if any.
///
/// Segments are percent-decoded; `..` or backslashes never resolve.
fn resolve_page(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let mut candidate = public_dir.to_path_buf();
    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        let segment = decode(segment);
        if segment == "." || segment == ".." || segment.contains('\\') || segment.contains('/') {
            return None;
        }
        candidate.push(segment);
    }

    if candidate.is_dir() {
        candidate.push("index.html");
    }

    let is_html = candidate
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    (is_html && candidate.is_file()).then_some(candidate)
}

/// Insert the live reload snippet before the first `</body>`, or append it
fn inject_live_reload(html: &str) -> String {
    let at = html.find("</body>").unwrap_or(html.len());
    let mut out = String::with_capacity(html.len() + LIVE_RELOAD_SNIPPET.len());
    out.push_str(&html[..at]);
    out.push_str(LIVE_RELOAD_SNIPPET);
    out.push_str(&html[at..]);
    out
}

/// Ask the desktop to open `url`
fn open_browser(url: &str) -> Result<()> {
    let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/c", "start"])
    } else {
        ("xdg-open", &[])
    };

    std::process::Command::new(program).args(args).arg(url).spawn()?;
    Ok(())
}
