use std::sync::Arc;
use std::time::Duration;

use game_server::app;
use game_server::config::Config;
use game_server::engine::{EngineOptions, EngineSession};
use reqwest::Client;

/// Scripted UCI engine: handshakes and always answers `e2e4`.
pub const FAKE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name FakeFish"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 20 pv e2e4"; echo "bestmove e2e4 ponder e7e5" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Answers every `go` with a move that is illegal from the start position.
pub const ILLEGAL_MOVE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "bestmove e2e5" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Claims there is nothing to play, whatever the position.
pub const NO_MOVE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "bestmove (none)" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Handshakes but never finishes a search.
pub const SILENT_SEARCH_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    quit) exit 0 ;;
  esac
done
"#;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A server running on an ephemeral port for the duration of a test.
pub struct TestServer {
    pub base_url: String,
    pub engine: Option<Arc<EngineSession>>,
}

impl TestServer {
    /// Build a URL for an endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server(with_engine: bool) -> TestServer {
    if with_engine {
        spawn_server_with(FAKE_ENGINE, Duration::from_secs(5)).await
    } else {
        start(None).await
    }
}

/// Server backed by the given engine script, run with `sh -c`.
pub async fn spawn_server_with(script: &str, timeout: Duration) -> TestServer {
    let mut options = EngineOptions::new("sh");
    options.args = vec!["-c".to_string(), script.to_string()];
    options.timeout = timeout;
    start(Some(Arc::new(EngineSession::new(options)))).await
}

async fn start(engine: Option<Arc<EngineSession>>) -> TestServer {

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        debug: false,
        engine: engine.as_ref().map(|e| e.options().clone()),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app::router(config, engine.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        engine,
    }
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}
