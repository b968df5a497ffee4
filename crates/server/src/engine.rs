//! UCI engine wrapper (async I/O) and the shared session handlers talk to.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How long `quit` waits for the engine to exit on its own.
const QUIT_GRACE: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to spawn engine {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine process exited")]
    Closed,

    #[error("Engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Unexpected engine reply: {0}")]
    Protocol(String),
}

/// How to launch and drive the engine process.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub path: PathBuf,
    /// Extra command-line arguments for the engine binary
    pub args: Vec<String>,
    pub threads: u32,
    pub hash_mb: u32,
    pub limits: SearchLimits,
    /// Upper bound on a full position + search round-trip
    pub timeout: Duration,
}

impl EngineOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            threads: 1,
            hash_mb: 16,
            limits: SearchLimits::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Limits sent with `go`. A depth limit takes precedence over move time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub movetime_ms: u64,
    pub depth: Option<u32>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            movetime_ms: 1000,
            depth: None,
        }
    }
}

impl SearchLimits {
    fn go_command(&self) -> String {
        match self.depth {
            Some(depth) => format!("go depth {depth}"),
            None => format!("go movetime {}", self.movetime_ms),
        }
    }
}

/// Result of a `go` command. Both moves are in UCI notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the engine has no move to play (mate or stalemate)
    pub best_move: Option<String>,
    pub ponder: Option<String>,
}

/// A running UCI engine process.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Spawn the engine and complete the UCI handshake
    pub async fn spawn(options: &EngineOptions) -> Result<Self, EngineError> {
        let mut process = Command::new(&options.path)
            .args(&options.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: options.path.display().to_string(),
                source,
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| EngineError::Protocol("engine stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine
            .send(&format!("setoption name Threads value {}", options.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", options.hash_mb))
            .await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "engine <");
        self.stdin.write_all(format!("{cmd}\n").as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Next line from the engine, trimmed. EOF means the process went away.
    async fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(EngineError::Closed);
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "engine >");
        Ok(trimmed)
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), EngineError> {
        loop {
            if self.read_line().await? == expected {
                return Ok(());
            }
        }
    }

    pub async fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.send(&format!("position fen {fen}")).await
    }

    /// Search the current position and block until `bestmove` arrives
    pub async fn search(&mut self, limits: &SearchLimits) -> Result<SearchResult, EngineError> {
        self.send(&limits.go_command()).await?;

        loop {
            let line = self.read_line().await?;
            if line.starts_with("bestmove") {
                return parse_bestmove(&line);
            }
        }
    }

    /// Send `quit` and wait for the process to exit, killing it if it lingers
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        if tokio::time::timeout(QUIT_GRACE, self.process.wait())
            .await
            .is_err()
        {
            warn!("Engine ignored quit, killing it");
            let _ = self.process.start_kill();
            let _ = self.process.wait().await;
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.process.start_kill();
    }
}

/// Parse `bestmove <move> [ponder <move>]`
fn parse_bestmove(line: &str) -> Result<SearchResult, EngineError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.first() != Some(&"bestmove") || parts.len() < 2 {
        return Err(EngineError::Protocol(line.to_string()));
    }

    let best_move = Some(parts[1])
        .filter(|m| *m != "(none)" && *m != "0000")
        .map(String::from);

    let ponder = parts
        .iter()
        .position(|p| *p == "ponder")
        .and_then(|i| parts.get(i + 1))
        .map(|m| m.to_string());

    Ok(SearchResult { best_move, ponder })
}

/// The process-wide engine session.
///
/// Position/go cycles are serialized through the mutex. A failed or timed-out
/// round-trip drops the process; the next call spawns a fresh one.
pub struct EngineSession {
    options: EngineOptions,
    engine: Mutex<Option<UciEngine>>,
}

impl EngineSession {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            engine: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Spawn the engine now instead of on the first request.
    /// The handshake is bounded by the configured timeout.
    pub async fn start(&self) -> Result<(), EngineError> {
        let mut slot = self.engine.lock().await;
        if slot.is_none() {
            let engine = tokio::time::timeout(self.options.timeout, UciEngine::spawn(&self.options))
                .await
                .map_err(|_| EngineError::Timeout(self.options.timeout))??;
            *slot = Some(engine);
            info!(path = %self.options.path.display(), "Engine ready");
        }
        Ok(())
    }

    /// Ask the engine for its best move in `fen`.
    pub async fn best_move(&self, fen: &str) -> Result<SearchResult, EngineError> {
        let mut slot = self.engine.lock().await;

        let round_trip = async {
            if slot.is_none() {
                *slot = Some(UciEngine::spawn(&self.options).await?);
                info!(path = %self.options.path.display(), "Engine restarted");
            }
            let engine = slot.as_mut().ok_or(EngineError::Closed)?;
            engine.set_position(fen).await?;
            engine.search(&self.options.limits).await
        };

        let result = match tokio::time::timeout(self.options.timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(self.options.timeout)),
        };

        if let Err(e) = &result {
            warn!(error = %e, fen, "Engine search failed, discarding process");
            *slot = None;
        }

        result
    }

    pub async fn shutdown(&self) {
        if let Some(mut engine) = self.engine.lock().await.take() {
            engine.quit().await;
            info!("Engine stopped");
        }
    }
}
