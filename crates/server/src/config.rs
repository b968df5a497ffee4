use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::{EngineOptions, SearchLimits};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// `None` runs the service without move suggestions
    pub engine: Option<EngineOptions>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(5000),
            debug: env::var("DEBUG").map(|v| parse_flag(&v)).unwrap_or(false),
            engine: engine_path().map(|path| EngineOptions {
                path,
                args: Vec::new(),
                threads: parse_var("ENGINE_THREADS").unwrap_or(1),
                hash_mb: parse_var("ENGINE_HASH_MB").unwrap_or(16),
                limits: SearchLimits {
                    movetime_ms: parse_var("ENGINE_MOVETIME_MS").unwrap_or(1000),
                    depth: parse_var("ENGINE_DEPTH"),
                },
                timeout: Duration::from_secs(parse_var("ENGINE_TIMEOUT_SECS").unwrap_or(30)),
            }),
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Truthy unless empty or one of `false`, `0`, `no`, `off`.
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "no" | "off"
    )
}

/// `ENGINE_PATH` wins; empty or `none` disables the engine. Otherwise the
/// bundled Stockfish build for this OS is used if it is present.
fn engine_path() -> Option<PathBuf> {
    match env::var("ENGINE_PATH") {
        Ok(path) if path.trim().is_empty() || path.trim().eq_ignore_ascii_case("none") => None,
        Ok(path) => Some(PathBuf::from(path.trim())),
        Err(_) => default_engine_path().filter(|p| p.exists()),
    }
}

fn default_engine_path() -> Option<PathBuf> {
    let relative = if cfg!(target_os = "macos") {
        "engines/stockfish/Mac/stockfish-7-64"
    } else if cfg!(target_os = "linux") {
        "engines/stockfish/Linux/stockfish-7-x64"
    } else {
        return None;
    };
    Some(Path::new(relative).to_path_buf())
}
