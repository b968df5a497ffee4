pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod routes;
