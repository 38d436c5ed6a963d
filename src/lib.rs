pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod parsers;
pub mod routes;
pub mod services;

use std::sync::Arc;

use parsers::{BaziReportParser, Parser};
use services::engine::ChartEngine;

/// Shared application state passed to all Axum handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub engine: ChartEngine,
    pub parser: Arc<dyn Parser>,
}

impl AppState {
    /// State wired to the configured engine and the `bazi.py` report parser.
    pub fn new(config: config::AppConfig) -> Result<Self, anyhow::Error> {
        Ok(Self {
            engine: ChartEngine::new(config.engine.clone()),
            parser: Arc::new(BaziReportParser::new()?),
            config: Arc::new(config),
        })
    }
}
