//! # Stockline Web
//!
//! JSON HTTP API over [`stockline_core`].
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/stock/{ticker}?period=` | [`handlers::stock_history`] |
//! | `GET /api/search/{query}` | [`handlers::search_symbol`] |
//! | `GET /health` | [`handlers::health`] |

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;

pub use config::Cli;
pub use error::{LookupFailure, QuoteFailure, ServerError};
pub use logging::{init_logging, LoggingConfig};
pub use server::{AppState, Server, ServerConfig, ServerConfigBuilder};
