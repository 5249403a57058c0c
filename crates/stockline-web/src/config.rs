//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or as a `STOCKLINE_*` environment
//! variable; flags win. `RUST_LOG` overrides `--log-level` when set.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--host` | `STOCKLINE_HOST` | `0.0.0.0` |
//! | `--port` | `STOCKLINE_PORT` | `5000` |
//! | `--upstream-timeout-ms` | `STOCKLINE_UPSTREAM_TIMEOUT_MS` | `10000` |
//! | `--cors` | `STOCKLINE_CORS` | off |
//! | `--log-level` | `STOCKLINE_LOG_LEVEL` | `info` |
//! | `--json-logs` | `STOCKLINE_JSON_LOGS` | off |

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

use stockline_core::DEFAULT_TIMEOUT_MS;

use crate::logging::LoggingConfig;
use crate::server::ServerConfig;

/// Stock price history API backed by Yahoo Finance.
#[derive(Debug, Clone, Parser)]
#[command(name = "stockline", version, about, long_about = None)]
pub struct Cli {
    /// Address to bind to
    #[arg(long, env = "STOCKLINE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "STOCKLINE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Timeout for each call to the market data provider, in milliseconds
    #[arg(long, env = "STOCKLINE_UPSTREAM_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub upstream_timeout_ms: u64,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "STOCKLINE_CORS")]
    pub cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STOCKLINE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "STOCKLINE_JSON_LOGS")]
    pub json_logs: bool,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .addr(SocketAddr::new(self.host, self.port))
            .cors(self.cors)
            .upstream_timeout_ms(self.upstream_timeout_ms)
            .build()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            json: self.json_logs,
        }
    }
}
