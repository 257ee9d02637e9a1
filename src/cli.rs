//! Command-line interface parsing for the proxy server
//!
//! This module handles parsing of CLI arguments using clap: the listen
//! address and port, plus overrides for the record-store backend.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Default port the proxy listens on
const DEFAULT_PORT: u16 = 8080;

/// Caching proxy for the Fear & Greed index
#[derive(Parser, Debug)]
#[command(name = "fngproxy")]
#[command(about = "Serves a rolling 30-day Fear & Greed index history from a daily-refreshed cache")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Redis connection URL (overrides REDIS_URL; the file store is used
    /// when neither is set)
    #[arg(long, value_name = "URL")]
    pub redis_url: Option<String>,

    /// Directory for the file-backed store (defaults to the XDG cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl Cli {
    /// Socket address derived from `--bind` and `--port`
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
