use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Parley chat backend
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Streaming chat backend with proxy, native and agent tool strategies")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PARLEY_LISTEN")]
    pub listen: Option<SocketAddr>,
}
