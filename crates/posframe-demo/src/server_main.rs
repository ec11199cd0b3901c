//! posframe server demo binary.
//!
//! # Usage
//!
//! ```bash
//! posframe-server-demo --bind 0.0.0.0:8583
//! ```

use clap::Parser;
use posframe_server::{ServerConfig, ServerSession};
use posframe_testkit::{EchoHandler, TlvPackager};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// posframe POS protocol demo server
#[derive(Parser, Debug)]
#[command(name = "posframe-server-demo")]
#[command(about = "Echoes 0200 requests back as 0210 responses")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8583")]
    bind: String,

    /// Maximum concurrent connections
    #[arg(long, default_value = "10")]
    max_clients: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("posframe server demo starting");
    tracing::info!(bind = %args.bind, max_clients = args.max_clients, "configuration");

    let config = ServerConfig::new("posframe-server-demo", args.bind).with_max_clients(args.max_clients);
    let session = ServerSession::new(config, TlvPackager, EchoHandler);

    session.listen().await?;

    Ok(())
}
