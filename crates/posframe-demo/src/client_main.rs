//! posframe client demo binary.
//!
//! # Usage
//!
//! ```bash
//! posframe-client-demo --host 127.0.0.1 --port 8583
//! ```

use std::time::Duration;

use clap::Parser;
use posframe_client::{ClientConfig, ClientSession};
use posframe_proto::IsoMessage;
use posframe_testkit::{PosMessage, TlvPackager};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// posframe POS protocol demo client
#[derive(Parser, Debug)]
#[command(name = "posframe-client-demo")]
#[command(about = "Sends a single 0200 request and prints the correlated response")]
#[command(version)]
struct Args {
    /// Server host to dial
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to dial
    #[arg(long, default_value = "8583")]
    port: u16,

    /// Keep redialing with a 1s backoff if the connection drops
    #[arg(long)]
    auto_reconnect: bool,

    /// Per-request timeout, in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("posframe client demo starting");
    tracing::info!(host = %args.host, port = args.port, "configuration");

    let config = ClientConfig::new("posframe-client-demo", args.host, args.port)
        .with_auto_reconnect(args.auto_reconnect)
        .with_timeout(Duration::from_secs(args.timeout_secs));

    let session = ClientSession::new(config, TlvPackager);
    session.connect().await?;

    let request = PosMessage::new([(0, "0200"), (7, "0227152417")]);
    let response = session.request(request).await?;

    tracing::info!(mti = ?response.get_field(0), body = %response.log(), "received response");

    Ok(())
}
