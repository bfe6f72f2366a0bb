//! Pollwire server binary.
//!
//! # Usage
//!
//! ```bash
//! # Start on the default port
//! pollwire-server --bind 0.0.0.0:2222
//!
//! # Connect from another terminal (raw mode, no local echo)
//! stty raw -echo && nc 127.0.0.1 2222
//! ```

use clap::Parser;
use pollwire_server::{Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal poll server
#[derive(Parser, Debug)]
#[command(name = "pollwire-server")]
#[command(about = "In-memory poll server for remote terminal sessions")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:2222")]
    bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Pollwire server starting");

    let config = ServerConfig { bind_address: args.bind };
    let server = Server::bind(&config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);
    tracing::warn!("All poll state is in memory and is lost on restart");

    server.run().await?;

    Ok(())
}
