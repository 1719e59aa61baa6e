use clap::Parser;
use controller::server::{ControllerConfig, ControllerServer};
use log::info;
use tokio::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "6789")]
    port: u16,

    /// Milliseconds to wait after a game over before restarting
    #[arg(long, default_value = "5000")]
    restart_delay_ms: u64,

    /// Distance at which the controller reacts to an approaching obstacle
    #[arg(long, default_value_t = controller::policy::DEFAULT_REACT_DISTANCE)]
    react_distance: f32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = ControllerConfig {
        restart_delay: Duration::from_millis(args.restart_delay_ms),
        react_distance: args.react_distance,
    };
    let address = format!("{}:{}", args.host, args.port);
    let server = ControllerServer::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
