use clap::Parser;
use game::config::GameConfig;
use game::input::spawn_stdin_reader;
use game::network::{Runner, WsTransport};
use game::presentation::LogPresenter;
use game::Game;
use log::info;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Controller WebSocket URL to connect to
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:6789")]
    url: String,

    /// Seed for obstacle types (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Obstacle distance per movement tick at score 0
    #[arg(long, default_value_t = shared::BASE_SPEED)]
    base_speed: f32,

    /// Points needed to add one unit of obstacle speed
    #[arg(long, default_value_t = shared::SCORE_DIVISOR)]
    score_divisor: f32,

    /// Do not read jump/crouch commands from stdin
    #[arg(long)]
    no_stdin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let mut config = GameConfig::default();
    config.seed = args.seed;
    config.difficulty.base_speed = args.base_speed;
    config.difficulty.score_divisor = args.score_divisor;
    config.validate()?;

    info!("Starting game...");
    info!("Controller: {}", args.url);
    if let Some(seed) = config.seed {
        info!("Obstacle seed: {}", seed);
    }

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    if args.no_stdin {
        drop(command_tx);
    } else {
        spawn_stdin_reader(command_tx);
    }

    let game = Game::new(config, WsTransport::new(), LogPresenter);
    let mut runner = Runner::new(game);
    runner.run(&args.url, command_rx).await?;

    Ok(())
}
