use clap::Parser;
use log::{error, info};
use server::config::ServerConfig;
use server::network::Server;
use server::session::Session;
use shared::Arena;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Tick rate (updates per second)
    #[arg(short, long, default_value = "20")]
    tick_rate: u32,

    /// Arena width
    #[arg(long, default_value = "1024")]
    width: i32,

    /// Arena height
    #[arg(long, default_value = "768")]
    height: i32,

    /// Seed for spawn placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            tick_rate: self.tick_rate,
            arena: Arena {
                width: self.width,
                height: self.height,
                ..Arena::default()
            },
            seed: self.seed,
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = Args::parse().into_config();
    config.validate()?;
    info!(
        "Starting server: {}x{} arena, {} ticks/s",
        config.arena.width, config.arena.height, config.tick_rate
    );

    let (session, handle) = Session::new(&config);
    let server = Server::bind(&config, handle).await?;

    let session_handle = tokio::spawn(session.run());
    let server_handle = tokio::spawn(server.run());

    tokio::select! {
        result = server_handle => {
            match result {
                Ok(Err(e)) => error!("Server stopped: {}", e),
                Err(e) => error!("Network task panicked: {}", e),
                Ok(Ok(())) => {}
            }
        }
        result = session_handle => {
            if let Err(e) = result {
                error!("Session task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
