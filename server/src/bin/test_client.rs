//! Headless scripted player for poking a running server.
//!
//! Joins, walks a fixed route, strikes at the end of each leg and prints
//! every snapshot it receives.

use clap::Parser;
use log::{info, warn};
use shared::framing::{read_packet, write_packet};
use shared::{Direction, Packet};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{interval, sleep};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8000")]
    server: String,

    /// Number of route legs to walk before disconnecting
    #[arg(short, long, default_value = "8")]
    legs: usize,

    /// Moves sent per leg
    #[arg(long, default_value = "10")]
    steps: usize,
}

const ROUTE: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let stream = TcpStream::connect(&args.server).await?;
    stream.set_nodelay(true)?;
    info!("Connected to {}", args.server);

    let (mut reader, mut writer) = stream.into_split();
    write_packet(&mut writer, &Packet::Join).await?;

    let printer = tokio::spawn(async move {
        loop {
            match read_packet(&mut reader).await {
                Ok(Some(Packet::Ready { player_number })) => {
                    println!("Ready as player {}", player_number);
                }
                Ok(Some(Packet::Snapshot { players })) => {
                    let line: Vec<String> = players
                        .iter()
                        .map(|p| {
                            format!(
                                "#{} ({}, {}) {:?} score={}{}",
                                p.number,
                                p.position.x,
                                p.position.y,
                                p.facing,
                                p.score,
                                if p.animating { " *" } else { "" }
                            )
                        })
                        .collect();
                    println!("{}", line.join(" | "));
                }
                Ok(Some(other)) => warn!("Unexpected packet: {:?}", other),
                Ok(None) => {
                    info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read from server: {}", e);
                    break;
                }
            }
        }
    });

    // One command per tick keeps every move from being overwritten.
    let mut pace = interval(Duration::from_millis(50));
    for leg in 0..args.legs {
        let direction = ROUTE[leg % ROUTE.len()];
        for _ in 0..args.steps {
            pace.tick().await;
            write_packet(&mut writer, &Packet::Move { direction }).await?;
        }
        pace.tick().await;
        write_packet(&mut writer, &Packet::Strike).await?;
    }

    sleep(Duration::from_millis(200)).await;
    printer.abort();
    info!("Test client finished");
    Ok(())
}
