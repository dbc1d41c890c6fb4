//! # Arena Brawl Server Library
//!
//! Authoritative server for a real-time arena brawler. Every connected player
//! sends movement and strike intents; the server advances one shared world
//! at a fixed tick rate and streams a snapshot of it back to each player.
//!
//! ## Architecture
//!
//! ### Single-Writer Session
//! The `session` loop is the only task that touches game state. Connection
//! tasks forward decoded intents over a channel and the loop applies them at
//! the top of the next tick, so no tick ever observes a half-applied command
//! and every snapshot is internally consistent.
//!
//! ### Tick Phases
//! Each tick runs the phases in `game` in a fixed order:
//! 1. Movement: pending moves commit unless they leave the arena or overlap
//!    another player.
//! 2. Strikes: each striker's sprite, pushed a few units along its facing,
//!    marks every player it overlaps as hit.
//! 3. Scoring: each hit player gains one point.
//! 4. Broadcast: ready players are serialized once and the same bytes are
//!    queued for every ready player.
//!
//! ### Connections
//! `network` accepts TCP connections and hands them to the join handler,
//! which numbers the player, picks a spawn point and starts two tasks from
//! `channel`: a command reader and an outbound writer. A broken connection
//! only stops its own tasks; the player stays in the world, frozen.
//!
//! ## Module Organization
//!
//! - `config`: runtime settings
//! - `player`: per-player record and the command-derived mutations
//! - `game`: tick phases over all players
//! - `client_manager`: outbound queues and per-recipient failure isolation
//! - `session`: command intake and fixed-rate loop
//! - `channel`: per-connection reader and writer tasks
//! - `network`: TCP listener and join handler
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//! use server::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let (session, handle) = Session::new(&config);
//!     let server = Server::bind(&config, handle).await?;
//!
//!     tokio::spawn(session.run());
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod client_manager;
pub mod config;
pub mod error;
pub mod game;
pub mod network;
pub mod player;
pub mod session;
