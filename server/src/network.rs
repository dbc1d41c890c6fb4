//! Connection intake: TCP listener and join handler.

use crate::channel::{spawn_command_channel, spawn_outbound};
use crate::client_manager::outbound_queue;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::session::{SessionCommand, SessionHandle};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Arena, Position};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;

/// Registers new connections with the session, one at a time.
pub struct JoinHandler {
    session: SessionHandle,
    arena: Arena,
    rng: StdRng,
    /// Players registered so far; numbers are never reused
    joined: u32,
}

impl JoinHandler {
    pub fn new(config: &ServerConfig, session: SessionHandle) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            session,
            arena: config.arena,
            rng,
            joined: 0,
        }
    }

    pub fn joined(&self) -> u32 {
        self.joined
    }

    /// Uniform draw over the whole arena, pulled back inside the legal range
    /// so the sprite never touches an edge. The arena must have passed
    /// `ServerConfig::validate`.
    pub fn spawn_position(&mut self) -> Position {
        let raw = Position::new(
            self.rng.gen_range(0..self.arena.width),
            self.rng.gen_range(0..self.arena.height),
        );
        self.arena.clamp(raw)
    }

    /// Assigns the next player number, registers the player and starts its
    /// connection tasks. Returns the assigned number.
    pub fn accept<S>(&mut self, stream: S, peer: String) -> Result<u32>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let number = self.joined + 1;
        let spawn = self.spawn_position();
        let (outbound, frames) = outbound_queue();

        self.session.send(SessionCommand::Register {
            number,
            spawn,
            peer: peer.clone(),
            outbound,
        })?;
        self.joined = number;

        let (reader, writer) = tokio::io::split(stream);
        spawn_outbound(number, writer, frames);
        spawn_command_channel(number, reader, self.session.clone());

        info!(
            "Player {} joined from {} at ({}, {})",
            number, peer, spawn.x, spawn.y
        );
        Ok(number)
    }
}

/// TCP front door feeding the join handler.
pub struct Server {
    listener: TcpListener,
    join: JoinHandler,
}

impl Server {
    pub async fn bind(config: &ServerConfig, session: SessionHandle) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_addr).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            join: JoinHandler::new(config, session),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the session goes away.
    pub async fn run(mut self) -> Result<()> {
        info!("Waiting for players...");
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        error!("Failed to set TCP_NODELAY for {}: {}", addr, e);
                    }
                    self.join.accept(stream, addr.to_string())?;
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}
