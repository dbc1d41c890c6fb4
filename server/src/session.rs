//! Fixed-rate session loop.
//!
//! The session is the only owner of the game state. Join handlers and
//! command channels talk to it through a `SessionHandle`; their commands are
//! queued and applied at the top of the next tick, so each tick (and the
//! snapshot it produces) sees one consistent set of player fields.

use crate::client_manager::{ClientManager, Frame, FrameSender};
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::game::GameState;
use log::{debug, error, info, warn};
use shared::framing::{encode_frame, encode_packet};
use shared::{Direction, Packet, PlayerView, Position};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Ticks between periodic status lines.
const STATUS_INTERVAL: u64 = 200;

/// Messages from connection tasks to the session loop
#[derive(Debug)]
pub enum SessionCommand {
    Register {
        number: u32,
        spawn: Position,
        peer: String,
        outbound: FrameSender,
    },
    Join {
        number: u32,
    },
    Move {
        number: u32,
        direction: Direction,
    },
    Strike {
        number: u32,
    },
}

/// Cloneable entry point into a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn send(&self, command: SessionCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| ServerError::SessionClosed)
    }
}

pub struct Session {
    game: GameState,
    clients: ClientManager,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    tick_duration: Duration,
}

impl Session {
    pub fn new(config: &ServerConfig) -> (Self, SessionHandle) {
        let (tx, commands) = mpsc::unbounded_channel();
        let session = Self {
            game: GameState::from_config(config),
            clients: ClientManager::new(),
            commands,
            tick_duration: config.tick_duration(),
        };
        (session, SessionHandle { tx })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    pub fn apply_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Register {
                number,
                spawn,
                peer,
                outbound,
            } => {
                self.game.add_player(number, spawn);
                self.clients.add_client(number, peer, outbound);
            }
            SessionCommand::Join { number } => {
                if !self.game.mark_ready(number) {
                    warn!("Join from unregistered player {}", number);
                    return;
                }
                info!("Player {} ready", number);
                match encode(&Packet::Ready {
                    player_number: number,
                }) {
                    Ok(frame) => {
                        // Failures are logged by the client manager.
                        let _ = self.clients.send_to(number, &frame);
                    }
                    Err(e) => error!("Failed to encode ready packet: {}", e),
                }
            }
            SessionCommand::Move { number, direction } => {
                if !self.game.apply_move(number, direction) {
                    warn!("Move from unregistered player {}", number);
                }
            }
            SessionCommand::Strike { number } => {
                if !self.game.apply_strike(number) {
                    warn!("Strike from unregistered player {}", number);
                }
            }
        }
    }

    /// Applies every command queued since the previous tick.
    pub fn drain_commands(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command);
            applied += 1;
        }
        applied
    }

    /// Runs one complete tick and returns the snapshot that was broadcast,
    /// or `None` when nothing went out.
    pub fn tick(&mut self) -> Option<Vec<PlayerView>> {
        self.drain_commands();

        let players = self.game.step()?;

        let frame = match encode(&Packet::Snapshot {
            players: players.clone(),
        }) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to encode snapshot for tick {}: {}", self.game.tick, e);
                return None;
            }
        };

        let recipients: Vec<u32> = players.iter().map(|p| p.number).collect();
        self.clients.broadcast(recipients, &frame);
        Some(players)
    }

    /// Ticks forever at the configured rate.
    ///
    /// A tick that overruns its budget is followed immediately by the next
    /// one; missed ticks are never replayed in a burst.
    pub async fn run(mut self) {
        let mut tick_interval = interval(self.tick_duration);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Session started ({:.0} ticks/s)",
            1.0 / self.tick_duration.as_secs_f64()
        );

        loop {
            tick_interval.tick().await;
            let started = Instant::now();

            self.tick();

            let elapsed = started.elapsed();
            if elapsed > self.tick_duration {
                debug!(
                    "Tick {} overran its budget: {:?} > {:?}",
                    self.game.tick, elapsed, self.tick_duration
                );
            }

            if self.game.tick % STATUS_INTERVAL == 0 && !self.clients.is_empty() {
                debug!(
                    "Tick {}: {} players, {} connected",
                    self.game.tick,
                    self.game.player_count(),
                    self.clients.connected_count()
                );
            }
        }
    }
}

/// Serializes a packet once into a frame that can be queued for any number
/// of recipients.
pub fn encode(packet: &Packet) -> Result<Frame> {
    let payload = encode_packet(packet).map_err(ServerError::Encode)?;
    let frame = encode_frame(&payload)?;
    Ok(Arc::from(frame))
}
