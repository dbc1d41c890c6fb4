//! Outbound side of every player connection.
//!
//! The session loop never writes to sockets itself. Each player has a writer
//! task fed by a bounded queue of encoded frames; the `ClientManager` holds
//! the sending halves and fans frames out to them without waiting. A failed
//! send only affects its recipient: it is logged once and the handle is
//! dropped. A full queue counts as a failed send, so a peer that stops
//! reading is cut off instead of buffering frames forever.

use crate::error::{Result, ServerError};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Frames buffered per player before it is considered stalled, a little
/// over three seconds at the default tick rate.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// An encoded, length-prefixed packet shared by every recipient.
pub type Frame = Arc<[u8]>;

pub type FrameSender = mpsc::Sender<Frame>;
pub type FrameReceiver = mpsc::Receiver<Frame>;

/// Creates the queue between the session and one player's writer task.
pub fn outbound_queue() -> (FrameSender, FrameReceiver) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

#[derive(Debug)]
pub struct Client {
    pub number: u32,
    /// Peer description for logs
    pub peer: String,
    /// `None` once a send has failed
    outbound: Option<FrameSender>,
}

impl Client {
    pub fn new(number: u32, peer: String, outbound: FrameSender) -> Self {
        Self {
            number,
            peer,
            outbound: Some(outbound),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.outbound.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ClientManager {
    clients: Vec<Client>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_client(&mut self, number: u32, peer: String, outbound: FrameSender) {
        info!("Client {} connected from {}", number, peer);
        self.clients.push(Client::new(number, peer, outbound));
    }

    pub fn get(&self, number: u32) -> Option<&Client> {
        self.clients.iter().find(|c| c.number == number)
    }

    /// Queues `frame` for one player.
    pub fn send_to(&mut self, number: u32, frame: &Frame) -> Result<()> {
        let client = self
            .clients
            .iter_mut()
            .find(|c| c.number == number)
            .ok_or(ServerError::Send { player: number })?;

        let outbound = client
            .outbound
            .as_ref()
            .ok_or(ServerError::Send { player: number })?;

        match outbound.try_send(Arc::clone(frame)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(
                    "Player {} ({}) stopped reading, no further updates will be sent",
                    number, client.peer
                );
                client.outbound = None;
                Err(ServerError::Send { player: number })
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    "Connection to player {} ({}) is gone, no further updates will be sent",
                    number, client.peer
                );
                client.outbound = None;
                Err(ServerError::Send { player: number })
            }
        }
    }

    /// Queues `frame` for each listed player, returning how many accepted it.
    pub fn broadcast<I>(&mut self, recipients: I, frame: &Frame) -> usize
    where
        I: IntoIterator<Item = u32>,
    {
        recipients
            .into_iter()
            .filter(|number| self.send_to(*number, frame).is_ok())
            .count()
    }

    pub fn connected_count(&self) -> usize {
        self.clients.iter().filter(|c| c.is_connected()).count()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
