//! Error types for the arena server.
//!
//! Move rejections (out of bounds, collisions) are ordinary outcomes and do
//! not appear here.

use shared::framing::FrameTooLarge;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Socket level failure while binding, accepting, reading or writing
    #[error("Network error: {0}")]
    Io(io::Error),

    /// An inbound frame could not be decoded into a packet
    #[error("Decode error: {0}")]
    Decode(#[from] bincode::Error),

    /// An outbound packet could not be serialized
    #[error("Encode error: {0}")]
    Encode(bincode::Error),

    /// A frame length exceeded the limit for its stream
    #[error("Frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// An outbound packet could not be queued for its recipient
    #[error("Send error to player {player}")]
    Send { player: u32 },

    /// The session loop is no longer accepting commands
    #[error("Session closed")]
    SessionClosed,

    /// Settings that cannot produce a playable arena
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        let too_large = e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<FrameTooLarge>())
            .copied();
        match too_large {
            Some(FrameTooLarge { len, max }) => ServerError::FrameTooLarge { len, max },
            None => ServerError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
