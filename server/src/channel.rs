//! Per-player connection tasks.
//!
//! The command channel reads frames from a player's connection, decodes them
//! and forwards the intents to the session. The outbound writer drains the
//! player's frame queue onto the connection. Both run until their half of
//! the connection fails; neither retries.

use crate::client_manager::FrameReceiver;
use crate::error::Result;
use crate::session::{SessionCommand, SessionHandle};
use log::{info, warn};
use shared::framing::{decode_packet, read_frame, write_frame, MAX_COMMAND_FRAME};
use shared::Packet;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;

/// Reads commands until the connection closes.
///
/// Returns `Ok` on a clean end of stream. Any read or decode failure, or a
/// frame longer than `MAX_COMMAND_FRAME`, ends the channel with that error;
/// the session and other players carry on.
pub async fn run_command_channel<R>(
    number: u32,
    mut reader: R,
    session: SessionHandle,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    while let Some(payload) = read_frame(&mut reader, MAX_COMMAND_FRAME).await? {
        let packet = decode_packet(&payload)?;
        let command = match packet {
            Packet::Join => SessionCommand::Join { number },
            Packet::Move { direction } => SessionCommand::Move { number, direction },
            Packet::Strike => SessionCommand::Strike { number },
            other => {
                warn!("Unexpected packet from player {}: {:?}", number, other);
                continue;
            }
        };
        session.send(command)?;
    }
    Ok(())
}

pub fn spawn_command_channel<R>(number: u32, reader: R, session: SessionHandle) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        match run_command_channel(number, reader, session).await {
            Ok(()) => info!("Player {} closed its connection", number),
            Err(e) => warn!("Command channel for player {} stopped: {}", number, e),
        }
    })
}

/// Writes queued frames until the queue closes or a write fails.
pub async fn run_outbound<W>(
    mut writer: W,
    mut frames: FrameReceiver,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.recv().await {
        write_frame(&mut writer, &frame).await?;
    }
    Ok(())
}

pub fn spawn_outbound<W>(
    number: u32,
    writer: W,
    frames: FrameReceiver,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = run_outbound(writer, frames).await {
            warn!("Outbound stream to player {} failed: {}", number, e);
        }
    })
}
