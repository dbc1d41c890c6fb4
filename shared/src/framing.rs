//! Length-delimited packet framing over a byte stream.
//!
//! Each frame is a 4-byte big-endian payload length followed by the
//! bincode-encoded `Packet`. TCP has no message boundaries, so both ends of a
//! player connection read and write through these helpers.

use crate::Packet;
use std::{fmt, io};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload a server accepts from a player. Commands are a few bytes.
pub const MAX_COMMAND_FRAME: usize = 64 * 1024;

/// Largest payload the length prefix can describe. Snapshots grow with the
/// player count, so outbound frames are only bounded by this.
pub const MAX_FRAME_SIZE: usize = u32::MAX as usize;

const HEADER_LEN: usize = 4;

/// A frame length over the limit in force for that stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTooLarge {
    pub len: usize,
    pub max: usize,
}

impl fmt::Display for FrameTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame too large: {} bytes (max {})", self.len, self.max)
    }
}

impl std::error::Error for FrameTooLarge {}

impl From<FrameTooLarge> for io::Error {
    fn from(e: FrameTooLarge) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

pub fn encode_packet(packet: &Packet) -> bincode::Result<Vec<u8>> {
    bincode::serialize(packet)
}

pub fn decode_packet(payload: &[u8]) -> bincode::Result<Packet> {
    bincode::deserialize(payload)
}

/// Prefixes `payload` with its length, producing bytes ready for the wire.
pub fn encode_frame(payload: &[u8]) -> io::Result<Vec<u8>> {
    if payload.len() > MAX_FRAME_SIZE {
        return Err(FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_SIZE,
        }
        .into());
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Reads one frame payload of at most `max_len` bytes.
///
/// Returns `Ok(None)` when the stream closes cleanly between frames, and
/// `UnexpectedEof` when it closes part way through one. A longer frame is
/// rejected with `FrameTooLarge` before any payload is buffered.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader.read(&mut header[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed inside frame header",
            ));
        }
        filled += n;
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > max_len {
        return Err(FrameTooLarge { len, max: max_len }.into());
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Writes an already encoded frame and flushes it.
pub async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await
}

/// Encodes, frames and writes a single packet.
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let payload =
        encode_packet(packet).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let frame = encode_frame(&payload)?;
    write_frame(writer, &frame).await
}

/// Reads and decodes a single packet of any size; `Ok(None)` on clean end
/// of stream.
pub async fn read_packet<R>(reader: &mut R) -> io::Result<Option<Packet>>
where
    R: AsyncRead + Unpin,
{
    match read_frame(reader, MAX_FRAME_SIZE).await? {
        Some(payload) => decode_packet(&payload)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    #[tokio::test]
    async fn test_packets_in_sequence() {
        let packets = vec![
            Packet::Join,
            Packet::Move {
                direction: Direction::Left,
            },
            Packet::Strike,
        ];

        let mut buf = Vec::new();
        for packet in &packets {
            write_packet(&mut buf, packet).await.unwrap();
        }

        let mut reader = buf.as_slice();
        for expected in &packets {
            let packet = read_packet(&mut reader).await.unwrap();
            assert_eq!(packet.as_ref(), Some(expected));
        }
        assert_eq!(read_packet(&mut reader).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_frame_split_across_reads() {
        let payload = encode_packet(&Packet::Ready { player_number: 7 }).unwrap();
        let frame = encode_frame(&payload).unwrap();

        let mut mock = tokio_test::io::Builder::new()
            .read(&frame[..2])
            .read(&frame[2..5])
            .read(&frame[5..])
            .build();

        let packet = read_packet(&mut mock).await.unwrap();
        assert_eq!(packet, Some(Packet::Ready { player_number: 7 }));
    }

    #[tokio::test]
    async fn test_eof_inside_header() {
        let mut reader: &[u8] = &[0, 0];
        let err = read_frame(&mut reader, MAX_COMMAND_FRAME)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_eof_inside_payload() {
        let mut reader: &[u8] = &[0, 0, 0, 8, 1, 2];
        let err = read_frame(&mut reader, MAX_COMMAND_FRAME)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_rejects_oversized_read() {
        let header = ((MAX_COMMAND_FRAME + 1) as u32).to_be_bytes();
        let mut reader: &[u8] = &header;
        let err = read_frame(&mut reader, MAX_COMMAND_FRAME)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let inner = err.get_ref().unwrap().downcast_ref::<FrameTooLarge>();
        assert_eq!(
            inner,
            Some(&FrameTooLarge {
                len: MAX_COMMAND_FRAME + 1,
                max: MAX_COMMAND_FRAME,
            })
        );
    }

    #[tokio::test]
    async fn test_large_frames_written_and_read() {
        let payload = vec![7u8; MAX_COMMAND_FRAME * 2];
        let frame = encode_frame(&payload).unwrap();
        assert_eq!(&frame[..4], &((MAX_COMMAND_FRAME * 2) as u32).to_be_bytes());

        let mut reader = frame.as_slice();
        let read = read_frame(&mut reader, MAX_FRAME_SIZE).await.unwrap();
        assert_eq!(read, Some(payload));
    }

    #[tokio::test]
    async fn test_garbage_payload_fails_to_decode() {
        let frame = encode_frame(&[0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
        let mut reader = frame.as_slice();
        let err = read_packet(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
