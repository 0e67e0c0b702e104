//! Byte transports for outbound settings messages.
//!
//! The socket transport frames each message as a u32 little-endian length
//! prefix followed by the UTF-8 JSON payload.

use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::constants::ipc::{MAX_MESSAGE_SIZE, SOCKET_FILE};
use crate::constants::APP_BINARY_NAME;

/// Sink for serialized settings messages.
pub trait Transport {
    /// Sends one complete message.
    fn send(&mut self, message: &str) -> Result<()>;
}

impl<F> Transport for F
where
    F: FnMut(&str) -> Result<()>,
{
    fn send(&mut self, message: &str) -> Result<()> {
        self(message)
    }
}

/// In-process transport backed by an mpsc channel.
///
/// Useful when the consumer runs on another thread of the same process.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: Sender<String>,
}

impl ChannelTransport {
    /// Creates a transport and the receiver its messages arrive on.
    #[must_use]
    pub fn pair() -> (Self, Receiver<String>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, message: &str) -> Result<()> {
        self.sender
            .send(message.to_string())
            .map_err(|_| anyhow!("Message receiver has been dropped"))
    }
}

/// Client side of the Unix socket transport.
#[cfg(unix)]
#[derive(Debug)]
pub struct UnixSocketTransport {
    stream: std::os::unix::net::UnixStream,
}

#[cfg(unix)]
impl UnixSocketTransport {
    /// Connects to the settings consumer listening at `path`.
    pub fn connect(path: &std::path::Path) -> Result<Self> {
        let stream = std::os::unix::net::UnixStream::connect(path)
            .with_context(|| format!("Failed to connect to settings socket at {}", path.display()))?;
        Ok(Self { stream })
    }

    /// Wraps an already connected stream.
    pub const fn from_stream(stream: std::os::unix::net::UnixStream) -> Self {
        Self { stream }
    }
}

#[cfg(unix)]
impl Transport for UnixSocketTransport {
    fn send(&mut self, message: &str) -> Result<()> {
        write_message(&mut self.stream, message)
    }
}

/// Writes one length-prefixed message.
pub fn write_message<W: Write>(stream: &mut W, message: &str) -> Result<()> {
    let payload = message.as_bytes();
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(anyhow!(
            "Message too large: {} bytes (max: {})",
            payload.len(),
            MAX_MESSAGE_SIZE
        ));
    }

    let len = u32::try_from(payload.len()).context("Message length does not fit the frame header")?;
    stream
        .write_all(&len.to_le_bytes())
        .context("Failed to write message length")?;
    stream
        .write_all(payload)
        .context("Failed to write message payload")?;
    stream.flush().context("Failed to flush stream")?;
    Ok(())
}

/// Reads one length-prefixed message.
pub fn read_message<R: Read>(stream: &mut R) -> Result<String> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .context("Failed to read message length")?;
    let len = u32::from_le_bytes(len_buf) as usize;

    // Reject before allocating
    if len > MAX_MESSAGE_SIZE {
        return Err(anyhow!("Message too large: {len} bytes (max: {MAX_MESSAGE_SIZE})"));
    }

    let mut payload = vec![0u8; len];
    stream
        .read_exact(&mut payload)
        .context("Failed to read message payload")?;
    String::from_utf8(payload).context("Message payload is not valid UTF-8")
}

/// Default socket path: `$XDG_RUNTIME_DIR/zonekeys/zonekeys.sock`, falling
/// back to the cache directory.
pub fn default_socket_path() -> Result<PathBuf> {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(runtime_dir).join(APP_BINARY_NAME).join(SOCKET_FILE));
    }

    let cache = dirs::cache_dir()
        .context("Failed to determine cache directory (no XDG_RUNTIME_DIR or HOME)")?;
    Ok(cache.join(APP_BINARY_NAME).join(SOCKET_FILE))
}
