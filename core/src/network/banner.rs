use std::string::FromUtf8Error;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// Most bytes taken from a service greeting.
pub const BANNER_READ_LIMIT: usize = 1024;

#[derive(Error, Debug)]
pub enum BannerError {
    #[error("failed to read banner: {0}")]
    Io(#[from] std::io::Error),

    #[error("banner is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
}

/// Reads whatever the service sends first, in a single bounded read.
///
/// Returns `Ok(None)` if `deadline` passes first, if the peer closes without
/// sending anything, or if the greeting is only whitespace. Does not close the
/// connection.
pub async fn read_banner<R>(reader: &mut R, deadline: Instant) -> Result<Option<String>, BannerError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; BANNER_READ_LIMIT];

    let read = match timeout_at(deadline, reader.read(&mut buf)).await {
        Ok(res) => res?,
        Err(_elapsed) => {
            debug!("No banner before deadline");
            return Ok(None);
        }
    };

    debug!(bytes = read, "Read banner");
    buf.truncate(read);
    let text = String::from_utf8(buf)?;
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
