use std::io::Error as IoError;

use bytes::{Buf, BytesMut};
use snafu::prelude::*;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::frame::{Frame, ParseFrameError, WriteFrameError};

/// A wrapper of a stream (typically a socket), which handles sending and
/// receiving frames through the stream.
pub struct Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream: S,
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Serialize a [`Frame`] to bytes and send it through the wrapped stream.
    ///
    /// # Errors
    ///
    /// This function will return an error if serialization fails or network
    /// IO fails.
    pub async fn send(&mut self, frame: Frame) -> Result<(), SendFrameError> {
        let mut buffer = BytesMut::with_capacity(256);
        frame.write(&mut buffer).context(WriteSnafu)?;

        self.stream
            .write_all(&buffer)
            .await
            .context(SendNetworkSnafu)?;
        self.stream.flush().await.context(SendNetworkSnafu)?;

        Ok(())
    }

    /// Receive bytes from the wrapped stream until a whole [`Frame`] is
    /// buffered, then deserialize it.
    ///
    /// # Errors
    ///
    /// This function will return an error if deserialization fails, network
    /// IO fails or the peer closes the stream.
    pub async fn receive(&mut self) -> Result<Frame, ReceiveFrameError> {
        loop {
            match Frame::parse(&self.buffer[..]) {
                Ok((frame, offset)) => {
                    self.buffer.advance(offset);
                    return Ok(frame);
                }
                Err(ParseFrameError::Incomplete) => {}
                Err(err) => return Err(err).context(ParseSnafu),
            }

            let read = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .context(ReceiveNetworkSnafu)?;
            ensure!(read > 0, ClosedSnafu);
        }
    }
}

impl<S> From<S> for Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn from(value: S) -> Self {
        Self {
            stream: value,
            buffer: BytesMut::with_capacity(1024),
        }
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SendFrameError {
    #[snafu(display("Could not write frame to buffer"))]
    Write { source: WriteFrameError },
    #[snafu(display("Could not send bytes through inner stream"))]
    SendNetwork { source: IoError },
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReceiveFrameError {
    #[snafu(display("Could not parse frame from buffer"))]
    Parse { source: ParseFrameError },
    #[snafu(display("Connection is closed by the peer"))]
    Closed,
    #[snafu(display("Could not receive bytes through inner stream"))]
    ReceiveNetwork { source: IoError },
}
