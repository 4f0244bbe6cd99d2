use bytes::{Buf, BufMut};
use serde_json::Error as SerdeError;
use snafu::prelude::*;

use crate::protocol::data::Protocol;

/// Upper bound of a frame's payload. Anything larger is treated as garbage.
pub const MAX_PAYLOAD_LENGTH: usize = 1 << 20;

const HEADER_LENGTH: usize = 9;

/// A wrapper of [`Protocol`] for converting the internal data from and to
/// bytes and being transmitted through byte stream.
///
/// The layout of a [`Frame`] in bytes is described below:
/// - starts with a `b'+'` and a big-endian `u64` as the payload's length,
/// - followed by that many bytes of JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Protocol,
}

impl Frame {
    /// Parse a [`Frame`] from one of buf's prefix. Return the [`Frame`] and
    /// the number of bytes it occupied.
    ///
    /// The cursor of `buf` is meaningless after a failure.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is no enough byte or the
    /// data is broken.
    pub fn parse<B: Buf>(mut buf: B) -> Result<(Self, usize), ParseFrameError> {
        ensure!(buf.remaining() >= 1, IncompleteSnafu);
        ensure!(buf.get_u8() == b'+', InvalidStartSnafu);

        ensure!(buf.remaining() >= 8, IncompleteSnafu);
        let len = buf.get_u64();
        ensure!(len > 0, InvalidLengthSnafu { len });
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= MAX_PAYLOAD_LENGTH)
            .context(InvalidLengthSnafu { len })?;

        ensure!(buf.remaining() >= len, IncompleteSnafu);
        let reader = buf.take(len).reader();
        let data: Protocol = serde_json::from_reader(reader).context(DeserializationSnafu)?;

        Ok((data.into(), HEADER_LENGTH + len))
    }

    /// Serialize a [`Frame`] and write it to buf.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn write<B: BufMut>(&self, mut buf: B) -> Result<(), WriteFrameError> {
        let data = serde_json::to_vec(&self.data).context(SerializationSnafu)?;
        buf.put_u8(b'+');
        buf.put_u64(data.len() as u64);
        buf.put_slice(&data);
        Ok(())
    }

    pub fn into_inner(self) -> Protocol {
        self.data
    }
}

impl From<Protocol> for Frame {
    fn from(value: Protocol) -> Self {
        Self { data: value }
    }
}

impl From<Frame> for Protocol {
    fn from(value: Frame) -> Self {
        value.data
    }
}

/// An error type for parsing a [`Frame`] from bytes.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ParseFrameError {
    #[snafu(display("Could not parse a frame with incomplete data"))]
    Incomplete,
    #[snafu(display("Could not parse the start symbol"))]
    InvalidStart,
    #[snafu(display("Invalid payload length {len}"))]
    InvalidLength { len: u64 },
    #[snafu(display("Could not deserialize data"))]
    Deserialization { source: SerdeError },
}

/// An error type for writing a [`Frame`] to bytes.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum WriteFrameError {
    #[snafu(display("Could not serialize frame"))]
    Serialization { source: SerdeError },
}
