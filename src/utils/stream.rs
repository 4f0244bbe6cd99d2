use tokio::io::{AsyncRead, AsyncWrite};

/// Abstract form of types that are capable of async IO and may be moved
/// across tasks, such as UNIX sockets and in-memory duplex pipes.
pub trait Stream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Stream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}
