use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tokio::io::DuplexStream;
use tokio::net::UnixListener as TokioUnixListener;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::utils::stream::Stream;

/// Abstract listener which listens on a given endpoint and accepts connections.
#[async_trait::async_trait]
pub trait Listener: Send + Sync {
    /// Accept connections and return its corresponding stream.
    ///
    /// # Errors
    ///
    /// This function will return an error if the connection fails to establish.
    async fn accept(&self) -> Result<Box<dyn Stream>, ListenError>;
}

/// An error for listening procedure.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ListenError {
    #[snafu(display("Could not bind to occupied endpoint {}", path.display()))]
    InUse { path: PathBuf },
    #[snafu(display("Could not bind to {}", path.display()))]
    Bind { path: PathBuf, source: IoError },
    #[snafu(display("Could not accept connection due to system error"))]
    Accept { source: IoError },
    #[snafu(display("Peer of the in-memory listener is gone"))]
    PeerClosed,
}

/// A [`Listener`] implementation which accepts UNIX socket connections.
#[derive(Debug)]
pub struct UnixListener {
    listener: TokioUnixListener,
    path: PathBuf,
}

impl UnixListener {
    /// Create a [`UnixListener`] with a given UNIX socket path.
    ///
    /// # Errors
    ///
    /// This function will return an error if it fails to bind to the socket.
    pub fn bind<P: AsRef<Path>>(path: P) -> Result<Self, ListenError> {
        let path = path.as_ref();
        match TokioUnixListener::bind(path) {
            Ok(listener) => Ok(Self {
                listener,
                path: path.to_path_buf(),
            }),
            Err(err) if err.kind() == IoErrorKind::AddrInUse => InUseSnafu { path }.fail(),
            Err(err) => Err(err).context(BindSnafu { path }),
        }
    }

    /// Like [`UnixListener::bind`], but first removes a socket file left
    /// behind by a previous process. Only call this when no other instance
    /// can be running.
    ///
    /// # Errors
    ///
    /// This function will return an error if it fails to bind to the socket.
    pub fn bind_replacing<P: AsRef<Path>>(path: P) -> Result<Self, ListenError> {
        let path = path.as_ref();
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale socket"),
            Err(err) if err.kind() == IoErrorKind::NotFound => {}
            Err(err) => return Err(err).context(BindSnafu { path }),
        }
        Self::bind(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Listener for UnixListener {
    async fn accept(&self) -> Result<Box<dyn Stream>, ListenError> {
        self.listener
            .accept()
            .await
            .map(|(stream, _)| -> Box<dyn Stream> { Box::new(stream) })
            .context(AcceptSnafu)
    }
}

impl Drop for UnixListener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// A [`Listener`] implementation which returns [`DuplexStream`]s. This is
/// typically used for testing purpose.
#[derive(Debug)]
pub struct DuplexListener {
    peer: Sender<DuplexStream>,
    buffer_size: usize,
}

impl DuplexListener {
    /// Create a [`DuplexListener`] and return a channel receiver which
    /// receives the client side of every accepted [`DuplexStream`].
    pub fn new(buffer_size: usize) -> (Self, Receiver<DuplexStream>) {
        let (sender, receiver) = mpsc::channel(1);
        let listener = Self {
            peer: sender,
            buffer_size,
        };
        (listener, receiver)
    }
}

#[async_trait::async_trait]
impl Listener for DuplexListener {
    async fn accept(&self) -> Result<Box<dyn Stream>, ListenError> {
        let (local, peer) = tokio::io::duplex(self.buffer_size);
        self.peer
            .send(peer)
            .await
            .map_err(|_| PeerClosedSnafu.build())?;
        Ok(Box::new(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::{prelude::*, TempDir};
    use bytes::BytesMut;
    use predicates::path as path_pred;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixStream;

    #[tokio::test]
    async fn unix_listener_error_in_use() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        tmp.child("in-use.socket").touch().unwrap();
        let path = tmp.child("in-use.socket").to_path_buf();
        assert!(matches!(
            UnixListener::bind(path),
            Err(ListenError::InUse { .. })
        ));
    }

    #[tokio::test]
    async fn unix_listener_bind_replacing() {
        let tmp = TempDir::new().expect("Test environment should support temporary directories");
        let socket = tmp.child("daemon.socket");
        socket.touch().unwrap();

        let listener = UnixListener::bind_replacing(socket.path()).unwrap();
        let mut client = UnixStream::connect(socket.path()).await.unwrap();
        let mut server = listener.accept().await.unwrap();

        client.write_all(b"ping").await.unwrap();
        let mut buf = [0u8; 4];
        server.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");

        drop(listener);
        socket.assert(path_pred::missing());
    }

    #[tokio::test]
    async fn duplex_listener() {
        let (listener, mut peer) = DuplexListener::new(256);
        let mut local = listener.accept().await.unwrap();
        let mut peer = peer.recv().await.unwrap();
        local.write_all(b"bytes").await.unwrap();
        drop(local);

        let mut buf = BytesMut::new();
        peer.read_buf(&mut buf).await.unwrap();
        assert_eq!(&buf[..], b"bytes");
    }

    #[tokio::test]
    async fn duplex_listener_error_peer_closed() {
        let (listener, peer) = DuplexListener::new(256);
        drop(peer);
        assert!(matches!(
            listener.accept().await,
            Err(ListenError::PeerClosed)
        ));
    }
}
