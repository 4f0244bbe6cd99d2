use std::sync::Arc;

use snafu::prelude::*;
use tracing::{field::Empty, Instrument, Span};

use crate::daemon::app::listener::{ListenError, Listener};
use crate::domain::daemon::inbound::{HandleRequestError, QueryResponse};
use crate::domain::daemon::ApplicationCore;
use crate::protocol::{Connection, Protocol, ReceiveFrameError, Request, Response, SendFrameError};
use crate::tracing_report;
use crate::utils::stream::Stream;

/// An dedicated server which listens on a UNIX socket and handles
/// requests from clients.
pub struct Server {
    listener: Box<dyn Listener>,
    core: Arc<ApplicationCore>,
}

impl Server {
    /// Creates a new [`Server`].
    pub fn new(listener: Box<dyn Listener>, core: ApplicationCore) -> Self {
        Self {
            listener,
            core: Arc::new(core),
        }
    }

    /// Accept connections and handle one request on each of them.
    ///
    /// # Errors
    ///
    /// This function will return an error if the server fails to accept
    /// connections.
    #[tracing::instrument(skip(self))]
    pub async fn serve(&self) -> Result<(), ServerError> {
        loop {
            let stream = self.listener.accept().await.context(ListenSnafu)?;
            tracing::debug!("Accepted connection");

            let core = Arc::clone(&self.core);
            let connection = Connection::from(stream);

            let span = tracing::info_span!("handle", req = Empty).or_current();
            tokio::spawn(
                async move {
                    if let Err(err) = Self::handle(core, connection).await {
                        tracing_report!(err, "Could not handle requests");
                    }
                }
                .instrument(span),
            );
        }
    }

    /// Handle a request from an accepted connection.
    ///
    /// # Errors
    ///
    /// This function will return an error if the connection breaks or the
    /// peer does not send a request.
    async fn handle<S: Stream>(
        core: Arc<ApplicationCore>,
        mut connection: Connection<S>,
    ) -> Result<(), ServerError> {
        let frame = connection.receive().await.context(ReceiveSnafu)?;
        let request = match Protocol::from(frame) {
            Protocol::Request(request) => request,
            protocol => return BadRequestSnafu { protocol }.fail(),
        };

        Span::current().record("req", format!("{request:?}"));
        tracing::info!("Received request");

        let response = match Self::dispatch(&core, request).await {
            Ok(response) => response,
            Err(err) => {
                tracing_report!(err);
                Response::Error {
                    message: snafu::Report::from_error(&err).to_string(),
                }
            }
        };

        connection
            .send(Protocol::Response(response).into())
            .await
            .context(SendSnafu)
            .inspect(|_| tracing::debug!("Sent response"))
    }

    async fn dispatch(
        core: &ApplicationCore,
        request: Request,
    ) -> Result<Response, HandleRequestError> {
        match request {
            Request::Pause { kind } => core.pause.pause(kind).await.map(|_| Response::Pause),
            Request::Resume { kind } => core.resume.resume(kind).await.map(|_| Response::Resume),
            Request::Skip { kind } => core.skip.skip(kind).await.map(|_| Response::Skip),
            Request::Query => core.query.query().await.map(Response::from),
            Request::Test { kind } => core.test.test(kind).await.map(|_| Response::Test),
            Request::Reload => core.reload.reload().await.map(|_| Response::Reload),
        }
    }
}

impl From<QueryResponse> for Response {
    fn from(value: QueryResponse) -> Self {
        Response::Query {
            paused: value.paused,
            reminders: value.reminders,
        }
    }
}

/// An error type for server.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ServerError {
    #[snafu(display("Could not accept a connection"))]
    Listen { source: ListenError },
    #[snafu(display("Could not receive a request"))]
    Receive { source: ReceiveFrameError },
    #[snafu(display("Could not handle {protocol:?}"))]
    BadRequest { protocol: Protocol },
    #[snafu(display("Could not send a response"))]
    Send { source: SendFrameError },
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::DuplexStream;
    use tokio::time::Duration;

    use crate::daemon::app::listener::DuplexListener;
    use crate::domain::daemon::inbound::{
        MockPausePort, MockQueryPort, MockReloadPort, MockResumePort, MockSkipPort,
        MockTestPort, ReminderStatus,
    };
    use crate::domain::daemon::SchedulerError;
    use crate::domain::entity::{ReminderKind, TimerStatus};

    fn reminders() -> Vec<ReminderStatus> {
        vec![ReminderStatus {
            kind: ReminderKind::Break,
            status: TimerStatus::Paused,
            interval: Some(25),
            remaining: Some(Duration::from_secs(600)),
        }]
    }

    fn new_core() -> ApplicationCore {
        let mut pause = MockPausePort::new();
        pause.expect_pause().returning(|_| Ok(()));

        let mut resume = MockResumePort::new();
        resume
            .expect_resume()
            .withf(|kind| *kind == Some(ReminderKind::Posture))
            .returning(|_| Ok(()));

        let mut skip = MockSkipPort::new();
        skip.expect_skip().returning(|_| Ok(()));

        let mut query = MockQueryPort::new();
        query.expect_query().returning(|| {
            Ok(QueryResponse {
                paused: true,
                reminders: reminders(),
            })
        });

        let mut test = MockTestPort::new();
        test.expect_test().returning(|_| {
            Err(HandleRequestError::Scheduler {
                source: SchedulerError::Stopped,
            })
        });

        let mut reload = MockReloadPort::new();
        reload.expect_reload().returning(|| Ok(()));

        ApplicationCore {
            pause: Arc::new(pause),
            resume: Arc::new(resume),
            skip: Arc::new(skip),
            query: Arc::new(query),
            test: Arc::new(test),
            reload: Arc::new(reload),
        }
    }

    async fn new_connection_with(
        data_recv: Protocol,
    ) -> (Connection<DuplexStream>, Connection<DuplexStream>) {
        let (server, client) = tokio::io::duplex(1024);
        let server = Connection::from(server);
        let mut client = Connection::from(client);
        client.send(data_recv.into()).await.unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn server_handle_query() {
        let (connection, mut client) = new_connection_with(Request::Query.into()).await;
        assert!(Server::handle(Arc::new(new_core()), connection).await.is_ok());
        assert_eq!(
            client.receive().await.unwrap(),
            Protocol::Response(Response::Query {
                paused: true,
                reminders: reminders(),
            })
            .into(),
        );
    }

    #[tokio::test]
    async fn server_handle_resume_with_kind() {
        let request = Request::Resume {
            kind: Some(ReminderKind::Posture),
        };
        let (connection, mut client) = new_connection_with(request.into()).await;
        assert!(Server::handle(Arc::new(new_core()), connection).await.is_ok());
        assert_eq!(
            client.receive().await.unwrap(),
            Protocol::Response(Response::Resume).into(),
        );
    }

    #[tokio::test]
    async fn server_handle_port_error() {
        let request = Request::Test {
            kind: Some(ReminderKind::Break),
        };
        let (connection, mut client) = new_connection_with(request.into()).await;
        assert!(Server::handle(Arc::new(new_core()), connection).await.is_ok());

        match client.receive().await.unwrap().into_inner() {
            Protocol::Response(Response::Error { message }) => {
                assert!(message.contains("Could not reach the scheduler"));
            }
            protocol => panic!("unexpected {protocol:?}"),
        }
    }

    #[tokio::test]
    async fn server_handle_error_bad_request() {
        let (connection, _client) = new_connection_with(Response::Pause.into()).await;
        assert!(matches!(
            Server::handle(Arc::new(new_core()), connection).await,
            Err(ServerError::BadRequest {
                protocol: Protocol::Response(Response::Pause)
            }),
        ))
    }

    #[tokio::test]
    async fn server_handle_error_send() {
        let (connection, client) = new_connection_with(Request::Pause { kind: None }.into()).await;
        drop(client);
        assert!(matches!(
            Server::handle(Arc::new(new_core()), connection).await,
            Err(ServerError::Send { .. }),
        ))
    }

    #[tokio::test]
    async fn server_serve() {
        let (listener, mut peers) = DuplexListener::new(1024);
        let server = Server::new(Box::new(listener), new_core());
        let serving = tokio::spawn(async move { server.serve().await });

        for _ in 0..3 {
            let mut client = Connection::from(peers.recv().await.unwrap());
            client.send(Protocol::from(Request::Reload).into()).await.unwrap();
            assert_eq!(
                client.receive().await.unwrap(),
                Protocol::Response(Response::Reload).into(),
            );
        }

        drop(peers);
        assert!(matches!(
            serving.await.unwrap(),
            Err(ServerError::Listen {
                source: ListenError::PeerClosed
            })
        ));
    }
}
