use std::sync::Arc;

use snafu::prelude::*;

use crate::client::app::connector::{ConnectError, Connector};
use crate::domain::client::outbound::{
    BadResponseSnafu, DaemonPort, QueryResponse, RejectedSnafu, RequestDaemonError,
    UnavailableSnafu,
};
use crate::domain::entity::ReminderKind;
use crate::protocol::{Connection, Protocol, Request, Response};

/// A [`DaemonPort`] implementation which sends one request per connection.
pub struct DaemonService {
    connector: Arc<dyn Connector>,
}

impl DaemonService {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Send `request` and wait for the reply. An error reply from the daemon
    /// becomes [`RequestDaemonError::Rejected`].
    async fn exchange(&self, request: Request) -> Result<Response, RequestDaemonError> {
        let stream = match self.connector.connect().await {
            Ok(stream) => stream,
            Err(ConnectError::Unavailable { endpoint }) => {
                return UnavailableSnafu { endpoint }.fail()
            }
            Err(err) => return Err(err).whatever_context("Could not connect"),
        };

        let mut connection = Connection::from(stream);
        connection
            .send(Protocol::Request(request).into())
            .await
            .whatever_context("Could not send request")?;

        let frame = connection
            .receive()
            .await
            .whatever_context("Could not receive response")?;

        match Protocol::from(frame) {
            Protocol::Response(Response::Error { message }) => RejectedSnafu { message }.fail(),
            Protocol::Response(response) => Ok(response),
            Protocol::Request(_) => BadResponseSnafu.fail(),
        }
    }

    async fn acknowledge(
        &self,
        request: Request,
        expected: Response,
    ) -> Result<(), RequestDaemonError> {
        let response = self.exchange(request).await?;
        ensure!(response == expected, BadResponseSnafu);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DaemonPort for DaemonService {
    async fn pause(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError> {
        self.acknowledge(Request::Pause { kind }, Response::Pause).await
    }

    async fn resume(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError> {
        self.acknowledge(Request::Resume { kind }, Response::Resume).await
    }

    async fn skip(&self, kind: ReminderKind) -> Result<(), RequestDaemonError> {
        self.acknowledge(Request::Skip { kind }, Response::Skip).await
    }

    async fn query(&self) -> Result<QueryResponse, RequestDaemonError> {
        match self.exchange(Request::Query).await? {
            Response::Query { paused, reminders } => Ok(QueryResponse { paused, reminders }),
            _ => BadResponseSnafu.fail(),
        }
    }

    async fn test(&self, kind: Option<ReminderKind>) -> Result<(), RequestDaemonError> {
        self.acknowledge(Request::Test { kind }, Response::Test).await
    }

    async fn reload(&self) -> Result<(), RequestDaemonError> {
        self.acknowledge(Request::Reload, Response::Reload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::DuplexStream;
    use tokio::sync::mpsc::Receiver;
    use tokio::time::Duration;

    use crate::client::app::connector::DuplexConnector;
    use crate::domain::client::outbound::ReminderStatus;
    use crate::domain::entity::TimerStatus;

    /// Answer the next connection with `response` once it sent `expected`.
    fn serve_once(mut server: Receiver<DuplexStream>, expected: Request, response: Response) {
        tokio::spawn(async move {
            let server = server.recv().await.unwrap();
            let mut connection = Connection::from(server);
            let request = connection.receive().await.unwrap();
            assert_eq!(Protocol::from(request), Protocol::Request(expected));
            connection
                .send(Protocol::Response(response).into())
                .await
                .unwrap();
        });
    }

    #[tokio::test]
    async fn daemon_service_pause_all() {
        let (connector, server) = DuplexConnector::new(256);
        serve_once(server, Request::Pause { kind: None }, Response::Pause);

        let service = DaemonService::new(Arc::new(connector));
        assert!(service.pause(None).await.is_ok());
    }

    #[tokio::test]
    async fn daemon_service_skip() {
        let (connector, server) = DuplexConnector::new(256);
        let kind = ReminderKind::StandSit;
        serve_once(server, Request::Skip { kind }, Response::Skip);

        let service = DaemonService::new(Arc::new(connector));
        assert!(service.skip(kind).await.is_ok());
    }

    #[tokio::test]
    async fn daemon_service_query() {
        let (connector, server) = DuplexConnector::new(1024);
        let reminders = vec![ReminderStatus {
            kind: ReminderKind::Posture,
            status: TimerStatus::Running,
            interval: Some(30),
            remaining: Some(Duration::from_secs(90)),
        }];
        serve_once(
            server,
            Request::Query,
            Response::Query {
                paused: false,
                reminders: reminders.clone(),
            },
        );

        let service = DaemonService::new(Arc::new(connector));
        assert_eq!(
            service.query().await.unwrap(),
            QueryResponse {
                paused: false,
                reminders
            }
        );
    }

    #[tokio::test]
    async fn daemon_service_error_unavailable() {
        let (connector, server) = DuplexConnector::new(256);
        drop(server);

        let service = DaemonService::new(Arc::new(connector));
        assert!(matches!(
            service.resume(None).await,
            Err(RequestDaemonError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn daemon_service_error_unknown() {
        let (connector, mut server) = DuplexConnector::new(256);

        tokio::spawn(async move {
            let _ = server.recv().await.unwrap();
        });

        let service = DaemonService::new(Arc::new(connector));
        assert!(matches!(
            service.reload().await,
            Err(RequestDaemonError::Unknown { .. })
        ));
    }

    #[tokio::test]
    async fn daemon_service_error_bad_response() {
        let (connector, server) = DuplexConnector::new(256);
        let kind = Some(ReminderKind::Break);
        serve_once(server, Request::Test { kind }, Response::Skip);

        let service = DaemonService::new(Arc::new(connector));
        assert!(matches!(
            service.test(kind).await,
            Err(RequestDaemonError::BadResponse)
        ));
    }

    #[tokio::test]
    async fn daemon_service_error_rejected() {
        let (connector, server) = DuplexConnector::new(256);
        serve_once(
            server,
            Request::Reload,
            Response::Error {
                message: "Invalid interval for reminder break".to_owned(),
            },
        );

        let service = DaemonService::new(Arc::new(connector));
        match service.reload().await {
            Err(RequestDaemonError::Rejected { message }) => {
                assert_eq!(message, "Invalid interval for reminder break");
            }
            res => panic!("unexpected {res:?}"),
        }
    }
}
