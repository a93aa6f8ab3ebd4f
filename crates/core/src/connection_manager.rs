use async_trait::async_trait;
use thiserror::Error;

use crate::credentials::Credentials;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Driver seam for opening, verifying, and closing a database connection.
#[async_trait]
pub trait ConnectionBackend {
    type Connection: Send;

    async fn connect(&self, credentials: &Credentials)
        -> Result<Self::Connection, BackendError>;
    async fn ping(&self, connection: &mut Self::Connection) -> Result<(), BackendError>;
    async fn disconnect(&self, connection: Self::Connection) -> Result<(), BackendError>;
}

#[derive(Debug, Error)]
pub enum ConnectionManagerError {
    #[error("an active connection already exists")]
    AlreadyConnected,
    #[error("connection backend failed: {0}")]
    Backend(#[source] BackendError),
}

/// Owns the single database connection. At most one handle is open at a
/// time, and nothing outside the manager may close it.
#[derive(Debug)]
pub struct ConnectionManager<B: ConnectionBackend> {
    backend: B,
    active: Option<B::Connection>,
}

impl<B: ConnectionBackend> ConnectionManager<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Backend and open handle in one borrow, so callers can run a query
    /// without releasing the manager.
    pub fn split_mut(&mut self) -> (&B, Option<&mut B::Connection>) {
        (&self.backend, self.active.as_mut())
    }

    /// Opens and pings a connection. A ping failure closes the half-open
    /// handle before the error is returned.
    pub async fn connect(
        &mut self,
        credentials: &Credentials,
    ) -> Result<(), ConnectionManagerError> {
        if self.active.is_some() {
            return Err(ConnectionManagerError::AlreadyConnected);
        }

        let mut handle = self
            .backend
            .connect(credentials)
            .await
            .map_err(ConnectionManagerError::Backend)?;
        if let Err(error) = self.backend.ping(&mut handle).await {
            let _ = self.backend.disconnect(handle).await;
            return Err(ConnectionManagerError::Backend(error));
        }

        self.active = Some(handle);
        Ok(())
    }

    /// Idempotent close; disconnecting with no open handle is a no-op.
    pub async fn disconnect(&mut self) -> Result<(), ConnectionManagerError> {
        let Some(handle) = self.active.take() else {
            return Ok(());
        };

        self.backend
            .disconnect(handle)
            .await
            .map_err(ConnectionManagerError::Backend)
    }
}
