use std::sync::Arc;

use futures::future::join_all;
use shared::domain::ConnectionId;
use tracing::{debug, info, warn};

use crate::{error::SessionError, RemoteExecutor};

pub struct Connection {
    prefix: String,
    executor: Arc<dyn RemoteExecutor>,
}

impl Connection {
    pub fn new(prefix: impl Into<String>, executor: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            prefix: prefix.into(),
            executor,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn run(&self, id: ConnectionId, command: &str) -> String {
        let output = self.executor.execute(command).await;
        match &output.failure {
            Some(failure) => warn!(
                connection = id.0,
                code = ?failure.code(),
                %failure,
                "pool: remote command failed"
            ),
            None => debug!(
                connection = id.0,
                bytes = output.text.len(),
                "pool: remote command completed"
            ),
        }
        output.into_text()
    }
}

/// Fixed, ordered set of connections. A connection's index is its identity
/// for the lifetime of the process.
pub struct ConnectionPool {
    connections: Vec<Connection>,
    closed: bool,
}

impl ConnectionPool {
    pub fn new(connections: Vec<Connection>) -> Self {
        Self {
            connections,
            closed: false,
        }
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn ids(&self) -> impl Iterator<Item = ConnectionId> {
        (0..self.connections.len()).map(ConnectionId)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    pub fn prefix(&self, id: ConnectionId) -> Result<&str, SessionError> {
        self.connection(id)
            .map(Connection::prefix)
            .ok_or(SessionError::UnknownConnection(id))
    }

    /// Runs `command` on a single connection and returns its combined output.
    pub async fn execute(&self, id: ConnectionId, command: &str) -> Result<String, SessionError> {
        if self.closed {
            return Err(SessionError::PoolClosed);
        }
        let connection = self
            .connection(id)
            .ok_or(SessionError::UnknownConnection(id))?;
        Ok(connection.run(id, command).await)
    }

    /// Runs `command` on every connection concurrently. Returns once all of
    /// them have finished; the result is index-aligned with the pool.
    pub async fn execute_all(&self, command: &str) -> Result<Vec<String>, SessionError> {
        if self.closed {
            return Err(SessionError::PoolClosed);
        }
        let runs = self
            .connections
            .iter()
            .enumerate()
            .map(|(index, connection)| connection.run(ConnectionId(index), command));
        Ok(join_all(runs).await)
    }

    /// Releases every connection. Later calls are no-ops.
    pub async fn close_all(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for (index, connection) in self.connections.iter().enumerate() {
            if let Err(error) = connection.executor.close().await {
                warn!(connection = index, %error, "pool: failed to close connection");
            }
        }
        info!(connections = self.connections.len(), "pool: all connections closed");
    }
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
mod tests;
