use shared::domain::ConnectionId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no connection with index {0}")]
    UnknownConnection(ConnectionId),
    #[error("a session needs at least one connection")]
    EmptyPool,
    #[error("connection pool is already closed")]
    PoolClosed,
}
