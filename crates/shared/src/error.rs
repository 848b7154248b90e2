use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Config,
    CommandLoad,
    RemoteExecution,
}

/// Startup failures. Any of these aborts the process before the UI is shown.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read login file '{}': {source}", path.display())]
    ReadLoginFile { path: PathBuf, source: io::Error },
    #[error("malformed login line {line}: {reason}")]
    MalformedLogin { line: usize, reason: String },
    #[error("login file '{}' lists no connections", path.display())]
    NoConnections { path: PathBuf },
    #[error("failed to load credential '{}': {reason}", path.display())]
    Credential { path: PathBuf, reason: String },
    #[error("failed to connect to {host}: {reason}")]
    Connect { host: String, reason: String },
    #[error("connection to {host} timed out after {seconds}s")]
    ConnectTimeout { host: String, seconds: u64 },
    #[error("public key authentication rejected for {username}@{host}")]
    Authentication { username: String, host: String },
    #[error("invalid settings in '{}': {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}

/// Failures resolving a `loadCommand(...)` directive. Reported inline, never fatal.
#[derive(Debug, Error)]
pub enum CommandLoadError {
    #[error("loadCommand directive is missing its closing parenthesis")]
    MissingClosingParen,
    #[error("loadCommand directive names no file")]
    EmptyPath,
    #[error("loadCommand must be the whole input, not embedded in other text")]
    MisplacedDirective,
    #[error("could not read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

/// A remote command that did not complete cleanly. Rendered as text in the
/// channel's output instead of being propagated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteExecutionError {
    #[error("Process exited with status {status}")]
    NonZeroExit { status: u32 },
    #[error("Process exited with signal {signal}")]
    Signal { signal: String },
    #[error("{0}")]
    Transport(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Config
    }
}

impl CommandLoadError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::CommandLoad
    }
}

impl RemoteExecutionError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::RemoteExecution
    }
}
