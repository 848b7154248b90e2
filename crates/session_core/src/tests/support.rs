use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{domain::shell_prefix, error::RemoteExecutionError};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionPool, ExecutionOutput, RemoteExecutor};

/// In-memory stand-in for a remote host.
///
/// `pwd` prints the host's home directory, commands starting with `fail`
/// exit non-zero, `drop` simulates a transport fault, and anything else is
/// echoed back tagged with the host name.
pub(crate) struct ScriptedExecutor {
    host: String,
    calls: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_close: bool,
}

impl ScriptedExecutor {
    pub(crate) fn new(host: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            host: host.into(),
            calls: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_close: false,
        })
    }

    pub(crate) fn failing_close(host: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            host: host.into(),
            calls: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
            fail_close: true,
        })
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn execute(&self, command: &str) -> ExecutionOutput {
        self.calls.lock().await.push(command.to_string());
        if command == "pwd" {
            return ExecutionOutput::completed(format!("/home/{}\n", self.host));
        }
        if command.starts_with("fail") {
            return ExecutionOutput::failed(
                format!("{}: {command}: not found\n", self.host),
                RemoteExecutionError::NonZeroExit { status: 127 },
            );
        }
        if command == "drop" {
            return ExecutionOutput::failed(
                "",
                RemoteExecutionError::Transport("connection reset by peer".into()),
            );
        }
        ExecutionOutput::completed(format!("{}: {command}\n", self.host))
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(anyhow!("{} already disconnected", self.host));
        }
        Ok(())
    }
}

pub(crate) fn pool_of(hosts: &[&str]) -> (ConnectionPool, Vec<Arc<ScriptedExecutor>>) {
    let executors: Vec<_> = hosts.iter().map(|host| ScriptedExecutor::new(*host)).collect();
    let pool = pool_over(&executors);
    (pool, executors)
}

pub(crate) fn pool_over(executors: &[Arc<ScriptedExecutor>]) -> ConnectionPool {
    ConnectionPool::new(
        executors
            .iter()
            .map(|executor| {
                Connection::new(
                    shell_prefix("ops", &executor.host),
                    executor.clone() as Arc<dyn RemoteExecutor>,
                )
            })
            .collect(),
    )
}
