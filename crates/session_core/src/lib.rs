use anyhow::Result;
use async_trait::async_trait;
use shared::error::RemoteExecutionError;

pub mod engine;
pub mod error;
pub mod pool;
pub mod resolver;
pub mod session;
pub mod transcript;
pub mod view;

pub use engine::{CurrentView, DispatchEngine, DispatchOutcome, DispatchPhase, HELP_TEXT};
pub use error::SessionError;
pub use pool::{Connection, ConnectionPool};
pub use resolver::{Command, CommandResolver, CommandSource, LOAD_COMMAND_PREFIX};
pub use session::Session;
pub use transcript::{Entry, EntryKind, TranscriptStore};
pub use view::{cycle, ViewState};

/// Combined stdout/stderr of one remote command, plus how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub text: String,
    pub failure: Option<RemoteExecutionError>,
}

impl ExecutionOutput {
    pub fn completed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failure: None,
        }
    }

    pub fn failed(text: impl Into<String>, failure: RemoteExecutionError) -> Self {
        Self {
            text: text.into(),
            failure: Some(failure),
        }
    }

    /// Flattens the output into the text recorded in a transcript. A failure
    /// description is appended after whatever the command printed.
    pub fn into_text(self) -> String {
        let Some(failure) = self.failure else {
            return self.text;
        };
        let mut text = self.text;
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&failure.to_string());
        text
    }
}

/// One established remote channel able to run commands in fresh,
/// single-use execution contexts.
///
/// `execute` never fails from the caller's point of view: transport faults
/// and non-zero exits are reported through [`ExecutionOutput::failure`].
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, command: &str) -> ExecutionOutput;
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
