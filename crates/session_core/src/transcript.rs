use shared::domain::ConnectionId;

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A command that was executed remotely, with its output.
    Command,
    /// A locally generated notice (mode switches, load failures).
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub prefix: String,
    pub command: String,
    pub output: String,
}

impl Entry {
    pub fn command(
        prefix: impl Into<String>,
        command: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            kind: EntryKind::Command,
            prefix: prefix.into(),
            command: command.into(),
            output: output.into(),
        }
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Status,
            prefix: String::new(),
            command: String::new(),
            output: message.into(),
        }
    }

    pub fn is_status(&self) -> bool {
        self.kind == EntryKind::Status
    }

    /// Unwrapped display text for this entry.
    pub fn render(&self) -> String {
        match self.kind {
            EntryKind::Command => format!("{}{}\n{}", self.prefix, self.command, self.output),
            EntryKind::Status => self.output.clone(),
        }
    }
}

/// One append-only log per connection, index-aligned with the pool.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    transcripts: Vec<Vec<Entry>>,
}

impl TranscriptStore {
    pub fn new(connection_count: usize) -> Self {
        Self {
            transcripts: vec![Vec::new(); connection_count],
        }
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Appends `entry` to transcript `id` and returns that transcript's new length.
    pub fn append(&mut self, id: ConnectionId, entry: Entry) -> Result<usize, SessionError> {
        let transcript = self
            .transcripts
            .get_mut(id.0)
            .ok_or(SessionError::UnknownConnection(id))?;
        transcript.push(entry);
        Ok(transcript.len())
    }

    pub fn get(&self, id: ConnectionId) -> Result<&[Entry], SessionError> {
        self.transcripts
            .get(id.0)
            .map(Vec::as_slice)
            .ok_or(SessionError::UnknownConnection(id))
    }

    pub fn entry_count(&self, id: ConnectionId) -> usize {
        self.transcripts.get(id.0).map_or(0, Vec::len)
    }
}

#[cfg(test)]
#[path = "tests/transcript_tests.rs"]
mod tests;
