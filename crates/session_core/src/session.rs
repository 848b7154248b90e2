use shared::domain::ConnectionId;

use crate::{
    error::SessionError,
    pool::ConnectionPool,
    transcript::{Entry, TranscriptStore},
    view::ViewState,
};

/// Everything the dispatch engine owns for the life of the process: the
/// connections, one transcript per connection, and the view state.
pub struct Session {
    pool: ConnectionPool,
    transcripts: TranscriptStore,
    view: ViewState,
}

impl Session {
    /// Builds a session over an established pool. Each transcript starts with
    /// a login notice for its connection.
    pub fn new(pool: ConnectionPool) -> Result<Self, SessionError> {
        if pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let mut transcripts = TranscriptStore::new(pool.size());
        for id in pool.ids() {
            transcripts.append(id, login_notice(id))?;
        }
        let view = ViewState::new(pool.size());

        Ok(Self {
            pool,
            transcripts,
            view,
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub(crate) fn parts_mut(&mut self) -> (&ConnectionPool, &mut TranscriptStore, &mut ViewState) {
        (&self.pool, &mut self.transcripts, &mut self.view)
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub(crate) fn pool_mut(&mut self) -> &mut ConnectionPool {
        &mut self.pool
    }
}

fn login_notice(id: ConnectionId) -> Entry {
    Entry::status(format!("Logged in for server {}", id.ordinal()))
}
