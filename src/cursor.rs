//! Client side of the server cursor pagination protocol.
//!
//! A cursor starts without an id, adopts the id of the first response it is
//! attached to and then pulls further batches with [`Cursor::fetch`] for as
//! long as the server reports `hasMore`. Each fetch replaces the current batch.

use std::sync::{Mutex, MutexGuard, PoisonError};

use http::{Method, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::connection::Connection;
use crate::error::{AqlcladError, Result};

/// Everything the client knows about a cursor after its latest response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorState {
    pub id: Option<String>,
    pub has_more: bool,
    pub error: bool,
    pub count: i64,
    pub code: i64,
    pub error_message: Option<String>,
    pub results: Vec<Value>,
}

// Missing scalar fields fall back to their zero values; `result` is checked separately.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    id: Option<String>,
}

impl CursorState {
    fn apply(&mut self, body: &str) -> Result<()> {
        let envelope: Envelope = serde_json::from_str(body)?;
        let results = match envelope.result {
            Some(results) => results,
            // error envelopes carry no result array
            None if envelope.error => Vec::new(),
            None => {
                return Err(AqlcladError::MalformedResponse {
                    message: "missing `result` array".to_owned(),
                });
            }
        };
        self.has_more = envelope.has_more;
        self.error = envelope.error;
        self.count = envelope.count;
        self.code = envelope.code;
        self.error_message = envelope.error_message;
        self.results = results;
        if self.id.is_none() {
            self.id = envelope.id;
        }
        trace!(id=?self.id, has_more=self.has_more, error=self.error, code=self.code, batch=self.results.len(), "cursor attached");
        Ok(())
    }
}

pub struct Cursor<'c> {
    conn: &'c Connection,
    state: Mutex<CursorState>,
}

impl<'c> Cursor<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            state: Mutex::new(CursorState::default()),
        }
    }

    /// Picks up a cursor the server already holds. More batches are assumed
    /// to exist until the first fetch says otherwise.
    pub fn resume(conn: &'c Connection, id: impl Into<String>) -> Self {
        Self {
            conn,
            state: Mutex::new(CursorState {
                id: Some(id.into()),
                has_more: true,
                ..CursorState::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CursorState>> {
        self.state
            .lock()
            .map_err(|e| AqlcladError::Lock(e.to_string()))
    }

    // readers only copy data out, so a poisoned lock still holds a usable state
    fn read(&self) -> MutexGuard<'_, CursorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the state with the envelope in `response`.
    pub fn attach(&self, response: &Response<String>) -> Result<()> {
        let mut state = self.lock()?;
        state.apply(response.body())
    }

    /// Pulls the next batch, replacing the current one.
    pub fn fetch(&self) -> Result<()> {
        let mut state = self.lock()?;
        if !state.has_more {
            return Err(AqlcladError::InvalidCursor(
                "fetch on an exhausted cursor".to_owned(),
            ));
        }
        let id = match &state.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => {
                return Err(AqlcladError::InvalidCursor(
                    "fetch on a cursor without id".to_owned(),
                ));
            }
        };
        debug!(%id, "fetching next batch");
        let response = self
            .conn
            .query(Method::PUT, &format!("_api/cursor/{}", id), Some(String::new()))?;
        state.apply(response.body())
    }

    /// Fetches until the server has nothing more, returning every batch in order
    /// starting with the current one.
    pub fn drain(&self) -> Result<Vec<Value>> {
        let mut all = self.results();
        while self.has_more() {
            self.fetch()?;
            all.extend(self.results());
        }
        Ok(all)
    }

    pub fn id(&self) -> Option<String> {
        self.read().id.clone()
    }
    pub fn has_more(&self) -> bool {
        self.read().has_more
    }
    pub fn error(&self) -> bool {
        self.read().error
    }
    pub fn count(&self) -> i64 {
        self.read().count
    }
    pub fn code(&self) -> i64 {
        self.read().code
    }
    pub fn error_message(&self) -> Option<String> {
        self.read().error_message.clone()
    }
    pub fn results(&self) -> Vec<Value> {
        self.read().results.clone()
    }
    pub fn snapshot(&self) -> CursorState {
        self.read().clone()
    }
}
