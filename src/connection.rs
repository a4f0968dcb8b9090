//! Request/response cycles against the database's HTTP API.
//!
//! The socket work itself belongs to a [`Transport`]; a [`Connection`] only
//! shapes requests (paths, credentials, JSON bodies) and makes sure one round
//! trip at a time goes through it.

use std::sync::Mutex;

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HOST};
use http::request::Builder;
use http::{Method, Request, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cursor::{Cursor, CursorState};
use crate::error::{AqlcladError, Result};
use crate::query::Aql;
use crate::settings::ConnectionConfig;

/// Sends one request and blocks for its response.
///
/// Implementations report connect/write/read failures as
/// [`AqlcladError::Transport`]; nothing above this layer retries.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request<String>) -> Result<Response<String>>;
}

impl<F> Transport for F
where
    F: Fn(Request<String>) -> Result<Response<String>> + Send + Sync,
{
    fn send(&self, request: Request<String>) -> Result<Response<String>> {
        self(request)
    }
}

/// Options of a new server cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorOptions {
    /// Ask the server to report the total number of results.
    pub count: bool,
    /// Maximum number of results per batch, server default when unset.
    pub batch_size: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CursorRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    count: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_size: Option<u32>,
}

pub struct Connection {
    config: ConnectionConfig,
    transport: Box<dyn Transport>,
    lock: Mutex<()>,
}

impl Connection {
    pub fn new(config: ConnectionConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            lock: Mutex::new(()),
        }
    }
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
    pub fn database(&self) -> &str {
        &self.config.database
    }

    /// A request for a server-wide path, credentials already attached.
    pub fn url(&self, method: Method, path: &str) -> Builder {
        let path = path.trim_start_matches(['/', ' ']);
        Request::builder()
            .method(method)
            .uri(format!("/{}", path))
            .header(HOST, self.config.authority())
            .header(AUTHORIZATION, self.config.authorization())
    }

    /// A request for a path below the configured database.
    pub fn db_url(&self, method: Method, path: &str) -> Builder {
        let path = path.trim_start_matches(['/', ' ']);
        self.url(method, &format!("/_db/{}/{}", self.config.database, path))
    }

    /// One full round trip. Concurrent callers wait for each other here.
    pub fn request(&self, request: Request<String>) -> Result<Response<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| AqlcladError::Lock(e.to_string()))?;
        debug!(method=%request.method(), uri=%request.uri(), "request");
        let response = self.transport.send(request)?;
        debug!(status=%response.status().as_u16(), "response");
        Ok(response)
    }

    /// Paths starting with `/` address the server, anything else the database.
    pub fn query(&self, method: Method, path: &str, body: Option<String>) -> Result<Response<String>> {
        let builder = if path.starts_with('/') {
            self.url(method, path)
        } else {
            self.db_url(method, path)
        };
        let request = match body {
            Some(content) => builder
                .header(CONTENT_TYPE, "application/json")
                .header(CONTENT_LENGTH, content.len())
                .body(content)?,
            None => builder.body(String::new())?,
        };
        self.request(request)
    }

    pub fn aql<Q: Aql + ?Sized>(&self, query: &Q) -> Result<Cursor<'_>> {
        self.aql_with(query, CursorOptions::default())
    }

    /// Opens a server cursor for `query` and attaches its first batch.
    ///
    /// A non-success status is not an error here: the server's error envelope
    /// is attached and can be inspected through [`Cursor::error`] and [`Cursor::code`].
    pub fn aql_with<Q: Aql + ?Sized>(&self, query: &Q, options: CursorOptions) -> Result<Cursor<'_>> {
        let text = query.to_aql()?;
        debug!(query=%text, "aql");
        let body = serde_json::to_string(&CursorRequest {
            query: &text,
            count: options.count,
            batch_size: options.batch_size,
        })?;
        let response = self.query(Method::POST, "_api/cursor", Some(body))?;
        if !response.status().is_success() {
            warn!(status=%response.status().as_u16(), query=%text, "AQL failed");
        }
        let cursor = Cursor::new(self);
        cursor.attach(&response)?;
        Ok(cursor)
    }
}

/// Runs queries and keeps the state of the last one around.
pub struct Shell {
    conn: Connection,
    last: Option<CursorState>,
}

impl Shell {
    pub fn new(conn: Connection) -> Self {
        Self { conn, last: None }
    }
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
    pub fn run<Q: Aql + ?Sized>(&mut self, query: &Q) -> Result<&mut Self> {
        let state = self.conn.aql(query)?.snapshot();
        self.last = Some(state);
        Ok(self)
    }
    pub fn last(&self) -> Option<&CursorState> {
        self.last.as_ref()
    }
    pub fn has_more(&self) -> bool {
        self.last.as_ref().is_some_and(|s| s.has_more)
    }
    pub fn is_error(&self) -> bool {
        self.last.as_ref().is_some_and(|s| s.error)
    }
    pub fn count(&self) -> i64 {
        self.last.as_ref().map_or(0, |s| s.count)
    }
    pub fn code(&self) -> i64 {
        self.last.as_ref().map_or(0, |s| s.code)
    }
    pub fn results(&self) -> &[Value] {
        self.last
            .as_ref()
            .map(|s| s.results.as_slice())
            .unwrap_or_default()
    }
}
