//! The canonical response envelope.
//!
//! The backend answers with either `{ "status": "...", "data": {...} }`
//! or `{ "token": "...", "data": { "user": {...} } }` depending on the
//! endpoint. One envelope type absorbs both shapes here so the rest of
//! the client never sees the difference.

use serde::Deserialize;

/// Parsed response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Backend status string; informational only, the HTTP status code
    /// governs error handling.
    #[serde(default)]
    pub status: Option<String>,
    /// Session token, present only on auth endpoints.
    #[serde(default)]
    pub token: Option<String>,
    /// The payload.
    pub data: T,
}
