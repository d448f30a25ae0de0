//! Session handler trait definition.

use crate::error::SessionResult;
use crate::update::SessionData;
use async_trait::async_trait;
use mongodb::bson::Document;

/// Storage-backend contract for HTTP session lifecycle operations.
///
/// Mirrors the classic session-handler interface a web framework drives once
/// per request: `open`/`close` bracket the request, `read` fetches (and
/// implicitly creates) the session, `write` persists it, `destroy` invalidates
/// it, and `gc` reclaims expired records.
///
/// Per-call store failures on `write`/`destroy`/`gc` are reported through the
/// returned acknowledgement flag rather than as errors, so a flaky store
/// degrades to "session not persisted this request" instead of failing the
/// request. Unrecoverable connection loss still surfaces as an error.
#[async_trait]
pub trait SessionHandler: Send + Sync {
    /// Open the handler.
    ///
    /// Connection lifecycle is owned by the store client, established at
    /// handler construction, so implementations typically succeed
    /// unconditionally here.
    async fn open(&self, path: &str, name: &str) -> SessionResult<bool>;

    /// Close the handler.
    async fn close(&self) -> SessionResult<bool>;

    /// Read the session payload, creating the record on first access.
    ///
    /// # Returns
    ///
    /// The stored payload, or an empty document for absent and destroyed
    /// sessions.
    async fn read(&self, id: &str) -> SessionResult<Document>;

    /// Persist a mutation log for the session.
    ///
    /// # Returns
    ///
    /// Whether the store acknowledged the update. An empty payload is a
    /// successful no-op; writing to an absent or destroyed session matches
    /// nothing and is also success.
    async fn write(&self, id: &str, data: SessionData) -> SessionResult<bool>;

    /// Mark the session as destroyed. Idempotent.
    async fn destroy(&self, id: &str) -> SessionResult<bool>;

    /// Remove stale-destroyed and expired sessions.
    ///
    /// # Arguments
    ///
    /// * `max_lifetime` - retention horizon in seconds for tombstones; live
    ///   records expire against their own stored lifetime instead.
    async fn gc(&self, max_lifetime: i64) -> SessionResult<bool>;
}

/// Generate a new unique session ID.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
