//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated visitor session.
///
/// `data` is a per-session key/value store; the onboarding flow uses it
/// to mark sessions that belong to a disposable account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    /// SHA-256 hex of the opaque session token. The raw token is
    /// returned to the client and never stored.
    pub token_hash: String,
    pub data: serde_json::Value,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub account_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
