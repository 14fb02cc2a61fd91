//! Disposable account domain model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted disposable front-end account.
///
/// Accounts are created exactly once by the onboarding workflow and
/// never updated by it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Generated, unique across all accounts.
    pub username: String,
    /// Argon2id PHC-format hash. The plaintext is never stored.
    pub password_hash: String,
    /// Storage folder the account record lives in. `None` means the
    /// storage default.
    pub storage_folder: Option<i64>,
    /// Group memberships (membership-only relation, unordered).
    pub group_ids: BTreeSet<Uuid>,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The transient, form-bound shape of an account before persistence.
///
/// Form fields (`full_name`, `email`) come from the visitor; the
/// remaining fields are filled in by enrichment. An empty draft is the
/// state of a freshly rendered form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDraft {
    pub username: String,
    pub password_hash: String,
    pub storage_folder: Option<i64>,
    pub group_ids: BTreeSet<Uuid>,
    pub full_name: String,
    pub email: String,
}
