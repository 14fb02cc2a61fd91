//! SurrealDB implementation of [`AccountRepository`].
//!
//! The account's password hash is produced upstream by the credentials
//! generator; this layer stores it as-is and never sees a plaintext
//! password. Username uniqueness is enforced by the
//! `idx_account_username` index.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use guestpass_core::error::GuestpassResult;
use guestpass_core::models::account::{Account, AccountDraft};
use guestpass_core::repository::AccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccountRow {
    username: String,
    password_hash: String,
    storage_folder: Option<i64>,
    group_ids: Vec<String>,
    full_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    storage_folder: Option<i64>,
    group_ids: Vec<String>,
    full_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_group_ids(raw: Vec<String>) -> Result<BTreeSet<Uuid>, DbError> {
    raw.iter()
        .map(|s| {
            Uuid::parse_str(s).map_err(|e| DbError::Migration(format!("invalid group UUID: {e}")))
        })
        .collect()
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<Account, DbError> {
        Ok(Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            storage_folder: self.storage_folder,
            group_ids: parse_group_ids(self.group_ids)?,
            full_name: self.full_name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            storage_folder: self.storage_folder,
            group_ids: parse_group_ids(self.group_ids)?,
            full_name: self.full_name,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn add(&self, draft: AccountDraft) -> GuestpassResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let group_ids: Vec<String> = draft.group_ids.iter().map(Uuid::to_string).collect();

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 username = $username, \
                 password_hash = $password_hash, \
                 storage_folder = $storage_folder, \
                 group_ids = $group_ids, \
                 full_name = $full_name, \
                 email = $email",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", draft.username.clone()))
            .bind(("password_hash", draft.password_hash))
            .bind(("storage_folder", draft.storage_folder))
            .bind(("group_ids", group_ids))
            .bind(("full_name", draft.full_name))
            .bind(("email", draft.email))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            // The unique username index rejects concurrent duplicates.
            if e.to_string().contains("idx_account_username") {
                DbError::AlreadyExists {
                    entity: format!("account with username {}", draft.username),
                }
            } else {
                DbError::Migration(e.to_string())
            }
        })?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn find_by_id(&self, id: Uuid) -> GuestpassResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn find_by_username(&self, username: &str) -> GuestpassResult<Account> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn username_exists(&self, username: &str) -> GuestpassResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM account \
                 WHERE username = $username GROUP ALL",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
