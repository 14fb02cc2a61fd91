//! SurrealDB implementation of [`SessionRepository`].
//!
//! The `data` field is a schemaless object acting as the per-session
//! key/value store. `set_data` merges a single key into it.

use chrono::{DateTime, Utc};
use guestpass_core::error::GuestpassResult;
use guestpass_core::models::session::{CreateSession, Session};
use guestpass_core::repository::SessionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    account_id: String,
    token_hash: String,
    data: serde_json::Value,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self, id: Uuid) -> Result<Session, DbError> {
        let account_id = Uuid::parse_str(&self.account_id)
            .map_err(|e| DbError::Migration(format!("invalid account UUID: {e}")))?;
        Ok(Session {
            id,
            account_id,
            token_hash: self.token_hash,
            data: self.data,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> GuestpassResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('session', $id) SET \
                 account_id = $account_id, \
                 token_hash = $token_hash, \
                 data = {}, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("account_id", input.account_id.to_string()))
            .bind(("token_hash", input.token_hash))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn find_by_id(&self, id: Uuid) -> GuestpassResult<Session> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('session', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn set_data(
        &self,
        id: Uuid,
        key: &str,
        value: serde_json::Value,
    ) -> GuestpassResult<Session> {
        let id_str = id.to_string();
        let patch = serde_json::json!({ "data": { key: value } });

        let result = self
            .db
            .query("UPDATE type::record('session', $id) MERGE $patch")
            .bind(("id", id_str.clone()))
            .bind(("patch", patch))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn invalidate(&self, id: Uuid) -> GuestpassResult<()> {
        self.db
            .query("DELETE type::record('session', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
