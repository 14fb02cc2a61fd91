//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Writes are flushed before the
//! returned future resolves; there is no deferred or batched commit.

use uuid::Uuid;

use crate::error::GuestpassResult;
use crate::models::{
    account::{Account, AccountDraft},
    group::{CreateGroup, Group},
    session::{CreateSession, Session},
};

pub trait AccountRepository: Send + Sync {
    /// Persist a new account. The storage layer assigns the id and
    /// enforces username uniqueness; adding a duplicate username fails
    /// with `AlreadyExists`.
    fn add(&self, draft: AccountDraft) -> impl Future<Output = GuestpassResult<Account>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = GuestpassResult<Account>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = GuestpassResult<Account>> + Send;

    /// Cheap existence probe used by the username generator's
    /// collision-retry loop.
    fn username_exists(
        &self,
        username: &str,
    ) -> impl Future<Output = GuestpassResult<bool>> + Send;
}

pub trait GroupRepository: Send + Sync {
    fn create(&self, input: CreateGroup) -> impl Future<Output = GuestpassResult<Group>> + Send;

    /// Look up a group by id; resolves to `NotFound` for unknown ids.
    fn find_by_id(&self, id: Uuid) -> impl Future<Output = GuestpassResult<Group>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = GuestpassResult<Session>> + Send;

    fn find_by_id(&self, id: Uuid) -> impl Future<Output = GuestpassResult<Session>> + Send;

    /// Merge a single key into the session's key/value data store and
    /// return the updated session.
    fn set_data(
        &self,
        id: Uuid,
        key: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = GuestpassResult<Session>> + Send;

    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = GuestpassResult<()>> + Send;
}
