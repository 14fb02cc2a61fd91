//! SurrealDB repository implementations.

mod account;
mod group;
mod session;

pub use account::SurrealAccountRepository;
pub use group::SurrealGroupRepository;
pub use session::SurrealSessionRepository;
