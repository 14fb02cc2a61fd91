//! guestpass auth — password hashing/verification, opaque session
//! tokens, and session establishment for known accounts.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput};
