//! guestpass onboarding — the disposable-account issuance workflow.
//!
//! A form submission enters [`OnboardingService::create`], which
//! validates the draft, enriches it with generated credentials and
//! configured policy (storage folder, default groups), persists it
//! exactly once, and completes via the selected strategy: auto-login
//! through the session activator, or one-time display of the
//! credentials.

pub mod activator;
pub mod config;
pub mod error;
pub mod escape;
pub mod generator;
pub mod service;
pub mod validator;

pub use activator::{ActivatedSession, ONE_TIME_ACCOUNT_KEY, SessionActivator};
pub use config::{FormField, OnboardingSettings};
pub use error::OnboardingError;
pub use generator::{CredentialsGenerator, RandomUsernameSource, UsernameSource};
pub use service::{CompletionMode, CreationOutcome, OnboardingService};
pub use validator::FieldError;
