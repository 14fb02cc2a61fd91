//! Onboarding error types.

use guestpass_core::error::GuestpassError;
use thiserror::Error;

/// Failures of the credential-generation machinery. These are fatal
/// for the request (a configuration or deployment defect), never a
/// user-facing validation problem.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("could not find a free username after {attempts} attempts")]
    UsernameExhausted { attempts: u32 },
}

impl From<OnboardingError> for GuestpassError {
    fn from(err: OnboardingError) -> Self {
        GuestpassError::CredentialGeneration(err.to_string())
    }
}
