//! Onboarding configuration.
//!
//! Settings are passed explicitly at service construction; nothing is
//! read from ambient or global state. The storage-folder and group
//! settings are kept as raw strings because they arrive from an
//! admin-edited configuration source; parsing happens at the point of
//! use and malformed values fall back to defaults.

use std::collections::BTreeSet;

/// Form fields the validator can be configured to require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    FullName,
    Email,
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::FullName => "full_name",
            FormField::Email => "email",
        }
    }
}

/// Configuration for the onboarding workflow.
#[derive(Debug, Clone)]
pub struct OnboardingSettings {
    /// Raw storage-folder setting. Applied to new accounts only when it
    /// parses as an integer; otherwise the account default is kept.
    pub system_folder_for_new_users: Option<String>,
    /// Comma-separated group ids to add new accounts to. Entries that
    /// do not parse or do not resolve to an existing group are skipped.
    pub groups_for_new_users: Option<String>,
    /// Form fields the visitor must fill in.
    pub required_fields: BTreeSet<FormField>,
    /// Prefix for generated usernames.
    pub username_prefix: String,
    /// Retry bound for the username collision loop.
    pub max_username_attempts: u32,
    /// Length of generated plaintext passwords.
    pub password_length: usize,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            system_folder_for_new_users: None,
            groups_for_new_users: None,
            required_fields: BTreeSet::new(),
            username_prefix: "guest-".into(),
            max_username_attempts: 10,
            password_length: 20,
        }
    }
}
