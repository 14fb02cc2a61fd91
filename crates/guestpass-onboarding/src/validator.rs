//! Server-side acceptance rules for submitted account drafts.

use std::fmt;

use guestpass_core::models::account::AccountDraft;

use crate::config::{FormField, OnboardingSettings};

/// Upper bound on form field length, matching the schema's string
/// columns.
const MAX_FIELD_LENGTH: usize = 255;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.name(), self.message)
    }
}

/// Check a submitted draft against the configured acceptance rules.
///
/// This is a pure predicate with no side effects. All failures are
/// aggregated (rather than short-circuiting on the first) so the form
/// can show every problem at once.
pub fn validate(
    draft: &AccountDraft,
    settings: &OnboardingSettings,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for field in &settings.required_fields {
        let value = field_value(draft, *field);
        if value.trim().is_empty() {
            errors.push(FieldError::new(*field, "This field is required."));
        }
    }

    for field in [FormField::FullName, FormField::Email] {
        if field_value(draft, field).len() > MAX_FIELD_LENGTH {
            errors.push(FieldError::new(field, "This value is too long."));
        }
    }

    if !draft.email.is_empty() && !is_plausible_email(&draft.email) {
        errors.push(FieldError::new(
            FormField::Email,
            "This is not a valid email address.",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn field_value(draft: &AccountDraft, field: FormField) -> &str {
    match field {
        FormField::FullName => &draft.full_name,
        FormField::Email => &draft.email,
    }
}

/// Shape check only: one `@`, non-empty local part, dotted domain, no
/// whitespace. Deliverability is not this layer's concern.
fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
