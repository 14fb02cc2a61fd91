//! Integration tests for the onboarding workflow using in-memory
//! SurrealDB.

use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::sync::Mutex;

use guestpass_auth::config::AuthConfig;
use guestpass_core::error::GuestpassError;
use guestpass_core::models::account::AccountDraft;
use guestpass_core::models::group::CreateGroup;
use guestpass_core::repository::{GroupRepository, SessionRepository};
use guestpass_db::repository::{
    SurrealAccountRepository, SurrealGroupRepository, SurrealSessionRepository,
};
use guestpass_onboarding::{
    CompletionMode, CreationOutcome, FormField, ONE_TIME_ACCOUNT_KEY, OnboardingService,
    OnboardingSettings, UsernameSource,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

/// A username source that replays a scripted candidate sequence.
struct ScriptedSource {
    candidates: Mutex<VecDeque<String>>,
}

impl ScriptedSource {
    fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: Mutex::new(candidates.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl UsernameSource for ScriptedSource {
    fn candidate(&self) -> String {
        self.candidates
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted candidates exhausted")
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

async fn table_count(db: &Surreal<Db>, table: &str) -> u64 {
    let mut result = db
        .query(format!("SELECT count() AS total FROM {table} GROUP ALL"))
        .await
        .unwrap();
    let rows: Vec<CountRow> = result.take(0).unwrap();
    rows.first().map(|r| r.total).unwrap_or(0)
}

/// Spin up in-memory DB, run migrations, create two groups.
async fn setup() -> (
    Surreal<Db>,
    SurrealAccountRepository<Db>,
    SurrealGroupRepository<Db>,
    SurrealSessionRepository<Db>,
    Uuid, // visitors group
    Uuid, // downloads group
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    guestpass_db::run_migrations(&db).await.unwrap();

    let group_repo = SurrealGroupRepository::new(db.clone());
    let visitors = group_repo
        .create(CreateGroup {
            name: "Visitors".into(),
            description: "One-time visitors".into(),
        })
        .await
        .unwrap();
    let downloads = group_repo
        .create(CreateGroup {
            name: "Downloads".into(),
            description: "Access to protected downloads".into(),
        })
        .await
        .unwrap();

    (
        db.clone(),
        SurrealAccountRepository::new(db.clone()),
        group_repo,
        SurrealSessionRepository::new(db),
        visitors.id,
        downloads.id,
    )
}

#[tokio::test]
async fn created_account_has_generated_credentials() {
    let (_db, accounts, groups, sessions, _, _) = setup().await;
    let svc = OnboardingService::new(
        accounts,
        groups,
        sessions,
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    let outcome = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued { account, .. } = outcome else {
        panic!("expected CredentialsIssued");
    };
    assert!(account.username.starts_with("guest-"));
    assert!(!account.username.is_empty());
    // The stored credential is an Argon2id hash, not the plaintext.
    assert!(account.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn absent_submission_is_a_no_op() {
    let (db, accounts, groups, sessions, _, _) = setup().await;
    let svc = OnboardingService::new(
        accounts,
        groups,
        sessions,
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    let outcome = svc.create(None, CompletionMode::AutoLogin).await.unwrap();

    assert!(matches!(outcome, CreationOutcome::Idle));
    assert_eq!(table_count(&db, "account").await, 0);
    assert_eq!(table_count(&db, "session").await, 0);
}

#[tokio::test]
async fn new_form_never_writes() {
    let (db, accounts, groups, sessions, _, _) = setup().await;
    let svc = OnboardingService::new(
        accounts,
        groups,
        sessions,
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    for _ in 0..3 {
        let draft = svc.new_form(None);
        assert!(draft.username.is_empty());
        assert!(draft.group_ids.is_empty());
    }
    let prefilled = svc.new_form(Some(AccountDraft {
        full_name: "Alice Example".into(),
        ..Default::default()
    }));
    assert_eq!(prefilled.full_name, "Alice Example");

    assert_eq!(table_count(&db, "account").await, 0);
}

#[tokio::test]
async fn non_numeric_folder_setting_keeps_default() {
    let (_db, accounts, groups, sessions, _, _) = setup().await;
    let settings = OnboardingSettings {
        system_folder_for_new_users: Some("not-a-number".into()),
        ..Default::default()
    };
    let svc = OnboardingService::new(accounts, groups, sessions, settings, AuthConfig::default());

    let outcome = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued { account, .. } = outcome else {
        panic!("expected CredentialsIssued");
    };
    assert_eq!(account.storage_folder, None);
}

#[tokio::test]
async fn folder_and_groups_are_applied_and_unknowns_skipped() {
    let (_db, accounts, groups, sessions, visitors, downloads) = setup().await;
    let missing = Uuid::new_v4();
    let settings = OnboardingSettings {
        system_folder_for_new_users: Some("12".into()),
        groups_for_new_users: Some(format!("{visitors},{downloads},{missing}")),
        ..Default::default()
    };
    let svc = OnboardingService::new(accounts, groups, sessions, settings, AuthConfig::default());

    let outcome = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued { account, .. } = outcome else {
        panic!("expected CredentialsIssued");
    };
    assert_eq!(account.storage_folder, Some(12));
    assert_eq!(
        account.group_ids,
        BTreeSet::from([visitors, downloads]),
        "exactly the two resolvable groups"
    );
}

#[tokio::test]
async fn duplicate_group_entries_collapse() {
    let (_db, accounts, groups, sessions, visitors, _) = setup().await;
    let settings = OnboardingSettings {
        groups_for_new_users: Some(format!("{visitors}, {visitors},junk,")),
        ..Default::default()
    };
    let svc = OnboardingService::new(accounts, groups, sessions, settings, AuthConfig::default());

    let outcome = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued { account, .. } = outcome else {
        panic!("expected CredentialsIssued");
    };
    assert_eq!(account.group_ids, BTreeSet::from([visitors]));
}

#[tokio::test]
async fn auto_login_marks_the_session() {
    let (_db, accounts, groups, sessions, _, _) = setup().await;
    let svc = OnboardingService::new(
        accounts,
        groups,
        sessions.clone(),
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    let outcome = svc
        .create(Some(AccountDraft::default()), CompletionMode::AutoLogin)
        .await
        .unwrap();

    let CreationOutcome::LoggedIn { account, session } = outcome else {
        panic!("expected LoggedIn");
    };

    let stored = sessions.find_by_id(session.session_id).await.unwrap();
    assert_eq!(stored.account_id, account.id);
    assert_eq!(
        stored.data.get(ONE_TIME_ACCOUNT_KEY),
        Some(&serde_json::Value::Bool(true))
    );
}

#[tokio::test]
async fn deferred_login_displays_credentials_without_a_session() {
    let (db, accounts, groups, sessions, _, _) = setup().await;
    let svc = OnboardingService::new(
        accounts,
        groups,
        sessions,
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    let outcome = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued {
        account,
        confirmation_html,
    } = outcome
    else {
        panic!("expected CredentialsIssued");
    };

    assert_eq!(table_count(&db, "session").await, 0);
    assert!(confirmation_html.contains(&account.username));
    // The stored hash never appears in the confirmation.
    assert!(!confirmation_html.contains(&account.password_hash));

    // The displayed plaintext is the account's actual password.
    let marker = "Password: <strong>";
    let start = confirmation_html.find(marker).unwrap() + marker.len();
    let end = confirmation_html[start..].find("</strong>").unwrap() + start;
    let plaintext = &confirmation_html[start..end];
    assert!(
        guestpass_auth::password::verify_password(plaintext, &account.password_hash, None)
            .unwrap()
    );
}

#[tokio::test]
async fn rejected_submission_writes_nothing() {
    let (db, accounts, groups, sessions, _, _) = setup().await;
    let settings = OnboardingSettings {
        required_fields: BTreeSet::from([FormField::Email]),
        ..Default::default()
    };
    let svc = OnboardingService::new(accounts, groups, sessions, settings, AuthConfig::default());

    let outcome = svc
        .create(Some(AccountDraft::default()), CompletionMode::AutoLogin)
        .await
        .unwrap();

    let CreationOutcome::Rejected(errors) = outcome else {
        panic!("expected Rejected");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, FormField::Email);
    assert_eq!(table_count(&db, "account").await, 0);
}

#[tokio::test]
async fn colliding_candidates_are_retried() {
    let (_db, accounts, groups, sessions, _, _) = setup().await;

    // Both submissions draw "guest-dup" first; the second must retry.
    let source = ScriptedSource::new(&["guest-dup", "guest-dup", "guest-fresh"]);
    let svc = OnboardingService::with_username_source(
        accounts,
        groups,
        sessions,
        source,
        OnboardingSettings::default(),
        AuthConfig::default(),
    );

    let first = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();
    let second = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap();

    let CreationOutcome::CredentialsIssued { account: a, .. } = first else {
        panic!("expected CredentialsIssued");
    };
    let CreationOutcome::CredentialsIssued { account: b, .. } = second else {
        panic!("expected CredentialsIssued");
    };
    assert_eq!(a.username, "guest-dup");
    assert_eq!(b.username, "guest-fresh");
}

#[tokio::test]
async fn exhausted_retries_are_fatal() {
    let (_db, accounts, groups, sessions, _, _) = setup().await;

    let source = ScriptedSource::new(&["guest-dup", "guest-dup", "guest-dup"]);
    let settings = OnboardingSettings {
        max_username_attempts: 2,
        ..Default::default()
    };
    let svc = OnboardingService::with_username_source(
        accounts,
        groups,
        sessions,
        source,
        settings,
        AuthConfig::default(),
    );

    // First creation claims "guest-dup".
    svc.create(
        Some(AccountDraft::default()),
        CompletionMode::DisplayCredentials,
    )
    .await
    .unwrap();

    // The second runs out of candidates within the bound.
    let err = svc
        .create(
            Some(AccountDraft::default()),
            CompletionMode::DisplayCredentials,
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, GuestpassError::CredentialGeneration(_)),
        "expected CredentialGeneration, got: {err:?}"
    );
}
