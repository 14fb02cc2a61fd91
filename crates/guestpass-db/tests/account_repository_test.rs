//! Integration tests for the Account repository using in-memory
//! SurrealDB.

use std::collections::BTreeSet;

use guestpass_core::error::GuestpassError;
use guestpass_core::models::account::AccountDraft;
use guestpass_core::repository::AccountRepository;
use guestpass_db::repository::SurrealAccountRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> SurrealAccountRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    guestpass_db::run_migrations(&db).await.unwrap();
    SurrealAccountRepository::new(db)
}

fn draft(username: &str) -> AccountDraft {
    AccountDraft {
        username: username.into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".into(),
        storage_folder: Some(12),
        group_ids: BTreeSet::from([Uuid::new_v4()]),
        full_name: "Alice Example".into(),
        email: "alice@example.com".into(),
    }
}

#[tokio::test]
async fn add_and_find_roundtrip() {
    let repo = setup().await;

    let added = repo.add(draft("guest-cafe01")).await.unwrap();
    assert_eq!(added.username, "guest-cafe01");
    assert_eq!(added.storage_folder, Some(12));
    assert_eq!(added.group_ids.len(), 1);

    let by_id = repo.find_by_id(added.id).await.unwrap();
    assert_eq!(by_id.username, added.username);
    assert_eq!(by_id.group_ids, added.group_ids);

    let by_name = repo.find_by_username("guest-cafe01").await.unwrap();
    assert_eq!(by_name.id, added.id);
    assert_eq!(by_name.storage_folder, Some(12));
}

#[tokio::test]
async fn storage_folder_defaults_to_none() {
    let repo = setup().await;

    let added = repo
        .add(AccountDraft {
            username: "guest-nofolder".into(),
            password_hash: "hash".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(added.storage_folder, None);
    assert!(added.group_ids.is_empty());
}

#[tokio::test]
async fn username_exists_probe() {
    let repo = setup().await;
    repo.add(draft("guest-cafe01")).await.unwrap();

    assert!(repo.username_exists("guest-cafe01").await.unwrap());
    assert!(!repo.username_exists("guest-other").await.unwrap());
}

#[tokio::test]
async fn duplicate_username_is_rejected_by_the_index() {
    let repo = setup().await;
    repo.add(draft("guest-cafe01")).await.unwrap();

    let err = repo.add(draft("guest-cafe01")).await.unwrap_err();
    assert!(
        matches!(err, GuestpassError::AlreadyExists { .. }),
        "expected AlreadyExists, got: {err:?}"
    );
}

#[tokio::test]
async fn find_unknown_account_is_not_found() {
    let repo = setup().await;

    let err = repo.find_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, GuestpassError::NotFound { .. }));

    let err = repo.find_by_username("guest-missing").await.unwrap_err();
    assert!(matches!(err, GuestpassError::NotFound { .. }));
}
