//! guestpass server — application entry point.

use guestpass_auth::config::AuthConfig;
use guestpass_db::repository::{
    SurrealAccountRepository, SurrealGroupRepository, SurrealSessionRepository,
};
use guestpass_db::{DbConfig, DbManager};
use guestpass_onboarding::{OnboardingService, OnboardingSettings};
use tracing_subscriber::EnvFilter;

/// Onboarding settings from `GUESTPASS_*` environment variables.
fn settings_from_env() -> OnboardingSettings {
    let defaults = OnboardingSettings::default();
    OnboardingSettings {
        system_folder_for_new_users: std::env::var("GUESTPASS_FOLDER_FOR_NEW_USERS").ok(),
        groups_for_new_users: std::env::var("GUESTPASS_GROUPS_FOR_NEW_USERS").ok(),
        ..defaults
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("guestpass=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting guestpass server...");

    let db_config = DbConfig::from_env();
    let manager = DbManager::connect(&db_config).await?;
    guestpass_db::run_migrations(manager.client()).await?;

    let db = manager.client().clone();
    let accounts = SurrealAccountRepository::new(db.clone());
    let groups = SurrealGroupRepository::new(db.clone());
    let sessions = SurrealSessionRepository::new(db);

    let auth_config = AuthConfig {
        pepper: std::env::var("GUESTPASS_PEPPER").ok(),
        ..AuthConfig::default()
    };
    let _onboarding = OnboardingService::new(
        accounts,
        groups,
        sessions,
        settings_from_env(),
        auth_config,
    );

    tracing::info!("guestpass server ready");

    // TODO: mount the HTTP form endpoints on top of OnboardingService

    tracing::info!("guestpass server stopped.");
    Ok(())
}
