//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Connection settings for the SurrealDB backend.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, e.g. `127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials for signin.
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "guestpass".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a configuration from `GUESTPASS_DB_*` environment
    /// variables, falling back to the defaults for unset ones.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| std::env::var(name).unwrap_or(fallback);
        Self {
            url: var("GUESTPASS_DB_URL", defaults.url),
            namespace: var("GUESTPASS_DB_NAMESPACE", defaults.namespace),
            database: var("GUESTPASS_DB_DATABASE", defaults.database),
            username: var("GUESTPASS_DB_USERNAME", defaults.username),
            password: var("GUESTPASS_DB_PASSWORD", defaults.password),
        }
    }
}

/// Owns the live SurrealDB client handle.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open a WebSocket connection, sign in as root, and select the
    /// configured namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(url = %config.url, namespace = %config.namespace, "connecting to SurrealDB");

        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(database = %config.database, "SurrealDB connection established");
        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
