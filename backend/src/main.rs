//! Backend entry-point: configuration, migrations, and server startup.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jobboard::domain::accounts;
use jobboard::server::{ServerConfig, create_server};
use jobboard::outbound::persistence::{DbPool, PoolConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_migrations(database_url.clone()).await?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("pool construction failed: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; running against the in-memory store");
    }

    let (server, state) = create_server(config)?;

    if let (Ok(email), Ok(password)) = (
        env::var("SEED_ADMIN_EMAIL"),
        env::var("SEED_ADMIN_PASSWORD"),
    ) {
        let seeded = accounts::ensure_admin(&state.users, &state.hasher, &email, &password)
            .await
            .map_err(|e| std::io::Error::other(format!("admin seeding failed: {e}")))?;
        if seeded {
            info!("admin account created");
        }
    }

    info!(%bind_addr, "server starting");
    server.await
}

/// Load the session signing key, falling back to an ephemeral key only
/// in debug builds or when explicitly allowed.
fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending migrations on a blocking thread before the pool and
/// server come up.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied pending migrations");
        }
        Ok(())
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
}
