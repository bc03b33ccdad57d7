/// Identity records and their lookup store.
///
/// The authentication core only ever reads identities; account
/// creation and management belong to a separate surface. The store is
/// a trait so the auth service can run against Postgres in production
/// and against an in-memory map in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// A stored identity: who can sign in, with which roles.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

/// Read-only identity lookup.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Exact-match lookup by username. `Ok(None)` when no such user.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError>;
}

/// Postgres-backed identity store.
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, Vec<String>, bool)>(
            "SELECT id, username, password_hash, roles, enabled FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash, roles, enabled)| Identity {
            id,
            username,
            password_hash,
            roles,
            enabled,
        }))
    }
}

/// In-memory identity store, used by the integration tests.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identity: Identity) {
        self.identities
            .write()
            .expect("identity store lock poisoned")
            .insert(identity.username.clone(), identity);
    }

    pub fn remove(&self, username: &str) {
        self.identities
            .write()
            .expect("identity store lock poisoned")
            .remove(username);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AppError> {
        Ok(self
            .identities
            .read()
            .expect("identity store lock poisoned")
            .get(username)
            .cloned())
    }
}
