/// Person entity and its persistence.
///
/// Plain CRUD plumbing behind a store trait: Postgres in production,
/// an in-memory map for the integration tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
}

/// A person about to be created; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, AppError>;
    async fn find_all(&self) -> Result<Vec<Person>, AppError>;
    async fn create(&self, new: NewPerson) -> Result<Person, AppError>;
    /// `Ok(None)` when no person with the given id exists.
    async fn update(&self, person: Person) -> Result<Option<Person>, AppError>;
    /// `Ok(false)` when no person with the given id exists.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Postgres-backed person store.
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type PersonRow = (i64, String, String, String, String);

fn from_row((id, first_name, last_name, address, gender): PersonRow) -> Person {
    Person {
        id,
        first_name,
        last_name,
        address,
        gender,
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, AppError> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, first_name, last_name, address, gender FROM persons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn find_all(&self) -> Result<Vec<Person>, AppError> {
        let rows = sqlx::query_as::<_, PersonRow>(
            "SELECT id, first_name, last_name, address, gender FROM persons ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn create(&self, new: NewPerson) -> Result<Person, AppError> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            INSERT INTO persons (first_name, last_name, address, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, address, gender
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.address)
        .bind(&new.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(row))
    }

    async fn update(&self, person: Person) -> Result<Option<Person>, AppError> {
        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            UPDATE persons
            SET first_name = $2, last_name = $3, address = $4, gender = $5
            WHERE id = $1
            RETURNING id, first_name, last_name, address, gender
            "#,
        )
        .bind(person.id)
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.address)
        .bind(&person.gender)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory person store, used by the integration tests.
pub struct InMemoryPersonStore {
    persons: RwLock<BTreeMap<i64, Person>>,
    next_id: AtomicI64,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self {
            persons: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, AppError> {
        Ok(self
            .persons
            .read()
            .expect("person store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Person>, AppError> {
        Ok(self
            .persons
            .read()
            .expect("person store lock poisoned")
            .values()
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewPerson) -> Result<Person, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let person = Person {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            address: new.address,
            gender: new.gender,
        };

        self.persons
            .write()
            .expect("person store lock poisoned")
            .insert(id, person.clone());

        Ok(person)
    }

    async fn update(&self, person: Person) -> Result<Option<Person>, AppError> {
        let mut persons = self.persons.write().expect("person store lock poisoned");

        if !persons.contains_key(&person.id) {
            return Ok(None);
        }

        persons.insert(person.id, person.clone());
        Ok(Some(person))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self
            .persons
            .write()
            .expect("person store lock poisoned")
            .remove(&id)
            .is_some())
    }
}
