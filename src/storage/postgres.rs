//! # Durable Store
//!
//! PostgreSQL-backed user store. Predicate clauses are translated into SQL
//! that reproduces the volatile store's semantics exactly:
//!
//! - substring clauses use `strpos` on lowercased values (no pattern syntax)
//! - text ordering uses the `"C"` collation (byte-wise, like Rust `str`)
//! - ties are broken by insertion order (`id`)
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS users (
//!     id BIGSERIAL PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     email TEXT NOT NULL,
//!     country_code TEXT NOT NULL,
//!     phone TEXT NOT NULL,
//!     place TEXT NOT NULL,
//!     gender TEXT NOT NULL,
//!     hobbies TEXT[] NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     CONSTRAINT users_email_key UNIQUE (email),
//!     CONSTRAINT users_phone_key UNIQUE (phone),
//!     CONSTRAINT users_country_code_phone_key UNIQUE (country_code, phone)
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::debug;

use crate::model::{now, UserFields, UserRecord};
use crate::query::{Clause, PageSpec, PredicateSpec, SortDirection, SortSpec};

use super::backend::{BackendKind, StorageBackend};
use super::errors::{StorageError, StorageResult, UniqueKey};

/// Connections kept in the pool
pub const MAX_CONNECTIONS: u32 = 10;

const SELECT_COLUMNS: &str = "SELECT id, name, email, country_code, phone, place, gender, \
     hobbies, created_at, updated_at FROM users";

const RETURNING_COLUMNS: &str = " RETURNING id, name, email, country_code, phone, place, \
     gender, hobbies, created_at, updated_at";

/// PostgreSQL user store
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to PostgreSQL and create the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if no connection can be acquired
    /// within `connect_timeout` or schema creation fails.
    pub async fn connect(database_url: &str, connect_timeout: Duration) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(connect_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::backend(format!("failed to connect postgres: {e}")))?;

        Self::from_pool(pool).await
    }

    /// Create the store from an existing pool
    pub async fn from_pool(pool: PgPool) -> StorageResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn init_schema(&self) -> StorageResult<()> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                country_code TEXT NOT NULL,
                phone TEXT NOT NULL,
                place TEXT NOT NULL,
                gender TEXT NOT NULL,
                hobbies TEXT[] NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT users_email_key UNIQUE (email),
                CONSTRAINT users_phone_key UNIQUE (phone),
                CONSTRAINT users_country_code_phone_key UNIQUE (country_code, phone),
                CONSTRAINT users_hobbies_not_empty CHECK (cardinality(hobbies) > 0)
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at)",
            "CREATE INDEX IF NOT EXISTS idx_users_hobbies ON users USING GIN (hobbies)",
        ];

        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::backend(format!("schema init failed: {e}")))?;
        }

        Ok(())
    }

    /// Delete every row and restart the id sequence.
    ///
    /// Not exposed through [`StorageBackend::reset`]; intended for test setup.
    pub async fn truncate(&self) -> StorageResult<()> {
        sqlx::query("TRUNCATE users RESTART IDENTITY")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to truncate users: {e}")))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// SQL Translation
// =============================================================================

fn push_clause(qb: &mut QueryBuilder<'_, Postgres>, clause: &Clause) {
    match clause {
        Clause::ExactMatch { field, value } => {
            qb.push(field.column()).push(" = ").push_bind(value.clone());
        }
        Clause::SubstringMatch { field, needle } => {
            qb.push("strpos(lower(")
                .push(field.column())
                .push("), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        Clause::Disjunction(any) if any.is_empty() => {
            qb.push("FALSE");
        }
        Clause::Disjunction(any) => {
            qb.push("(");
            for (i, inner) in any.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_clause(qb, inner);
            }
            qb.push(")");
        }
        Clause::Membership { values } => {
            qb.push("hobbies && ")
                .push_bind(values.clone())
                .push("::text[]");
        }
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, predicate: &PredicateSpec) {
    for (i, clause) in predicate.clauses.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_clause(qb, clause);
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, sort: &SortSpec) {
    qb.push(" ORDER BY ").push(sort.field.column());
    if !sort.field.is_timestamp() {
        qb.push(" COLLATE \"C\"");
    }
    qb.push(match sort.direction {
        SortDirection::Asc => " ASC",
        SortDirection::Desc => " DESC",
    });
    qb.push(", id ASC");
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

/// Parse a database row into a UserRecord
fn row_to_user(row: &PgRow) -> StorageResult<UserRecord> {
    let get_err = |e: sqlx::Error| StorageError::backend(format!("failed to read row: {e}"));

    let id: i64 = row.try_get("id").map_err(get_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(get_err)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(get_err)?;

    Ok(UserRecord {
        id: id.to_string(),
        name: row.try_get("name").map_err(get_err)?,
        email: row.try_get("email").map_err(get_err)?,
        country_code: row.try_get("country_code").map_err(get_err)?,
        phone: row.try_get("phone").map_err(get_err)?,
        place: row.try_get("place").map_err(get_err)?,
        gender: row.try_get("gender").map_err(get_err)?,
        hobbies: row.try_get("hobbies").map_err(get_err)?,
        created_at,
        updated_at,
    })
}

/// Map a write failure, recognising unique-constraint violations
fn write_error(op: &str, e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            if let Some(key) = db.constraint().and_then(UniqueKey::from_constraint) {
                return StorageError::Conflict(key);
            }
        }
    }
    StorageError::backend(format!("failed to {op}: {e}"))
}

// =============================================================================
// StorageBackend Implementation
// =============================================================================

#[async_trait]
impl StorageBackend for PostgresStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Durable
    }

    async fn insert(&self, fields: UserFields) -> StorageResult<UserRecord> {
        let at = now();
        let sql = format!(
            "INSERT INTO users (name, email, country_code, phone, place, gender, hobbies, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9){RETURNING_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.country_code)
            .bind(&fields.phone)
            .bind(&fields.place)
            .bind(&fields.gender)
            .bind(&fields.hobbies)
            .bind(at)
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error("insert user", e))?;

        row_to_user(&row)
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_matching(
        &self,
        predicate: &PredicateSpec,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> StorageResult<Vec<UserRecord>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
        push_where(&mut qb, predicate);
        push_order(&mut qb, sort);
        qb.push(" OFFSET ")
            .push_bind(to_i64(page.skip()))
            .push(" LIMIT ")
            .push_bind(to_i64(page.limit));

        debug!(sql = qb.sql(), "durable find");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to query users: {e}")))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count_matching(&self, predicate: &PredicateSpec) -> StorageResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_where(&mut qb, predicate);

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to count users: {e}")))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn update_by_id(
        &self,
        id: &str,
        fields: UserFields,
    ) -> StorageResult<Option<UserRecord>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let sql = format!(
            "UPDATE users SET name = $1, email = $2, country_code = $3, phone = $4, \
             place = $5, gender = $6, hobbies = $7, updated_at = $8 \
             WHERE id = $9{RETURNING_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(&fields.name)
            .bind(&fields.email)
            .bind(&fields.country_code)
            .bind(&fields.phone)
            .bind(&fields.place)
            .bind(&fields.gender)
            .bind(&fields.hobbies)
            .bind(now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error("update user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn delete_by_id(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let sql = format!("DELETE FROM users WHERE id = $1{RETURNING_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("failed to delete user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

// =============================================================================
// Tests
// =============================================================================
