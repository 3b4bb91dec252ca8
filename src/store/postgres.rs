//! PostgreSQL store backend
//!
//! Each collection is a JSONB document table (`id`, `seq`, `doc`,
//! `created_at`); see `migrations/0001_init.sql`. Filters compare the textual
//! projection `doc->>'field'`, and the descending-`created_at` ordering breaks
//! ties on the insertion sequence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::{text_of, Collection, Document, Filter, InsertOutcome, Sort, Store, StoreError};

/// Store backend over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Value,
    created_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, StoreError> {
        match self.doc {
            Value::Object(body) => Ok(Document {
                id: self.id,
                created_at: self.created_at,
                body,
            }),
            other => Err(StoreError::Corrupt(format!(
                "document {} is not a JSON object: {}",
                self.id, other
            ))),
        }
    }
}

// Field names interpolated below are internal constants (model field names),
// never client input; all values go through bind parameters.
fn where_clause(filter: &Filter, first_param: usize) -> String {
    let mut sql = String::new();
    for (i, (name, _)) in filter.fields().iter().enumerate() {
        let keyword = if i == 0 { " WHERE" } else { " AND" };
        sql.push_str(&format!(
            "{} doc->>'{}' = ${}",
            keyword,
            name,
            first_param + i
        ));
    }
    sql
}

#[async_trait]
impl Store for PgStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Document, StoreError> {
        let sql = format!(
            "INSERT INTO {} (doc, created_at) VALUES ($1, $2) RETURNING id, doc, created_at",
            collection.table()
        );

        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(Value::Object(body))
            .bind(created_at.unwrap_or_else(Utc::now))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        row.into_document()
    }

    async fn insert_unique(
        &self,
        collection: Collection,
        key: &str,
        body: Map<String, Value>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<InsertOutcome, StoreError> {
        // Single conditional write: the unique index on the key expression
        // arbitrates concurrent inserts, no check-then-insert round trip.
        let sql = format!(
            "INSERT INTO {} (doc, created_at) VALUES ($1, $2) \
             ON CONFLICT ((doc->>'{}')) DO NOTHING \
             RETURNING id, doc, created_at",
            collection.table(),
            key
        );

        let key_value = body.get(key).cloned().unwrap_or(Value::Null);

        let inserted = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(Value::Object(body))
            .bind(created_at.unwrap_or_else(Utc::now))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match inserted {
            Some(row) => Ok(InsertOutcome::Inserted(row.into_document()?)),
            None => {
                let existing = self
                    .find_one(collection, Filter::new().field(key, key_value))
                    .await?;
                existing.map(InsertOutcome::AlreadyExists).ok_or_else(|| {
                    StoreError::Query(format!(
                        "insert into {} conflicted but no existing document was found",
                        collection.table()
                    ))
                })
            }
        }
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at FROM {} WHERE id = $1",
            collection.table()
        );

        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        sort: Sort,
    ) -> Result<Vec<Document>, StoreError> {
        let mut sql = format!("SELECT id, doc, created_at FROM {}", collection.table());
        sql.push_str(&where_clause(&filter, 1));
        if sort == Sort::CreatedAtDesc {
            sql.push_str(" ORDER BY created_at DESC, seq ASC");
        }

        let mut query = sqlx::query_as::<_, DocumentRow>(&sql);
        for (_, value) in filter.fields() {
            query = query.bind(text_of(value));
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut sql = format!("SELECT id, doc, created_at FROM {}", collection.table());
        sql.push_str(&where_clause(&filter, 1));
        sql.push_str(" LIMIT 1");

        let mut query = sqlx::query_as::<_, DocumentRow>(&sql);
        for (_, value) in filter.fields() {
            query = query.bind(text_of(value));
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        row.map(DocumentRow::into_document).transpose()
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: Filter,
        field: &str,
        value: Value,
    ) -> Result<u64, StoreError> {
        let mut sql = format!(
            "UPDATE {} SET doc = jsonb_set(doc, $1, $2)",
            collection.table()
        );
        sql.push_str(&where_clause(&filter, 3));

        let mut query = sqlx::query(&sql)
            .bind(vec![field.to_string()])
            .bind(value);
        for (_, filter_value) in filter.fields() {
            query = query.bind(text_of(filter_value));
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
