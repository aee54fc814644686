use async_trait::async_trait;
use marquee_application::{ItemStore, RangeQuery, StoredItem};
use marquee_core::{AppError, AppResult};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};


/// PostgreSQL-backed item store over the single `items` table.
///
/// Sort keys use the `C` collation so range scans follow byte order, the same
/// order as the in-memory adapter.
#[derive(Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn get(&self, partition_key: &str, sort_key: &str) -> AppResult<Option<Value>> {
        sqlx::query_scalar::<_, Value>(
            r#"
            SELECT data
            FROM items
            WHERE pk = $1 AND sk = $2
            "#,
        )
        .bind(partition_key)
        .bind(sort_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read item: {error}")))
    }

    async fn put(&self, item: StoredItem) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO items (pk, sk, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (pk, sk) DO UPDATE
            SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(&item.partition_key)
        .bind(&item.sort_key)
        .bind(&item.data)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to write item: {error}")))?;

        Ok(())
    }

    async fn insert(&self, item: StoredItem) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (pk, sk, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (pk, sk) DO NOTHING
            "#,
        )
        .bind(&item.partition_key)
        .bind(&item.sort_key)
        .bind(&item.data)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert item: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "item '{}' already exists in partition '{}'",
                item.sort_key, item.partition_key
            )));
        }

        Ok(())
    }

    async fn delete(&self, partition_key: &str, sort_key: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE pk = $1 AND sk = $2
            "#,
        )
        .bind(partition_key)
        .bind(sort_key)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete item: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, partition_key: &str, query: RangeQuery) -> AppResult<Vec<StoredItem>> {
        let mut builder = range_query(partition_key, &query)?;
        let rows = builder
            .build_query_as::<(String, Value)>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to query items: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|(sort_key, data)| StoredItem {
                partition_key: partition_key.to_owned(),
                sort_key,
                data,
            })
            .collect())
    }
}

fn range_query<'args>(
    partition_key: &'args str,
    query: &'args RangeQuery,
) -> AppResult<QueryBuilder<'args, Postgres>> {
    let mut builder = QueryBuilder::new("SELECT sk, data FROM items WHERE pk = ");
    builder.push_bind(partition_key);

    if let Some(gt) = &query.gt {
        builder.push(" AND sk > ").push_bind(gt);
    }
    if let Some(lt) = &query.lt {
        builder.push(" AND sk < ").push_bind(lt);
    }
    if let Some(prefix) = &query.begins_with {
        builder.push(" AND starts_with(sk, ").push_bind(prefix).push(")");
    }

    builder.push(if query.reverse {
        " ORDER BY sk DESC"
    } else {
        " ORDER BY sk ASC"
    });

    if let Some(limit) = query.limit {
        let limit = i64::try_from(limit)
            .map_err(|_| AppError::Validation(format!("query limit {limit} is too large")))?;
        builder.push(" LIMIT ").push_bind(limit);
    }

    Ok(builder)
}
