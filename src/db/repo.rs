//! Repository layer for the `releases` table.
//!
//! Every method issues exactly one SQL statement against the shared pool.

use crate::domain::{FieldValue, Release, ReleaseId, ReleasePayload};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqliteRow};
use sqlx::Row;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Repository for release rows.
pub struct ReleaseRepository {
    pool: SqlitePool,
}

impl ReleaseRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        ReleaseRepository { pool }
    }

    /// Return up to `limit` releases in whatever order SQLite yields them.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list(&self, limit: i64) -> Result<Vec<Release>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, releaseDate, platforms, status
            FROM releases
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(release_from_row).collect()
    }

    /// Fetch a single release by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(&self, id: &ReleaseId) -> Result<Option<Release>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, releaseDate, platforms, status
            FROM releases
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(release_from_row).transpose()
    }

    /// Insert a new release under `id` and return the row as stored.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including a duplicate id).
    pub async fn insert(
        &self,
        id: &ReleaseId,
        payload: &ReleasePayload,
    ) -> Result<Release, sqlx::Error> {
        let query = sqlx::query(
            r#"
            INSERT INTO releases (id, title, description, releaseDate, platforms, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, releaseDate, platforms, status
            "#,
        )
        .bind(id.as_str());

        let row = bind_fields(query, payload).fetch_one(&self.pool).await?;
        release_from_row(&row)
    }

    /// Overwrite all mutable fields of the release with `id`.
    ///
    /// Returns the number of rows affected; zero when no such release exists.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update(
        &self,
        id: &ReleaseId,
        payload: &ReleasePayload,
    ) -> Result<u64, sqlx::Error> {
        let query = sqlx::query(
            r#"
            UPDATE releases
            SET title = ?, description = ?, releaseDate = ?, platforms = ?, status = ?
            WHERE id = ?
            "#,
        );

        let result = bind_fields(query, payload)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete the release with `id`. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete(&self, id: &ReleaseId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Round-trip a trivial statement to check the store is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Bind the five mutable fields in column order.
fn bind_fields<'q>(query: SqliteQuery<'q>, payload: &'q ReleasePayload) -> SqliteQuery<'q> {
    payload
        .fields()
        .into_iter()
        .fold(query, |query, value| match value {
            FieldValue::Null => query.bind(None::<String>),
            FieldValue::Integer(n) => query.bind(*n),
            FieldValue::Real(x) => query.bind(*x),
            FieldValue::Text(s) => query.bind(s.as_str()),
        })
}

fn release_from_row(row: &SqliteRow) -> Result<Release, sqlx::Error> {
    Ok(Release {
        id: ReleaseId::new(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        release_date: row.try_get("releaseDate")?,
        platforms: row.try_get("platforms")?,
        status: row.try_get("status")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use serde_json::json;
    use tempfile::TempDir;

    async fn setup() -> (ReleaseRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (ReleaseRepository::new(pool), temp_dir)
    }

    fn payload(title: &str) -> ReleasePayload {
        ReleasePayload::from_json(json!({
            "title": title,
            "description": "d",
            "releaseDate": "2024-01-01",
            "platforms": "PC",
            "status": "announced",
        }))
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        let inserted = repo.insert(&id, &payload("Game A")).await.unwrap();
        assert_eq!(inserted.id, id);
        assert_eq!(inserted.title.as_deref(), Some("Game A"));
        assert_eq!(inserted.release_date.as_deref(), Some("2024-01-01"));

        let fetched = repo.get(&id).await.unwrap();
        assert_eq!(fetched, Some(inserted));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (repo, _temp) = setup().await;
        let fetched = repo
            .get(&ReleaseId::new("missing".to_string()))
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_insert_stores_absent_fields_as_null() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        repo.insert(&id, &ReleasePayload::from_json(json!({})))
            .await
            .unwrap();

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert!(fetched.title.is_none());
        assert!(fetched.release_date.is_none());
    }

    #[tokio::test]
    async fn test_insert_lets_text_affinity_coerce_non_strings() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        let body = json!({
            "title": 5,
            "description": 2.5,
            "releaseDate": false,
            "platforms": ["PC", "PS5"],
            "status": { "phase": "beta" },
        });
        let stored = repo
            .insert(&id, &ReleasePayload::from_json(body))
            .await
            .unwrap();

        assert_eq!(stored.title.as_deref(), Some("5"));
        assert_eq!(stored.description.as_deref(), Some("2.5"));
        assert_eq!(stored.release_date.as_deref(), Some("0"));
        assert_eq!(stored.platforms.as_deref(), Some(r#"["PC","PS5"]"#));
        assert_eq!(stored.status.as_deref(), Some(r#"{"phase":"beta"}"#));
        assert_eq!(repo.get(&id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_storage_error() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        repo.insert(&id, &payload("Game A")).await.unwrap();
        assert!(repo.insert(&id, &payload("Game B")).await.is_err());
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let (repo, _temp) = setup().await;
        for i in 0..5 {
            repo.insert(&ReleaseId::generate(), &payload(&format!("Game {}", i)))
                .await
                .unwrap();
        }

        assert_eq!(repo.list(3).await.unwrap().len(), 3);
        assert_eq!(repo.list(50).await.unwrap().len(), 5);
        assert!(repo.list(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        repo.insert(&id, &payload("Game A")).await.unwrap();

        let update = ReleasePayload::from_json(json!({ "title": "Game B" }));
        let affected = repo.update(&id, &update).await.unwrap();
        assert_eq!(affected, 1);

        let fetched = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Game B"));
        assert!(fetched.description.is_none());
        assert!(fetched.status.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_affect_zero_rows() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::new("missing".to_string());

        let affected = repo
            .update(&id, &ReleasePayload::from_json(json!({})))
            .await
            .unwrap();
        assert_eq!(affected, 0);
        assert_eq!(repo.delete(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (repo, _temp) = setup().await;
        let id = ReleaseId::generate();
        repo.insert(&id, &payload("Game A")).await.unwrap();

        assert_eq!(repo.delete(&id).await.unwrap(), 1);
        assert!(repo.get(&id).await.unwrap().is_none());
    }
}
