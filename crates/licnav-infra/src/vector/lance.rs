//! LanceDB connection wrapper for license collections.
//!
//! Provides `LanceVectorStore`, which wraps a `lancedb::Connection` and
//! offers table lifecycle helpers (create, open, drop) using Arrow schemas.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_schema::Schema;

/// LanceDB store rooted at the index directory (`{data_dir}/index` by default).
///
/// Each jurisdiction gets its own table, named by
/// `licnav_core::retrieval::lookup::collection_name`.
pub struct LanceVectorStore {
    db: lancedb::Connection,
}

impl LanceVectorStore {
    /// Open or create a LanceDB store at the given path.
    ///
    /// Creates the directory if it does not exist.
    pub async fn new(base_path: PathBuf) -> Result<Self, lancedb::Error> {
        std::fs::create_dir_all(&base_path).map_err(|e| lancedb::Error::CreateDir {
            path: base_path.display().to_string(),
            source: e,
        })?;

        let uri = base_path
            .to_str()
            .ok_or_else(|| lancedb::Error::InvalidInput {
                message: format!("Path contains invalid UTF-8: {}", base_path.display()),
            })?;

        let db = lancedb::connect(uri).execute().await?;

        Ok(Self { db })
    }

    /// Open the table, creating it empty with `schema` if it does not exist.
    pub async fn ensure_table(
        &self,
        table_name: &str,
        schema: Arc<Schema>,
    ) -> Result<lancedb::Table, lancedb::Error> {
        match self.db.open_table(table_name).execute().await {
            Ok(table) => Ok(table),
            Err(lancedb::Error::TableNotFound { .. }) => {
                self.db
                    .create_empty_table(table_name, schema)
                    .execute()
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Open an existing table. `Ok(None)` when it does not exist.
    pub async fn open_table(&self, table_name: &str) -> Result<Option<lancedb::Table>, lancedb::Error> {
        match self.db.open_table(table_name).execute().await {
            Ok(table) => Ok(Some(table)),
            Err(lancedb::Error::TableNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[cfg(test)]
    pub async fn table_exists(&self, table_name: &str) -> bool {
        matches!(self.open_table(table_name).await, Ok(Some(_)))
    }

    /// Drop a table. Idempotent.
    pub async fn drop_table(&self, table_name: &str) -> Result<(), lancedb::Error> {
        match self.db.drop_table(table_name, &[]).await {
            Ok(()) => Ok(()),
            Err(lancedb::Error::TableNotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::schema::license_schema;

    #[tokio::test]
    async fn test_connection_opens_successfully() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceVectorStore::new(temp_dir.path().join("index"))
            .await
            .expect("Failed to create vector store");

        assert!(!store.table_exists("licenses_de").await);
        assert!(temp_dir.path().join("index").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_table_creates_and_reopens() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceVectorStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create vector store");
        let schema = Arc::new(license_schema(4));

        let table = store
            .ensure_table("licenses_de", schema.clone())
            .await
            .expect("Failed to create table");
        assert_eq!(table.count_rows(None).await.expect("count"), 0);

        store
            .ensure_table("licenses_de", schema)
            .await
            .expect("Failed to reopen table");
        assert!(store.table_exists("licenses_de").await);
    }

    #[tokio::test]
    async fn test_open_missing_table_is_none() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceVectorStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create vector store");
        assert!(store.open_table("licenses_fl").await.expect("open").is_none());
    }

    #[tokio::test]
    async fn test_drop_table_idempotent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceVectorStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create vector store");

        store
            .ensure_table("to_drop", Arc::new(license_schema(4)))
            .await
            .expect("Failed to create table");
        store.drop_table("to_drop").await.expect("Failed to drop table");
        assert!(!store.table_exists("to_drop").await);

        store
            .drop_table("to_drop")
            .await
            .expect("Second drop should be idempotent");
    }
}
