//! Capabilities provided by collaborators outside this workspace
//!
//! The tenant core degrades gracefully when they are absent: group names fall
//! back to placeholders and indexing becomes a no-op.

use async_trait::async_trait;
use ncobase_api_types::GroupInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolves group IDs into group records
#[async_trait]
pub trait GroupLookup: Send + Sync {
    /// Unknown IDs are simply absent from the result
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<GroupInfo>, String>;
}

/// A document pushed to the search index on write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub index: String,
    pub id: String,
    pub tenant_id: Option<String>,
    pub body: Value,
}

/// Full-text search indexing sink; failures are logged by callers, never
/// propagated to the write that triggered them
#[async_trait]
pub trait SearchIndexer: Send + Sync {
    async fn index(&self, document: SearchDocument) -> Result<(), String>;

    async fn delete(&self, index: &str, id: &str) -> Result<(), String>;
}

/// Indexer used when no search service is configured
#[derive(Debug, Clone, Default)]
pub struct NoopSearchIndexer;

#[async_trait]
impl SearchIndexer for NoopSearchIndexer {
    async fn index(&self, document: SearchDocument) -> Result<(), String> {
        tracing::trace!("search indexing disabled, skipping {}/{}", document.index, document.id);
        Ok(())
    }

    async fn delete(&self, index: &str, id: &str) -> Result<(), String> {
        tracing::trace!("search indexing disabled, skipping delete {}/{}", index, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_indexer_accepts_everything() {
        let indexer = NoopSearchIndexer;
        let doc = SearchDocument {
            index: "tenants".to_string(),
            id: "t-1".to_string(),
            tenant_id: None,
            body: serde_json::json!({"name": "Acme"}),
        };
        assert!(indexer.index(doc).await.is_ok());
        assert!(indexer.delete("tenants", "t-1").await.is_ok());
    }
}
