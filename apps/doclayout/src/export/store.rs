use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ExportError;

/// Persisted reference to a generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub content_type: String,
    pub page_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Persistence for generated documents and their chat associations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save_record(&self, record: &DocumentRecord) -> Result<(), ExportError>;

    /// Adds `document_id` to the chat's active documents. Appending twice is a no-op.
    async fn append_active_document(
        &self,
        chat_id: Uuid,
        document_id: Uuid,
    ) -> Result<(), ExportError>;
}

/// Process-local store, for previews and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<Uuid, DocumentRecord>>,
    active: RwLock<HashMap<Uuid, Vec<Uuid>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, id: Uuid) -> Option<DocumentRecord> {
        self.records.read().await.get(&id).cloned()
    }

    pub async fn active_documents(&self, chat_id: Uuid) -> Vec<Uuid> {
        self.active
            .read()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn save_record(&self, record: &DocumentRecord) -> Result<(), ExportError> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn append_active_document(
        &self,
        chat_id: Uuid,
        document_id: Uuid,
    ) -> Result<(), ExportError> {
        if !self.records.read().await.contains_key(&document_id) {
            return Err(ExportError::Storage(format!(
                "Document {document_id} has no saved record"
            )));
        }
        let mut active = self.active.write().await;
        let docs = active.entry(chat_id).or_default();
        if !docs.contains(&document_id) {
            docs.push(document_id);
        }
        Ok(())
    }
}
