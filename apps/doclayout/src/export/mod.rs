//! Export seam: content source in, encoded artifact out.
//!
//! # spawn_blocking pattern
//! Layout is synchronous and CPU-bound. `run_layout` moves owned inputs onto a
//! blocking thread and bounds the wait with `tokio::time::timeout`. A timed-out
//! worker is not cancelled; it finishes in the background and its result is dropped.

pub mod encoder;
pub mod sources;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ExportError;
use crate::layout::{layout_request, LayoutConfig};
use crate::models::document::LayoutRequest;
use crate::models::page::{Diagnostic, LayoutResult};

pub use encoder::{DocumentEncoder, JsonPageEncoder};
pub use sources::{ChatMessage, ChatRole, ExportSource};
pub use store::{DocumentRecord, DocumentStore, InMemoryDocumentStore};

const FALLBACK_FILENAME: &str = "document";

/// A finished export, ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
    pub page_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub generated_at: DateTime<Utc>,
}

impl ExportArtifact {
    pub fn record(&self) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            title: self.title.clone(),
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
            page_count: self.page_count,
            created_at: self.generated_at,
        }
    }
}

/// Filename derived from the title: ASCII alphanumerics only.
/// Falls back to `document` when nothing survives.
pub fn suggested_filename(title: &str, extension: &str) -> String {
    let stem: String = title.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let stem = if stem.is_empty() {
        FALLBACK_FILENAME
    } else {
        stem.as_str()
    };
    format!("{stem}.{extension}")
}

/// Runs normalization and layout on a blocking thread, bounded by `limit`.
pub async fn run_layout(
    request: LayoutRequest,
    generated_at: DateTime<Utc>,
    config: Arc<LayoutConfig>,
    limit: Duration,
) -> Result<LayoutResult, ExportError> {
    let task =
        tokio::task::spawn_blocking(move || layout_request(&request, generated_at, &config));

    match tokio::time::timeout(limit, task).await {
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "layout timed out");
            Err(ExportError::Timeout(limit))
        }
        Ok(Err(join_err)) => Err(ExportError::Worker(format!(
            "spawn_blocking failed in layout: {join_err}"
        ))),
        Ok(Ok(result)) => Ok(result?),
    }
}

pub struct Exporter {
    config: Arc<LayoutConfig>,
    encoder: Arc<dyn DocumentEncoder>,
    store: Option<Arc<dyn DocumentStore>>,
    timeout: Duration,
}

impl Exporter {
    pub fn new(
        config: Arc<LayoutConfig>,
        encoder: Arc<dyn DocumentEncoder>,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            encoder,
            store: None,
            timeout,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Lays out, encodes and (when a store is attached) persists one document.
    ///
    /// With a `chat_id`, the new document is also appended to that chat's
    /// active documents. Without a store, `chat_id` is ignored.
    pub async fn export(
        &self,
        source: ExportSource,
        chat_id: Option<Uuid>,
    ) -> Result<ExportArtifact, ExportError> {
        let request = source.into_request();
        let title = request.title.clone();
        let generated_at = Utc::now();

        let layout = run_layout(request, generated_at, Arc::clone(&self.config), self.timeout).await?;
        let bytes = self.encoder.encode(&title, &layout)?;

        let artifact = ExportArtifact {
            id: Uuid::new_v4(),
            filename: suggested_filename(&title, self.encoder.extension()),
            content_type: self.encoder.content_type().to_string(),
            bytes,
            page_count: layout.page_count(),
            diagnostics: layout.diagnostics,
            generated_at,
            title,
        };

        if let Some(store) = &self.store {
            store.save_record(&artifact.record()).await?;
            if let Some(chat_id) = chat_id {
                store.append_active_document(chat_id, artifact.id).await?;
            }
        }

        info!(
            document_id = %artifact.id,
            pages = artifact.page_count,
            diagnostics = artifact.diagnostics.len(),
            bytes = artifact.bytes.len(),
            "Document exported"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LayoutError;
    use crate::layout::GeometryOverrides;
    use crate::models::document::Table;

    fn exporter() -> Exporter {
        Exporter::new(
            Arc::new(LayoutConfig::default()),
            Arc::new(JsonPageEncoder::default()),
            Duration::from_secs(5),
        )
    }

    fn report(body: &str) -> ExportSource {
        ExportSource::GeneratedReport {
            title: "Quarterly Report".into(),
            body: body.into(),
            table: None,
            page_geometry: None,
        }
    }

    #[test]
    fn test_suggested_filename_keeps_ascii_alphanumerics() {
        assert_eq!(suggested_filename("Q3 Report: 2024!", "pdf"), "Q3Report2024.pdf");
        assert_eq!(suggested_filename("Überblick", "json"), "berblick.json");
    }

    #[test]
    fn test_suggested_filename_falls_back() {
        assert_eq!(suggested_filename("   ", "pdf"), "document.pdf");
        assert_eq!(suggested_filename("日本語", "json"), "document.json");
    }

    #[tokio::test]
    async fn test_export_produces_artifact() {
        let artifact = exporter()
            .export(report("# Summary\n\nRevenue grew."), None)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "QuarterlyReport.json");
        assert_eq!(artifact.content_type, "application/json");
        assert_eq!(artifact.page_count, 1);
        assert!(artifact.diagnostics.is_empty());
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_export_persists_and_links_to_chat() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let exporter = exporter().with_store(store.clone());
        let chat_id = Uuid::new_v4();

        let artifact = exporter
            .export(report("Body text."), Some(chat_id))
            .await
            .unwrap();

        let record = store.record(artifact.id).await.unwrap();
        assert_eq!(record.filename, artifact.filename);
        assert_eq!(record.page_count, artifact.page_count);
        assert_eq!(store.active_documents(chat_id).await, vec![artifact.id]);
    }

    #[tokio::test]
    async fn test_export_reports_table_diagnostics() {
        let source = ExportSource::GeneratedReport {
            title: "Data".into(),
            body: "Intro".into(),
            table: Some(Table::new(vec!["a".into(), "b".into()], vec![])),
            page_geometry: None,
        };
        let artifact = exporter().export(source, None).await.unwrap();
        assert!(artifact
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedTable { .. })));
    }

    #[tokio::test]
    async fn test_export_rejects_invalid_geometry_override() {
        let source = ExportSource::GeneratedReport {
            title: "Bad".into(),
            body: "text".into(),
            table: None,
            page_geometry: Some(GeometryOverrides {
                margin: Some(200.0),
                ..Default::default()
            }),
        };
        let err = exporter().export(source, None).await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::Layout(LayoutError::InvalidGeometry(_))
        ));
    }

    #[tokio::test]
    async fn test_run_layout_times_out() {
        let body = "A paragraph of reasonable length to wrap.\n\n".repeat(20_000);
        let request = LayoutRequest {
            title: "Huge".into(),
            body,
            ..Default::default()
        };
        let err = run_layout(
            request,
            Utc::now(),
            Arc::new(LayoutConfig::default()),
            Duration::from_micros(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExportError::Timeout(_)));
        assert_eq!(err.code(), "LAYOUT_TIMEOUT");
    }
}
