use bytes::Bytes;
use serde::Serialize;

use crate::errors::ExportError;
use crate::models::page::{Diagnostic, LayoutResult, PageFrame};

/// Turns a laid-out page list into a byte stream.
///
/// Binary formats (and font embedding) live outside this crate; the engine
/// only hands over geometry and styled text runs.
pub trait DocumentEncoder: Send + Sync {
    fn content_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn encode(&self, title: &str, layout: &LayoutResult) -> Result<Bytes, ExportError>;
}

/// Serializes pages as JSON. Used by the preview binary and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageEncoder {
    pub pretty: bool,
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    title: &'a str,
    page_count: usize,
    pages: &'a [PageFrame],
    diagnostics: &'a [Diagnostic],
}

impl DocumentEncoder for JsonPageEncoder {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, title: &str, layout: &LayoutResult) -> Result<Bytes, ExportError> {
        let envelope = JsonEnvelope {
            title,
            page_count: layout.page_count(),
            pages: &layout.pages,
            diagnostics: &layout.diagnostics,
        };
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&envelope)
        } else {
            serde_json::to_vec(&envelope)
        }
        .map_err(|e| ExportError::Encoding(format!("JSON page encoding failed: {e}")))?;
        Ok(Bytes::from(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_request, LayoutConfig};
    use crate::models::document::LayoutRequest;
    use chrono::Utc;

    #[test]
    fn test_json_encoder_round_trips_page_count() {
        let request = LayoutRequest {
            title: "Notes".into(),
            body: "# Heading\n\nBody".into(),
            ..Default::default()
        };
        let result = layout_request(&request, Utc::now(), &LayoutConfig::default()).unwrap();
        let bytes = JsonPageEncoder::default().encode("Notes", &result).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["title"], "Notes");
        assert_eq!(value["page_count"], 1);
        assert_eq!(value["pages"][0]["content_lines"][0]["text"], "Heading");
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }
}
