//! Content sources that export documents, each reduced to one request shape.

use serde::{Deserialize, Serialize};

use crate::layout::GeometryOverrides;
use crate::models::document::{LayoutRequest, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
            ChatRole::System => "System",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportSource {
    /// A whole conversation: one level-2 heading per message, then its content.
    ChatTranscript {
        title: String,
        messages: Vec<ChatMessage>,
    },
    /// A single message exported on its own, without a role heading.
    SingleMessage { title: String, message: ChatMessage },
    /// LLM-generated report text, optionally with a dataset.
    GeneratedReport {
        title: String,
        body: String,
        #[serde(default)]
        table: Option<Table>,
        #[serde(default)]
        page_geometry: Option<GeometryOverrides>,
    },
}

impl ExportSource {
    pub fn title(&self) -> &str {
        match self {
            ExportSource::ChatTranscript { title, .. }
            | ExportSource::SingleMessage { title, .. }
            | ExportSource::GeneratedReport { title, .. } => title,
        }
    }

    pub fn into_request(self) -> LayoutRequest {
        match self {
            ExportSource::ChatTranscript { title, messages } => {
                let body = messages
                    .iter()
                    .filter(|m| !m.content.trim().is_empty())
                    .map(|m| format!("## {}\n\n{}", m.role.label(), m.content.trim()))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                LayoutRequest {
                    title,
                    body,
                    table: None,
                    page_geometry: None,
                }
            }
            ExportSource::SingleMessage { title, message } => LayoutRequest {
                title,
                body: message.content,
                table: None,
                page_geometry: None,
            },
            ExportSource::GeneratedReport {
                title,
                body,
                table,
                page_geometry,
            } => LayoutRequest {
                title,
                body,
                table,
                page_geometry,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::normalize;
    use crate::models::document::Block;

    fn message(role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_transcript_renders_role_headings() {
        let source = ExportSource::ChatTranscript {
            title: "Support chat".into(),
            messages: vec![
                message(ChatRole::User, "How do I reset my password?"),
                message(ChatRole::Assistant, "Open **Settings**.\n\nThen choose Reset."),
            ],
        };
        let request = source.into_request();
        let blocks = normalize(&request.body);
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "User".into()
                },
                Block::Paragraph {
                    text: "How do I reset my password?".into()
                },
                Block::Heading {
                    level: 2,
                    text: "Assistant".into()
                },
                Block::Paragraph {
                    text: "Open Settings.".into()
                },
                Block::Paragraph {
                    text: "Then choose Reset.".into()
                },
            ]
        );
    }

    #[test]
    fn test_transcript_skips_blank_messages() {
        let source = ExportSource::ChatTranscript {
            title: "t".into(),
            messages: vec![message(ChatRole::User, "   "), message(ChatRole::System, "ok")],
        };
        let blocks = normalize(&source.into_request().body);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_single_message_keeps_content_verbatim() {
        let source = ExportSource::SingleMessage {
            title: "Answer".into(),
            message: message(ChatRole::Assistant, "# Plan\n\nStep one."),
        };
        assert_eq!(source.title(), "Answer");
        let request = source.into_request();
        assert_eq!(request.body, "# Plan\n\nStep one.");
        assert!(request.table.is_none());
    }

    #[test]
    fn test_generated_report_passes_table_through() {
        let table = Table::new(vec!["k".into()], vec![vec!["v".into()]]);
        let source = ExportSource::GeneratedReport {
            title: "Report".into(),
            body: "text".into(),
            table: Some(table.clone()),
            page_geometry: None,
        };
        assert_eq!(source.into_request().table, Some(table));
    }

    #[test]
    fn test_source_deserializes_from_tagged_json() {
        let json = r#"{"kind": "single_message", "title": "x",
                       "message": {"role": "assistant", "content": "hi"}}"#;
        let source: ExportSource = serde_json::from_str(json).unwrap();
        assert!(matches!(source, ExportSource::SingleMessage { .. }));
    }
}
