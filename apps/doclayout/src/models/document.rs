use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::geometry::GeometryOverrides;

/// Tabular data attached to a document. Cells are already stringified upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// No columns and no rows.
    Empty,
    WellFormed,
    /// Rows without columns, or columns without rows.
    Malformed,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn shape(&self) -> TableShape {
        match (self.columns.is_empty(), self.rows.is_empty()) {
            (true, true) => TableShape::Empty,
            (false, false) => TableShape::WellFormed,
            _ => TableShape::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Table { table: Table },
}

/// Immutable engine input: metadata plus the normalized, ordered block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub body: Vec<Block>,
    pub table: Option<Table>,
}

/// Caller-facing input contract. `body` is raw, lightly marked-up text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub table: Option<Table>,
    #[serde(default)]
    pub page_geometry: Option<GeometryOverrides>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape_classification() {
        let empty = Table::default();
        assert_eq!(empty.shape(), TableShape::Empty);

        let ok = Table::new(vec!["A".into()], vec![vec!["1".into()]]);
        assert_eq!(ok.shape(), TableShape::WellFormed);

        let no_columns = Table::new(vec![], vec![vec!["1".into()]]);
        assert_eq!(no_columns.shape(), TableShape::Malformed);

        let no_rows = Table::new(vec!["A".into()], vec![]);
        assert_eq!(no_rows.shape(), TableShape::Malformed);
    }

    #[test]
    fn test_layout_request_deserializes_with_defaults() {
        let req: LayoutRequest = serde_json::from_str(r#"{"title": "Report"}"#).unwrap();
        assert_eq!(req.title, "Report");
        assert!(req.body.is_empty());
        assert!(req.table.is_none());
        assert!(req.page_geometry.is_none());
    }

    #[test]
    fn test_block_serializes_with_kind_tag() {
        let block = Block::Heading {
            level: 2,
            text: "Summary".to_string(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["level"], 2);
    }
}
