//! Output model: fully positioned pages in page millimetres.

use serde::{Deserialize, Serialize};

use crate::layout::style::StyleRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Horizontal line from `(x1, y)` to `(x2, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A decoration text run. `x` is the anchor point interpreted through `align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size_pt: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub color: Color,
}

/// Cover-style header. Only page 1 carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderBand {
    pub title: TextRun,
    pub date: TextRun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterBand {
    pub background: Rect,
    pub fill: Color,
    pub copyright: TextRun,
    pub page_number: TextRun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub style: StyleRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedRow {
    /// Index into the source table's rows; `None` for a header row.
    pub row_index: Option<usize>,
    pub y: f32,
    pub height: f32,
    pub fill: Color,
    /// Source cell values, untouched.
    pub values: Vec<String>,
    /// Wrapped text per drawn column.
    pub cell_lines: Vec<Vec<String>>,
    pub style: StyleRef,
}

impl PositionedRow {
    pub fn is_header(&self) -> bool {
        self.row_index.is_none()
    }
}

/// The slice of a table that landed on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedTable {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub column_widths: Vec<f32>,
    pub header: PositionedRow,
    pub rows: Vec<PositionedRow>,
}

impl PositionedTable {
    /// Bottom edge of the last placed row (or of the header when empty).
    pub fn bottom(&self) -> f32 {
        self.rows
            .last()
            .map(|r| r.y + r.height)
            .unwrap_or(self.header.y + self.header.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFrame {
    pub page_index: usize,
    pub header: Option<HeaderBand>,
    pub divider: Rule,
    pub footer: FooterBand,
    pub content_lines: Vec<PositionedLine>,
    pub table_region: Option<PositionedTable>,
}

impl PageFrame {
    /// True for a page carrying only its decoration.
    pub fn is_blank(&self) -> bool {
        self.content_lines.is_empty() && self.table_region.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// Non-fatal conditions absorbed during layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Rows without columns or columns without rows; the table was omitted.
    MalformedTable { columns: usize, rows: usize },
    /// A text block taller than the usable page height, placed without splitting.
    OversizedBlock {
        block_index: usize,
        page_index: usize,
        height: f32,
    },
    /// A table row taller than the usable page height, placed without splitting.
    OversizedTableRow {
        row_index: usize,
        page_index: usize,
        height: f32,
    },
    /// A row whose cell count differs from the column count.
    RaggedTableRow {
        row_index: usize,
        expected: usize,
        found: usize,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MalformedTable { .. } | Diagnostic::RaggedTableRow { .. } => {
                Severity::Info
            }
            Diagnostic::OversizedBlock { .. } | Diagnostic::OversizedTableRow { .. } => {
                Severity::Warning
            }
        }
    }
}

/// Layout output: always a renderable page list plus whatever was absorbed on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub pages: Vec<PageFrame>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutResult {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Warning)
    }

    pub fn total_content_lines(&self) -> usize {
        self.pages.iter().map(|p| p.content_lines.len()).sum()
    }

    /// Body rows of every table region in page order, header repeats excluded.
    pub fn table_rows(&self) -> impl Iterator<Item = &PositionedRow> {
        self.pages
            .iter()
            .filter_map(|p| p.table_region.as_ref())
            .flat_map(|t| t.rows.iter())
    }
}
