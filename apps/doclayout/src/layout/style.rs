//! Style table and the engine-wide layout configuration.
//!
//! Heading and paragraph pitches must keep a 7 : 5.5 ratio; pagination
//! decisions downstream depend on it.

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::layout::geometry::PageGeometry;
use crate::models::page::Color;

/// Deepest heading level the engine distinguishes. Deeper `#` runs collapse here.
pub const MAX_HEADING_LEVEL: u8 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Style references
// ────────────────────────────────────────────────────────────────────────────

/// Color class of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    Heading,
    Body,
    TableHeader,
    TableBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleRef {
    pub class: StyleClass,
    pub font_size_pt: f32,
    /// Vertical advance per wrapped line, in page millimetres.
    pub line_pitch: f32,
    pub bold: bool,
}

impl StyleRef {
    pub fn color(&self) -> Color {
        match self.class {
            StyleClass::Heading => Color::rgb(31, 56, 100),
            StyleClass::Body | StyleClass::TableBody => Color::rgb(33, 33, 33),
            StyleClass::TableHeader => Color::WHITE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    pub font_size_pt: f32,
    pub line_pitch: f32,
    pub cell_padding: f32,
    pub header_fill: Color,
    pub even_fill: Color,
    pub odd_fill: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size_pt: 9.0,
            line_pitch: 4.5,
            cell_padding: 1.5,
            header_fill: Color::rgb(41, 98, 155),
            even_fill: Color::rgb(245, 247, 250),
            odd_fill: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTable {
    /// Font sizes for heading levels 1..=MAX_HEADING_LEVEL.
    pub heading_sizes_pt: [f32; MAX_HEADING_LEVEL as usize],
    pub heading_pitch: f32,
    pub paragraph_size_pt: f32,
    pub paragraph_pitch: f32,
    pub table: TableStyle,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            heading_sizes_pt: [16.0, 14.0, 12.5],
            heading_pitch: 7.0,
            paragraph_size_pt: 11.0,
            paragraph_pitch: 5.5,
            table: TableStyle::default(),
        }
    }
}

impl StyleTable {
    pub fn heading(&self, level: u8) -> StyleRef {
        let idx = level.clamp(1, MAX_HEADING_LEVEL) as usize - 1;
        StyleRef {
            class: StyleClass::Heading,
            font_size_pt: self.heading_sizes_pt[idx],
            line_pitch: self.heading_pitch,
            bold: true,
        }
    }

    pub fn paragraph(&self) -> StyleRef {
        StyleRef {
            class: StyleClass::Body,
            font_size_pt: self.paragraph_size_pt,
            line_pitch: self.paragraph_pitch,
            bold: false,
        }
    }

    pub fn table_header(&self) -> StyleRef {
        StyleRef {
            class: StyleClass::TableHeader,
            font_size_pt: self.table.font_size_pt,
            line_pitch: self.table.line_pitch,
            bold: true,
        }
    }

    pub fn table_body(&self) -> StyleRef {
        StyleRef {
            class: StyleClass::TableBody,
            font_size_pt: self.table.font_size_pt,
            line_pitch: self.table.line_pitch,
            bold: false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout configuration
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_FOOTER_TEXT: &str = "© Generated document. All rights reserved.";

/// Everything `layout()` needs besides the document. Read-only and shareable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub geometry: PageGeometry,
    pub styles: StyleTable,
    /// Vertical gap added after every block.
    pub block_spacing: f32,
    /// Left-aligned footer text on every page.
    pub footer_text: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            styles: StyleTable::default(),
            block_spacing: 6.0,
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn with_geometry(&self, geometry: PageGeometry) -> Self {
        Self {
            geometry,
            ..self.clone()
        }
    }

    /// Checks the geometry, then every style metric the flow relies on.
    /// Sizes and pitches must be positive; spacing and padding must not be
    /// negative. Non-finite values are rejected everywhere.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.geometry.validate()?;

        let s = &self.styles;
        let positive = [
            ("heading_sizes_pt[0]", s.heading_sizes_pt[0]),
            ("heading_sizes_pt[1]", s.heading_sizes_pt[1]),
            ("heading_sizes_pt[2]", s.heading_sizes_pt[2]),
            ("heading_pitch", s.heading_pitch),
            ("paragraph_size_pt", s.paragraph_size_pt),
            ("paragraph_pitch", s.paragraph_pitch),
            ("table.font_size_pt", s.table.font_size_pt),
            ("table.line_pitch", s.table.line_pitch),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("block_spacing", self.block_spacing),
            ("table.cell_padding", s.table.cell_padding),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be zero or positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
