//! Page compositor: fixed decoration for every page, independent of content.
//!
//! Page 1 gets a cover-style header (centred title plus generation date).
//! Later pages do not repeat it. Every page gets the divider rule and the
//! footer band with copyright text and page number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::metrics;
use crate::layout::geometry::HEADER_DIVIDER_Y;
use crate::layout::style::{LayoutConfig, StyleClass, StyleRef};
use crate::models::page::{Color, FooterBand, HeaderBand, Rect, Rule, TextAlign, TextRun};

const TITLE_SIZE_PT: f32 = 16.0;
const DATE_SIZE_PT: f32 = 9.0;
const FOOTER_SIZE_PT: f32 = 8.0;
/// Title baseline distance above the divider rule.
const TITLE_ABOVE_DIVIDER: f32 = 10.0;
/// Gap between the title baseline and the date line.
const DATE_OFFSET: f32 = 6.0;
const TITLE_ELLIPSIS: &str = "...";
const FOOTER_BAND_HEIGHT: f32 = 8.0;
const FOOTER_TEXT_INSET: f32 = 2.0;

const DIVIDER_COLOR: Color = Color::rgb(200, 200, 200);
const FOOTER_FILL: Color = Color::rgb(240, 240, 240);
const MUTED_TEXT: Color = Color::rgb(110, 110, 110);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDecoration {
    pub header: Option<HeaderBand>,
    pub divider: Rule,
    pub footer: FooterBand,
}

/// Builds the decoration for page `page_index` (1-based).
pub fn composite(
    page_index: usize,
    title: &str,
    generated_at: DateTime<Utc>,
    config: &LayoutConfig,
) -> PageDecoration {
    let g = &config.geometry;

    let header = (page_index == 1).then(|| {
        let title_style = StyleRef {
            class: StyleClass::Heading,
            font_size_pt: TITLE_SIZE_PT,
            line_pitch: config.styles.heading_pitch,
            bold: true,
        };
        let title_y = HEADER_DIVIDER_Y - TITLE_ABOVE_DIVIDER;
        HeaderBand {
            title: TextRun {
                text: fit_title(title, &title_style, g.content_width()),
                x: g.page_width / 2.0,
                y: title_y,
                font_size_pt: TITLE_SIZE_PT,
                bold: true,
                align: TextAlign::Center,
                color: title_style.color(),
            },
            date: TextRun {
                text: format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
                x: g.page_width / 2.0,
                y: title_y + DATE_OFFSET,
                font_size_pt: DATE_SIZE_PT,
                bold: false,
                align: TextAlign::Center,
                color: MUTED_TEXT,
            },
        }
    });

    let divider = Rule {
        x1: g.margin,
        x2: g.page_width - g.margin,
        y: HEADER_DIVIDER_Y,
        color: DIVIDER_COLOR,
    };

    // Centre the band inside the reserved footer area.
    let band_height = FOOTER_BAND_HEIGHT.min(g.footer_reserve);
    let band_top = g.bottom_boundary() + (g.footer_reserve - band_height) / 2.0;
    let text_y = band_top + band_height * 0.7;

    let footer = FooterBand {
        background: Rect {
            x: g.margin,
            y: band_top,
            width: g.content_width(),
            height: band_height,
        },
        fill: FOOTER_FILL,
        copyright: TextRun {
            text: config.footer_text.clone(),
            x: g.margin + FOOTER_TEXT_INSET,
            y: text_y,
            font_size_pt: FOOTER_SIZE_PT,
            bold: false,
            align: TextAlign::Left,
            color: MUTED_TEXT,
        },
        page_number: TextRun {
            text: format!("Page {page_index}"),
            x: g.page_width - g.margin - FOOTER_TEXT_INSET,
            y: text_y,
            font_size_pt: FOOTER_SIZE_PT,
            bold: false,
            align: TextAlign::Right,
            color: MUTED_TEXT,
        },
    };

    PageDecoration {
        header,
        divider,
        footer,
    }
}

/// Truncates `title` with an ellipsis so the centred run stays inside `max_width`.
fn fit_title(title: &str, style: &StyleRef, max_width: f32) -> String {
    let m = metrics();
    if m.measure_mm(title, style) <= max_width {
        return title.to_string();
    }
    let mut kept: String = title.to_string();
    while !kept.is_empty() {
        kept.pop();
        let candidate = format!("{}{TITLE_ELLIPSIS}", kept.trim_end());
        if m.measure_mm(&candidate, style) <= max_width {
            return candidate;
        }
    }
    TITLE_ELLIPSIS.to_string()
}
