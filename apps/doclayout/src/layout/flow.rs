//! Flow engine: the pagination state machine.
//!
//! # Phases
//! - `Placing(i)`: wrap block `i`; place it if it fits, otherwise go to `PageBreak`.
//! - `PageBreak`: close the page, open a new one (compositor first), place the pending block.
//! - `Done`: every block has been placed exactly once.
//!
//! Blocks are never split line-by-line. A block taller than the usable page
//! height is placed on a fresh page and reported as `Diagnostic::OversizedBlock`.
//! Each transition either consumes a block or moves `PageBreak` → `Placing(i + 1)`,
//! so the loop always terminates.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::LayoutError;
use crate::layout::compositor::composite;
use crate::layout::style::LayoutConfig;
use crate::layout::table::place_table;
use crate::layout::wrapper::{wrap, WrappedBlock, WrappedLine};
use crate::models::document::{Block, Document};
use crate::models::page::{Diagnostic, LayoutResult, PageFrame, PositionedLine};

// ────────────────────────────────────────────────────────────────────────────
// Layout state
// ────────────────────────────────────────────────────────────────────────────

/// Mutable state of a single `layout()` call. Never shared between calls.
pub struct LayoutState<'a> {
    config: &'a LayoutConfig,
    title: &'a str,
    generated_at: DateTime<Utc>,
    pub cursor_y: f32,
    pub current_page_index: usize,
    pub pages: Vec<PageFrame>,
    page_has_content: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> LayoutState<'a> {
    /// Creates the state with page 1 already open and decorated.
    pub fn new(config: &'a LayoutConfig, title: &'a str, generated_at: DateTime<Utc>) -> Self {
        let mut state = Self {
            config,
            title,
            generated_at,
            cursor_y: config.geometry.content_top,
            current_page_index: 0,
            pages: Vec::new(),
            page_has_content: false,
            diagnostics: Vec::new(),
        };
        state.open_page();
        state
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    pub fn page_has_content(&self) -> bool {
        self.page_has_content
    }

    pub(crate) fn mark_content(&mut self) {
        self.page_has_content = true;
    }

    /// True when `height` fits between the cursor and the bottom boundary.
    pub fn fits(&self, height: f32) -> bool {
        self.cursor_y + height <= self.config.geometry.bottom_boundary()
    }

    pub fn current_page(&self) -> &PageFrame {
        let idx = self.pages.len() - 1;
        &self.pages[idx]
    }

    pub fn current_page_mut(&mut self) -> &mut PageFrame {
        let idx = self.pages.len() - 1;
        &mut self.pages[idx]
    }

    /// Closes the current page and opens the next one.
    pub fn break_page(&mut self) {
        debug!(
            page = self.current_page_index,
            cursor_y = self.cursor_y,
            "Page break"
        );
        self.open_page();
    }

    fn open_page(&mut self) {
        let page_index = self.pages.len() + 1;
        let decoration = composite(page_index, self.title, self.generated_at, self.config);
        self.pages.push(PageFrame {
            page_index,
            header: decoration.header,
            divider: decoration.divider,
            footer: decoration.footer,
            content_lines: Vec::new(),
            table_region: None,
        });
        self.current_page_index = page_index;
        self.cursor_y = self.config.geometry.content_top;
        self.page_has_content = false;
    }

    pub fn finish(self) -> LayoutResult {
        LayoutResult {
            pages: self.pages,
            diagnostics: self.diagnostics,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

enum FlowPhase {
    Placing(usize),
    PageBreak { block: usize, wrapped: WrappedBlock },
    Done,
}

/// Lays out a normalized document into decorated pages.
///
/// Fails only on invalid geometry or style metrics, before anything is
/// placed. Every other problem is absorbed and reported through
/// `LayoutResult::diagnostics`.
pub fn layout(document: &Document, config: &LayoutConfig) -> Result<LayoutResult, LayoutError> {
    config.validate()?;

    let mut state = LayoutState::new(config, &document.title, document.generated_at);
    let mut phase = FlowPhase::Placing(0);

    loop {
        phase = match phase {
            FlowPhase::Placing(i) => match document.body.get(i) {
                None => FlowPhase::Done,
                Some(Block::Table { table }) => {
                    place_table(table, &mut state);
                    FlowPhase::Placing(i + 1)
                }
                Some(block) => {
                    let wrapped = wrap_block(block, config);
                    let needed = wrapped.height() + config.block_spacing;
                    if state.page_has_content() && !state.fits(needed) {
                        FlowPhase::PageBreak { block: i, wrapped }
                    } else {
                        place_lines(&mut state, i, wrapped);
                        FlowPhase::Placing(i + 1)
                    }
                }
            },
            FlowPhase::PageBreak { block, wrapped } => {
                state.break_page();
                place_lines(&mut state, block, wrapped);
                FlowPhase::Placing(block + 1)
            }
            FlowPhase::Done => break,
        };
    }

    debug!(
        pages = state.pages.len(),
        diagnostics = state.diagnostics.len(),
        "Layout complete"
    );
    Ok(state.finish())
}

/// Wraps a text block with its style at the full content width.
///
/// A block whose text wraps to nothing still yields one empty line so that
/// no block disappears from the output.
pub fn wrap_block(block: &Block, config: &LayoutConfig) -> WrappedBlock {
    let (text, style) = match block {
        Block::Heading { level, text } => (text.as_str(), config.styles.heading(*level)),
        Block::Paragraph { text } => (text.as_str(), config.styles.paragraph()),
        Block::Table { .. } => ("", config.styles.paragraph()),
    };
    let mut wrapped = wrap(text, &style, config.geometry.content_width());
    if wrapped.lines.is_empty() {
        wrapped.lines.push(WrappedLine {
            text: String::new(),
            style,
        });
    }
    wrapped
}

fn place_lines(state: &mut LayoutState<'_>, block_index: usize, wrapped: WrappedBlock) {
    let config = state.config();
    let height = wrapped.height();

    if !state.fits(height) {
        warn!(
            block = block_index,
            page = state.current_page_index,
            height,
            usable = config.geometry.usable_height(),
            "Block taller than a page; placing without splitting"
        );
        state.diagnostics.push(Diagnostic::OversizedBlock {
            block_index,
            page_index: state.current_page_index,
            height,
        });
    }

    let x = config.geometry.margin;
    let top = state.cursor_y;
    let pitch = wrapped.line_height;
    let page = state.current_page_mut();
    for (i, line) in wrapped.lines.into_iter().enumerate() {
        page.content_lines.push(PositionedLine {
            text: line.text,
            x,
            y: top + i as f32 * pitch,
            style: line.style,
        });
    }

    state.cursor_y = top + height + config.block_spacing;
    state.mark_content();
}
