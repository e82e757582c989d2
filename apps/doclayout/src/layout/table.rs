//! Table placer: equal-width grid placement with repeated header rows.
//!
//! Rows are never split across pages. When a row does not fit, the page is
//! closed, the header row is re-emitted at the top of the next page and the
//! row is placed under it, so every page a table touches shows its header.

use tracing::warn;

use crate::layout::flow::LayoutState;
use crate::layout::style::{LayoutConfig, StyleRef};
use crate::layout::wrapper::wrap_text;
use crate::models::document::{Table, TableShape};
use crate::models::page::{Color, Diagnostic, PositionedRow, PositionedTable};

/// Places `table` starting at the state's cursor, breaking pages as needed.
///
/// On return the cursor sits below the last row plus block spacing and
/// `state.pages` includes every page the table created.
pub fn place_table(table: &Table, state: &mut LayoutState<'_>) {
    if table.shape() != TableShape::WellFormed {
        warn!(
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Skipping malformed table block"
        );
        state.diagnostics.push(Diagnostic::MalformedTable {
            columns: table.columns.len(),
            rows: table.rows.len(),
        });
        return;
    }

    let config = state.config();
    let grid = Grid::new(table.columns.len(), config);
    let header = grid.build_row(None, &table.columns, config.styles.table_header(), grid.header_fill);

    let first_row = grid.build_body_row(0, &table.rows[0], config);
    let reserve = header.height + first_row.height;
    // A page holds at most one table region; an orphaned header is never left behind.
    if state.page_has_content()
        && (!state.fits(reserve) || state.current_page().table_region.is_some())
    {
        state.break_page();
    }
    begin_region(state, &grid, &header);

    for (row_index, cells) in table.rows.iter().enumerate() {
        if cells.len() != grid.columns {
            state.diagnostics.push(Diagnostic::RaggedTableRow {
                row_index,
                expected: grid.columns,
                found: cells.len(),
            });
        }

        let mut row = if row_index == 0 {
            first_row.clone()
        } else {
            grid.build_body_row(row_index, cells, config)
        };

        if !state.fits(row.height) {
            if region_has_rows(state) {
                state.break_page();
                begin_region(state, &grid, &header);
            }
            if !state.fits(row.height) {
                warn!(
                    row = row_index,
                    page = state.current_page_index,
                    height = row.height,
                    "Table row taller than a page; placing without splitting"
                );
                state.diagnostics.push(Diagnostic::OversizedTableRow {
                    row_index,
                    page_index: state.current_page_index,
                    height: row.height,
                });
            }
        }

        row.y = state.cursor_y;
        state.cursor_y += row.height;
        if let Some(region) = state.current_page_mut().table_region.as_mut() {
            region.rows.push(row);
        }
    }

    state.cursor_y += config.block_spacing;
}

fn region_has_rows(state: &LayoutState<'_>) -> bool {
    state
        .current_page()
        .table_region
        .as_ref()
        .is_some_and(|t| !t.rows.is_empty())
}

/// Opens this page's table region with a header row at the cursor.
fn begin_region(state: &mut LayoutState<'_>, grid: &Grid, header: &PositionedRow) {
    let mut header = header.clone();
    header.y = state.cursor_y;
    state.cursor_y += header.height;

    let region = PositionedTable {
        x: grid.x,
        y: header.y,
        width: grid.width,
        column_widths: vec![grid.column_width; grid.columns],
        header,
        rows: Vec::new(),
    };
    state.current_page_mut().table_region = Some(region);
    state.mark_content();
}

// ────────────────────────────────────────────────────────────────────────────
// Grid measurement
// ────────────────────────────────────────────────────────────────────────────

struct Grid {
    columns: usize,
    x: f32,
    width: f32,
    column_width: f32,
    cell_padding: f32,
    header_fill: Color,
}

impl Grid {
    fn new(columns: usize, config: &LayoutConfig) -> Self {
        let width = config.geometry.content_width();
        Self {
            columns,
            x: config.geometry.margin,
            width,
            column_width: width / columns as f32,
            cell_padding: config.styles.table.cell_padding,
            header_fill: config.styles.table.header_fill,
        }
    }

    fn build_body_row(&self, row_index: usize, cells: &[String], config: &LayoutConfig) -> PositionedRow {
        let fill = if row_index % 2 == 0 {
            config.styles.table.even_fill
        } else {
            config.styles.table.odd_fill
        };
        self.build_row(Some(row_index), cells, config.styles.table_body(), fill)
    }

    /// Wraps each drawn cell; the tallest cell sets the row height.
    /// `y` is left at zero until the row is placed.
    fn build_row(
        &self,
        row_index: Option<usize>,
        cells: &[String],
        style: StyleRef,
        fill: Color,
    ) -> PositionedRow {
        let inner_width = self.column_width - 2.0 * self.cell_padding;
        let cell_lines: Vec<Vec<String>> = (0..self.columns)
            .map(|c| {
                let text = cells.get(c).map(String::as_str).unwrap_or("");
                wrap_text(text, &style, inner_width)
            })
            .collect();

        let max_lines = cell_lines.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = max_lines as f32 * style.line_pitch + 2.0 * self.cell_padding;

        PositionedRow {
            row_index,
            y: 0.0,
            height,
            fill,
            values: cells.to_vec(),
            cell_lines,
            style,
        }
    }
}
