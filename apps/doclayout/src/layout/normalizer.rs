//! Normalizer: turns lightly marked-up text into an ordered block list.
//!
//! Supported markup is deliberately tiny: `#` headings and inline emphasis
//! markers (`**`, `__`, `*`, `_`, backticks). Emphasis delimiters are dropped
//! and their content kept; the engine renders one style per line.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::layout::style::MAX_HEADING_LEVEL;
use crate::models::document::{Block, Document, Table, TableShape};
use crate::models::page::Diagnostic;

/// A normalized document plus anything noticed while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Splits `raw` on blank lines and classifies each candidate as heading or paragraph.
///
/// Total for any input; an empty or whitespace-only string yields no blocks.
/// A candidate with no text left once markup is stripped (a bare `#` run,
/// or only emphasis markers such as `**`) is dropped without a diagnostic:
/// it carries nothing to render.
pub fn normalize(raw: &str) -> Vec<Block> {
    split_candidates(raw)
        .into_iter()
        .filter_map(|candidate| classify(&candidate))
        .collect()
}

/// Builds the engine's `Document`, appending the table after all prose blocks.
///
/// A malformed table (rows without columns or the reverse) is left out and
/// reported as `Diagnostic::MalformedTable`; layout still proceeds.
pub fn normalize_document(
    title: &str,
    generated_at: DateTime<Utc>,
    raw: &str,
    table: Option<Table>,
) -> NormalizedDocument {
    let mut body = normalize(raw);
    let mut diagnostics = Vec::new();

    let table = match table {
        Some(t) => match t.shape() {
            TableShape::WellFormed => {
                body.push(Block::Table { table: t.clone() });
                Some(t)
            }
            TableShape::Malformed => {
                warn!(
                    columns = t.columns.len(),
                    rows = t.rows.len(),
                    "Dropping malformed table from document layout"
                );
                diagnostics.push(Diagnostic::MalformedTable {
                    columns: t.columns.len(),
                    rows: t.rows.len(),
                });
                None
            }
            TableShape::Empty => None,
        },
        None => None,
    };

    NormalizedDocument {
        document: Document {
            title: title.to_string(),
            generated_at,
            body,
            table,
        },
        diagnostics,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate splitting and classification
// ────────────────────────────────────────────────────────────────────────────

/// Groups consecutive non-blank lines. Whitespace-only lines count as blank.
fn split_candidates(raw: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                candidates.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        candidates.push(current.join("\n"));
    }
    candidates
}

fn classify(candidate: &str) -> Option<Block> {
    let trimmed = candidate.trim_start();
    let marker_len = trimmed.chars().take_while(|&c| c == '#').count();

    if marker_len > 0 {
        // '#' is one byte, so the char count doubles as a byte offset.
        let rest = &trimmed[marker_len..];
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        let text = fold_lines(&strip_inline_markup(rest));
        if text.trim().is_empty() {
            return None;
        }
        let level = marker_len.min(MAX_HEADING_LEVEL as usize) as u8;
        return Some(Block::Heading { level, text });
    }

    let text = fold_lines(&strip_inline_markup(candidate));
    if text.trim().is_empty() {
        None
    } else {
        Some(Block::Paragraph { text })
    }
}

/// Joins the lines of a candidate with single spaces.
fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Inline markup
// ────────────────────────────────────────────────────────────────────────────

/// Removes emphasis and code delimiters, keeping their content.
///
/// Single `*` / `_` are only treated as delimiters at a word edge, so
/// `snake_case`, `2 * 3` and list bullets survive.
pub fn strip_inline_markup(text: &str) -> String {
    let without_pairs = text.replace("**", "").replace("__", "").replace('`', "");
    let chars: Vec<char> = without_pairs.chars().collect();
    let mut out = String::with_capacity(without_pairs.len());

    for (i, &c) in chars.iter().enumerate() {
        if (c == '*' || c == '_') && is_edge_delimiter(&chars, i) {
            continue;
        }
        out.push(c);
    }
    out
}

fn is_edge_delimiter(chars: &[char], i: usize) -> bool {
    let prev = if i == 0 { None } else { chars.get(i - 1).copied() };
    let next = chars.get(i + 1).copied();

    let opens = !prev.is_some_and(|p| p.is_alphanumeric())
        && next.is_some_and(|n| !n.is_whitespace());
    let closes = !next.is_some_and(|n| n.is_alphanumeric())
        && prev.is_some_and(|p| !p.is_whitespace());
    opens || closes
}
