// Document layout engine: normalize → wrap → flow → composite / place tables.
// Pure and synchronous; callers that need a timeout run it on a blocking thread.

pub mod compositor;
pub mod flow;
pub mod font_metrics;
pub mod geometry;
pub mod normalizer;
pub mod style;
pub mod table;
pub mod wrapper;

// Re-export the public API consumed by the export seam and external callers.
pub use compositor::{composite, PageDecoration};
pub use flow::{layout, LayoutState};
pub use geometry::{GeometryOverrides, PageGeometry};
pub use normalizer::{normalize, normalize_document, NormalizedDocument};
pub use style::{LayoutConfig, StyleClass, StyleRef, StyleTable, TableStyle};
pub use table::place_table;
pub use wrapper::{wrap, WrappedBlock, WrappedLine};

use crate::errors::LayoutError;
use crate::models::document::LayoutRequest;
use crate::models::page::LayoutResult;
use chrono::{DateTime, Utc};

/// Runs the whole pipeline for a caller request.
///
/// Geometry overrides in the request are merged onto `config`. Diagnostics
/// from normalization come first, followed by those raised during flow.
pub fn layout_request(
    request: &LayoutRequest,
    generated_at: DateTime<Utc>,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    let effective;
    let config = match &request.page_geometry {
        Some(overrides) => {
            effective = config.with_geometry(config.geometry.with_overrides(overrides));
            &effective
        }
        None => config,
    };

    let normalized = normalize_document(
        &request.title,
        generated_at,
        &request.body,
        request.table.clone(),
    );
    let mut result = layout(&normalized.document, config)?;

    let mut diagnostics = normalized.diagnostics;
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    Ok(result)
}
