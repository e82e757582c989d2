//! Document pagination and rendering engine.
//!
//! Lightly marked-up text (plus an optional table) goes in; a list of A4
//! page frames with absolutely positioned text, rules, fills and table
//! regions comes out. Encoding the frames into a binary format is left to
//! a [`export::DocumentEncoder`].

pub mod config;
pub mod errors;
pub mod export;
pub mod layout;
pub mod models;

pub use errors::{ExportError, LayoutError};
pub use export::{ExportArtifact, ExportSource, Exporter};
pub use layout::{layout, layout_request, LayoutConfig, PageGeometry};
pub use models::document::{Block, Document, LayoutRequest, Table};
pub use models::page::{Diagnostic, LayoutResult, PageFrame};
