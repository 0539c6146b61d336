//! Change-order PDF generation.
//!
//! Composition ([`change_order`]) produces a list of layout [`layout::Block`]s,
//! [`layout::paginate`] flows them onto US-Letter pages, and [`render`]
//! serializes the pages with `lopdf` using the standard Helvetica fonts.

pub mod change_order;
pub mod encoding;
pub mod layout;
pub mod render;

pub use change_order::{render_change_order, ChangeOrderPdfData, PdfLineItem};

/// Error type for PDF generation.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// A page content stream could not be encoded.
    #[error("Content encoding failed: {0}")]
    Encode(String),

    /// The document could not be written out.
    #[error("PDF save failed: {0}")]
    Save(String),
}
