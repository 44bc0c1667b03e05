//! Error types for the font inventory library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the font inventory library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Requested page is outside the document
    #[error("Page {page} does not exist (document has {page_count} pages)")]
    PageNotFound { page: u32, page_count: u32 },

    /// Page range expression could not be parsed
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Unknown text encoding label
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// A worker was asked to start while another run is active
    #[error("An inventory run is already in progress")]
    RunInProgress,
}
