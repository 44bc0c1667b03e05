//! PDF Font Inventory Library
//!
//! Lists the fonts that the pages of a PDF document actually reference,
//! ready to be handed to font substitution tooling.
//! This library provides functionality to:
//! - Scan the font resources of a selection of pages
//! - Deduplicate fonts shared between pages through indirect references
//! - Report embedding status, first page and reference counts
//! - Run the scan on a background worker with progress and cancellation
//!
//! # Example
//!
//! ```no_run
//! use pdf_font_inventory::{list_fonts, InventoryOptions};
//! use std::path::PathBuf;
//!
//! let options = InventoryOptions {
//!     input_path: PathBuf::from("report.pdf"),
//!     page_range: Some("1-3, 7".to_string()),
//!     ..Default::default()
//! };
//!
//! let catalog = list_fonts(&options).expect("Failed to list fonts");
//! for font in catalog.iter() {
//!     println!("{} (page {})", font.name, font.first_page);
//! }
//! ```

pub mod config;
pub mod error;
pub mod pdf;
pub mod range;
pub mod worker;

// Re-export commonly used items
pub use config::InventoryConfig;
pub use error::{Error, Result};
pub use pdf::{
    list_fonts, run, FontDocument, FontRecord, InventoryEvent, InventoryOptions, PageFontCatalog,
    ScanOutcome,
};
pub use worker::{CancellationToken, InventoryRequest, InventoryWorker};
