//! PDF font inventory module

pub mod catalog;
pub mod document;
pub mod font;
pub mod runner;
pub mod scanner;

// Re-export commonly used items
pub use catalog::{FontRecord, FontResolutionCache, PageFontCatalog, PageVisitedSet};
pub use document::FontDocument;
pub use font::{has_embedded_program, strip_subset_prefix, FontEntry};
pub use runner::{list_fonts, run, InventoryEvent, InventoryOptions, ScanOutcome};
pub use scanner::scan_page;
