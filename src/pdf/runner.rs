//! Inventory runs over a page sequence

use std::path::PathBuf;
use crate::config::InventoryConfig;
use crate::error::{Error, Result};
use crate::pdf::catalog::{FontRecord, FontResolutionCache, PageFontCatalog, PageVisitedSet};
use crate::pdf::document::FontDocument;
use crate::pdf::scanner::scan_page;
use crate::range::parse_page_range;

/// Notifications produced while an inventory runs, in scan order
#[derive(Debug)]
pub enum InventoryEvent {
    /// The run is starting; `total` is the length of the page sequence
    Started { total: usize },
    /// One entry of the sequence has been handled
    Progress {
        /// Page number of the entry
        page: u32,
        /// 1-based position in the sequence; equals `total` on the last entry
        position: usize,
    },
    /// A font was seen for the first time
    Discovered(FontRecord),
    /// The whole sequence was scanned
    Completed(PageFontCatalog),
    /// Cancellation was requested; the catalog covers the pages scanned so far
    Cancelled(PageFontCatalog),
    /// The document could not be opened or the pages could not be selected
    Failed(Error),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(PageFontCatalog),
    Cancelled(PageFontCatalog),
}

impl ScanOutcome {
    /// The catalog, complete or partial
    pub fn catalog(&self) -> &PageFontCatalog {
        match self {
            ScanOutcome::Completed(catalog) | ScanOutcome::Cancelled(catalog) => catalog,
        }
    }

    pub fn into_catalog(self) -> PageFontCatalog {
        match self {
            ScanOutcome::Completed(catalog) | ScanOutcome::Cancelled(catalog) => catalog,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanOutcome::Cancelled(_))
    }

    /// The terminal event announcing this outcome
    pub fn into_event(self) -> InventoryEvent {
        match self {
            ScanOutcome::Completed(catalog) => InventoryEvent::Completed(catalog),
            ScanOutcome::Cancelled(catalog) => InventoryEvent::Cancelled(catalog),
        }
    }
}

/// Scan the fonts of `pages`, in the order given
///
/// Emits `Started`, then for every entry of the sequence one `Progress`
/// followed by a `Discovered` per new font. Pages appearing more than once
/// are scanned only the first time. A page that cannot be read is logged
/// and skipped. `is_cancelled` is polled before each entry; once it returns
/// true the run stops and the catalog gathered so far is returned.
///
/// The terminal event is not emitted here; use [`ScanOutcome::into_event`].
pub fn run<F, C>(
    document: &FontDocument,
    pages: &[u32],
    mut on_event: F,
    is_cancelled: C,
) -> ScanOutcome
where
    F: FnMut(InventoryEvent),
    C: Fn() -> bool,
{
    let mut cache = FontResolutionCache::new();
    let mut catalog = PageFontCatalog::new();
    let mut visited = PageVisitedSet::new(document.page_count());

    log::info!("Scanning fonts of {} pages", pages.len());
    on_event(InventoryEvent::Started { total: pages.len() });

    for (index, &page) in pages.iter().enumerate() {
        if is_cancelled() {
            log::info!("Font scan cancelled after {} of {} pages", index, pages.len());
            return ScanOutcome::Cancelled(catalog);
        }

        let discovered = if visited.mark(page) {
            match scan_page(document, page, &mut cache, &mut catalog) {
                Ok(discovered) => discovered,
                Err(e) => {
                    log::warn!("Skipping page {}: {}", page, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        on_event(InventoryEvent::Progress {
            page,
            position: index + 1,
        });
        for record in discovered {
            on_event(InventoryEvent::Discovered(record));
        }
    }

    log::info!("Found {} fonts", catalog.len());
    ScanOutcome::Completed(catalog)
}

/// Options for listing the fonts of a PDF file
#[derive(Debug, Clone, Default)]
pub struct InventoryOptions {
    /// PDF file to inspect
    pub input_path: PathBuf,
    /// Page range expression such as `"1-3, 8"`; `None` means every page
    pub page_range: Option<String>,
    /// Name decoding and other settings
    pub config: InventoryConfig,
}

/// Open a PDF and list the fonts of the selected pages
///
/// # Example
///
/// ```no_run
/// use pdf_font_inventory::{list_fonts, InventoryOptions};
/// use std::path::PathBuf;
///
/// let options = InventoryOptions {
///     input_path: PathBuf::from("report.pdf"),
///     ..Default::default()
/// };
///
/// let catalog = list_fonts(&options).expect("Failed to list fonts");
/// println!("{} fonts", catalog.len());
/// ```
pub fn list_fonts(options: &InventoryOptions) -> Result<PageFontCatalog> {
    let document = FontDocument::open(&options.input_path, &options.config)?;
    let pages = parse_page_range(options.page_range.as_deref(), document.page_count())?;
    Ok(run(&document, &pages, |_| {}, || false).into_catalog())
}
