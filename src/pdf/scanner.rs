//! Font scanning of a single page

use lopdf::Object;
use crate::error::Result;
use crate::pdf::catalog::{FontRecord, FontResolutionCache, PageFontCatalog};
use crate::pdf::document::FontDocument;
use crate::pdf::font::{base_font_name, has_embedded_program, strip_subset_prefix, FontEntry};

/// Scan the `/Font` resources of one page into the cache and catalog
///
/// Returns the records created by this page, in resource order; fonts that
/// were already known only have their reference count bumped. A page
/// without resources or fonts is not an error. Entries that are not indirect
/// references, or that point at something other than a font dictionary with
/// a `/BaseFont` name, are skipped.
///
/// # Errors
///
/// Fails only when the page itself cannot be located or read.
pub fn scan_page(
    document: &FontDocument,
    page: u32,
    cache: &mut FontResolutionCache,
    catalog: &mut PageFontCatalog,
) -> Result<Vec<FontRecord>> {
    let mut discovered = Vec::new();

    let fonts = match document.page_fonts(page)? {
        Some(fonts) => fonts,
        None => {
            log::debug!("Page {} has no font resources", page);
            return Ok(discovered);
        }
    };

    for (key, value) in fonts.iter() {
        let id = match FontEntry::classify(value) {
            FontEntry::Resolved(id) => id,
            FontEntry::Skip => {
                log::trace!("Page {}: font /{} is not a reference", page, String::from_utf8_lossy(key));
                continue;
            }
        };

        // Shared font object already resolved on this or an earlier page
        if let Some(name) = cache.get(id.0) {
            catalog.add_reference(name);
            continue;
        }

        let font = match document.resolve(id) {
            Some(Object::Dictionary(font)) => font,
            _ => {
                log::trace!("Page {}: object {} {} is not a font dictionary", page, id.0, id.1);
                continue;
            }
        };
        let base_font = match base_font_name(font) {
            Some(base_font) => base_font,
            None => {
                log::trace!("Page {}: object {} {} has no /BaseFont", page, id.0, id.1);
                continue;
            }
        };

        let name = strip_subset_prefix(&document.decode_name(base_font)).to_string();
        cache.insert(id.0, name.clone());

        // Same font reached through another object
        if catalog.add_reference(&name) {
            continue;
        }

        let record = FontRecord::new(name, page, has_embedded_program(document, font));
        log::debug!("Page {}: found font {} (embedded: {})", page, record.name, record.embedded);
        catalog.insert(record.clone());
        discovered.push(record);
    }

    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::error::Error;
    use lopdf::{dictionary, Dictionary, Document, ObjectId, Stream};

    /// Build a document whose pages each carry the given `/Font` dictionary
    fn document_with_pages(build: impl FnOnce(&mut Document) -> Vec<Dictionary>) -> FontDocument {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_dicts = build(&mut doc);
        let kids: Vec<Object> = font_dicts
            .into_iter()
            .map(|fonts| {
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Resources" => dictionary! { "Font" => fonts },
                }))
            })
            .collect();
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        FontDocument::from_document(doc, &InventoryConfig::default())
    }

    fn add_font(doc: &mut Document, base_font: &str, embedded: bool) -> ObjectId {
        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => base_font,
        };
        if embedded {
            let program = doc.add_object(Stream::new(Dictionary::new(), vec![0u8; 8]));
            let descriptor = doc.add_object(dictionary! { "FontFile2" => program });
            font.set("FontDescriptor", descriptor);
        }
        doc.add_object(font)
    }

    #[test]
    fn test_scan_page_strips_prefix_and_detects_embedding() {
        let document = document_with_pages(|doc| {
            let arial = add_font(doc, "BCDEFG+Arial", true);
            let times = add_font(doc, "Times-Roman", false);
            vec![dictionary! { "F1" => arial, "F2" => times }]
        });
        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();

        let discovered = scan_page(&document, 1, &mut cache, &mut catalog).unwrap();

        assert_eq!(discovered.len(), 2);
        assert_eq!(catalog.get("Arial"), Some(&FontRecord::new("Arial", 1, true)));
        assert_eq!(catalog.get("Times-Roman"), Some(&FontRecord::new("Times-Roman", 1, false)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_scan_page_counts_shared_object_once_per_entry() {
        let document = document_with_pages(|doc| {
            let arial = add_font(doc, "Arial", false);
            vec![
                dictionary! { "F1" => arial, "F2" => arial },
                dictionary! { "F7" => arial },
            ]
        });
        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();

        let first = scan_page(&document, 1, &mut cache, &mut catalog).unwrap();
        let second = scan_page(&document, 2, &mut cache, &mut catalog).unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        let arial = catalog.get("Arial").unwrap();
        assert_eq!(arial.reference_count, 3);
        assert_eq!(arial.first_page, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scan_page_merges_distinct_objects_with_same_name() {
        let document = document_with_pages(|doc| {
            let subset_a = add_font(doc, "AAAAAA+Arial", true);
            let subset_b = add_font(doc, "BBBBBB+Arial", false);
            vec![dictionary! { "F1" => subset_a, "F2" => subset_b }]
        });
        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();

        let discovered = scan_page(&document, 1, &mut cache, &mut catalog).unwrap();

        assert_eq!(discovered.len(), 1);
        assert_eq!(catalog.len(), 1);
        let arial = catalog.get("Arial").unwrap();
        assert_eq!(arial.reference_count, 2);
        // embedding is decided by the first object seen
        assert!(arial.embedded);
        // both object numbers are cached
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_scan_page_skips_malformed_entries() {
        let mut missing_base_font = 0;
        let document = document_with_pages(|doc| {
            let not_a_dict = doc.add_object(Object::Integer(42));
            let no_base_font = doc.add_object(dictionary! { "Type" => "Font", "Subtype" => "Type1" });
            missing_base_font = no_base_font.0;
            let numeric_base_font = doc.add_object(dictionary! { "BaseFont" => 12 });
            let courier = add_font(doc, "Courier", false);
            vec![dictionary! {
                "F0" => dictionary! { "BaseFont" => "Inline" },
                "F1" => not_a_dict,
                "F2" => no_base_font,
                "F3" => numeric_base_font,
                "F4" => Object::Reference((999, 0)),
                "F5" => courier,
                "F6" => no_base_font,
            }]
        });
        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();

        let discovered = scan_page(&document, 1, &mut cache, &mut catalog).unwrap();

        assert_eq!(discovered.len(), 1);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Courier"]);
        // failures are not remembered
        assert!(cache.get(missing_base_font).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scan_page_without_fonts() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);
        let document = FontDocument::from_document(doc, &InventoryConfig::default());

        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();
        let discovered = scan_page(&document, 1, &mut cache, &mut catalog).unwrap();

        assert!(discovered.is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_scan_missing_page_is_an_error() {
        let document = document_with_pages(|_| vec![Dictionary::new()]);
        let mut cache = FontResolutionCache::new();
        let mut catalog = PageFontCatalog::new();

        let result = scan_page(&document, 5, &mut cache, &mut catalog);
        assert!(matches!(result.unwrap_err(), Error::PageNotFound { page: 5, .. }));
    }
}
