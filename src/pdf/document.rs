//! Document access for font scanning

use std::collections::BTreeMap;
use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::config::InventoryConfig;
use crate::error::{Error, Result};

/// Guards the `/Parent` walk against cyclic page trees
const MAX_TREE_DEPTH: usize = 64;

/// A loaded PDF document together with its page map and name decoding
pub struct FontDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
    config: InventoryConfig,
}

impl FontDocument {
    /// Open a PDF file
    ///
    /// Failing here is fatal to an inventory run: a missing file, a file
    /// lopdf cannot parse, or a document without pages.
    pub fn open(path: &Path, config: &InventoryConfig) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let doc = Document::load(path)?;
        let document = Self::from_document(doc, config);

        if document.page_count() == 0 {
            return Err(Error::EmptyPdf(path.to_path_buf()));
        }

        log::debug!("Opened {} ({} pages)", path.display(), document.page_count());
        Ok(document)
    }

    /// Wrap a document that is already in memory
    pub fn from_document(doc: Document, config: &InventoryConfig) -> Self {
        let pages = doc.get_pages();
        Self {
            doc,
            pages,
            config: *config,
        }
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Locate the `/Font` dictionary of a page's resources
    ///
    /// `Ok(None)` means the page simply has no fonts. Resources missing from
    /// the page itself are inherited from its ancestors in the page tree.
    pub fn page_fonts(&self, page: u32) -> Result<Option<&Dictionary>> {
        let page_id = *self.pages.get(&page).ok_or(Error::PageNotFound {
            page,
            page_count: self.page_count(),
        })?;

        // get_pages only yields ids of Page dictionaries
        let mut node = self.doc.get_dictionary(page_id)?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(resources) = node.get(b"Resources") {
                let fonts = self
                    .as_dictionary(resources)
                    .and_then(|resources| resources.get(b"Font").ok())
                    .and_then(|fonts| self.as_dictionary(fonts));
                return Ok(fonts);
            }

            // Inheritable attribute: look at the parent node
            match node.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => match self.doc.get_dictionary(*parent_id) {
                    Ok(parent) => node = parent,
                    Err(_) => return Ok(None),
                },
                _ => return Ok(None),
            }
        }

        log::warn!("Page tree too deep above page {}, ignoring its resources", page);
        Ok(None)
    }

    /// Resolve an indirect reference
    pub fn resolve(&self, id: ObjectId) -> Option<&Object> {
        self.doc.get_object(id).ok()
    }

    /// Follow an object through one indirect reference if it is one
    pub fn deref<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(id) => self.resolve(*id),
            _ => Some(object),
        }
    }

    /// View an object (or the object it refers to) as a dictionary
    pub fn as_dictionary<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        match self.deref(object)? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Decode a PDF name with the configured font-name encoding
    pub fn decode_name(&self, bytes: &[u8]) -> String {
        self.config.decode_name(bytes)
    }
}
