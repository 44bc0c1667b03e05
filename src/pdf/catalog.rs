//! Per-run inventory state: font records, resolution cache, visited pages

use std::collections::HashMap;
use indexmap::IndexMap;
use serde::Serialize;

/// One distinct font seen across the scanned pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontRecord {
    /// Font name with any subset tag removed
    pub name: String,
    /// Page on which the font was first met, in scan order
    pub first_page: u32,
    /// Number of resource entries that resolved to this font
    pub reference_count: u32,
    /// Whether the font program is embedded in the document
    pub embedded: bool,
}

impl FontRecord {
    /// Create a record for a font seen for the first time
    pub fn new(name: impl Into<String>, first_page: u32, embedded: bool) -> Self {
        Self {
            name: name.into(),
            first_page,
            reference_count: 1,
            embedded,
        }
    }
}

/// Fonts found by a run, keyed by canonical name, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageFontCatalog {
    fonts: IndexMap<String, FontRecord>,
}

impl PageFontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FontRecord> {
        self.fonts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Records in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &FontRecord> {
        self.fonts.values()
    }

    /// Canonical names in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn embedded(&self) -> impl Iterator<Item = &FontRecord> {
        self.iter().filter(|font| font.embedded)
    }

    pub fn not_embedded(&self) -> impl Iterator<Item = &FontRecord> {
        self.iter().filter(|font| !font.embedded)
    }

    /// Pick the requested fonts out of the catalog
    ///
    /// Returns the names that exist in the catalog, in catalog order and
    /// without repeats. This is the list handed to font substitution.
    pub fn select<'a, I>(&self, wanted: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: Vec<&str> = wanted.into_iter().collect();
        self.names()
            .filter(|name| wanted.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Count one more reference to a known font
    ///
    /// Returns `false` if the font is not in the catalog.
    pub(crate) fn add_reference(&mut self, name: &str) -> bool {
        match self.fonts.get_mut(name) {
            Some(font) => {
                font.reference_count += 1;
                true
            }
            None => false,
        }
    }

    /// Insert a newly discovered font; the first insertion of a name wins
    pub(crate) fn insert(&mut self, record: FontRecord) {
        self.fonts.entry(record.name.clone()).or_insert(record);
    }
}

impl<'a> IntoIterator for &'a PageFontCatalog {
    type Item = &'a FontRecord;
    type IntoIter = indexmap::map::Values<'a, String, FontRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.fonts.values()
    }
}

/// Object number -> canonical font name, for objects already resolved
///
/// Only successful resolutions are stored; a malformed font object is
/// looked at again every time it is referenced.
#[derive(Debug, Clone, Default)]
pub struct FontResolutionCache {
    names: HashMap<u32, String>,
}

impl FontResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, object_number: u32) -> Option<&str> {
        self.names.get(&object_number).map(String::as_str)
    }

    pub fn insert(&mut self, object_number: u32, name: String) {
        self.names.insert(object_number, name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// Pages already scanned during a run, indexed by page number
#[derive(Debug, Clone, Default)]
pub struct PageVisitedSet {
    marks: Vec<bool>,
}

impl PageVisitedSet {
    /// Create a set able to hold pages `1..=page_count`
    pub fn new(page_count: u32) -> Self {
        Self {
            marks: vec![false; page_count as usize + 1],
        }
    }

    /// Mark a page as visited
    ///
    /// Returns `true` if the page had not been visited before. Pages outside
    /// `1..=page_count` are never recorded and always report as unvisited.
    pub fn mark(&mut self, page: u32) -> bool {
        if page == 0 {
            return true;
        }
        match self.marks.get_mut(page as usize) {
            Some(mark) => !std::mem::replace(mark, true),
            None => true,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        self.marks.get(page as usize).copied().unwrap_or(false)
    }
}
