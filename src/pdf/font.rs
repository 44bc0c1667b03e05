//! Font dictionary inspection: names, embedding, resource entries

use lopdf::{Dictionary, Object, ObjectId};
use crate::pdf::document::FontDocument;

/// Length of the tag in front of a subset font name (`ABCDEF+`)
const SUBSET_TAG_LEN: usize = 6;

/// Keys of a font descriptor that hold an embedded font program
const FONT_FILE_KEYS: [&[u8]; 3] = [b"FontFile", b"FontFile2", b"FontFile3"];

/// Outcome of decoding one value of a `/Font` resource dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontEntry {
    /// Indirect reference to a font object
    Resolved(ObjectId),
    /// Inline or malformed value; not inventoried
    Skip,
}

impl FontEntry {
    /// Classify a resource dictionary value
    pub fn classify(value: &Object) -> Self {
        match value {
            Object::Reference(id) => FontEntry::Resolved(*id),
            _ => FontEntry::Skip,
        }
    }
}

/// Remove a subset tag from a font name
///
/// Subset fonts are named with six uppercase letters and a `+` in front of
/// the real name, e.g. `ABCDEF+Arial`.
pub fn strip_subset_prefix(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() > SUBSET_TAG_LEN
        && bytes[SUBSET_TAG_LEN] == b'+'
        && bytes[..SUBSET_TAG_LEN].iter().all(u8::is_ascii_uppercase)
    {
        &name[SUBSET_TAG_LEN + 1..]
    } else {
        name
    }
}

/// Raw `/BaseFont` bytes of a font dictionary, if it has a name there
pub fn base_font_name(font: &Dictionary) -> Option<&[u8]> {
    match font.get(b"BaseFont") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        _ => None,
    }
}

/// Whether a font dictionary carries an embedded font program
///
/// Simple fonts keep their program in the font descriptor. Composite
/// (`/Type0`) fonts delegate to their first descendant font. Type 3 glyphs
/// are content streams inside the file, so those always count as embedded.
pub fn has_embedded_program(document: &FontDocument, font: &Dictionary) -> bool {
    match font.get(b"Subtype") {
        Ok(Object::Name(subtype)) if subtype == b"Type3" => true,
        Ok(Object::Name(subtype)) if subtype == b"Type0" => descendant_font(document, font)
            .map(|descendant| descriptor_has_program(document, descendant))
            .unwrap_or(false),
        _ => descriptor_has_program(document, font),
    }
}

fn descendant_font<'a>(document: &'a FontDocument, font: &'a Dictionary) -> Option<&'a Dictionary> {
    let descendants = document.deref(font.get(b"DescendantFonts").ok()?)?;
    match descendants {
        Object::Array(fonts) => document.as_dictionary(fonts.first()?),
        _ => None,
    }
}

fn descriptor_has_program(document: &FontDocument, font: &Dictionary) -> bool {
    font.get(b"FontDescriptor")
        .ok()
        .and_then(|descriptor| document.as_dictionary(descriptor))
        .map(|descriptor| FONT_FILE_KEYS.iter().any(|key| descriptor.has(key)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use lopdf::{dictionary, Document, Stream};

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("BCDEFG+Arial"), "Arial");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("Helvetica-Bold"), "Helvetica-Bold");
    }

    #[test]
    fn test_strip_subset_prefix_near_misses() {
        // lowercase tag
        assert_eq!(strip_subset_prefix("abcdef+Arial"), "abcdef+Arial");
        // tag too short or too long
        assert_eq!(strip_subset_prefix("ABCDE+Arial"), "ABCDE+Arial");
        assert_eq!(strip_subset_prefix("ABCDEFG+Arial"), "ABCDEFG+Arial");
        // nothing after the tag
        assert_eq!(strip_subset_prefix("ABCDEF+"), "ABCDEF+");
        // multibyte text must not be sliced mid-character
        assert_eq!(strip_subset_prefix("宋体+Arial"), "宋体+Arial");
    }

    #[test]
    fn test_classify() {
        assert_eq!(FontEntry::classify(&Object::Reference((7, 0))), FontEntry::Resolved((7, 0)));
        assert_eq!(FontEntry::classify(&Object::Integer(7)), FontEntry::Skip);
        assert_eq!(
            FontEntry::classify(&Object::Dictionary(dictionary! { "BaseFont" => "Arial" })),
            FontEntry::Skip
        );
    }

    #[test]
    fn test_base_font_name() {
        let font = dictionary! { "BaseFont" => "Times-Roman" };
        assert_eq!(base_font_name(&font), Some(&b"Times-Roman"[..]));

        let font = dictionary! { "BaseFont" => Object::Integer(3) };
        assert_eq!(base_font_name(&font), None);

        assert_eq!(base_font_name(&Dictionary::new()), None);
    }

    #[test]
    fn test_embedded_simple_font() {
        let mut doc = Document::with_version("1.5");
        let program = doc.add_object(Stream::new(Dictionary::new(), vec![0u8; 16]));
        let descriptor = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "ABCDEF+Arial",
            "FontFile2" => program,
        });
        let document = FontDocument::from_document(doc, &InventoryConfig::default());

        let embedded = dictionary! {
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Arial",
            "FontDescriptor" => descriptor,
        };
        assert!(has_embedded_program(&document, &embedded));

        let standard = dictionary! { "Subtype" => "Type1", "BaseFont" => "Helvetica" };
        assert!(!has_embedded_program(&document, &standard));
    }

    #[test]
    fn test_embedded_composite_font() {
        let mut doc = Document::with_version("1.5");
        let program = doc.add_object(Stream::new(Dictionary::new(), vec![0u8; 16]));
        let embedded_descriptor = doc.add_object(dictionary! { "FontFile3" => program });
        let bare_descriptor = doc.add_object(dictionary! { "FontName" => "SimSun" });
        let embedded_cid = doc.add_object(dictionary! {
            "Subtype" => "CIDFontType0",
            "FontDescriptor" => embedded_descriptor,
        });
        let bare_cid = doc.add_object(dictionary! {
            "Subtype" => "CIDFontType2",
            "FontDescriptor" => bare_descriptor,
        });
        let document = FontDocument::from_document(doc, &InventoryConfig::default());

        let embedded = dictionary! {
            "Subtype" => "Type0",
            "DescendantFonts" => vec![Object::Reference(embedded_cid)],
        };
        assert!(has_embedded_program(&document, &embedded));

        let bare = dictionary! {
            "Subtype" => "Type0",
            "DescendantFonts" => vec![Object::Reference(bare_cid)],
        };
        assert!(!has_embedded_program(&document, &bare));

        let broken = dictionary! { "Subtype" => "Type0" };
        assert!(!has_embedded_program(&document, &broken));
    }

    #[test]
    fn test_type3_is_embedded() {
        let document = FontDocument::from_document(Document::with_version("1.5"), &InventoryConfig::default());
        let font = dictionary! { "Subtype" => "Type3" };
        assert!(has_embedded_program(&document, &font));
    }
}
