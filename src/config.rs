//! Inventory configuration

use encoding_rs::Encoding;
use crate::error::{Error, Result};

/// Settings shared by every scan of a document
#[derive(Debug, Clone, Copy)]
pub struct InventoryConfig {
    /// Encoding used to turn raw `/BaseFont` name bytes into text
    pub font_name_encoding: &'static Encoding,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            font_name_encoding: encoding_rs::UTF_8,
        }
    }
}

impl InventoryConfig {
    /// Build a configuration from a WHATWG encoding label such as `"gbk"`
    pub fn with_encoding_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        Ok(Self {
            font_name_encoding: encoding,
        })
    }

    /// Decode raw name bytes with the configured encoding
    ///
    /// Malformed sequences are replaced rather than rejected; a font name that
    /// cannot be decoded cleanly is still a font worth listing.
    pub fn decode_name(&self, bytes: &[u8]) -> String {
        let (text, _) = self.font_name_encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }
}
