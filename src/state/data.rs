/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the backend client and the UI layer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use iced::widget::image::Handle;
use serde::{Deserialize, Deserializer};

/// A single product as served by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(rename = "productName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "productDescription", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "productPrice", default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Base64-encoded image bytes (None renders a placeholder)
    #[serde(rename = "productImageData", default)]
    pub image_data: Option<String>,
    /// Only its presence matters: it drives the "New" badge
    #[serde(rename = "productUploadDate", default)]
    pub upload_date: Option<serde_json::Value>,
    /// Decoded image, filled in once by `decode_image`
    #[serde(skip)]
    pub image: Option<Handle>,
}

impl Product {
    /// Decode `image_data` into a displayable handle.
    /// Undecodable data is treated the same as missing data.
    pub fn decode_image(&mut self) {
        self.image = self
            .image_data
            .as_deref()
            .filter(|data| !data.is_empty())
            .and_then(|data| BASE64.decode(data).ok())
            .map(Handle::from_bytes);
    }

    /// Whether the "New" badge should be shown
    pub fn is_new(&self) -> bool {
        matches!(&self.upload_date, Some(value) if !value.is_null())
    }

    /// Price with the rupee prefix, e.g. "₹120" or "₹99.5"
    pub fn price_label(&self) -> String {
        format!("₹{}", self.price)
    }

    /// Case-insensitive match of an already lower-cased needle
    /// against name or description
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// Treat an explicit JSON `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A locally selected image file, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    /// Sniffed MIME type, e.g. "image/png"
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Text fields of the add-product form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    Price,
}

/// Validated payload for the add-product request
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    /// Price as typed (already checked to parse as a non-negative number)
    pub price: String,
    pub image: SelectedImage,
}
