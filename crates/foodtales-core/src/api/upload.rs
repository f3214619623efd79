//! Multipart form assembly for image-bearing writes.
//!
//! Resource writes carry a JSON metadata part named after the resource
//! (`post`, `restaurant`, `food`) and an optional binary `image` part.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use super::error::{ApiError, ApiResult};

/// Fallback MIME type when the content cannot be identified
const OCTET_STREAM: &str = "application/octet-stream";

/// Form field name of the image file part
pub const IMAGE_FIELD: &str = "image";

/// An image file ready to be sent as a multipart file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap in-memory bytes; the MIME type is detected from the content,
    /// then from the file extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = detect_mime(&file_name, &bytes);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidUpload(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_part(self) -> ApiResult<Part> {
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidUpload(format!("{} is empty", self.file_name)));
        }
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))
    }
}

fn detect_mime(file_name: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let mime = match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => OCTET_STREAM,
    };
    mime.to_string()
}

/// JSON-serialized metadata part.
pub(crate) fn json_part<T: Serialize>(metadata: &T) -> ApiResult<Part> {
    let json = serde_json::to_string(metadata)
        .map_err(|e| ApiError::InvalidUpload(format!("Failed to serialize metadata: {}", e)))?;
    Part::text(json)
        .mime_str("application/json")
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))
}

/// Metadata part under `field` plus the optional image part.
pub(crate) fn resource_form<T: Serialize>(
    field: &'static str,
    metadata: &T,
    image: Option<ImageUpload>,
) -> ApiResult<Form> {
    let mut form = Form::new().part(field, json_part(metadata)?);
    if let Some(image) = image {
        form = form.part(IMAGE_FIELD, image.into_part()?);
    }
    Ok(form)
}
