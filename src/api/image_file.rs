/// Reading product images picked from disk

use image::ImageFormat;
use std::path::{Path, PathBuf};

use crate::state::data::SelectedImage;

/// Extensions offered in the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Read an image file and work out its MIME type.
/// Size and type validation is left to the form.
pub async fn load_image_file(path: PathBuf) -> Result<SelectedImage, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let mime = sniff_mime(&path, &bytes);

    Ok(SelectedImage {
        file_name,
        mime,
        bytes,
    })
}

/// MIME type from the file's magic bytes, falling back to its extension
pub fn sniff_mime(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_sniff_prefers_contents() {
        assert_eq!(sniff_mime(Path::new("scan.bin"), PNG_MAGIC), "image/png");
    }

    #[test]
    fn test_sniff_falls_back_to_extension() {
        assert_eq!(sniff_mime(Path::new("photo.JPG"), b"????"), "image/jpeg");
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(
            sniff_mime(Path::new("notes.txt"), b"hello"),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_load_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let image = load_image_file(path).await.unwrap();
        assert_eq!(image.file_name, "mask.png");
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.size(), PNG_MAGIC.len());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_image_file("/nonexistent/path.png".into()).await;
        assert!(result.is_err());
    }
}
