//! MIME type detection for image files.
//!
//! Used by the Telegram adapter to accept image documents and by the CLI to
//! pick an output encoding from a file name.

use std::path::Path;

use telefax_core::OutputFormat;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "ico"          => "image/x-icon",
        "tiff" | "tif" => "image/tiff",
        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Label encoding matching a destination file name, if it is one we can write.
pub fn format_for_path(path: &Path) -> Option<OutputFormat> {
    match detect_mime_type(path) {
        "image/png" => Some(OutputFormat::Png),
        "image/jpeg" => Some(OutputFormat::Jpeg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("file.xyz")), "application/octet-stream");
        assert!(!is_image("application/octet-stream"));
    }

    #[test]
    fn output_format_from_path() {
        assert_eq!(format_for_path(&PathBuf::from("label.png")), Some(OutputFormat::Png));
        assert_eq!(format_for_path(&PathBuf::from("label.jpeg")), Some(OutputFormat::Jpeg));
        assert_eq!(format_for_path(&PathBuf::from("label.gif")), None);
    }
}
