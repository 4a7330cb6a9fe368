//! Transport-neutral classification of an inbound chat message.

use std::path::Path;

use telefax_core::SenderId;
use telefax_media::{detect_mime_type, is_image};

/// Identity of the user who sent a message. Messages without a user (channel
/// posts) get the empty identity, which is never authorized.
pub fn sender_identity(user_id: Option<u64>) -> SenderId {
    user_id.map(SenderId::from).unwrap_or_default()
}

/// What an inbound message asks for. `F` is the transport's file handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind<F> {
    /// Text starting with `/`.
    Command(String),
    /// A printable image plus its caption.
    Image { file: F, caption: Option<String> },
    /// A document that is not an image.
    NotAnImage { mime: String },
    /// Plain text.
    Text,
    /// Stickers, locations and the like.
    Ignored,
}

/// An attached document, as far as classification cares.
#[derive(Debug, Clone)]
pub struct DocumentInfo<'a, F> {
    pub file: F,
    pub mime: Option<&'a str>,
    pub file_name: Option<&'a str>,
}

/// Photos win over documents; captions travel with the image.
pub fn classify<F>(
    text: Option<&str>,
    caption: Option<&str>,
    photo: Option<F>,
    document: Option<DocumentInfo<'_, F>>,
) -> InboundKind<F> {
    let caption = caption.map(str::to_string);

    if let Some(file) = photo {
        return InboundKind::Image { file, caption };
    }

    if let Some(doc) = document {
        let mime = document_mime(doc.mime, doc.file_name);
        if is_image(&mime) {
            return InboundKind::Image {
                file: doc.file,
                caption,
            };
        }
        return InboundKind::NotAnImage { mime };
    }

    match text.map(str::trim) {
        Some(t) if t.starts_with('/') => InboundKind::Command(t.to_string()),
        Some(_) => InboundKind::Text,
        None => InboundKind::Ignored,
    }
}

/// Declared MIME type, or one guessed from the file name when the client sent none.
fn document_mime(declared: Option<&str>, file_name: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
            mime.to_ascii_lowercase()
        }
        _ => file_name
            .map(|name| detect_mime_type(Path::new(name)))
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc<'a>(mime: Option<&'a str>, file_name: Option<&'a str>) -> Option<DocumentInfo<'a, u32>> {
        Some(DocumentInfo {
            file: 7,
            mime,
            file_name,
        })
    }

    #[test]
    fn sender_is_the_user_not_the_chat() {
        assert_eq!(sender_identity(Some(111)).as_str(), "111");
        assert!(sender_identity(None).is_empty());
    }

    #[test]
    fn photo_with_caption_is_an_image() {
        assert_eq!(
            classify(None, Some("3 copies"), Some(1u32), None),
            InboundKind::Image {
                file: 1,
                caption: Some("3 copies".into())
            }
        );
    }

    #[test]
    fn image_documents_are_accepted() {
        assert_eq!(
            classify(None, None, None, doc(Some("image/png"), Some("label.png"))),
            InboundKind::Image { file: 7, caption: None }
        );
        assert_eq!(
            classify(None, None, None, doc(Some("application/octet-stream"), Some("scan.JPG"))),
            InboundKind::Image { file: 7, caption: None }
        );
    }

    #[test]
    fn other_documents_are_refused() {
        assert_eq!(
            classify(None, None, None, doc(Some("application/pdf"), Some("label.pdf"))),
            InboundKind::NotAnImage {
                mime: "application/pdf".into()
            }
        );
        assert_eq!(
            classify(None, None, None, doc(None, None)),
            InboundKind::NotAnImage {
                mime: "application/octet-stream".into()
            }
        );
    }

    #[test]
    fn text_is_command_or_plain() {
        assert_eq!(
            classify::<u32>(Some(" /help "), None, None, None),
            InboundKind::Command("/help".into())
        );
        assert_eq!(classify::<u32>(Some("hello"), None, None, None), InboundKind::Text);
        assert_eq!(classify::<u32>(None, None, None, None), InboundKind::Ignored);
    }
}
