//! Image normalization for physical labels.
//!
//! Decodes whatever the transport delivered, fits it inside the label canvas
//! without cropping, centers it on a solid background and re-encodes it in the
//! raster format the print queue expects.

pub mod mime_detect;
pub mod normalize;

pub use mime_detect::{detect_mime_type, format_for_path, is_image};
pub use normalize::{decode, fit_dimensions, normalize, ImageNormalizer};
