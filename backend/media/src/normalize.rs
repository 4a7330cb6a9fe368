use std::io::Cursor;

use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use telefax_core::{LabelBitmap, LabelSpec, OutputFormat, TelefaxError};
use tracing::debug;

const JPEG_QUALITY: u8 = 95;

/// Fits images onto the configured label canvas.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    label: LabelSpec,
}

impl ImageNormalizer {
    pub fn new(label: LabelSpec) -> Self {
        Self { label }
    }

    pub fn label(&self) -> &LabelSpec {
        &self.label
    }

    /// Decode `bytes`, scale uniformly to fit the canvas, center it and encode.
    ///
    /// The result is always exactly `pixel_width() x pixel_height()` and is
    /// byte-identical for identical input.
    pub fn normalize(&self, bytes: &[u8]) -> Result<LabelBitmap, TelefaxError> {
        let source = decode(bytes)?;
        let target_w = self.label.pixel_width();
        let target_h = self.label.pixel_height();
        let background = Rgb(self.label.background);

        let flat = flatten(&source, background);
        let (fit_w, fit_h) = fit_dimensions(flat.width(), flat.height(), target_w, target_h);
        debug!(
            src_w = flat.width(),
            src_h = flat.height(),
            fit_w,
            fit_h,
            target_w,
            target_h,
            "Fitting image to label"
        );

        let scaled = resize_rgb(flat, fit_w, fit_h)?;
        let canvas = center_on_canvas(&scaled, target_w, target_h, background);
        let data = encode(canvas, self.label.output_format)?;

        Ok(LabelBitmap {
            width: target_w,
            height: target_h,
            format: self.label.output_format,
            data,
        })
    }
}

/// Normalize with a white background and PNG output.
pub fn normalize(
    bytes: &[u8],
    width_inches: f64,
    height_inches: f64,
    dpi: u32,
) -> Result<LabelBitmap, TelefaxError> {
    ImageNormalizer::new(LabelSpec {
        width_inches,
        height_inches,
        dpi,
        ..Default::default()
    })
    .normalize(bytes)
}

/// Decode any supported image format into memory.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, TelefaxError> {
    if bytes.is_empty() {
        return Err(TelefaxError::Decode("empty payload".into()));
    }
    image::load_from_memory(bytes).map_err(|e| TelefaxError::Decode(e.to_string()))
}

/// Largest size with the source aspect ratio that fits inside the target.
///
/// Scales up as well as down. Each side is at least 1px and never exceeds the target.
pub fn fit_dimensions(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let scale_w = target_w as f64 / src_w.max(1) as f64;
    let scale_h = target_h as f64 / src_h.max(1) as f64;
    let scale = scale_w.min(scale_h);

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, target_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, target_h.max(1));
    (w, h)
}

/// Composite any alpha channel over the background so letterbox and image agree.
fn flatten(img: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            let fg = src[c] as u32 * alpha;
            let bg = background[c] as u32 * (255 - alpha);
            dst[c] = ((fg + bg + 127) / 255) as u8;
        }
    }
    out
}

/// Lanczos3 resize via fast_image_resize.
fn resize_rgb(img: RgbImage, target_w: u32, target_h: u32) -> Result<RgbImage, TelefaxError> {
    let (width, height) = img.dimensions();
    if (width, height) == (target_w, target_h) {
        return Ok(img);
    }

    let src_image = Image::from_vec_u8(width, height, img.into_raw(), PixelType::U8x3)
        .map_err(|e| TelefaxError::Encode(format!("failed to create source image: {e}")))?;
    let mut dst_image = Image::new(target_w, target_h, PixelType::U8x3);

    let mut resizer = Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        )
        .map_err(|e| TelefaxError::Encode(format!("resize failed: {e}")))?;

    RgbImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| TelefaxError::Encode("failed to convert resized image".into()))
}

fn center_on_canvas(img: &RgbImage, width: u32, height: u32, background: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, background);
    let x = (width.saturating_sub(img.width()) / 2) as i64;
    let y = (height.saturating_sub(img.height()) / 2) as i64;
    image::imageops::replace(&mut canvas, img, x, y);
    canvas
}

fn encode(canvas: RgbImage, format: OutputFormat) -> Result<Vec<u8>, TelefaxError> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => {
            DynamicImage::ImageRgb8(canvas)
                .write_to(&mut buf, ImageFormat::Png)
                .map_err(|e| TelefaxError::Encode(format!("PNG encode failed: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            canvas
                .write_with_encoder(encoder)
                .map_err(|e| TelefaxError::Encode(format!("JPEG encode failed: {e}")))?;
        }
    }
    Ok(buf.into_inner())
}
