//! Local icon images: bounded resize plus re-encode into a `data:` URI for
//! storage in the `icon` field.

use crate::error::Result;
use base64::Engine;
use image::DynamicImage;
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::Cursor;

/// Longest allowed dimension of a stored icon.
pub const MAX_DIMENSION: u32 = 256;

/// Quality for lossy re-encoding (the original's 0.9).
const JPEG_QUALITY: u8 = 90;

/// Compress raw image bytes into an embedded icon payload: shrink so the
/// longer dimension fits [`MAX_DIMENSION`] (never upscale), keep PNG for PNG
/// sources and use JPEG otherwise.
pub fn compress_to_data_uri(bytes: &[u8]) -> Result<String> {
    let source_format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory(bytes)?;
    let resized = fit_max(decoded, MAX_DIMENSION);
    let (mime, encoded) = if source_format == ImageFormat::Png {
        ("image/png", encode_png(&resized)?)
    } else {
        ("image/jpeg", encode_jpeg(&resized)?)
    };
    let payload = base64::engine::general_purpose::STANDARD.encode(encoded);
    Ok(format!("data:{mime};base64,{payload}"))
}

fn fit_max(img: DynamicImage, max: u32) -> DynamicImage {
    if img.width().max(img.height()) <= max {
        img
    } else {
        img.resize(max, max, FilterType::Lanczos3)
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>> {
    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut buf = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
        &mut buf,
        JPEG_QUALITY,
    );
    rgb.write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([200, 40, 40, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn decode_data_uri(uri: &str) -> (String, DynamicImage) {
        let rest = uri.strip_prefix("data:").unwrap();
        let (meta, payload) = rest.split_once(',').unwrap();
        let mime = meta.strip_suffix(";base64").unwrap().to_string();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        (mime, image::load_from_memory(&bytes).unwrap())
    }

    #[test]
    fn wide_image_is_bounded_by_longer_dimension() {
        let uri = compress_to_data_uri(&png_bytes(512, 300)).unwrap();
        let (mime, img) = decode_data_uri(&uri);
        assert_eq!(mime, "image/png");
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 150);
    }

    #[test]
    fn tall_image_keeps_aspect_ratio() {
        let uri = compress_to_data_uri(&png_bytes(100, 400)).unwrap();
        let (_, img) = decode_data_uri(&uri);
        assert_eq!(img.height(), 256);
        assert_eq!(img.width(), 64);
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let uri = compress_to_data_uri(&png_bytes(100, 50)).unwrap();
        let (_, img) = decode_data_uri(&uri);
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn non_png_source_becomes_jpeg() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            300,
            300,
            image::Rgba([10, 120, 200, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.to_rgb8()
            .write_with_encoder(image::codecs::jpeg::JpegEncoder::new(
                &mut buf,
            ))
            .unwrap();
        let uri = compress_to_data_uri(&buf.into_inner()).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        let (_, out) = decode_data_uri(&uri);
        assert_eq!((out.width(), out.height()), (256, 256));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(compress_to_data_uri(b"definitely not an image").is_err());
    }
}
