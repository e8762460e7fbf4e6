// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PNG decoding and data-URI helpers for generated images

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use thiserror::Error;

/// PNG magic bytes: 89 50 4E 47
const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

/// Custom error types for image handling
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Payload is not a PNG image")]
    NotPng,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Dimensions and size of a decoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Decode a base64-encoded PNG and validate it decodes to real pixels.
///
/// Returns the raw PNG bytes together with the decoded dimensions.
pub fn decode_base64_png(base64_str: &str) -> Result<(Vec<u8>, ImageInfo), ImageError> {
    if base64_str.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let bytes = STANDARD.decode(base64_str)?;

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() < PNG_MAGIC.len() || bytes[..PNG_MAGIC.len()] != PNG_MAGIC {
        return Err(ImageError::NotPng);
    }

    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        size_bytes: bytes.len(),
    };

    Ok((bytes, info))
}

/// Encode raw PNG bytes as a base64 data URI suitable for direct embedding.
pub fn encode_png_data_uri(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}
