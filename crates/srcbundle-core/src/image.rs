//! Image assets.
//!
//! Images travel in the bundle as data URIs for display only. They are never
//! fingerprinted and never appear in a change report.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// MIME type for an image extension (lower-case, without the dot).
pub fn mime_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI.
pub fn data_uri(extension: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(extension), STANDARD.encode(bytes))
}

/// Estimated decoded size of a data URI: three bytes per four payload
/// characters, padding included.
pub fn estimated_size(data_uri: &str) -> u64 {
    let payload = data_uri
        .split_once(',')
        .map_or(data_uri, |(_, payload)| payload);
    payload.len() as u64 * 3 / 4
}
