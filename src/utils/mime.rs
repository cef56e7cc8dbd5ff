//! MIME type detection for feed enclosures.
//!
//! Maps file extensions of enclosure file references to the content
//! types advertised in RSS `<enclosure>` / Atom link elements.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";

    // Documents
    pub const PDF: &str = "application/pdf";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const ZIP: &str = "application/zip";
    pub const GZIP: &str = "application/gzip";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";

    // Audio
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const FLAC: &str = "audio/flac";

    // Video
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";
    pub const MOV: &str = "video/quicktime";
}

/// Guess MIME type from file extension.
pub fn from_path(path: impl AsRef<Path>) -> &'static str {
    from_extension(path.as_ref().extension().and_then(|e| e.to_str()))
}

/// Guess MIME type from file extension string.
pub fn from_extension(ext: Option<&str>) -> &'static str {
    let Some(ext) = ext else {
        return types::OCTET_STREAM;
    };

    match ext.to_ascii_lowercase().as_str() {
        "pdf" => types::PDF,
        "zip" => types::ZIP,
        "gz" => types::GZIP,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "svg" => types::SVG,
        "mp3" => types::MP3,
        "wav" => types::WAV,
        "ogg" | "oga" => types::OGG_AUDIO,
        "flac" => types::FLAC,
        "mp4" | "m4v" => types::MP4,
        "webm" => types::WEBM,
        "mov" => types::MOV,
        _ => types::OCTET_STREAM,
    }
}
