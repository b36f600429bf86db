use std::path::Path;

// Optimized MIME type system using enum indices instead of HashMap lookups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MimeType {
    Html = 0,
    Css = 1,
    Javascript = 2,
    Json = 3,
    Gif = 4,
    Icon = 5,
    Jpeg = 6,
    Png = 7,
    Svg = 8,
    Webp = 9,
    PlainText = 10,
    Xml = 11,
    Zip = 12,
    OctetStream = 13, // Default for unknown files
}

impl MimeType {
    // Static array for O(1) lookup - much faster than a HashMap
    const MIME_STRINGS: [&'static str; 14] = [
        "text/html",                     // Html
        "text/css",                      // Css
        "text/javascript",               // Javascript
        "application/json",              // Json
        "image/gif",                     // Gif
        "image/vnd.microsoft.icon",      // Icon
        "image/jpeg",                    // Jpeg
        "image/png",                     // Png
        "image/svg+xml",                 // Svg
        "image/webp",                    // Webp
        "text/plain",                    // PlainText
        "application/xml",               // Xml
        "application/zip",               // Zip
        "application/octet-stream",      // OctetStream
    ];

    // Convert enum to MIME string - zero allocation, O(1) lookup
    pub fn as_str(self) -> &'static str {
        Self::MIME_STRINGS[self as usize]
    }
}

// Fast MIME type detection by file extension. Matches the exact, case-sensitive
// extension table nginx-style static handlers use; anything unrecognized falls
// back to application/octet-stream rather than sniffing content.
pub fn get_mime_type_enum(file_path: &Path) -> MimeType {
    match file_path.extension().and_then(|s| s.to_str()) {
        Some("html") | Some("htm") => MimeType::Html,
        Some("css") => MimeType::Css,
        Some("js") => MimeType::Javascript,
        Some("json") => MimeType::Json,
        Some("gif") => MimeType::Gif,
        Some("ico") => MimeType::Icon,
        Some("jpeg") | Some("jpg") => MimeType::Jpeg,
        Some("png") => MimeType::Png,
        Some("svg") => MimeType::Svg,
        Some("webp") => MimeType::Webp,
        Some("txt") => MimeType::PlainText,
        Some("xml") => MimeType::Xml,
        Some("zip") => MimeType::Zip,
        _ => MimeType::OctetStream,
    }
}

pub fn get_mime_type(file_path: &Path) -> &'static str {
    get_mime_type_enum(file_path).as_str()
}
