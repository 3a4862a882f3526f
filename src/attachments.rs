// File attachments: classification by extension and the marker format that
// embeds file text into a user turn.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

pub const CONTENT_MARKER: &str = "--- content from";
const UNNAMED_FILE: &str = "your file";

static MARKER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--- Content from (.*?) ---").expect("marker pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Pdf,
    Text,
    Unsupported(String),
}

pub fn classify_attachment(file_name: &str) -> AttachmentKind {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => AttachmentKind::Image,
        "pdf" => AttachmentKind::Pdf,
        "txt" | "md" | "csv" | "log" | "json" => AttachmentKind::Text,
        "" => AttachmentKind::Unsupported("unknown".to_string()),
        other => AttachmentKind::Unsupported(other.to_string()),
    }
}

/// Combines the user's message with extracted file text.
pub fn attach_file_text(accompanying: &str, file_name: &str, text: &str) -> String {
    format!("{}\n\n--- Content from {} ---\n{}", accompanying, file_name, text)
}

pub fn has_file_marker(input: &str) -> bool {
    input.to_lowercase().contains(CONTENT_MARKER)
}

/// Name recorded in the marker, or a generic stand-in.
pub fn marker_file_name(input: &str) -> String {
    MARKER_NAME
        .captures(input)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNNAMED_FILE.to_string())
}
