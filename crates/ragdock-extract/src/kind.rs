//! File-format dispatch by extension.

/// Supported file formats for text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    /// Legacy binary `.doc`; extraction is not supported.
    DocLegacy,
    Spreadsheet,
    PlainText,
    Json,
    Markup,
    Unknown,
}

impl FileKind {
    /// Detect the format from a lowercase file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::DocLegacy,
            "xlsx" | "xls" => Self::Spreadsheet,
            "txt" | "md" | "csv" => Self::PlainText,
            "json" => Self::Json,
            "html" | "htm" | "xml" => Self::Markup,
            _ => Self::Unknown,
        }
    }

    /// Extension of a file name, without the dot. Empty when there is none.
    pub fn extension_of(name: &str) -> String {
        std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}
