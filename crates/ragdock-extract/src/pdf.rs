//! PDF page-text extraction.

/// Extract text from PDF bytes. Returns an error string on corrupt input.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}
