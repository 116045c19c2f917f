//! OOXML extraction: `.docx` word processing and `.xlsx`/`.xls` spreadsheets.

use std::io::{Cursor, Read};

use calamine::Reader;

use crate::markup;

/// Extract the raw text of a `.docx` document.
///
/// A docx file is a zip archive; the body lives in `word/document.xml`.
/// Paragraph ends become newlines, then remaining tags are stripped.
pub fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a docx archive: {e}"))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {e}"))?
        .read_to_string(&mut document_xml)
        .map_err(|e| format!("unreadable word/document.xml: {e}"))?;

    let with_breaks = document_xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    Ok(markup::strip_tags(&with_breaks))
}

/// Flatten every sheet of a workbook into tab-delimited rows, each sheet
/// prefixed with a `Sheet: <name>` header.
pub fn extract_spreadsheet(bytes: &[u8]) -> Result<String, String> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| format!("unreadable workbook: {e}"))?;

    let mut out = String::new();
    let sheet_names = workbook.sheet_names().to_vec();
    for name in sheet_names {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!("Skipping unreadable sheet '{}': {}", name, e);
                continue;
            }
        };

        out.push_str(&format!("Sheet: {name}\n"));
        for row in range.rows() {
            let line: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
        out.push('\n');
    }

    if out.trim().is_empty() {
        return Err("workbook contains no readable sheets".into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn docx_text_is_extracted_with_paragraph_breaks() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>First line</w:t></w:r></w:p><w:p><w:r><w:t>Second line</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_docx(&docx_bytes(xml)).unwrap();
        assert!(text.contains("First line"));
        assert!(text.contains("Second line"));
    }

    #[test]
    fn non_zip_bytes_are_an_error() {
        assert!(extract_docx(b"plainly not a zip").is_err());
    }

    #[test]
    fn zip_without_document_xml_is_an_error() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("other.txt", options).unwrap();
            writer.write_all(b"x").unwrap();
            writer.finish().unwrap();
        }
        assert!(extract_docx(&buf.into_inner()).is_err());
    }

    #[test]
    fn garbage_spreadsheet_is_an_error() {
        assert!(extract_spreadsheet(b"not a workbook").is_err());
    }
}
