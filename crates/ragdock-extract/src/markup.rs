//! Markup stripping for HTML/XML content.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap());
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup tags and collapse whitespace, keeping the visible text.
pub fn strip_tags(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCKS.replace_all(input, " ");
    let without_tags = TAGS.replace_all(&without_scripts, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stripped_and_whitespace_collapsed() {
        let html = "<html><body><h1>Title</h1>\n\n  <p>Some   <b>bold</b> text.</p></body></html>";
        assert_eq!(strip_tags(html), "Title Some bold text.");
    }

    #[test]
    fn script_and_style_bodies_are_dropped() {
        let html = "<p>keep</p><script>var x = 'drop';</script><style>p { color: red }</style>";
        assert_eq!(strip_tags(html), "keep");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(strip_tags("<p>a &amp; b &lt;c&gt;</p>"), "a & b <c>");
    }

    #[test]
    fn plain_xml_strips_to_element_text() {
        let xml = "<items><item>one</item><item>two</item></items>";
        assert_eq!(strip_tags(xml), "one two");
    }
}
