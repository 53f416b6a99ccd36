//! Minimal HTML utilities for the region engine.
//!
//! The region engine works on the editor's HTML value as a string. It does not
//! need a full HTML parser: the only elements it ever has to find are the
//! sentinel spans it writes itself, so a small tag scanner is enough. What it
//! does need to get exactly right is escaping (all user-facing text is escaped
//! on the way in) and visible-text extraction (tags stripped, the builder's
//! entities decoded, whitespace collapsed) so fingerprints are stable.

/// Escapes text for use as HTML element content or attribute value.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decodes the entities [`escape_text`] emits.
///
/// `&amp;` is decoded last so that escaped ampersand sequences round-trip.
pub fn decode_entities(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// A `<span ...>` open tag located in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpanTag {
    /// Byte offset of the `<` of the open tag.
    pub open_start: usize,
    /// Byte offset one past the `>` of the open tag.
    pub open_end: usize,
}

impl SpanTag {
    /// Byte offset one past the matching `</span>`, if present.
    ///
    /// Sentinel and meta spans are always empty or text-only, so the next
    /// close tag after the open tag is the matching one.
    pub fn element_end(&self, html: &str) -> Option<usize> {
        const CLOSE: &str = "</span>";
        html[self.open_end..]
            .find(CLOSE)
            .map(|rel| self.open_end + rel + CLOSE.len())
    }
}

/// Returns the next `<span` open tag at or after `from`.
pub(crate) fn next_span_tag(html: &str, from: usize) -> Option<SpanTag> {
    let rel = html[from..].find("<span")?;
    let open_start = from + rel;
    let gt_rel = html[open_start..].find('>')?;
    Some(SpanTag {
        open_start,
        open_end: open_start + gt_rel + 1,
    })
}

/// Checks whether an open tag carries `name="value"` (either quote style).
///
/// Attribute order within the tag does not matter, which keeps marker lookup
/// stable when an editor rewrites attribute order.
pub(crate) fn tag_has_attr(tag: &str, name: &str, value: &str) -> bool {
    tag.contains(&format!("{name}=\"{value}\"")) || tag.contains(&format!("{name}='{value}'"))
}

/// Removes every span element whose open tag carries the given attribute name,
/// content included.
pub(crate) fn remove_spans_with_attr(html: &str, attr_name: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    while let Some(tag) = next_span_tag(html, cursor) {
        let open_tag = &html[tag.open_start..tag.open_end];
        let has_attr = open_tag.contains(&format!("{attr_name}=\""))
            || open_tag.contains(&format!("{attr_name}='"));
        if !has_attr {
            out.push_str(&html[cursor..tag.open_end]);
            cursor = tag.open_end;
            continue;
        }
        out.push_str(&html[cursor..tag.open_start]);
        match tag.element_end(html) {
            Some(end) => cursor = end,
            // Unclosed span: drop the rest, there is no matching close tag.
            None => return out,
        }
    }
    out.push_str(&html[cursor..]);
    out
}

/// Extracts the visible text of an HTML fragment.
///
/// Tags are stripped, entities decoded, and whitespace runs collapsed to a
/// single space; the result is trimmed. Fingerprints are computed over this
/// form, so it must stay deterministic across editor round-trips.
pub fn visible_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                // Tag boundaries separate words in the rendered document.
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => text.push(ch),
        }
    }
    let decoded = decode_entities(&text);
    let mut out = String::with_capacity(decoded.len());
    for word in decoded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_round_trip() {
        let raw = "Fish & Chips <em>\"quoted\"</em> 'single'";
        assert_eq!(decode_entities(&escape_text(raw)), raw);
    }

    #[test]
    fn escape_handles_pre_escaped_ampersand() {
        assert_eq!(escape_text("&amp;"), "&amp;amp;");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
    }

    #[test]
    fn finds_span_tags_in_order() {
        let html = "<p>x</p><span a=\"1\"></span><span b=\"2\"></span>";
        let first = next_span_tag(html, 0).unwrap();
        assert!(tag_has_attr(&html[first.open_start..first.open_end], "a", "1"));
        let second = next_span_tag(html, first.open_end).unwrap();
        assert!(tag_has_attr(&html[second.open_start..second.open_end], "b", "2"));
        assert!(next_span_tag(html, second.open_end).is_none());
    }

    #[test]
    fn attr_match_ignores_attribute_order() {
        let tag = "<span style=\"display:none\" data-sx-edge='start' data-sx-region=\"beats\">";
        assert!(tag_has_attr(tag, "data-sx-region", "beats"));
        assert!(tag_has_attr(tag, "data-sx-edge", "start"));
        assert!(!tag_has_attr(tag, "data-sx-region", "overview"));
    }

    #[test]
    fn removes_attributed_spans_with_content() {
        let html = "<p>keep</p><span data-sx-meta=\"beats\">{&quot;x&quot;:1}</span><p>also</p>";
        assert_eq!(
            remove_spans_with_attr(html, "data-sx-meta"),
            "<p>keep</p><p>also</p>"
        );
    }

    #[test]
    fn visible_text_strips_tags_and_collapses_whitespace() {
        let html = "<h2>Plot   A</h2>\n<ul><li>First beat</li><li>Second &amp; third</li></ul>";
        assert_eq!(visible_text(html), "Plot A First beat Second & third");
    }

    #[test]
    fn visible_text_separates_adjacent_elements() {
        assert_eq!(visible_text("<li>one</li><li>two</li>"), "one two");
    }
}
