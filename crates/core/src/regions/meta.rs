//! Hidden beats meta payload.
//!
//! The beats region carries one hidden span with a small JSON payload: the
//! conflict label the region was generated for and the fingerprint of its
//! canonical text. The payload exists only to detect unexpected edits; any
//! parse failure reads as "edited" upstream, so parsing here returns `Option`
//! rather than an error.

use crate::fingerprint::Fingerprint;
use crate::html::{decode_entities, escape_text, next_span_tag, tag_has_attr};
use serde::{Deserialize, Serialize};

pub(crate) const META_ATTR: &str = "data-sx-meta";

/// Payload stored in the beats region's hidden meta span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatsMeta {
    /// Conflict label the region was generated for.
    pub conflict: String,
    /// Fingerprint of the region's canonical visible text.
    pub fingerprint: Fingerprint,
}

/// Renders the hidden meta span. The JSON is HTML-escaped as text content.
pub(crate) fn render_meta_span(meta: &BeatsMeta) -> String {
    // Serializing a struct of strings cannot fail.
    let json = serde_json::to_string(meta).unwrap_or_default();
    format!(
        "<span {META_ATTR}=\"beats\" style=\"display:none\">{}</span>",
        escape_text(&json)
    )
}

/// Parses the first beats meta span found in `html`, if any.
pub(crate) fn parse_meta(html: &str) -> Option<BeatsMeta> {
    let mut cursor = 0;
    while let Some(tag) = next_span_tag(html, cursor) {
        let open_tag = &html[tag.open_start..tag.open_end];
        if !tag_has_attr(open_tag, META_ATTR, "beats") {
            cursor = tag.open_end;
            continue;
        }
        let end = tag.element_end(html)?;
        let inner = &html[tag.open_end..end - "</span>".len()];
        return serde_json::from_str(&decode_entities(inner)).ok();
    }
    None
}

/// Removes every meta span, content included.
pub(crate) fn strip_meta_spans(html: &str) -> String {
    crate::html::remove_spans_with_attr(html, META_ATTR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> BeatsMeta {
        BeatsMeta {
            conflict: "[Wo]Man vs. Nature".to_owned(),
            fingerprint: Fingerprint::of_text("canonical text"),
        }
    }

    #[test]
    fn meta_round_trip() {
        let rendered = render_meta_span(&sample_meta());
        assert_eq!(parse_meta(&rendered), Some(sample_meta()));
    }

    #[test]
    fn parse_skips_unrelated_spans() {
        let html = format!(
            "<span class=\"x\">noise</span>{}",
            render_meta_span(&sample_meta())
        );
        assert_eq!(parse_meta(&html), Some(sample_meta()));
    }

    #[test]
    fn mangled_payload_parses_as_none() {
        let html = "<span data-sx-meta=\"beats\" style=\"display:none\">{broken</span>";
        assert_eq!(parse_meta(html), None);
        assert_eq!(parse_meta("<p>no meta at all</p>"), None);
    }

    #[test]
    fn strip_removes_payload_text() {
        let html = format!("<p>before</p>{}<p>after</p>", render_meta_span(&sample_meta()));
        let stripped = strip_meta_spans(&html);
        assert_eq!(stripped, "<p>before</p><p>after</p>");
    }
}
