//! The story document and region upsert.
//!
//! A [`StoryDocument`] is the editor's full HTML value. The engine never
//! interprets author-written content; it only splices freshly built regions in
//! between the sentinel markers, preserving every byte outside them.
//!
//! Recovery policy: when a region's markers are missing one edge, unclosed, or
//! reversed, the prior content is discarded and a fresh document is seeded
//! containing the new region plus the default placeholder paragraph. Reset is
//! deliberate; partial repair of a half-destroyed marker pair is not
//! attempted. Worst case is a stale region, which the next successful write
//! corrects.

use crate::constants::PLACEHOLDER_PARAGRAPH;
use crate::regions::{find_marker, locate, RegionKind, RegionLocation};

/// A rich-text story document, held as its full HTML value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDocument {
    html: String,
}

impl StoryDocument {
    /// Wraps an existing editor value.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The document a fresh editor mounts with: empty overview markers
    /// followed by the placeholder paragraph.
    pub fn seeded() -> Self {
        let mut html = RegionKind::Overview.start_marker();
        html.push_str(&RegionKind::Overview.end_marker());
        html.push_str(PLACEHOLDER_PARAGRAPH);
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Returns the content strictly between a region's markers, if the region
    /// is well-formed.
    pub fn region_inner(&self, kind: RegionKind) -> Option<&str> {
        match locate(&self.html, kind) {
            RegionLocation::Present { start, end } => Some(&self.html[start.end..end.start]),
            _ => None,
        }
    }

    /// Splices a freshly built region (sentinels included) into the document.
    ///
    /// - Well-formed markers: content outside the pair is preserved verbatim;
    ///   everything between, markers inclusive, is replaced.
    /// - Missing one edge or reversed: the document is reset to the new region
    ///   plus the placeholder paragraph.
    /// - Region absent: inserted immediately after the overview end marker if
    ///   one exists, otherwise appended at document end.
    ///
    /// Applying the same upsert twice leaves the document byte-identical.
    pub fn upsert_region(&mut self, kind: RegionKind, region_html: &str) {
        match locate(&self.html, kind) {
            RegionLocation::Present { start, end } => {
                let mut next = String::with_capacity(
                    self.html.len() - (end.end - start.start) + region_html.len(),
                );
                next.push_str(&self.html[..start.start]);
                next.push_str(region_html);
                next.push_str(&self.html[end.end..]);
                self.html = next;
            }
            RegionLocation::Malformed => {
                let mut next = String::with_capacity(
                    region_html.len() + PLACEHOLDER_PARAGRAPH.len(),
                );
                next.push_str(region_html);
                next.push_str(PLACEHOLDER_PARAGRAPH);
                self.html = next;
            }
            RegionLocation::Absent => {
                match find_marker(&self.html, RegionKind::Overview, "end") {
                    Some(overview_end) => {
                        self.html.insert_str(overview_end.end, region_html);
                    }
                    None => self.html.push_str(region_html),
                }
            }
        }
    }
}

impl Default for StoryDocument {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::beats::{render_beats_region, ConflictArchetype};
    use crate::regions::overview::{render_overview_region, StoryOverview};

    fn overview_with_title(title: &str) -> String {
        render_overview_region(&StoryOverview {
            title: title.into(),
            ..StoryOverview::default()
        })
    }

    #[test]
    fn seeded_document_accepts_overview() {
        let mut doc = StoryDocument::seeded();
        doc.upsert_region(RegionKind::Overview, &overview_with_title("Gun Smoke"));
        assert!(doc.html().contains("<p>Story Title — Gun Smoke</p>"));
        assert!(doc.html().ends_with(PLACEHOLDER_PARAGRAPH));
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut doc = StoryDocument::seeded();
        let region = overview_with_title("Gun Smoke");
        doc.upsert_region(RegionKind::Overview, &region);
        let once = doc.html().to_owned();
        doc.upsert_region(RegionKind::Overview, &region);
        assert_eq!(doc.html(), once);
    }

    #[test]
    fn preserves_bytes_outside_markers() {
        let authored_before = "<h1>My Script</h1>";
        let authored_after = "<p>INT. SALOON - NIGHT</p><p>Dust hangs in the light.</p>";
        let mut doc = StoryDocument::new(format!(
            "{authored_before}{}{authored_after}",
            overview_with_title("Draft One")
        ));
        doc.upsert_region(RegionKind::Overview, &overview_with_title("Draft Two"));
        assert!(doc.html().starts_with(authored_before));
        assert!(doc.html().ends_with(authored_after));
        assert!(doc.html().contains("Draft Two"));
        assert!(!doc.html().contains("Draft One"));
    }

    #[test]
    fn malformed_markers_reset_the_document() {
        // End marker missing: the pair cannot be trusted.
        let mut doc = StoryDocument::new(format!(
            "{}<p>orphaned content</p>",
            RegionKind::Overview.start_marker()
        ));
        let region = overview_with_title("Recovered");
        doc.upsert_region(RegionKind::Overview, &region);
        assert_eq!(doc.html(), format!("{region}{PLACEHOLDER_PARAGRAPH}"));
    }

    #[test]
    fn reversed_markers_reset_the_document() {
        let mut doc = StoryDocument::new(format!(
            "{}<p>x</p>{}",
            RegionKind::Beats.end_marker(),
            RegionKind::Beats.start_marker()
        ));
        let region = render_beats_region(ConflictArchetype::Nature);
        doc.upsert_region(RegionKind::Beats, &region);
        assert_eq!(doc.html(), format!("{region}{PLACEHOLDER_PARAGRAPH}"));
        // Exactly one marker pair remains.
        assert!(doc.region_inner(RegionKind::Beats).is_some());
    }

    #[test]
    fn absent_beats_inserted_after_overview_end() {
        let mut doc = StoryDocument::seeded();
        doc.upsert_region(RegionKind::Overview, &overview_with_title("Gun Smoke"));
        let beats = render_beats_region(ConflictArchetype::Person);
        doc.upsert_region(RegionKind::Beats, &beats);

        let beats_at = doc.html().find(&RegionKind::Beats.start_marker()).unwrap();
        let overview_end = RegionKind::Overview.end_marker();
        let overview_end_at = doc.html().find(&overview_end).unwrap();
        assert_eq!(beats_at, overview_end_at + overview_end.len());
        assert!(doc.html().ends_with(PLACEHOLDER_PARAGRAPH));
    }

    #[test]
    fn absent_region_appended_when_no_overview_marker() {
        let mut doc = StoryDocument::new("<p>free-form notes</p>");
        let beats = render_beats_region(ConflictArchetype::Fate);
        doc.upsert_region(RegionKind::Beats, &beats);
        assert_eq!(doc.html(), format!("<p>free-form notes</p>{beats}"));
    }

    #[test]
    fn region_inner_excludes_markers() {
        let mut doc = StoryDocument::seeded();
        doc.upsert_region(RegionKind::Overview, &overview_with_title("Gun Smoke"));
        let inner = doc.region_inner(RegionKind::Overview).unwrap();
        assert!(inner.contains("Gun Smoke"));
        assert!(!inner.contains("data-sx-edge"));
    }
}
