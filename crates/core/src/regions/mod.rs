//! Marker-delimited document regions.
//!
//! The story editor owns two named regions inside the rich-text document,
//! `overview` and `beats`. Each is delimited by a pair of invisible sentinel
//! spans; everything between the markers is rewritten programmatically, and
//! everything outside them belongs to the author.
//!
//! Marker form:
//!
//! ```text
//! <span data-sx-region="overview" data-sx-edge="start" style="display:none"></span>
//! ```
//!
//! Lookup tolerates attribute reordering inside the open tag but requires the
//! start marker to precede the end marker; anything else is malformed and the
//! caller recovers by reseeding the region.

pub mod beats;
pub mod meta;
pub mod overview;

use crate::html::{next_span_tag, tag_has_attr};

pub(crate) const REGION_ATTR: &str = "data-sx-region";
pub(crate) const EDGE_ATTR: &str = "data-sx-edge";

/// The two programmatically owned regions of a story document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Overview,
    Beats,
}

impl RegionKind {
    /// Region name as embedded in marker attributes.
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Overview => "overview",
            RegionKind::Beats => "beats",
        }
    }

    /// Canonical start sentinel for this region.
    pub fn start_marker(&self) -> String {
        marker(self.name(), "start")
    }

    /// Canonical end sentinel for this region.
    pub fn end_marker(&self) -> String {
        marker(self.name(), "end")
    }
}

fn marker(name: &str, edge: &str) -> String {
    format!(
        "<span {REGION_ATTR}=\"{name}\" {EDGE_ATTR}=\"{edge}\" style=\"display:none\"></span>"
    )
}

/// Byte range of a marker element, open tag through `</span>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MarkerSpan {
    pub start: usize,
    pub end: usize,
}

/// Result of looking a region up in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegionLocation {
    /// Both markers found, start strictly before end.
    Present {
        start: MarkerSpan,
        end: MarkerSpan,
    },
    /// Neither marker found.
    Absent,
    /// One marker missing, a marker unclosed, or the pair reversed.
    Malformed,
}

/// Finds the first marker of the given region and edge.
pub(crate) fn find_marker(html: &str, kind: RegionKind, edge: &str) -> Option<MarkerSpan> {
    let mut cursor = 0;
    while let Some(tag) = next_span_tag(html, cursor) {
        let open_tag = &html[tag.open_start..tag.open_end];
        if tag_has_attr(open_tag, REGION_ATTR, kind.name()) && tag_has_attr(open_tag, EDGE_ATTR, edge)
        {
            // An open tag without a close tag counts as no marker; the caller
            // sees the mismatch with the other edge and treats it as malformed.
            return tag.element_end(html).map(|end| MarkerSpan {
                start: tag.open_start,
                end,
            });
        }
        cursor = tag.open_end;
    }
    None
}

/// Locates a region's marker pair in the document.
pub(crate) fn locate(html: &str, kind: RegionKind) -> RegionLocation {
    let start = find_marker(html, kind, "start");
    let end = find_marker(html, kind, "end");
    match (start, end) {
        (Some(start), Some(end)) if start.end <= end.start => {
            RegionLocation::Present { start, end }
        }
        (None, None) => RegionLocation::Absent,
        _ => RegionLocation::Malformed,
    }
}
