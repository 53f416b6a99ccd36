//! Overview region builder.
//!
//! Renders the project-metadata form state into the overview region: one
//! labeled line per populated field, in a fixed order, all values escaped.
//! Rendering is pure and byte-deterministic so that repeated synchronisation
//! with unchanged form state leaves the document untouched.

use crate::html::escape_text;
use crate::regions::RegionKind;
use serde::{Deserialize, Serialize};

/// In-memory overview form state for a story project.
///
/// Empty strings mean "not filled in yet"; the builder omits those lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOverview {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub sub_genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub sub_theme: String,
    #[serde(default)]
    pub central_conflict: String,
    #[serde(default)]
    pub plot_summary: String,
    #[serde(default)]
    pub plot_notes: String,
}

impl StoryOverview {
    /// Labeled field values in render order.
    fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("Story Title", &self.title),
            ("Project Type", &self.project_type),
            ("Runtime", &self.runtime),
            ("Genre", &self.genre),
            ("Sub-Genre", &self.sub_genre),
            ("Theme", &self.theme),
            ("Sub-Theme", &self.sub_theme),
            ("Central Conflict", &self.central_conflict),
            ("Plot Summary", &self.plot_summary),
            ("Plot Notes", &self.plot_notes),
        ]
    }
}

/// Renders the overview region, sentinels included.
pub fn render_overview_region(overview: &StoryOverview) -> String {
    let mut out = RegionKind::Overview.start_marker();
    out.push_str("<h2>Story Overview</h2>");
    for (label, value) in overview.fields() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        out.push_str(&format!("<p>{label} — {}</p>", escape_text(value)));
    }
    out.push_str(&RegionKind::Overview.end_marker());
    out
}
