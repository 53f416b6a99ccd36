//! # StoryXcel Core
//!
//! Domain logic for the StoryXcel project-management and creative-writing
//! tool.
//!
//! The centrepiece is the document region engine: the story editor's
//! rich-text value contains two programmatically owned, marker-delimited
//! regions (the project overview and the conflict "story beats"), and this
//! crate builds, locates and splices those regions while preserving every
//! byte the author wrote outside them. Around it sit the conflict-archetype
//! beat table, content fingerprinting for edit detection, the editor session
//! with its debounced overview writes, and file-backed repositories for
//! projects, friends, assets and external-tool integrations.
//!
//! **No API concerns**: HTTP serving and DTOs belong in `api-rest`; terminal
//! interaction belongs in `cli`.

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod html;
pub mod ids;
pub mod regions;
pub mod repositories;
pub mod sync;
pub mod validation;

pub use config::CoreConfig;
pub use document::StoryDocument;
pub use error::{StoryError, StoryResult};
pub use fingerprint::Fingerprint;
pub use ids::RecordId;
pub use regions::beats::{canonical_beats_text, render_beats_region, BeatSheet, ConflictArchetype};
pub use regions::overview::{render_overview_region, StoryOverview};
pub use regions::RegionKind;
pub use sync::{
    BeatsOutcome, ConfirmOverwrite, EditorSession, OverviewDebouncer, OverwritePrompt,
    Preconfirmed,
};
