//! Editor-session synchronisation: region writes, edit detection, debounce.
//!
//! One [`EditorSession`] owns one document; there is exactly one writer. The
//! overview region is rewritten on every (debounced) form change. The beats
//! region is written once per conflict selection and only overwritten after
//! an explicit confirmation whenever the fingerprint check cannot prove the
//! region is still the untouched canonical content for the requested label.
//!
//! Confirmation is injected as an async trait object so the same session
//! logic serves an interactive prompt, a pre-answered REST request, or a
//! test double. Awaiting the confirmer is the only suspension point; no
//! other region mutation happens while a decision is pending.

use crate::constants::OVERVIEW_DEBOUNCE;
use crate::document::StoryDocument;
use crate::fingerprint::Fingerprint;
use crate::html::visible_text;
use crate::regions::beats::{canonical_beats_text, render_beats_region, ConflictArchetype};
use crate::regions::meta::{parse_meta, strip_meta_spans};
use crate::regions::overview::{render_overview_region, StoryOverview};
use crate::regions::RegionKind;
use crate::{StoryError, StoryResult};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of a conflict selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatsOutcome {
    /// The region already holds the untouched canonical content for this
    /// label; nothing was written.
    Unchanged,
    /// The region was written (or seeded) with the requested label's content.
    Updated,
    /// The user declined the overwrite; the document is untouched.
    Declined,
}

/// Context handed to the confirmation callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverwritePrompt {
    /// Label recorded in the region's meta payload, if it was readable.
    pub stored_label: Option<String>,
    /// The newly selected conflict.
    pub requested: ConflictArchetype,
    /// True when the region's text no longer matches the canonical content
    /// for its stored label (or the meta was unreadable).
    pub edited: bool,
}

/// Asks the user whether a beats region may be overwritten.
#[async_trait::async_trait]
pub trait ConfirmOverwrite: Send + Sync {
    async fn confirm_overwrite(&self, prompt: &OverwritePrompt) -> bool;
}

/// A confirmation decision made ahead of time.
///
/// Used by the REST layer (the client resubmits with `confirm: true`) and by
/// tests.
pub struct Preconfirmed(pub bool);

#[async_trait::async_trait]
impl ConfirmOverwrite for Preconfirmed {
    async fn confirm_overwrite(&self, _prompt: &OverwritePrompt) -> bool {
        self.0
    }
}

/// Single-writer editing session over one story document.
#[derive(Debug, Clone)]
pub struct EditorSession {
    document: StoryDocument,
}

impl EditorSession {
    pub fn new(document: StoryDocument) -> Self {
        Self { document }
    }

    /// Starts a session on a freshly seeded document.
    pub fn seeded() -> Self {
        Self::new(StoryDocument::seeded())
    }

    pub fn document(&self) -> &StoryDocument {
        &self.document
    }

    pub fn into_document(self) -> StoryDocument {
        self.document
    }

    /// Rewrites the overview region from the current form state.
    pub fn apply_overview(&mut self, overview: &StoryOverview) {
        self.document
            .upsert_region(RegionKind::Overview, &render_overview_region(overview));
    }

    /// Applies a central-conflict selection to the beats region.
    ///
    /// A well-formed region whose visible text still matches the canonical
    /// content for its stored label, with that label equal to the new
    /// selection, is left untouched without consulting the confirmer. Every
    /// other present-region case (edited text, changed label, unreadable
    /// meta) goes to the confirmer; declining drops the update. An absent or
    /// malformed region is written without confirmation since there is
    /// nothing trustworthy to protect.
    pub async fn select_conflict(
        &mut self,
        conflict: ConflictArchetype,
        confirmer: &dyn ConfirmOverwrite,
    ) -> BeatsOutcome {
        let region_html = render_beats_region(conflict);

        let inner = match self.document.region_inner(RegionKind::Beats) {
            Some(inner) => inner,
            None => {
                self.document.upsert_region(RegionKind::Beats, &region_html);
                return BeatsOutcome::Updated;
            }
        };

        let meta = parse_meta(inner);
        let stored = meta
            .as_ref()
            .and_then(|m| ConflictArchetype::parse(&m.conflict));
        let clean = match stored {
            Some(stored) => {
                let current = visible_text(&strip_meta_spans(inner));
                Fingerprint::of_text(&current)
                    == Fingerprint::of_text(&canonical_beats_text(stored))
            }
            None => false,
        };

        if clean && stored == Some(conflict) {
            return BeatsOutcome::Unchanged;
        }

        let prompt = OverwritePrompt {
            stored_label: meta.map(|m| m.conflict),
            requested: conflict,
            edited: !clean,
        };
        if !confirmer.confirm_overwrite(&prompt).await {
            tracing::debug!(conflict = %conflict, "beats overwrite declined");
            return BeatsOutcome::Declined;
        }

        self.document.upsert_region(RegionKind::Beats, &region_html);
        BeatsOutcome::Updated
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Coalesces overview form edits before they reach the document.
///
/// Field edits arrive on every keystroke; rewriting the rich-text value each
/// time makes the editor stutter. The debouncer applies only the latest state
/// once input has been quiet for the configured delay. Closing the handle
/// flushes any pending update.
pub struct OverviewDebouncer {
    tx: mpsc::UnboundedSender<StoryOverview>,
    worker: JoinHandle<()>,
}

impl OverviewDebouncer {
    /// Spawns a debouncer with the default ~250ms delay.
    pub fn spawn<F>(apply: F) -> Self
    where
        F: FnMut(StoryOverview) + Send + 'static,
    {
        Self::spawn_with_delay(OVERVIEW_DEBOUNCE, apply)
    }

    /// Spawns a debouncer with an explicit delay.
    pub fn spawn_with_delay<F>(delay: Duration, mut apply: F) -> Self
    where
        F: FnMut(StoryOverview) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoryOverview>();
        let worker = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match tokio::time::timeout(delay, rx.recv()).await {
                        // Newer state within the window: keep coalescing.
                        Ok(Some(next)) => latest = next,
                        // Sender dropped: flush and stop.
                        Ok(None) => {
                            apply(latest);
                            return;
                        }
                        // Quiet for a full window: apply.
                        Err(_) => break,
                    }
                }
                apply(latest);
            }
        });
        Self { tx, worker }
    }

    /// Queues a new overview state.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::SessionClosed`] if the worker is gone.
    pub fn update(&self, overview: StoryOverview) -> StoryResult<()> {
        self.tx
            .send(overview)
            .map_err(|_| StoryError::SessionClosed)
    }

    /// Flushes any pending update and waits for the worker to finish.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct CountingConfirmer {
        asked: AtomicUsize,
        answer: bool,
    }

    impl CountingConfirmer {
        fn new(answer: bool) -> Self {
            Self {
                asked: AtomicUsize::new(0),
                answer,
            }
        }

        fn times_asked(&self) -> usize {
            self.asked.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ConfirmOverwrite for CountingConfirmer {
        async fn confirm_overwrite(&self, _prompt: &OverwritePrompt) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    #[tokio::test]
    async fn first_selection_writes_without_confirmation() {
        let mut session = EditorSession::seeded();
        let confirmer = CountingConfirmer::new(false);
        let outcome = session
            .select_conflict(ConflictArchetype::Nature, &confirmer)
            .await;
        assert_eq!(outcome, BeatsOutcome::Updated);
        assert_eq!(confirmer.times_asked(), 0);
        assert!(session.document().html().contains("Story Beats — [Wo]Man vs. Nature"));
    }

    #[tokio::test]
    async fn reselecting_same_label_unedited_is_a_silent_no_op() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;
        let before = session.document().html().to_owned();

        let confirmer = CountingConfirmer::new(false);
        let outcome = session
            .select_conflict(ConflictArchetype::Nature, &confirmer)
            .await;
        assert_eq!(outcome, BeatsOutcome::Unchanged);
        assert_eq!(confirmer.times_asked(), 0);
        assert_eq!(session.document().html(), before);
    }

    #[tokio::test]
    async fn label_change_requires_confirmation_even_when_unedited() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;

        let confirmer = CountingConfirmer::new(true);
        let outcome = session
            .select_conflict(ConflictArchetype::Fate, &confirmer)
            .await;
        assert_eq!(outcome, BeatsOutcome::Updated);
        assert_eq!(confirmer.times_asked(), 1);
        assert!(session.document().html().contains("[Wo]Man vs. Fate"));
    }

    #[tokio::test]
    async fn declined_overwrite_leaves_edited_document_byte_identical() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;

        // Hand-edit a beat inside the region.
        let edited = session
            .document()
            .html()
            .replace("A routine journey", "A doomed journey");
        let mut session = EditorSession::new(StoryDocument::new(edited.clone()));

        let outcome = session
            .select_conflict(ConflictArchetype::Fate, &Preconfirmed(false))
            .await;
        assert_eq!(outcome, BeatsOutcome::Declined);
        assert_eq!(session.document().html(), edited);
    }

    #[tokio::test]
    async fn accepted_overwrite_installs_new_canonical_content() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;
        let edited = session
            .document()
            .html()
            .replace("A routine journey", "A doomed journey");
        let mut session = EditorSession::new(StoryDocument::new(edited));

        let outcome = session
            .select_conflict(ConflictArchetype::Fate, &Preconfirmed(true))
            .await;
        assert_eq!(outcome, BeatsOutcome::Updated);
        let html = session.document().html();
        assert!(html.contains("Story Beats — [Wo]Man vs. Fate"));
        assert!(!html.contains("A doomed journey"));
    }

    #[tokio::test]
    async fn same_label_with_edits_prompts_before_restoring() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;
        let pristine = session.document().html().to_owned();
        let edited = pristine.replace("A routine journey", "A doomed journey");
        let mut session = EditorSession::new(StoryDocument::new(edited));

        let confirmer = CountingConfirmer::new(true);
        let outcome = session
            .select_conflict(ConflictArchetype::Nature, &confirmer)
            .await;
        assert_eq!(outcome, BeatsOutcome::Updated);
        assert_eq!(confirmer.times_asked(), 1);
        assert_eq!(session.document().html(), pristine);
    }

    #[tokio::test]
    async fn missing_meta_counts_as_edited() {
        let mut session = EditorSession::seeded();
        session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(true))
            .await;
        // Strip the meta payload out of the region.
        let html = session.document().html().to_owned();
        let mangled = strip_meta_spans(&html);
        let mut session = EditorSession::new(StoryDocument::new(mangled.clone()));

        let outcome = session
            .select_conflict(ConflictArchetype::Nature, &Preconfirmed(false))
            .await;
        assert_eq!(outcome, BeatsOutcome::Declined);
        assert_eq!(session.document().html(), mangled);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_coalesces_a_burst_into_one_application() {
        let applied: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = applied.clone();
        let debouncer = OverviewDebouncer::spawn_with_delay(
            Duration::from_millis(250),
            move |overview| sink.lock().unwrap().push(overview.title),
        );

        for title in ["G", "Gu", "Gun", "Gun Smoke"] {
            debouncer
                .update(StoryOverview {
                    title: title.into(),
                    ..StoryOverview::default()
                })
                .unwrap();
            tokio::time::advance(Duration::from_millis(50)).await;
        }
        tokio::time::advance(Duration::from_millis(300)).await;
        // Let the worker run after the clock advances.
        tokio::task::yield_now().await;

        assert_eq!(applied.lock().unwrap().as_slice(), ["Gun Smoke"]);
        debouncer.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_flushes_pending_update_on_close() {
        let applied: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = applied.clone();
        let debouncer = OverviewDebouncer::spawn_with_delay(
            Duration::from_millis(250),
            move |overview| sink.lock().unwrap().push(overview.title),
        );
        debouncer
            .update(StoryOverview {
                title: "Last Call".into(),
                ..StoryOverview::default()
            })
            .unwrap();
        debouncer.close().await;
        assert_eq!(applied.lock().unwrap().as_slice(), ["Last Call"]);
    }
}
