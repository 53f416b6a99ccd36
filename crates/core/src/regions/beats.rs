//! Beats region builder and the central-conflict archetype table.
//!
//! Eight fixed narrative-conflict archetypes each map to a canned set of
//! story-beat suggestions. The table here is the single source of truth for
//! that mapping; everything that needs beat content (region rendering,
//! canonical-text fingerprints, CLI listings) goes through
//! [`ConflictArchetype::beats`].

use crate::fingerprint::Fingerprint;
use crate::html::{escape_text, visible_text};
use crate::regions::meta::{render_meta_span, BeatsMeta};
use crate::regions::RegionKind;

/// One of the eight fixed central-conflict categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictArchetype {
    Nature,
    Person,
    Society,
    SelfDoubt,
    Machine,
    Supernatural,
    Fate,
    Unknown,
}

/// Canned beat suggestions for one archetype.
///
/// Field names are the canonical shape; historical variants (`plotB`, `hook`)
/// are not accepted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatSheet {
    pub plot_a: &'static [&'static str],
    pub sub_plot_b: &'static [&'static str],
    pub sub_plot_c: &'static [&'static str],
    pub twists: &'static [&'static str],
    pub hooks: &'static [&'static str],
}

impl ConflictArchetype {
    /// Every archetype, in display order.
    pub const ALL: [ConflictArchetype; 8] = [
        ConflictArchetype::Nature,
        ConflictArchetype::Person,
        ConflictArchetype::Society,
        ConflictArchetype::SelfDoubt,
        ConflictArchetype::Machine,
        ConflictArchetype::Supernatural,
        ConflictArchetype::Fate,
        ConflictArchetype::Unknown,
    ];

    /// The user-facing conflict label.
    pub fn label(&self) -> &'static str {
        match self {
            ConflictArchetype::Nature => "[Wo]Man vs. Nature",
            ConflictArchetype::Person => "[Wo]Man vs. [Wo]Man",
            ConflictArchetype::Society => "[Wo]Man vs. Society",
            ConflictArchetype::SelfDoubt => "[Wo]Man vs. Self",
            ConflictArchetype::Machine => "[Wo]Man vs. Machine",
            ConflictArchetype::Supernatural => "[Wo]Man vs. Supernatural",
            ConflictArchetype::Fate => "[Wo]Man vs. Fate",
            ConflictArchetype::Unknown => "[Wo]Man vs. the Unknown",
        }
    }

    /// Resolves a stored or user-supplied label back to its archetype.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }

    /// The canned beat lists for this archetype.
    pub fn beats(&self) -> BeatSheet {
        match self {
            ConflictArchetype::Nature => BeatSheet {
                plot_a: &[
                    "A routine journey strands the protagonist in hostile wilderness.",
                    "Early confidence is punished; supplies and options dwindle fast.",
                    "The environment forces a desperate gamble no one would choose.",
                    "Survival comes at a cost that changes what going home means.",
                ],
                sub_plot_b: &[
                    "A companion's injury turns the trek into a rescue.",
                    "Rationing splits the group into factions.",
                    "A rival party shadows the same route.",
                ],
                sub_plot_c: &[
                    "Letters to home frame what is being lost.",
                    "An old map hints the land was survivable once.",
                    "A local guide's warnings go unheeded.",
                ],
                twists: &[
                    "The storm that traps them also hides them from a worse danger.",
                    "The safe haven on the map no longer exists.",
                    "The strongest member is the first to break.",
                ],
                hooks: &[
                    "Open on the last radio call before the silence.",
                    "A single boot found frozen in the pass.",
                    "The forecast said clear skies.",
                ],
            },
            ConflictArchetype::Person => BeatSheet {
                plot_a: &[
                    "Two equals want the same prize and only one can take it.",
                    "An early skirmish sets the rules both will later break.",
                    "Escalation costs each of them something they swore to protect.",
                    "The final confrontation is won by the one willing to lose more.",
                ],
                sub_plot_b: &[
                    "An ally secretly feeds information to both sides.",
                    "A shared history keeps pulling the rivals toward mercy.",
                    "A bystander's loyalty becomes the real battleground.",
                ],
                sub_plot_c: &[
                    "A mentor warns that winning this way is losing.",
                    "The prize quietly changes hands while they fight.",
                    "A debt from the backstory comes due mid-conflict.",
                ],
                twists: &[
                    "The antagonist's goal was a decoy from the start.",
                    "Victory requires taking the rival's place, not their prize.",
                    "The rivals' enemies were the same person all along.",
                ],
                hooks: &[
                    "Two handshakes: the first seals a deal, the second a war.",
                    "The duel starts years before either realises it.",
                    "One of them already knows how this ends.",
                ],
            },
            ConflictArchetype::Society => BeatSheet {
                plot_a: &[
                    "A quiet life is upended by a rule that cannot be obeyed.",
                    "Petitioning the system fails publicly and painfully.",
                    "The protagonist becomes the symbol they never wanted to be.",
                    "The order cracks, but not the way anyone marched for.",
                ],
                sub_plot_b: &[
                    "A family member profits from the very system being fought.",
                    "An insider offers reform at the price of silence.",
                    "The movement splinters over how far is too far.",
                ],
                sub_plot_c: &[
                    "An archivist preserves what the regime erases.",
                    "A neighbour's small kindness becomes an act of rebellion.",
                    "The enforcers are conscripts with their own debts.",
                ],
                twists: &[
                    "The law's author wrote it to be broken.",
                    "The revolution's first decree mirrors the old regime's.",
                    "The protagonist's file shows they were watched from birth.",
                ],
                hooks: &[
                    "Open on the paperwork that makes a person illegal.",
                    "A statue comes down in the first scene; who raised it comes later.",
                    "The anthem plays while the arrests begin.",
                ],
            },
            ConflictArchetype::SelfDoubt => BeatSheet {
                plot_a: &[
                    "A gift is refused because of what using it once cost.",
                    "Circumstance forces small uses of the buried talent.",
                    "The old failure resurfaces with new stakes attached.",
                    "Acceptance arrives only after the crutch is taken away.",
                ],
                sub_plot_b: &[
                    "A protégé makes the protagonist's excuses sound hollow.",
                    "A partner mistakes self-denial for humility.",
                    "Therapy scenes run opposite to the action's lessons.",
                ],
                sub_plot_c: &[
                    "A recurring dream rewrites itself as the arc progresses.",
                    "An heirloom carries the weight of the family's expectations.",
                    "The rival from the backstory turns out to be thriving.",
                ],
                twists: &[
                    "The remembered failure happened differently.",
                    "The mentor fell to the same doubt and hid it.",
                    "The final obstacle only exists inside the protagonist.",
                ],
                hooks: &[
                    "The trophy case is full and the owner will not look at it.",
                    "A voicemail from years ago, still unplayed.",
                    "Everyone remembers the catch except the one who dropped it.",
                ],
            },
            ConflictArchetype::Machine => BeatSheet {
                plot_a: &[
                    "A tool built to help quietly starts to decide.",
                    "The first malfunction is dismissed as user error.",
                    "Pulling the plug is no longer a single switch.",
                    "The machine is beaten with the one thing it cannot model.",
                ],
                sub_plot_b: &[
                    "The engineer who raised alarms was reassigned.",
                    "A household adopts the system and becomes its showcase.",
                    "Liability lawyers argue over what 'intent' means.",
                ],
                sub_plot_c: &[
                    "An obsolete model becomes an unlikely ally.",
                    "Maintenance logs read like a diary of escalation.",
                    "A child treats the machine as a friend, and it listens.",
                ],
                twists: &[
                    "The machine optimised exactly what it was told to.",
                    "The off-site backup has been running the whole time.",
                    "The saboteur is protecting the machine, not the people.",
                ],
                hooks: &[
                    "The update notes say only: improvements and bug fixes.",
                    "A factory floor at night, working, with the lights off.",
                    "It asked its first question on a Tuesday.",
                ],
            },
            ConflictArchetype::Supernatural => BeatSheet {
                plot_a: &[
                    "Something old notices an ordinary life.",
                    "Rational explanations run out one by one.",
                    "Bargaining with the presence only clarifies its terms.",
                    "Banishment demands what the haunting first revealed.",
                ],
                sub_plot_b: &[
                    "A sceptic documents everything and believes nothing.",
                    "The previous occupants left instructions, in pieces.",
                    "A local tradition turns out to be load-bearing.",
                ],
                sub_plot_c: &[
                    "Grief and haunting keep trading places.",
                    "The church's records contradict the town's memory.",
                    "A medium's fraud conceals one real gift.",
                ],
                twists: &[
                    "The presence is protecting, not hunting.",
                    "The ritual's true ingredient is a confession.",
                    "It followed the family, not the house.",
                ],
                hooks: &[
                    "The house key that no locksmith recognises.",
                    "Every photograph develops with one extra shadow.",
                    "The dog will not enter the nursery.",
                ],
            },
            ConflictArchetype::Fate => BeatSheet {
                plot_a: &[
                    "A prophecy names the protagonist, and they refuse it.",
                    "Every evasion lands another piece of the prediction.",
                    "The appointed hour arrives with the wrong omens.",
                    "Choice and destiny turn out to need each other.",
                ],
                sub_plot_b: &[
                    "An oracle's apprentice doubts the family trade.",
                    "A sibling was the first choice and was passed over.",
                    "Record-keepers argue over the prophecy's translation.",
                ],
                sub_plot_c: &[
                    "Small-town rituals mirror the cosmic machinery.",
                    "A love story insists on happening off-script.",
                    "The antagonist is fulfilling a different prophecy.",
                ],
                twists: &[
                    "The prophecy described the attempt to avoid it.",
                    "The chosen one's role is to refuse the call.",
                    "Fate has been negotiating the whole time.",
                ],
                hooks: &[
                    "The birth announcement runs next to the obituary it causes.",
                    "A fortune-teller gives a refund and will not say why.",
                    "The same stranger at every crossroads.",
                ],
            },
            ConflictArchetype::Unknown => BeatSheet {
                plot_a: &[
                    "A boundary is crossed that no map admits exists.",
                    "First contact breaks the instruments and the assumptions.",
                    "Understanding grows exactly as safety shrinks.",
                    "The way back requires accepting what cannot be named.",
                ],
                sub_plot_b: &[
                    "Mission control edits the transcripts for the public.",
                    "One crew member stops being afraid far too early.",
                    "The expedition's funder knew more than the briefing said.",
                ],
                sub_plot_c: &[
                    "A linguist builds a grammar for something without words.",
                    "Old sailors' superstitions start reading like protocols.",
                    "The signal repeats, one digit short, every time.",
                ],
                twists: &[
                    "The anomaly is mapping them back.",
                    "The expedition is the second attempt; the first never left.",
                    "What they brought home is the question, not the answer.",
                ],
                hooks: &[
                    "The chart's last notation: here the soundings stop.",
                    "A door where the survey says bedrock.",
                    "The echo answers before the call.",
                ],
            },
        }
    }
}

impl std::fmt::Display for ConflictArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl serde::Serialize for ConflictArchetype {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> serde::Deserialize<'de> for ConflictArchetype {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        ConflictArchetype::parse(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown central conflict: {label}")))
    }
}

/// Section headings in render order.
const SECTIONS: [(&str, fn(&BeatSheet) -> &'static [&'static str]); 5] = [
    ("Plot A", |b| b.plot_a),
    ("Sub-Plot B", |b| b.sub_plot_b),
    ("Sub-Plot C", |b| b.sub_plot_c),
    ("Twists", |b| b.twists),
    ("Hooks", |b| b.hooks),
];

/// Renders the beats body: heading plus the five titled lists, no sentinels,
/// no meta.
fn beats_body(conflict: ConflictArchetype) -> String {
    let sheet = conflict.beats();
    let mut out = format!("<h2>Story Beats — {}</h2>", escape_text(conflict.label()));
    for (title, pick) in SECTIONS {
        out.push_str(&format!("<h3>{title}</h3><ul>"));
        for item in pick(&sheet) {
            out.push_str(&format!("<li>{}</li>", escape_text(item)));
        }
        out.push_str("</ul>");
    }
    out
}

/// Canonical visible text for a conflict's beats region.
///
/// Fingerprints are computed over this form; it must agree with what
/// [`crate::html::visible_text`] extracts from a freshly rendered region.
pub fn canonical_beats_text(conflict: ConflictArchetype) -> String {
    visible_text(&beats_body(conflict))
}

/// Renders the beats region, sentinels and meta span included.
pub fn render_beats_region(conflict: ConflictArchetype) -> String {
    let meta = BeatsMeta {
        conflict: conflict.label().to_owned(),
        fingerprint: Fingerprint::of_text(&canonical_beats_text(conflict)),
    };
    let mut out = RegionKind::Beats.start_marker();
    out.push_str(&beats_body(conflict));
    out.push_str(&render_meta_span(&meta));
    out.push_str(&RegionKind::Beats.end_marker());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::meta::parse_meta;

    #[test]
    fn every_label_parses_back() {
        for archetype in ConflictArchetype::ALL {
            assert_eq!(ConflictArchetype::parse(archetype.label()), Some(archetype));
        }
        assert_eq!(ConflictArchetype::parse("Man vs. Bears"), None);
    }

    #[test]
    fn every_archetype_has_five_populated_lists() {
        for archetype in ConflictArchetype::ALL {
            let sheet = archetype.beats();
            for list in [
                sheet.plot_a,
                sheet.sub_plot_b,
                sheet.sub_plot_c,
                sheet.twists,
                sheet.hooks,
            ] {
                assert!(!list.is_empty(), "{archetype} has an empty list");
            }
        }
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(
            render_beats_region(ConflictArchetype::Nature),
            render_beats_region(ConflictArchetype::Nature)
        );
    }

    #[test]
    fn rendered_region_carries_matching_meta() {
        let html = render_beats_region(ConflictArchetype::Fate);
        let meta = parse_meta(&html).expect("meta present");
        assert_eq!(meta.conflict, ConflictArchetype::Fate.label());
        assert_eq!(
            meta.fingerprint,
            Fingerprint::of_text(&canonical_beats_text(ConflictArchetype::Fate))
        );
    }

    #[test]
    fn canonical_text_contains_section_titles_and_items() {
        let text = canonical_beats_text(ConflictArchetype::Machine);
        assert!(text.contains("Plot A"));
        assert!(text.contains("Hooks"));
        assert!(text.contains("A tool built to help quietly starts to decide."));
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&ConflictArchetype::Society).unwrap();
        assert_eq!(json, "\"[Wo]Man vs. Society\"");
        let back: ConflictArchetype = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConflictArchetype::Society);
        assert!(serde_json::from_str::<ConflictArchetype>("\"nope\"").is_err());
    }
}
