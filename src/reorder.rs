use crate::model::{Entry, RankedCollection};

/// Ephemeral state for one drag gesture. Created on drag-start, discarded on
/// drop, drag-end, or cancel. The pointer model only ever allows one active
/// gesture, so at most one session exists at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub entry: Entry,
    pub source_tier: String,
    pub source_index: usize,
}

impl DragSession {
    pub fn new(entry: Entry, source_tier: impl Into<String>, source_index: usize) -> Self {
        Self {
            entry,
            source_tier: source_tier.into(),
            source_index,
        }
    }
}

/// A tier is a valid drop target iff it is not the tier the drag started in.
/// Dropping back on the source tier is a rejected no-op.
pub fn is_valid_target(session: &DragSession, target_label: &str) -> bool {
    session.source_tier != target_label
}

/// Move the session's entry to the end of the target tier, returning a new
/// collection. The input collection is never mutated.
///
/// Returns `None` when the move is rejected: same-tier drop, unknown source
/// or target label, or a stale session (index out of bounds, or the entry at
/// `source_index` is no longer the one the session captured). Rejection
/// leaves the caller holding the unchanged collection.
///
/// Removal is by index, not by searching for the entry id, so two entries
/// with identical names can never cause the wrong one to be removed.
pub fn move_entry(
    collection: &RankedCollection,
    session: &DragSession,
    target_label: &str,
) -> Option<RankedCollection> {
    if !is_valid_target(session, target_label) {
        return None;
    }

    let source_pos = collection.tier_position(&session.source_tier)?;
    let target_pos = collection.tier_position(target_label)?;

    let staged = collection.tiers[source_pos]
        .entries
        .get(session.source_index)?;
    if staged.id != session.entry.id {
        return None;
    }

    let mut tiers = collection.tiers.clone();
    let moved = tiers[source_pos].entries.remove(session.source_index);
    tiers[target_pos].entries.push(moved);

    Some(RankedCollection {
        title: collection.title.clone(),
        description: collection.description.clone(),
        tiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;

    fn entry(id: &str) -> Entry {
        Entry {
            id: id.to_string(),
            name: id.to_uppercase(),
            explanation: None,
        }
    }

    fn collection() -> RankedCollection {
        RankedCollection {
            title: "Test guide".to_string(),
            description: None,
            tiers: vec![
                Tier {
                    label: "S".to_string(),
                    name: "Top".to_string(),
                    entries: vec![entry("a"), entry("b")],
                },
                Tier {
                    label: "A".to_string(),
                    name: "Strong".to_string(),
                    entries: vec![entry("c")],
                },
            ],
        }
    }

    fn session_for(collection: &RankedCollection, tier: &str, index: usize) -> DragSession {
        let entry = collection.tier(tier).unwrap().entries[index].clone();
        DragSession::new(entry, tier, index)
    }

    #[test]
    fn moves_entry_to_end_of_target_tier() {
        let before = collection();
        let session = session_for(&before, "S", 1);

        let after = move_entry(&before, &session, "A").unwrap();

        let ids = |tier: &str| -> Vec<&str> {
            after
                .tier(tier)
                .unwrap()
                .entries
                .iter()
                .map(|e| e.id.as_str())
                .collect()
        };
        assert_eq!(ids("S"), vec!["a"]);
        assert_eq!(ids("A"), vec!["c", "b"]);
        assert_eq!(after.total_entries(), before.total_entries());
    }

    #[test]
    fn conserves_total_entry_count() {
        let before = collection();
        for (tier, index) in [("S", 0), ("S", 1), ("A", 0)] {
            let session = session_for(&before, tier, index);
            for target in ["S", "A"] {
                if let Some(after) = move_entry(&before, &session, target) {
                    assert_eq!(after.total_entries(), before.total_entries());
                }
            }
        }
    }

    #[test]
    fn moved_entry_appears_exactly_once() {
        let before = collection();
        let session = session_for(&before, "S", 1);

        let after = move_entry(&before, &session, "A").unwrap();

        let occurrences: usize = after
            .tiers
            .iter()
            .flat_map(|tier| tier.entries.iter())
            .filter(|e| e.id == "b")
            .count();
        assert_eq!(occurrences, 1);
        assert!(after.tier("S").unwrap().entries.iter().all(|e| e.id != "b"));
    }

    #[test]
    fn rejects_same_tier_drop() {
        let before = collection();
        let session = session_for(&before, "S", 1);

        assert!(!is_valid_target(&session, "S"));
        assert!(move_entry(&before, &session, "S").is_none());
    }

    #[test]
    fn rejects_unknown_tiers() {
        let before = collection();
        let session = session_for(&before, "S", 0);

        assert!(move_entry(&before, &session, "Z").is_none());

        let orphan = DragSession::new(entry("a"), "Z", 0);
        assert!(move_entry(&before, &orphan, "A").is_none());
    }

    #[test]
    fn rejects_stale_index() {
        let before = collection();
        let session = DragSession::new(entry("b"), "S", 5);

        assert!(move_entry(&before, &session, "A").is_none());
    }

    #[test]
    fn rejects_session_whose_entry_moved_away() {
        let before = collection();
        // Session claims index 1 of S holds "c", but it holds "b".
        let session = DragSession::new(entry("c"), "S", 1);

        assert!(move_entry(&before, &session, "A").is_none());
    }

    #[test]
    fn does_not_mutate_the_input() {
        let before = collection();
        let snapshot = before.clone();
        let session = session_for(&before, "S", 1);

        let _ = move_entry(&before, &session, "A");

        assert_eq!(before, snapshot);
    }

    #[test]
    fn untouched_tiers_keep_their_contents() {
        let mut before = collection();
        before.tiers.push(Tier {
            label: "B".to_string(),
            name: "Fine".to_string(),
            entries: vec![entry("d")],
        });
        let session = session_for(&before, "S", 0);

        let after = move_entry(&before, &session, "A").unwrap();

        assert_eq!(after.tier("B").unwrap().entries, before.tier("B").unwrap().entries);
    }
}
