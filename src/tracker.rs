use crate::model::RankedCollection;
use std::rc::Rc;

/// Tracks the originally loaded collection against the user's reordered one.
/// `current == None` means the ranking is untouched. Switching guides builds
/// a fresh tracker, so modifications never carry over between guides.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationTracker {
    original: Rc<RankedCollection>,
    current: Option<Rc<RankedCollection>>,
}

impl ModificationTracker {
    pub fn new(original: Rc<RankedCollection>) -> Self {
        Self {
            original,
            current: None,
        }
    }

    /// Store a reordered collection. Applying the original itself (same
    /// allocation) counts as a reset; structural comparison is not attempted.
    pub fn apply(&mut self, next: Rc<RankedCollection>) {
        if Rc::ptr_eq(&next, &self.original) {
            self.current = None;
        } else {
            self.current = Some(next);
        }
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    /// The collection the board renders. Never empty: falls back to the
    /// original whenever no modification is stored.
    pub fn effective(&self) -> &Rc<RankedCollection> {
        self.current.as_ref().unwrap_or(&self.original)
    }

    pub fn original(&self) -> &Rc<RankedCollection> {
        &self.original
    }

    pub fn is_dirty(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Tier};

    fn collection(title: &str) -> Rc<RankedCollection> {
        Rc::new(RankedCollection {
            title: title.to_string(),
            description: None,
            tiers: vec![Tier {
                label: "S".to_string(),
                name: "Top".to_string(),
                entries: vec![Entry {
                    id: "a".to_string(),
                    name: "A".to_string(),
                    explanation: None,
                }],
            }],
        })
    }

    #[test]
    fn clean_after_load() {
        let tracker = ModificationTracker::new(collection("guide"));
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.effective(), tracker.original());
    }

    #[test]
    fn dirty_after_apply() {
        let original = collection("guide");
        let mut tracker = ModificationTracker::new(original.clone());

        tracker.apply(collection("reordered"));

        assert!(tracker.is_dirty());
        assert_eq!(tracker.effective().title, "reordered");
        assert_eq!(tracker.original().title, "guide");
    }

    #[test]
    fn applying_the_original_allocation_is_a_reset() {
        let original = collection("guide");
        let mut tracker = ModificationTracker::new(original.clone());

        tracker.apply(collection("reordered"));
        tracker.apply(original);

        assert!(!tracker.is_dirty());
    }

    #[test]
    fn reset_is_idempotent() {
        let original = collection("guide");
        let mut tracker = ModificationTracker::new(original.clone());

        tracker.apply(collection("reordered"));
        tracker.reset();
        assert!(!tracker.is_dirty());
        assert!(Rc::ptr_eq(tracker.effective(), &original));

        tracker.reset();
        assert!(!tracker.is_dirty());
        assert!(Rc::ptr_eq(tracker.effective(), &original));
    }
}
