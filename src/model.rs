#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub label: String,
    pub name: String,
    pub entries: Vec<Entry>,
}

/// One complete tier-list guide. Reorder operations produce a new value;
/// the originally loaded collection is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCollection {
    pub title: String,
    pub description: Option<String>,
    pub tiers: Vec<Tier>,
}

impl RankedCollection {
    pub fn tier_position(&self, label: &str) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.label == label)
    }

    pub fn tier(&self, label: &str) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.label == label)
    }

    pub fn total_entries(&self) -> usize {
        self.tiers.iter().map(|tier| tier.entries.len()).sum()
    }
}
