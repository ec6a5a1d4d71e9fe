use crate::model::{Entry, RankedCollection, Tier};
use gloo_net::http::Request;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideInfo {
    pub id: String,
    pub label: String,
}

#[derive(Debug)]
pub enum DataError {
    NotFound(String),
    Network(String),
    Parse(String),
}

impl DataError {
    fn network<E: fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    fn parse<E: fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Guide '{}' was not found", id),
            Self::Network(message) => write!(f, "Network error: {}", message),
            Self::Parse(message) => write!(f, "Could not read guide data: {}", message),
        }
    }
}

// Wire shape of one guide file. `explanation` and `entries` are optional in
// the source data; normalization fills the gaps once, at load time.
#[derive(Debug, Deserialize)]
struct RawGuide {
    title: String,
    #[serde(default)]
    description: Option<String>,
    tiers: Vec<RawTier>,
}

#[derive(Debug, Deserialize)]
struct RawTier {
    tier: String,
    tier_name: String,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    #[serde(default)]
    explanation: Option<String>,
}

pub async fn fetch_available_guides() -> Result<Vec<GuideInfo>, DataError> {
    let response = Request::get("assets/index.json")
        .send()
        .await
        .map_err(DataError::network)?;

    if !response.ok() {
        return Err(DataError::Network(format!(
            "HTTP {} while fetching guide index",
            response.status()
        )));
    }

    let text = response.text().await.map_err(DataError::network)?;
    let ids: Vec<String> = serde_json::from_str(&text).map_err(DataError::parse)?;

    let infos = ids
        .into_iter()
        .map(|id| GuideInfo {
            label: display_name(&id),
            id,
        })
        .collect();

    Ok(infos)
}

pub async fn load_guide(guide_id: &str) -> Result<RankedCollection, DataError> {
    let url = format!("assets/guides/{}.json", guide_id);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(DataError::network)?;

    if response.status() == 404 {
        return Err(DataError::NotFound(guide_id.to_owned()));
    }

    if !response.ok() {
        return Err(DataError::Network(format!(
            "HTTP {} while fetching {}",
            response.status(),
            url
        )));
    }

    let text = response.text().await.map_err(DataError::network)?;
    parse_guide(guide_id, &text)
}

/// Parse and normalize one guide file. Entry ids are slugs derived from the
/// display name, made unique across the whole collection so an id can never
/// name two entries.
fn parse_guide(guide_id: &str, text: &str) -> Result<RankedCollection, DataError> {
    let raw: RawGuide = serde_json::from_str(text).map_err(DataError::parse)?;

    if raw.tiers.is_empty() {
        return Err(DataError::Parse(format!(
            "Guide '{}' does not contain any tiers",
            guide_id
        )));
    }

    let mut seen = HashSet::new();
    let mut tiers = Vec::with_capacity(raw.tiers.len());

    for raw_tier in raw.tiers {
        let mut entries = Vec::with_capacity(raw_tier.entries.len());

        for (index, raw_entry) in raw_tier.entries.into_iter().enumerate() {
            let name = raw_entry.name.trim().to_string();
            if name.is_empty() {
                return Err(DataError::Parse(format!(
                    "Entry {} in tier '{}' of guide '{}' has an empty name",
                    index, raw_tier.tier, guide_id
                )));
            }

            let mut candidate = slugify(&name);
            if candidate.is_empty() {
                candidate = format!("entry-{}", index);
            }

            let id = ensure_unique_id(&mut seen, candidate);
            entries.push(Entry {
                id,
                name,
                explanation: raw_entry
                    .explanation
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty()),
            });
        }

        tiers.push(Tier {
            label: raw_tier.tier,
            name: raw_tier.tier_name,
            entries,
        });
    }

    Ok(RankedCollection {
        title: raw.title,
        description: raw.description,
        tiers,
    })
}

fn ensure_unique_id(seen: &mut HashSet<String>, base: String) -> String {
    if seen.insert(base.clone()) {
        return base;
    }

    let mut counter = 2;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

fn display_name(id: &str) -> String {
    id.split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn slugify(input: &str) -> String {
    let mut slug = String::new();

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || matches!(ch, '-' | '_') {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }

    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Green Axe"), "green-axe");
        assert_eq!(slugify("  Morningstar!!!  "), "morningstar");
    }

    #[test]
    fn display_name_basic() {
        assert_eq!(display_name("weapon-tiers"), "Weapon Tiers");
        assert_eq!(display_name("starter_picks"), "Starter Picks");
    }

    #[test]
    fn parses_the_wire_shape() {
        let text = r#"{
            "title": "Weapon guide",
            "description": "Ranked for season 4.",
            "tiers": [
                { "tier": "S", "tier_name": "Top picks", "entries": [
                    { "name": "Greatsword", "explanation": "Best reach." },
                    { "name": "Bow" }
                ] },
                { "tier": "A", "tier_name": "Strong", "entries": [] }
            ]
        }"#;

        let guide = parse_guide("weapon-tiers", text).unwrap();

        assert_eq!(guide.title, "Weapon guide");
        assert_eq!(guide.description.as_deref(), Some("Ranked for season 4."));
        assert_eq!(guide.tiers.len(), 2);

        let top = &guide.tiers[0];
        assert_eq!(top.label, "S");
        assert_eq!(top.entries[0].id, "greatsword");
        assert_eq!(top.entries[0].explanation.as_deref(), Some("Best reach."));
        assert_eq!(top.entries[1].id, "bow");
        assert_eq!(top.entries[1].explanation, None);

        assert!(guide.tiers[1].entries.is_empty());
        assert_eq!(guide.total_entries(), 2);
    }

    #[test]
    fn tolerates_missing_entries_field() {
        let text = r#"{
            "title": "Sparse",
            "tiers": [ { "tier": "S", "tier_name": "Top" } ]
        }"#;

        let guide = parse_guide("sparse", text).unwrap();
        assert_eq!(guide.total_entries(), 0);
    }

    #[test]
    fn duplicate_names_get_distinct_ids() {
        let text = r#"{
            "title": "Dupes",
            "tiers": [
                { "tier": "S", "tier_name": "Top", "entries": [ { "name": "Bow" } ] },
                { "tier": "A", "tier_name": "Strong", "entries": [ { "name": "Bow" } ] }
            ]
        }"#;

        let guide = parse_guide("dupes", text).unwrap();
        assert_eq!(guide.tiers[0].entries[0].id, "bow");
        assert_eq!(guide.tiers[1].entries[0].id, "bow-2");
    }

    #[test]
    fn rejects_empty_entry_names() {
        let text = r#"{
            "title": "Bad",
            "tiers": [ { "tier": "S", "tier_name": "Top", "entries": [ { "name": "   " } ] } ]
        }"#;

        assert!(matches!(parse_guide("bad", text), Err(DataError::Parse(_))));
    }

    #[test]
    fn rejects_guides_without_tiers() {
        let text = r#"{ "title": "Empty", "tiers": [] }"#;
        assert!(matches!(parse_guide("empty", text), Err(DataError::Parse(_))));
    }
}
