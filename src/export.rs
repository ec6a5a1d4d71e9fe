use crate::model::RankedCollection;
use log::warn;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
    PlainText,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Markdown,
        ExportFormat::PlainText,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Csv => "CSV",
            Self::Markdown => "Markdown",
            Self::PlainText => "Text",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Json => "tier-list.json",
            Self::Csv => "tier-list.csv",
            Self::Markdown => "tier-list.md",
            Self::PlainText => "tier-list.txt",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Markdown => "text/markdown",
            Self::PlainText => "text/plain",
        }
    }
}

/// Serialize the effective collection in the requested format. Pure string
/// building; callers decide whether the result goes to a file or the
/// clipboard.
pub fn render(collection: &RankedCollection, format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => to_json(collection),
        ExportFormat::Csv => to_csv(collection),
        ExportFormat::Markdown => to_markdown(collection),
        ExportFormat::PlainText => to_plain_text(collection),
    }
}

// JSON output mirrors the wire shape guides are loaded from, so an exported
// ranking is itself a loadable guide.
#[derive(Serialize)]
struct OutGuide<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    tiers: Vec<OutTier<'a>>,
}

#[derive(Serialize)]
struct OutTier<'a> {
    tier: &'a str,
    tier_name: &'a str,
    entries: Vec<OutEntry<'a>>,
}

#[derive(Serialize)]
struct OutEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<&'a str>,
}

fn to_json(collection: &RankedCollection) -> String {
    let out = OutGuide {
        title: &collection.title,
        description: collection.description.as_deref(),
        tiers: collection
            .tiers
            .iter()
            .map(|tier| OutTier {
                tier: &tier.label,
                tier_name: &tier.name,
                entries: tier
                    .entries
                    .iter()
                    .map(|entry| OutEntry {
                        name: &entry.name,
                        explanation: entry.explanation.as_deref(),
                    })
                    .collect(),
            })
            .collect(),
    };

    // Serialization of plain strings and vectors cannot fail.
    serde_json::to_string_pretty(&out).unwrap_or_default()
}

fn to_csv(collection: &RankedCollection) -> String {
    let mut out = String::from("tier,tier_name,entry,explanation\n");
    for tier in &collection.tiers {
        for entry in &tier.entries {
            out.push_str(&csv_field(&tier.label));
            out.push(',');
            out.push_str(&csv_field(&tier.name));
            out.push(',');
            out.push_str(&csv_field(&entry.name));
            out.push(',');
            out.push_str(&csv_field(entry.explanation.as_deref().unwrap_or("")));
            out.push('\n');
        }
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_markdown(collection: &RankedCollection) -> String {
    let mut out = format!("# {}\n", collection.title);
    if let Some(description) = &collection.description {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }

    for tier in &collection.tiers {
        out.push_str(&format!("\n## {}: {}\n\n", tier.label, tier.name));
        if tier.entries.is_empty() {
            out.push_str("*(empty)*\n");
            continue;
        }
        for entry in &tier.entries {
            match &entry.explanation {
                Some(explanation) => {
                    out.push_str(&format!("- **{}**: {}\n", entry.name, explanation))
                }
                None => out.push_str(&format!("- **{}**\n", entry.name)),
            }
        }
    }

    out
}

fn to_plain_text(collection: &RankedCollection) -> String {
    let mut out = format!("{}\n", collection.title);
    if let Some(description) = &collection.description {
        out.push_str(description);
        out.push('\n');
    }

    for tier in &collection.tiers {
        out.push_str(&format!("\n[{}] {}\n", tier.label, tier.name));
        for entry in &tier.entries {
            match &entry.explanation {
                Some(explanation) => out.push_str(&format!("  - {}: {}\n", entry.name, explanation)),
                None => out.push_str(&format!("  - {}\n", entry.name)),
            }
        }
    }

    out
}

/// Offer the rendered collection as a file download. Browser failures are
/// logged, not surfaced; export is best-effort UI glue.
pub fn download(collection: &RankedCollection, format: ExportFormat) {
    let content = render(collection, format);
    if let Err(err) = trigger_download(&content, format) {
        warn!("Export download failed: {:?}", err);
    }
}

fn trigger_download(content: &str, format: ExportFormat) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(format.mime());
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: web_sys::HtmlAnchorElement =
        document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(format.file_name());
    anchor.click();

    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}

/// Copy the rendered collection to the system clipboard.
pub fn copy_to_clipboard(collection: &RankedCollection, format: ExportFormat) {
    let content = render(collection, format);
    let Some(window) = web_sys::window() else {
        return;
    };
    let clipboard = window.navigator().clipboard();

    spawn_local(async move {
        if let Err(err) = JsFuture::from(clipboard.write_text(&content)).await {
            warn!("Clipboard copy failed: {:?}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Tier};

    fn collection() -> RankedCollection {
        RankedCollection {
            title: "Weapon guide".to_string(),
            description: Some("Season 4 rankings.".to_string()),
            tiers: vec![
                Tier {
                    label: "S".to_string(),
                    name: "Top picks".to_string(),
                    entries: vec![
                        Entry {
                            id: "greatsword".to_string(),
                            name: "Greatsword".to_string(),
                            explanation: Some("Best reach, solid damage".to_string()),
                        },
                        Entry {
                            id: "bow".to_string(),
                            name: "Bow".to_string(),
                            explanation: None,
                        },
                    ],
                },
                Tier {
                    label: "A".to_string(),
                    name: "Strong".to_string(),
                    entries: vec![],
                },
            ],
        }
    }

    #[test]
    fn json_round_trips_through_the_wire_shape() {
        let text = to_json(&collection());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["title"], "Weapon guide");
        assert_eq!(value["tiers"][0]["tier"], "S");
        assert_eq!(value["tiers"][0]["entries"][0]["name"], "Greatsword");
        // Missing explanations are omitted, not null.
        assert!(value["tiers"][0]["entries"][1].get("explanation").is_none());
    }

    #[test]
    fn csv_has_header_and_one_row_per_entry() {
        let text = to_csv(&collection());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "tier,tier_name,entry,explanation");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "S,Top picks,Greatsword,\"Best reach, solid damage\"");
        assert_eq!(lines[2], "S,Top picks,Bow,");
    }

    #[test]
    fn csv_escapes_embedded_quotes() {
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn markdown_renders_tier_sections() {
        let text = to_markdown(&collection());

        assert!(text.starts_with("# Weapon guide\n"));
        assert!(text.contains("## S: Top picks"));
        assert!(text.contains("- **Greatsword**: Best reach, solid damage"));
        assert!(text.contains("- **Bow**\n"));
        assert!(text.contains("## A: Strong"));
        assert!(text.contains("*(empty)*"));
    }

    #[test]
    fn plain_text_lists_tiers_and_entries() {
        let text = to_plain_text(&collection());

        assert!(text.contains("[S] Top picks"));
        assert!(text.contains("  - Bow\n"));
        assert!(text.contains("  - Greatsword: Best reach, solid damage"));
    }
}
