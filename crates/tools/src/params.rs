//! Enumerated tool parameters and shared payload helpers.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Knowledge base grouping a search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Concepts,
    Examples,
    Sections,
    All,
}

impl Category {
    pub const VALUES: [&'static str; 4] = ["concepts", "examples", "sections", "all"];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Concepts => "concepts",
            Category::Examples => "examples",
            Category::Sections => "sections",
            Category::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub const VALUES: [&'static str; 3] = ["basic", "intermediate", "advanced"];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Basic => "basic",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    Brief,
    Detailed,
    Technical,
}

impl Detail {
    pub const VALUES: [&'static str; 3] = ["brief", "detailed", "technical"];
}

/// Characters kept in a related-topic preview.
pub const PREVIEW_CHARS: usize = 100;

/// How many related entries or suggestions accompany an answer.
pub const MAX_RELATED: usize = 3;

/// First [`PREVIEW_CHARS`] characters followed by an ellipsis.
pub fn preview(content: &str) -> String {
    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// Text up to and including the first period.
pub fn first_sentence(content: &str) -> String {
    let head = content.split('.').next().unwrap_or_default();
    format!("{head}.")
}

pub fn unavailable_message(path: &Path) -> String {
    format!(
        "Documentation not available. Please ensure {} exists.",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "é".repeat(150);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short...");
    }

    #[test]
    fn first_sentence_cuts_at_period() {
        assert_eq!(
            first_sentence("A token system manages token balances. Tokens transfer value."),
            "A token system manages token balances."
        );
        assert_eq!(first_sentence("No period here"), "No period here.");
    }

    #[test]
    fn enum_values_match_serde_names() {
        for value in Category::VALUES {
            let parsed: Category = serde_json::from_value(serde_json::json!(value)).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        for value in Complexity::VALUES {
            let parsed: Complexity = serde_json::from_value(serde_json::json!(value)).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        for value in Detail::VALUES {
            assert!(serde_json::from_value::<Detail>(serde_json::json!(value)).is_ok());
        }
    }
}
