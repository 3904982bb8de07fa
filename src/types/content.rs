//! Lesson content types
//!
//! Sections produced by the streaming extractor and the lesson records built
//! from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Level
// =============================================================================

/// Lesson depth. Advanced unlocks once basic is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Basic,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Basic => "basic",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Level::Basic),
            "advanced" => Ok(Level::Advanced),
            _ => Err(format!(
                "Unknown level: {}. Valid values: basic, advanced",
                s
            )),
        }
    }
}

// =============================================================================
// Section Type
// =============================================================================

/// Semantic type of a lesson section.
///
/// Unknown type strings are kept verbatim in [`SectionType::Other`] and
/// rendered with the default style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionType {
    Concept,
    Why,
    Framework,
    Example,
    Takeaways,
    Challenge,
    DeepDive,
    CaseStudy,
    Mistakes,
    ProTips,
    Other(String),
}

impl SectionType {
    pub fn as_str(&self) -> &str {
        match self {
            SectionType::Concept => "concept",
            SectionType::Why => "why",
            SectionType::Framework => "framework",
            SectionType::Example => "example",
            SectionType::Takeaways => "takeaways",
            SectionType::Challenge => "challenge",
            SectionType::DeepDive => "deepdive",
            SectionType::CaseStudy => "casestudy",
            SectionType::Mistakes => "mistakes",
            SectionType::ProTips => "protips",
            SectionType::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SectionType::Other(_))
    }

    /// Display icon; unknown types share the concept icon
    pub fn icon(&self) -> &'static str {
        match self {
            SectionType::Why => "🎯",
            SectionType::Framework => "🧩",
            SectionType::Example => "📌",
            SectionType::Takeaways => "✅",
            SectionType::Challenge => "🏆",
            SectionType::DeepDive => "🔍",
            SectionType::CaseStudy => "📊",
            SectionType::Mistakes => "⚠️",
            SectionType::ProTips => "💎",
            SectionType::Concept | SectionType::Other(_) => "💡",
        }
    }
}

impl From<String> for SectionType {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "concept" => SectionType::Concept,
            "why" => SectionType::Why,
            "framework" => SectionType::Framework,
            "example" => SectionType::Example,
            "takeaways" => SectionType::Takeaways,
            "challenge" => SectionType::Challenge,
            "deepdive" => SectionType::DeepDive,
            "casestudy" => SectionType::CaseStudy,
            "mistakes" => SectionType::Mistakes,
            "protips" => SectionType::ProTips,
            _ => SectionType::Other(raw),
        }
    }
}

impl From<&str> for SectionType {
    fn from(raw: &str) -> Self {
        SectionType::from(raw.to_string())
    }
}

impl From<SectionType> for String {
    fn from(kind: SectionType) -> Self {
        match kind {
            SectionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sections
// =============================================================================

/// One structured block of lesson content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub title: String,
    /// Markdown body
    pub content: String,
}

/// Ordered, append-only list of sections for one lesson
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    sections: Vec<ContentSection>,
}

impl StructuredContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[ContentSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Append a confirmed section. Existing sections are never touched.
    pub(crate) fn append(&mut self, section: ContentSection) {
        self.sections.push(section);
    }

    /// Flatten to "Title:\nbody" blocks for prompts that need plain text
    pub fn to_plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("{}:\n{}", s.title, s.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<Vec<ContentSection>> for StructuredContent {
    fn from(sections: Vec<ContentSection>) -> Self {
        Self { sections }
    }
}

/// A generated lesson for one topic and level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub topic_id: String,
    pub level: Level,
    /// Full raw text returned by the model
    pub content: String,
    /// Parsed sections; `None` when none could be extracted
    pub structured: Option<StructuredContent>,
    pub generated_at: DateTime<Utc>,
}

impl Content {
    /// Text to feed downstream prompts: sections when available, raw otherwise
    pub fn plain_text(&self) -> String {
        match &self.structured {
            Some(structured) if !structured.is_empty() => structured.to_plain_text(),
            _ => self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("basic".parse::<Level>().unwrap(), Level::Basic);
        assert_eq!("ADVANCED".parse::<Level>().unwrap(), Level::Advanced);
        assert!("expert".parse::<Level>().is_err());
        assert_eq!(Level::Advanced.to_string(), "advanced");
    }

    #[test]
    fn test_section_type_known_and_unknown() {
        assert_eq!(SectionType::from("casestudy"), SectionType::CaseStudy);
        assert_eq!(SectionType::from("ProTips"), SectionType::ProTips);

        let other = SectionType::from("bonus");
        assert!(!other.is_known());
        assert_eq!(other.as_str(), "bonus");
        assert_eq!(other.icon(), SectionType::Concept.icon());
    }

    #[test]
    fn test_section_deserialize_passes_unknown_type_through() {
        let section: ContentSection =
            serde_json::from_str(r#"{"type":"bonus","title":"T","content":"C"}"#).unwrap();
        assert_eq!(section.kind, SectionType::Other("bonus".to_string()));

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["type"], "bonus");
    }

    #[test]
    fn test_plain_text() {
        let structured = StructuredContent::from(vec![
            ContentSection {
                kind: SectionType::Concept,
                title: "What".into(),
                content: "A thing".into(),
            },
            ContentSection {
                kind: SectionType::Why,
                title: "Why".into(),
                content: "Because".into(),
            },
        ]);
        assert_eq!(structured.to_plain_text(), "What:\nA thing\n\nWhy:\nBecause");
    }
}
