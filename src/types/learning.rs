//! Quiz, deep dive, memorize and note records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Level, SectionType};

// =============================================================================
// Quiz
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

// =============================================================================
// Deep Dive
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeepDiveMode {
    /// More depth and nuance
    #[default]
    Explain,
    /// Explain like I'm new
    Simpler,
    /// Real-world cases
    Examples,
    /// Applied to the learner's own company
    Apply,
}

impl DeepDiveMode {
    /// Title used when the model reply cannot be parsed
    pub fn fallback_title(&self, company: &str) -> String {
        match self {
            DeepDiveMode::Explain => "Deep Dive".to_string(),
            DeepDiveMode::Simpler => "Simplified".to_string(),
            DeepDiveMode::Examples => "More Examples".to_string(),
            DeepDiveMode::Apply => format!("Applied to {}", company),
        }
    }
}

impl fmt::Display for DeepDiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepDiveMode::Explain => write!(f, "explain"),
            DeepDiveMode::Simpler => write!(f, "simpler"),
            DeepDiveMode::Examples => write!(f, "examples"),
            DeepDiveMode::Apply => write!(f, "apply"),
        }
    }
}

impl FromStr for DeepDiveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explain" => Ok(DeepDiveMode::Explain),
            "simpler" => Ok(DeepDiveMode::Simpler),
            "examples" => Ok(DeepDiveMode::Examples),
            "apply" => Ok(DeepDiveMode::Apply),
            _ => Err(format!(
                "Unknown deep dive mode: {}. Valid values: explain, simpler, examples, apply",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveResponse {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub follow_up: String,
}

// =============================================================================
// Memorize
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub word: String,
    /// 1-5 stars
    pub rating: f64,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl KeywordAnalysis {
    /// Rating rounded and clamped to whole stars
    pub fn stars(&self) -> u8 {
        self.rating.round().clamp(1.0, 5.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptAnalysis {
    /// Total stars earned
    pub score: f64,
    /// Maximum possible stars
    pub max_score: f64,
    pub overall_rating: f64,
    pub keywords: Vec<KeywordAnalysis>,
    pub encouragement: String,
}

// =============================================================================
// Notes
// =============================================================================

/// A lesson section the learner saved for later
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub topic_id: String,
    pub topic_title: String,
    pub level: Level,
    pub section_type: SectionType,
    pub section_title: String,
    pub content: String,
    pub saved_at: DateTime<Utc>,
}

impl Note {
    /// True when this note was saved from the given lesson section
    pub fn matches(&self, topic_id: &str, level: Level, section_type: &SectionType) -> bool {
        self.topic_id == topic_id && self.level == level && &self.section_type == section_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_deserialize_camel_case() {
        let quiz: Quiz = serde_json::from_str(
            r#"{"questions":[{"question":"Q?","options":["a","b","c","d"],"correctIndex":2,"explanation":"because"}]}"#,
        )
        .unwrap();
        assert_eq!(quiz.questions[0].correct_index, 2);
    }

    #[test]
    fn test_deep_dive_mode_parse() {
        assert_eq!("apply".parse::<DeepDiveMode>().unwrap(), DeepDiveMode::Apply);
        assert!("louder".parse::<DeepDiveMode>().is_err());
        assert_eq!(DeepDiveMode::Simpler.fallback_title("Nivea"), "Simplified");
        assert_eq!(DeepDiveMode::Apply.fallback_title("Nivea"), "Applied to Nivea");
    }

    #[test]
    fn test_transcript_analysis_optional_suggestion() {
        let analysis: TranscriptAnalysis = serde_json::from_str(
            r#"{"score":7,"maxScore":10,"overallRating":4,"keywords":[
                {"word":"NSM","rating":5,"feedback":"Great"},
                {"word":"LTV","rating":2,"feedback":"Brief","suggestion":"Review LTV"}
            ],"encouragement":"Nice"}"#,
        )
        .unwrap();
        assert_eq!(analysis.keywords[0].suggestion, None);
        assert_eq!(analysis.keywords[1].suggestion.as_deref(), Some("Review LTV"));
        assert_eq!(analysis.keywords[1].stars(), 2);
    }
}
