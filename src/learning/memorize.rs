//! Verbal recall practice
//!
//! The analysis model picks a handful of keywords from a lesson, then
//! star-rates the learner's spoken (here: typed or piped) explanation of
//! each one.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::ai::{PromptTemplates, ProviderConfig, SharedProvider, parse_json_object, with_timeout};
use crate::config::LlmConfig;
use crate::constants::{analysis_llm, memorize};
use crate::types::{MasteryError, Result, TranscriptAnalysis};

/// Provider settings for the analysis model, with attribution headers
pub fn analysis_provider_config(config: &LlmConfig) -> ProviderConfig {
    config
        .to_provider_config(analysis_llm::API_KEY_ENV)
        .with_header("HTTP-Referer", analysis_llm::REFERER)
        .with_header("X-Title", analysis_llm::APP_TITLE)
}

pub struct MemorizeCoach {
    provider: SharedProvider,
    timeout: Duration,
}

impl MemorizeCoach {
    pub fn new(provider: SharedProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Up to five keywords worth explaining from `content_text`
    pub async fn extract_keywords(&self, content_text: &str) -> Result<Vec<String>> {
        let prompt = PromptTemplates::keywords(content_text);
        let response = with_timeout(
            self.timeout,
            self.provider.complete(&prompt),
            "keyword extraction",
        )
        .await?;

        let parsed: Value = parse_json_object(&response.content, "keywords")?;
        let keywords = parsed
            .get("keywords")
            .and_then(Value::as_array)
            .ok_or_else(|| MasteryError::Feature("Invalid keywords response format".to_string()))?;

        let mut keywords: Vec<String> = keywords
            .iter()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect();
        keywords.truncate(memorize::MAX_KEYWORDS);

        debug!("Extracted keywords: {:?}", keywords);
        Ok(keywords)
    }

    /// Rate `transcript` against the lesson and keywords.
    ///
    /// A blank transcript fails before any request is made.
    pub async fn analyze(
        &self,
        content_text: &str,
        keywords: &[String],
        transcript: &str,
    ) -> Result<TranscriptAnalysis> {
        if transcript.trim().is_empty() {
            return Err(MasteryError::Feature(memorize::NO_SPEECH_MESSAGE.to_string()));
        }

        let prompt = PromptTemplates::transcript_analysis(content_text, keywords, transcript);
        let response = with_timeout(
            self.timeout,
            self.provider.complete(&prompt),
            "transcript analysis",
        )
        .await?;

        let parsed: Value = parse_json_object(&response.content, "analysis")?;
        let analysis = validate_analysis(parsed)?;

        info!(
            "Recall scored {}/{} (overall {})",
            analysis.score, analysis.max_score, analysis.overall_rating
        );
        Ok(analysis)
    }
}

fn validate_analysis(parsed: Value) -> Result<TranscriptAnalysis> {
    let invalid = || MasteryError::Feature("Invalid analysis response format".to_string());

    let well_formed = ["score", "maxScore", "overallRating"]
        .iter()
        .all(|field| parsed.get(field).is_some_and(Value::is_number))
        && parsed.get("keywords").is_some_and(Value::is_array)
        && parsed.get("encouragement").is_some_and(Value::is_string);
    if !well_formed {
        return Err(invalid());
    }

    serde_json::from_value(parsed).map_err(|e| {
        debug!("Analysis keywords did not decode: {}", e);
        invalid()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;

    fn coach(reply: &str) -> (MemorizeCoach, std::sync::Arc<MockProvider>) {
        let (provider, mock) = MockProvider::replying(reply).shared();
        (MemorizeCoach::new(provider, Duration::from_secs(5)), mock)
    }

    #[tokio::test]
    async fn test_keywords_truncated_to_five() {
        let (coach, _) = coach(
            r#"{"keywords": ["NSM", "LTV", "CAC", "Funnel", "Bottleneck", "Dashboard"]}"#,
        );
        let keywords = coach.extract_keywords("North Star:\nOne metric").await.unwrap();
        assert_eq!(keywords, vec!["NSM", "LTV", "CAC", "Funnel", "Bottleneck"]);
    }

    #[tokio::test]
    async fn test_keywords_wrong_shape() {
        let (coach, _) = coach(r#"{"concepts": ["NSM"]}"#);
        let err = coach.extract_keywords("text").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid keywords response format");
    }

    #[tokio::test]
    async fn test_blank_transcript_skips_request() {
        let (coach, mock) = coach("{}");
        let err = coach
            .analyze("text", &["NSM".to_string()], "   \n")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), memorize::NO_SPEECH_MESSAGE);
        assert!(mock.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_parsed() {
        let (coach, mock) = coach(
            r#"```json
{"score": 7, "maxScore": 10, "overallRating": 4,
 "keywords": [{"word":"NSM","rating":5,"feedback":"Clear"},
              {"word":"LTV","rating":2,"feedback":"Brief","suggestion":"Revisit LTV"}],
 "encouragement": "Strong start!"}
```"#,
        );
        let keywords = vec!["NSM".to_string(), "LTV".to_string()];
        let analysis = coach
            .analyze("content", &keywords, "NSM is the one number that matters")
            .await
            .unwrap();

        assert_eq!(analysis.score, 7.0);
        assert_eq!(analysis.keywords[1].suggestion.as_deref(), Some("Revisit LTV"));
        assert!(mock.prompts()[0].contains("\"maxScore\": 10"));
    }

    #[tokio::test]
    async fn test_analysis_missing_fields() {
        let (coach, _) = coach(r#"{"score": "seven", "keywords": []}"#);
        let err = coach
            .analyze("content", &["NSM".to_string()], "something")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid analysis response format");
    }

    #[test]
    fn test_analysis_provider_headers() {
        let config = analysis_provider_config(&LlmConfig::analysis_default());
        let names: Vec<_> = config.extra_headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["HTTP-Referer", "X-Title"]);
        assert_eq!(config.model, "google/gemini-2.0-flash-lite-001");
    }
}
