//! Follow-up explanations for a single lesson section

use std::time::Duration;

use tracing::warn;

use crate::ai::{PromptTemplates, SharedProvider, parse_json_object, with_timeout};
use crate::types::{DeepDiveMode, DeepDiveResponse, Result};

const FALLBACK_FOLLOW_UP: &str = "What aspect would you like to explore further?";

/// The section the learner wants to dig into
#[derive(Debug, Clone)]
pub struct DeepDiveRequest<'a> {
    pub topic_title: &'a str,
    pub section_title: &'a str,
    pub section_content: &'a str,
    pub mode: DeepDiveMode,
}

pub struct DeepDiveGenerator {
    provider: SharedProvider,
    company: String,
    timeout: Duration,
}

impl DeepDiveGenerator {
    pub fn new(provider: SharedProvider, company: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            company: company.into(),
            timeout,
        }
    }

    /// Transport errors propagate; an unparseable reply is shown as-is
    /// under a mode-specific title.
    pub async fn explain(&self, request: &DeepDiveRequest<'_>) -> Result<DeepDiveResponse> {
        let prompt = PromptTemplates::deep_dive(
            request.topic_title,
            request.section_title,
            request.section_content,
            request.mode,
            &self.company,
        );
        let response =
            with_timeout(self.timeout, self.provider.complete(&prompt), "deep dive").await?;

        match parse_json_object::<DeepDiveResponse>(&response.content, "deep dive") {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!("Using raw deep dive reply: {}", e);
                Ok(DeepDiveResponse {
                    title: request.mode.fallback_title(&self.company),
                    content: response.content,
                    follow_up: FALLBACK_FOLLOW_UP.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;

    fn request(mode: DeepDiveMode) -> DeepDiveRequest<'static> {
        DeepDiveRequest {
            topic_title: "UTM Hygiene",
            section_title: "Why It Matters",
            section_content: "Attribution starts with clean tags.",
            mode,
        }
    }

    #[tokio::test]
    async fn test_parsed_reply() {
        let (provider, mock) = MockProvider::replying(
            r#"{"title":"Tagging at scale","content":"Use a **naming sheet**.","followUp":"Which channel is messiest?"}"#,
        )
        .shared();
        let generator = DeepDiveGenerator::new(provider, "Nivea India", Duration::from_secs(5));

        let reply = generator.explain(&request(DeepDiveMode::Apply)).await.unwrap();
        assert_eq!(reply.title, "Tagging at scale");
        assert_eq!(reply.follow_up, "Which channel is messiest?");
        assert!(mock.prompts()[0].contains("Nivea India"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back_to_raw() {
        let raw = "Think of UTMs like labels on a parcel.";
        let (provider, _) = MockProvider::replying(raw).shared();
        let generator = DeepDiveGenerator::new(provider, "Nivea India", Duration::from_secs(5));

        let reply = generator
            .explain(&request(DeepDiveMode::Simpler))
            .await
            .unwrap();
        assert_eq!(reply.title, "Simplified");
        assert_eq!(reply.content, raw);
        assert_eq!(reply.follow_up, FALLBACK_FOLLOW_UP);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_masked() {
        let (provider, _) = MockProvider::failing_to_open(429).shared();
        let generator = DeepDiveGenerator::new(provider, "Nivea India", Duration::from_secs(5));
        assert!(generator
            .explain(&request(DeepDiveMode::Explain))
            .await
            .is_err());
    }
}
