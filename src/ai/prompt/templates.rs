//! Preset prompts for lessons, quizzes, deep dives and memorize

use super::PromptBuilder;
use crate::config::LearnerConfig;
use crate::constants::memorize;
use crate::types::{DeepDiveMode, Level, SectionType, Topic};

/// One section a lesson prompt asks for
#[derive(Debug, Clone)]
pub struct SectionPlan {
    pub kind: SectionType,
    pub title: &'static str,
    pub brief: &'static str,
}

impl SectionPlan {
    const fn new(kind: SectionType, title: &'static str, brief: &'static str) -> Self {
        Self { kind, title, brief }
    }

    /// Sections requested for a level, in order (challenge excluded)
    pub fn for_level(level: Level) -> Vec<SectionPlan> {
        match level {
            Level::Basic => vec![
                Self::new(SectionType::Concept, "What This Is", "Clear, jargon-free definition"),
                Self::new(
                    SectionType::Why,
                    "Why It Matters",
                    "Real impact on business outcomes, with FMCG/beauty industry examples",
                ),
                Self::new(
                    SectionType::Framework,
                    "The Pareto 20%",
                    "The core 20% knowledge that delivers 80% of results",
                ),
                Self::new(
                    SectionType::Example,
                    "Practical Example",
                    "One specific example the learner could apply at work",
                ),
                Self::new(
                    SectionType::Takeaways,
                    "Key Takeaways",
                    "3-5 actionable bullet points",
                ),
            ],
            Level::Advanced => vec![
                Self::new(
                    SectionType::DeepDive,
                    "Deep Dive",
                    "Nuances, edge cases, and advanced considerations",
                ),
                Self::new(
                    SectionType::Framework,
                    "Advanced Frameworks",
                    "Mental models and frameworks used by top marketers",
                ),
                Self::new(
                    SectionType::CaseStudy,
                    "Case Study",
                    "Real-world example from FMCG/beauty (Nivea, L'Oreal, Dove, etc.)",
                ),
                Self::new(
                    SectionType::Mistakes,
                    "Common Mistakes",
                    "What experienced marketers get wrong and how to avoid it",
                ),
                Self::new(
                    SectionType::ProTips,
                    "Pro Tips",
                    "Insider knowledge and advanced tactics",
                ),
                Self::new(
                    SectionType::Takeaways,
                    "Key Takeaways",
                    "3-5 expert-level insights",
                ),
            ],
        }
    }
}

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Lesson prompt requesting `{"sections": [...]}` in reading order
    pub fn lesson(topic: &Topic, level: Level, learner: &LearnerConfig) -> String {
        let mut items: Vec<String> = SectionPlan::for_level(level)
            .into_iter()
            .map(|s| format!("**{}** (type \"{}\") - {}", s.title, s.kind, s.brief))
            .collect();
        if let Some(challenge) = &topic.challenge {
            items.push(format!(
                "**Mini-Challenge** (type \"{}\") - {}",
                SectionType::Challenge,
                challenge
            ));
        }

        let role = match level {
            Level::Basic => format!(
                "You are a marketing educator creating content for {}, {}.",
                learner.username, learner.persona
            ),
            Level::Advanced => format!(
                "You are a marketing educator creating ADVANCED content for {}, {}, who has already completed the basic level for this topic.",
                learner.username, learner.persona
            ),
        };

        let lead = match level {
            Level::Basic => "Create BASIC level content as these sections, in this order:",
            Level::Advanced => "Create ADVANCED content as these sections, in this order:",
        };

        let guidelines = match level {
            Level::Basic => vec![
                "Keep it concise and actionable",
                "Use markdown inside each section's content (bullets, bold for emphasis)",
                "Write in a professional but approachable tone",
                "Include specific numbers, frameworks, or templates where relevant",
                "Reading time should be approximately 5 minutes",
                "Focus on practical application, not theory",
            ],
            Level::Advanced => vec![
                "Assume foundational knowledge (this is advanced level)",
                "Include specific metrics, benchmarks, or industry standards",
                "Reference real tools, platforms, or techniques",
                "Use markdown inside each section's content",
                "Write in a professional, peer-to-peer tone",
                "Reading time should be approximately 8-10 minutes",
            ],
        };

        PromptBuilder::new()
            .role(role)
            .context_item("Topic", &topic.title)
            .context_item("Context", &topic.subtitle)
            .context_item("Company", &learner.company)
            .objectives(lead, items)
            .guidelines(guidelines)
            .output(
                r#"{"sections": [
  {"type": "concept", "title": "What This Is", "content": "markdown text"},
  {"type": "why", "title": "Why It Matters", "content": "markdown text"}
]}"#,
            )
            .custom("Escape quotes and newlines inside content strings. Start directly with the JSON object.")
            .build()
    }

    /// Five multiple-choice questions on a topic
    pub fn quiz(topic: &Topic, level: Level) -> String {
        PromptBuilder::new()
            .role("You are a marketing educator writing a short knowledge check.")
            .context_item("Topic", &topic.title)
            .context_item("Context", &topic.subtitle)
            .context_item("Level", level.as_str())
            .objectives(
                "Write 5 multiple-choice questions that:",
                vec![
                    "Test understanding and application, not recall of wording",
                    "Have exactly 4 options each with one correct answer",
                    "Use FMCG/beauty industry scenarios where possible",
                    "Explain briefly why the correct answer is right",
                ],
            )
            .output(
                r#"{"questions": [
  {"question": "...", "options": ["A", "B", "C", "D"], "correctIndex": 0, "explanation": "..."}
]}"#,
            )
            .build()
    }

    /// Follow-up explanation of one lesson section
    pub fn deep_dive(
        topic_title: &str,
        section_title: &str,
        section_content: &str,
        mode: DeepDiveMode,
        company: &str,
    ) -> String {
        let ask = match mode {
            DeepDiveMode::Explain => "Go deeper: explain the nuances, the reasoning behind it, and what most people miss.".to_string(),
            DeepDiveMode::Simpler => "Explain this more simply, as if to a new team member. Use one everyday analogy.".to_string(),
            DeepDiveMode::Examples => "Give 2-3 additional concrete examples from FMCG/beauty brands.".to_string(),
            DeepDiveMode::Apply => format!(
                "Show step by step how to apply this at {} this quarter, with one measurable goal.",
                company
            ),
        };

        PromptBuilder::new()
            .role("You are a marketing mentor answering a learner's follow-up question.")
            .context_item("Topic", topic_title)
            .context_item("Section", section_title)
            .section("Section content", section_content)
            .text(&ask)
            .guidelines(vec![
                "Use markdown in content",
                "Keep it under 300 words",
                "End with one follow-up question the learner could explore next",
            ])
            .output(r#"{"title": "...", "content": "markdown text", "followUp": "..."}"#)
            .build()
    }

    /// Memorize: pick 3-5 key concepts
    pub fn keywords(content_text: &str) -> String {
        PromptBuilder::new()
            .role("You are helping a marketing professional memorize key concepts.")
            .text(&format!(
                "Extract exactly 3-{} of the most important concepts/keywords from this marketing content that a learner should remember and be able to explain.",
                memorize::MAX_KEYWORDS
            ))
            .objectives(
                "Choose keywords that:",
                vec![
                    "Represent core concepts (not trivial details)",
                    "Are specific enough to test understanding",
                    "Cover the main ideas of the content",
                ],
            )
            .section("Content", content_text)
            .output(r#"{"keywords": ["Concept 1", "Concept 2", "Concept 3"]}"#)
            .build()
    }

    /// Memorize: star-rate a spoken explanation per keyword
    pub fn transcript_analysis(content_text: &str, keywords: &[String], transcript: &str) -> String {
        let max_score = keywords.len() * memorize::STARS_PER_KEYWORD;

        PromptBuilder::new()
            .role("You are analyzing a verbal recall exercise where a marketing professional explained what they learned.")
            .section("ORIGINAL CONTENT THEY LEARNED", content_text)
            .section("KEYWORDS THEY WERE ASKED TO EXPLAIN", &keywords.join(", "))
            .section("USER'S VERBAL EXPLANATION (transcribed)", &format!("\"{}\"", transcript))
            .objectives(
                "Rate how well the user explained EACH keyword concept on a scale of 1-5 stars:",
                vec![
                    "Not mentioned at all",
                    "Briefly mentioned but not explained",
                    "Partial understanding shown",
                    "Good explanation with minor gaps",
                    "Excellent, complete understanding demonstrated",
                ],
            )
            .text("Be encouraging but honest. For concepts rated 3 or below, provide a specific suggestion of what to review.")
            .output(format!(
                r#"{{
  "score": <total stars earned across all keywords>,
  "maxScore": {},
  "overallRating": <1-5 overall performance>,
  "keywords": [
    {{"word": "Keyword1", "rating": 5, "feedback": "Excellent explanation of..."}},
    {{"word": "Keyword2", "rating": 2, "feedback": "You mentioned it briefly...", "suggestion": "Review the section about X"}}
  ],
  "encouragement": "Encouraging message based on overall performance"
}}"#,
                max_score
            ))
            .build()
    }
}
