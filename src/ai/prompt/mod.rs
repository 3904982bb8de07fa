//! Prompt Builder System
//!
//! Standardized prompt construction for every LLM call the app makes.
//!
//! ## Layout
//!
//! 1. **Role**: who the model is and who it writes for
//! 2. **Context**: ordered key/value facts (topic, level, ...)
//! 3. **Objectives**: numbered items the reply must cover
//! 4. **Guidelines**: tone and format rules
//! 5. **Output**: the exact JSON shape to return

mod templates;

pub use templates::{PromptTemplates, SectionPlan};

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Opening sentence(s) defining the model's role
    Role(String),
    /// Ordered key-value facts
    Context(Vec<(String, String)>),
    /// Numbered objectives under a lead-in line
    Objectives { lead: String, items: Vec<String> },
    /// Bulleted rules
    Guidelines(Vec<String>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Required JSON reply shape
    Output { example: String },
    /// Custom section
    Custom(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Role(role.into()));
        self
    }

    /// Add a context item; consecutive items share one block
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(items)) = self.sections.last_mut() {
            items.push((key.to_string(), value.to_string()));
        } else {
            self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )]));
        }
        self
    }

    pub fn objectives<I, S>(mut self, lead: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.push(PromptSection::Objectives {
            lead: lead.to_string(),
            items: items.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn guidelines(mut self, rules: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Guidelines(
            rules.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    pub fn output(mut self, example: impl Into<String>) -> Self {
        self.sections.push(PromptSection::Output {
            example: example.into(),
        });
        self
    }

    /// Add custom section
    pub fn custom(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Custom(content.to_string()));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role(role) => {
                    prompt.push_str(&role);
                    prompt.push_str("\n\n");
                }
                PromptSection::Context(items) => {
                    for (key, value) in items {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Objectives { lead, items } => {
                    prompt.push_str(&lead);
                    prompt.push_str("\n\n");
                    for (i, item) in items.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Guidelines(rules) => {
                    prompt.push_str("Guidelines:\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Output { example } => {
                    prompt.push_str(
                        "Return ONLY a JSON object in this exact format, nothing else:\n",
                    );
                    prompt.push_str(&example);
                    prompt.push_str("\n\n");
                }
                PromptSection::Custom(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("You are a marketing educator.")
            .objectives("Cover:", vec!["Definition", "Example"])
            .build();

        assert!(prompt.starts_with("You are a marketing educator."));
        assert!(prompt.contains("Cover:\n\n1. Definition\n2. Example"));
    }

    #[test]
    fn test_context_items_keep_order_and_group() {
        let prompt = PromptBuilder::new()
            .context_item("Topic", "Brand Positioning")
            .context_item("Context", "Owning a place in the mind")
            .build();

        assert_eq!(
            prompt,
            "Topic: Brand Positioning\nContext: Owning a place in the mind"
        );
    }

    #[test]
    fn test_guidelines_and_output() {
        let prompt = PromptBuilder::new()
            .guidelines(vec!["Be concise", "Use markdown"])
            .output(r#"{"keywords": []}"#)
            .build();

        assert!(prompt.contains("Guidelines:\n- Be concise\n- Use markdown"));
        assert!(prompt.ends_with(r#"{"keywords": []}"#));
        assert!(prompt.contains("Return ONLY a JSON object"));
    }

    #[test]
    fn test_headed_section() {
        let prompt = PromptBuilder::new()
            .section("Content", "Reach vs frequency")
            .build();
        assert_eq!(prompt, "Content:\nReach vs frequency");
    }
}
