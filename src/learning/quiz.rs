//! Quiz generation and scoring

use std::time::Duration;

use tracing::{info, warn};

use crate::ai::{PromptTemplates, SharedProvider, parse_json_object, with_timeout};
use crate::types::{Level, MasteryError, Quiz, QuizQuestion, Result, Topic};

const QUIZ_FAILED: &str = "Failed to generate quiz questions";

pub struct QuizGenerator {
    provider: SharedProvider,
    timeout: Duration,
}

impl QuizGenerator {
    pub fn new(provider: SharedProvider, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Ask the model for a quiz on `topic`.
    ///
    /// Questions whose answer index points outside their options are
    /// dropped; a quiz left with no questions is an error.
    pub async fn generate(&self, topic: &Topic, level: Level) -> Result<Quiz> {
        let prompt = PromptTemplates::quiz(topic, level);
        let response = with_timeout(
            self.timeout,
            self.provider.complete(&prompt),
            "quiz generation",
        )
        .await?;

        let mut quiz: Quiz = parse_json_object(&response.content, "quiz")?;
        quiz.questions.retain(|q| {
            let valid = q.correct_index < q.options.len();
            if !valid {
                warn!("Dropping quiz question with answer out of range: {}", q.question);
            }
            valid
        });

        if quiz.questions.is_empty() {
            return Err(MasteryError::Feature(QUIZ_FAILED.to_string()));
        }

        info!("Generated {} quiz question(s) for {}", quiz.questions.len(), topic.id);
        Ok(quiz)
    }
}

/// Graded answer to one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: Option<usize>,
    pub correct_index: usize,
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        self.selected == Some(self.correct_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub outcomes: Vec<AnswerOutcome>,
}

impl QuizResult {
    pub fn score(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn percentage(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.score() as f64 / self.total() as f64 * 100.0
    }

    /// Emoji and message for the final screen
    pub fn verdict(&self) -> (&'static str, &'static str) {
        let pct = self.percentage();
        if self.total() > 0 && self.score() == self.total() {
            ("🏆", "Perfect score! You've mastered this topic!")
        } else if pct >= 80.0 {
            ("🎉", "Excellent work! You have a strong understanding.")
        } else if pct >= 60.0 {
            ("👍", "Good job! Review the content to strengthen your knowledge.")
        } else {
            ("📚", "Keep learning! Review the content and try again.")
        }
    }
}

/// Grade answers in question order; missing answers count as wrong.
pub fn grade(quiz: &Quiz, answers: &[usize]) -> QuizResult {
    QuizResult {
        outcomes: quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, QuizQuestion { correct_index, .. })| AnswerOutcome {
                selected: answers.get(i).copied(),
                correct_index: *correct_index,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;

    fn topic() -> Topic {
        Topic {
            id: "m0-t2".into(),
            module_id: "m0".into(),
            title: "Value Equation".into(),
            subtitle: "Design offers that people can't ignore".into(),
            order_index: 2,
            challenge: None,
        }
    }

    fn question(correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Q?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index,
            explanation: String::new(),
        }
    }

    #[tokio::test]
    async fn test_generate_parses_wrapped_reply() {
        let reply = r#"Here is your quiz:
{"questions": [
  {"question": "What raises perceived value?", "options": ["A","B","C","D"], "correctIndex": 1, "explanation": "B"},
  {"question": "Broken", "options": ["A","B"], "correctIndex": 3}
]}"#;
        let (provider, mock) = MockProvider::replying(reply).shared();
        let quiz = QuizGenerator::new(provider, Duration::from_secs(5))
            .generate(&topic(), Level::Basic)
            .await
            .unwrap();

        assert_eq!(quiz.questions.len(), 1);
        assert!(mock.prompts()[0].contains("Value Equation"));
    }

    #[tokio::test]
    async fn test_empty_quiz_is_feature_error() {
        let (provider, _) = MockProvider::replying(r#"{"questions": []}"#).shared();
        let err = QuizGenerator::new(provider, Duration::from_secs(5))
            .generate(&topic(), Level::Advanced)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), QUIZ_FAILED);
    }

    #[tokio::test]
    async fn test_no_json_is_malformed() {
        let (provider, _) = MockProvider::replying("I cannot help with that").shared();
        let err = QuizGenerator::new(provider, Duration::from_secs(5))
            .generate(&topic(), Level::Basic)
            .await
            .unwrap_err();
        assert!(matches!(err, MasteryError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let (provider, _) = MockProvider::failing_to_open(500).shared();
        let err = QuizGenerator::new(provider, Duration::from_secs(5))
            .generate(&topic(), Level::Basic)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_grade_and_verdict() {
        let quiz = Quiz {
            questions: (0..5).map(|i| question(i % 4)).collect(),
        };

        let perfect = grade(&quiz, &[0, 1, 2, 3, 0]);
        assert_eq!(perfect.score(), 5);
        assert_eq!(perfect.verdict().0, "🏆");

        let four = grade(&quiz, &[0, 1, 2, 3, 1]);
        assert_eq!(four.verdict().0, "🎉");

        let three = grade(&quiz, &[0, 1, 2]);
        assert_eq!(three.score(), 3);
        assert_eq!(three.verdict().0, "👍");

        let none = grade(&quiz, &[]);
        assert_eq!(none.score(), 0);
        assert_eq!(none.verdict().0, "📚");
    }
}
