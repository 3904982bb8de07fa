//! Quiz Command
//!
//! Without `--answers` the questions are printed; with them, the quiz is
//! graded and each explanation shown.

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, llm_timeout};
use crate::learning::{QuizGenerator, grade};
use crate::types::{Level, Quiz, Result};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub async fn run(topic_id: &str, level: Level, answers: &[usize]) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let topic = ctx.topic(topic_id).await?;

    let generator = QuizGenerator::new(
        ctx.content_provider()?,
        llm_timeout(&ctx.config.content_llm),
    );
    let quiz = generator.generate(&topic, level).await?;

    let output = Output::new();
    output.header(&format!("Quiz: {} ({})", topic.title, level));

    if answers.is_empty() {
        print_questions(&quiz);
        output.hint(&format!(
            "Answer with: mastery quiz {} --level {} --answers 0,2,1,...",
            topic.id, level
        ));
        return Ok(());
    }

    // A fresh quiz is generated per run, so answers grade the quiz shown now
    let result = grade(&quiz, answers);
    for (i, (question, outcome)) in quiz.questions.iter().zip(&result.outcomes).enumerate() {
        let mark = if outcome.is_correct() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("\n{} {}. {}", mark, i + 1, question.question);
        println!(
            "   Correct: {}",
            question
                .options
                .get(outcome.correct_index)
                .map(String::as_str)
                .unwrap_or("?")
        );
        if !question.explanation.is_empty() {
            println!("   {}", style(&question.explanation).dim());
        }
    }

    let (emoji, message) = result.verdict();
    println!();
    output.info(&format!(
        "{} {}/{} - {}",
        emoji,
        result.score(),
        result.total(),
        message
    ));
    Ok(())
}

fn print_questions(quiz: &Quiz) {
    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, style(&question.question).bold());
        for (label, option) in OPTION_LABELS.iter().zip(&question.options) {
            println!("   {}) {}", label, option);
        }
    }
    println!();
}
