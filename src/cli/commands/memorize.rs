//! Memorize Command
//!
//! Usage:
//!   mastery memorize keywords <topic-id> [--level]
//!   mastery memorize analyze <topic-id> [--transcript <text>|-] [--keywords a,b,c] [--level]
//!   mastery memorize onboarding [--reset]

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, llm_timeout, read_stdin};
use crate::constants::memorize::STARS_PER_KEYWORD;
use crate::content::ContentGenerator;
use crate::learning::MemorizeCoach;
use crate::storage::onboarding::{
    complete_onboarding, is_onboarding_complete, reset_onboarding,
};
use crate::types::{Level, Result, TranscriptAnalysis};

const ONBOARDING_STEPS: [&str; 3] = [
    "1. Read the lesson, then pick up to 5 key concepts to explain.",
    "2. Explain them out loud in your own words and paste the transcript.",
    "3. Each concept gets 1-5 stars with tips on what to review.",
];

pub async fn keywords(topic_id: &str, level: Level) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    show_onboarding_once(&ctx)?;

    let content_text = lesson_text(&ctx, topic_id, level).await?;
    let coach = coach(&ctx)?;
    let keywords = coach.extract_keywords(&content_text).await?;

    let output = Output::new();
    output.section("Explain these concepts in your own words");
    for keyword in &keywords {
        println!("  • {}", style(keyword).bold());
    }
    output.hint(&format!(
        "Then: mastery memorize analyze {} --level {} --keywords \"{}\" --transcript -",
        topic_id,
        level,
        keywords.join(",")
    ));
    Ok(())
}

pub async fn analyze(
    topic_id: &str,
    level: Level,
    transcript: Option<String>,
    keywords: Vec<String>,
) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;

    let transcript = match transcript.as_deref() {
        None | Some("-") => read_stdin()?,
        Some(text) => text.to_string(),
    };

    let content_text = lesson_text(&ctx, topic_id, level).await?;
    let coach = coach(&ctx)?;
    let keywords = if keywords.is_empty() {
        coach.extract_keywords(&content_text).await?
    } else {
        keywords
    };

    let analysis = coach.analyze(&content_text, &keywords, &transcript).await?;
    print_analysis(&analysis);
    Ok(())
}

pub fn onboarding(reset: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let output = Output::new();
    if reset {
        reset_onboarding(&ctx.db)?;
        output.success("Memorize walkthrough will show again");
    } else {
        print_onboarding();
        complete_onboarding(&ctx.db)?;
    }
    Ok(())
}

fn show_onboarding_once(ctx: &CommandContext) -> Result<()> {
    if !is_onboarding_complete(&ctx.db)? {
        print_onboarding();
        complete_onboarding(&ctx.db)?;
    }
    Ok(())
}

fn print_onboarding() {
    let output = Output::new();
    output.section("Memorize This Easily");
    for step in ONBOARDING_STEPS {
        println!("  {}", step);
    }
}

fn coach(ctx: &CommandContext) -> Result<MemorizeCoach> {
    Ok(MemorizeCoach::new(
        ctx.analysis_provider()?,
        llm_timeout(&ctx.config.analysis_llm),
    ))
}

/// Generate the lesson and flatten it for the analysis prompts
async fn lesson_text(ctx: &CommandContext, topic_id: &str, level: Level) -> Result<String> {
    let topic = ctx.topic(topic_id).await?;
    Output::new().hint(&format!("Preparing {} ({})...", topic.title, level));

    let generator = ContentGenerator::new(ctx.content_provider()?, ctx.config.learner.clone());
    Ok(generator.generate_lesson(&topic, level).await?.plain_text())
}

fn print_analysis(analysis: &TranscriptAnalysis) {
    let output = Output::new();
    output.section(&format!(
        "Recall score: {}/{}",
        analysis.score, analysis.max_score
    ));

    for keyword in &analysis.keywords {
        let stars = usize::from(keyword.stars());
        println!(
            "\n  {} {}{}",
            style(&keyword.word).bold(),
            "★".repeat(stars),
            "☆".repeat(STARS_PER_KEYWORD.saturating_sub(stars))
        );
        println!("    {}", keyword.feedback);
        if let Some(suggestion) = &keyword.suggestion {
            println!("    {} {}", style("Review:").yellow(), suggestion);
        }
    }

    println!();
    output.info(&analysis.encouragement);
}
