//! Curriculum overview, tier status and topic completion
//!
//! Usage:
//!   mastery modules [-f json]
//!   mastery status [-f json]
//!   mastery complete <topic-id> --level basic|advanced

use crate::cli::render::{render_module_line, render_tier};
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::curriculum::{summarize, tier_for_score, topics_to_next_tier};
use crate::types::{Level, Result};

pub async fn modules(format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let session = ctx.require_session()?;
    let modules = ctx.modules().await;
    let progress = ctx.progress(&session).await?;

    let from_fallback = modules.is_fallback();
    let modules = modules.into_inner();
    let summaries = summarize(&modules, &progress);

    if format == "json" {
        let json = serde_json::json!({
            "source": if from_fallback { "bundled" } else { "remote" },
            "modules": modules,
            "progress": summaries,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let output = Output::new();
    output.header("Marketing Mastery Curriculum");
    if from_fallback {
        output.hint("(bundled curriculum)");
    }

    for (module, summary) in modules.iter().zip(&summaries) {
        println!("\n{}", render_module_line(summary));
        for topic in &module.topics {
            let mark = match (
                progress.is_complete(&topic.id, Level::Advanced),
                progress.is_complete(&topic.id, Level::Basic),
            ) {
                (true, _) => "★",
                (false, true) => "✓",
                _ => " ",
            };
            println!("    {} {:<8} {}", mark, topic.id, topic.title);
        }
    }

    let score = progress.score();
    println!();
    output.info(&render_tier(tier_for_score(score), score, topics_to_next_tier(score)));
    Ok(())
}

pub async fn status(format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let session = ctx.require_session()?;
    let progress = ctx.progress(&session).await?;

    let score = progress.score();
    let tier = tier_for_score(score);
    let to_next = topics_to_next_tier(score);

    if format == "json" {
        let status = serde_json::json!({
            "username": session.username,
            "score": score,
            "tier": tier.tier,
            "tier_label": tier.label,
            "to_next_tier": to_next,
            "progress_source": if progress.is_remote() { "remote" } else { "local" },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Marketing Mastery Status");
    println!("══════════════════════════════════════");
    println!("Learner: {}", session.username);
    println!("{}", render_tier(tier, score, to_next));
    if !progress.is_remote() {
        println!("Progress stored locally only");
    }
    Ok(())
}

pub async fn complete(topic_id: &str, level: Level) -> Result<()> {
    let ctx = CommandContext::load()?;
    let session = ctx.require_session()?;
    let topic = ctx.topic(topic_id).await?;
    let mut progress = ctx.progress(&session).await?;

    let before = tier_for_score(progress.score()).tier;
    progress.mark_complete(&topic.id, level).await?;
    let score = progress.score();
    let after = tier_for_score(score);

    let output = Output::new();
    output.success(&format!("{} ({}) complete", topic.title, level));
    if after.tier != before {
        output.success(&format!("Level up! You are now {}", after));
    }
    output.info(&render_tier(after, score, topics_to_next_tier(score)));
    Ok(())
}
