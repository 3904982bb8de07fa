use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, llm_timeout};
use crate::learning::{DeepDiveGenerator, DeepDiveRequest};
use crate::types::{DeepDiveMode, Result};

pub async fn run(
    topic_id: &str,
    section_title: &str,
    section_content: &str,
    mode: DeepDiveMode,
) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let topic = ctx.topic(topic_id).await?;

    let generator = DeepDiveGenerator::new(
        ctx.content_provider()?,
        ctx.config.learner.company.clone(),
        llm_timeout(&ctx.config.content_llm),
    );
    let reply = generator
        .explain(&DeepDiveRequest {
            topic_title: &topic.title,
            section_title,
            section_content,
            mode,
        })
        .await?;

    let output = Output::new();
    output.section(&reply.title);
    println!("{}", reply.content.trim());
    if !reply.follow_up.is_empty() {
        println!("\n{} {}", style("→").cyan(), style(&reply.follow_up).italic());
    }
    Ok(())
}
