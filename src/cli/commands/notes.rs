//! Notes Command
//!
//! Usage:
//!   mastery notes list [--topic <id>] [-f json]
//!   mastery notes add <topic-id> --level --section-type --title --content
//!   mastery notes toggle <topic-id> --level --section-type --title --content
//!   mastery notes remove <note-id>
//!   mastery notes clear

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::storage::{NoteBook, NoteDraft};
use crate::types::{Level, Result, SectionType};

/// Fields shared by `add` and `toggle`
pub struct NoteInput {
    pub topic_id: String,
    pub level: Level,
    pub section_type: String,
    pub title: String,
    pub content: String,
}

async fn draft(ctx: &CommandContext, input: NoteInput) -> Result<NoteDraft> {
    let topic = ctx.topic(&input.topic_id).await?;
    Ok(NoteDraft {
        topic_id: topic.id,
        topic_title: topic.title,
        level: input.level,
        section_type: SectionType::from(input.section_type),
        section_title: input.title,
        content: input.content,
    })
}

fn notebook(ctx: &CommandContext) -> NoteBook {
    NoteBook::new(ctx.db.clone())
}

pub fn list(topic: Option<&str>, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let book = notebook(&ctx);
    let notes = match topic {
        Some(topic_id) => book.for_topic(topic_id)?,
        None => book.list()?,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    let output = Output::new();
    if notes.is_empty() {
        output.info("No saved notes yet");
        return Ok(());
    }

    output.header(&format!("Saved notes ({})", notes.len()));
    for note in &notes {
        println!(
            "\n{} {} · {} ({})",
            note.section_type.icon(),
            style(&note.section_title).bold(),
            note.topic_title,
            note.level
        );
        println!("   {}", style(&note.id).dim());
        for line in note.content.lines() {
            println!("   {}", line);
        }
    }
    Ok(())
}

pub async fn add(input: NoteInput) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let note = notebook(&ctx).add(draft(&ctx, input).await?)?;
    Output::new().success(&format!("Saved note {}", note.id));
    Ok(())
}

pub async fn toggle(input: NoteInput) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let added = notebook(&ctx).toggle(draft(&ctx, input).await?)?;
    let output = Output::new();
    if added {
        output.success("Note saved");
    } else {
        output.success("Note removed");
    }
    Ok(())
}

pub fn remove(note_id: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    let output = Output::new();
    if notebook(&ctx).remove(note_id)? {
        output.success("Note removed");
    } else {
        output.warning(&format!("No note with id {}", note_id));
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.require_session()?;
    notebook(&ctx).clear()?;
    Output::new().success("All notes cleared");
    Ok(())
}
