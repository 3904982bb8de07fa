//! Lesson Command
//!
//! Streams a lesson and prints each section as soon as it is complete.
//! Ctrl-C stops the stream; nothing is saved.

use std::io::Write;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::render::{render_outcome, render_update};
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::content::{ContentGenerator, ContentState, GenerationStatus};
use crate::curriculum::tiers::random_loading_message;
use crate::types::{Level, MasteryError, Result};

pub async fn run(topic_id: &str, level: Level) -> Result<()> {
    let ctx = CommandContext::load()?;
    let session = ctx.require_session()?;
    let topic = ctx.topic(topic_id).await?;

    if level == Level::Advanced {
        let progress = ctx.progress(&session).await?;
        if !progress.is_advanced_unlocked(&topic.id) {
            return Err(MasteryError::Feature(format!(
                "Advanced unlocks after completing basic. Run `mastery complete {} --level basic` first",
                topic.id
            )));
        }
    }

    let output = Output::new();
    output.header(&format!("{} ({})", topic.title, level));
    output.hint(&topic.subtitle);
    output.hint(&random_loading_message(&session.username));

    let generator = ContentGenerator::new(ctx.content_provider()?, ctx.config.learner.clone());
    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let state = generator
        .stream_lesson(&topic, level, &cancel, |update| {
            if let Some(text) = render_update(&update) {
                println!("{}", text);
                let _ = std::io::stdout().flush();
            }
        })
        .await;
    interrupt.abort();

    if state.status() == GenerationStatus::Complete {
        println!("{}", render_outcome(&state));
        output.hint(&format!(
            "Done reading? mastery complete {} --level {}",
            topic.id, level
        ));
    }
    settle(state, &output)
}

/// Final result of a lesson run. A transport failure is returned as-is so
/// it is reported once, by the caller.
fn settle(state: ContentState, output: &Output) -> Result<()> {
    match state.status() {
        GenerationStatus::Cancelled => {
            output.warning("Lesson cancelled");
            Ok(())
        }
        GenerationStatus::Failed => {
            let shown = state.sections().len();
            if shown > 0 {
                output.warning(&format!("{} section(s) shown above", shown));
            }
            Err(state
                .into_error()
                .unwrap_or_else(|| MasteryError::Feature("Lesson generation failed".into())))
        }
        _ => Ok(()),
    }
}

/// Cancel `token` on the first Ctrl-C
fn spawn_interrupt_handler(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling lesson stream");
            token.cancel();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_lesson_returns_transport_error_once() {
        let mut state = ContentState::new();
        state.begin();
        state.push_token(r#"{"sections": [{"type":"concept","title":"T1","content":"C1"},"#);
        state.fail(MasteryError::DataStore("connection reset".into()));

        let err = settle(state, &Output::new()).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Data store error: connection reset");
    }

    #[test]
    fn test_cancelled_and_complete_lessons_succeed() {
        let mut cancelled = ContentState::new();
        cancelled.begin();
        cancelled.cancel();
        assert!(settle(cancelled, &Output::new()).is_ok());

        let mut complete = ContentState::new();
        complete.begin();
        complete.push_token("plain markdown");
        complete.complete();
        assert!(settle(complete, &Output::new()).is_ok());
    }
}
