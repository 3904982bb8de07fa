//! Terminal rendering of lessons and progress
//!
//! Sections print the moment they are reported. A lesson that finished
//! without any structured section prints its raw text instead.

use console::style;

use crate::content::{ContentState, ContentUpdate, Rendering};
use crate::curriculum::TierInfo;
use crate::types::{ContentSection, ModuleSummary};

/// One section: icon and title header, indented markdown body
pub fn render_section(index: usize, section: &ContentSection) -> String {
    let header = format!(
        "{} {}. {}",
        section.kind.icon(),
        index + 1,
        section.title
    );
    let header = if section.kind.is_known() {
        style(header).bold().cyan().to_string()
    } else {
        style(header).bold().to_string()
    };

    let body = section
        .content
        .lines()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n{}\n{}", header, body)
}

/// Text to print for a live update, if any
pub fn render_update(update: &ContentUpdate<'_>) -> Option<String> {
    match update {
        ContentUpdate::SectionAdded { index, section } => Some(render_section(*index, section)),
        // Final summary comes from `render_outcome` once the state is settled
        ContentUpdate::Completed { .. } | ContentUpdate::Failed { .. } => None,
    }
}

/// Closing text once generation has stopped
pub fn render_outcome(state: &ContentState) -> String {
    match state.rendering() {
        Rendering::Pending => String::new(),
        Rendering::Sections(sections) => format!(
            "\n{} {} section(s)",
            style("✓").green(),
            sections.len()
        ),
        Rendering::Markdown(raw) => format!("\n{}", raw.trim()),
        Rendering::Failed { sections, error } => {
            let kept = if sections.is_empty() {
                String::new()
            } else {
                format!(" ({} section(s) shown above)", sections.len())
            };
            format!("\n{} Generation failed: {}{}", style("✗").red(), error, kept)
        }
    }
}

/// Render a simple progress bar
pub fn render_progress_bar(completed: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return format!("[{}]", " ".repeat(width));
    }

    let progress = (completed as f32 / total as f32).min(1.0);
    let filled = (progress * width as f32) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

pub fn render_module_line(summary: &ModuleSummary) -> String {
    format!(
        "{:>2}. {:<42} {} {}/{} basic, {} advanced",
        summary.module_number,
        summary.title,
        render_progress_bar(summary.completed_basic, summary.total_topics, 16),
        summary.completed_basic,
        summary.total_topics,
        summary.completed_advanced
    )
}

pub fn render_tier(tier: &TierInfo, score: u32, to_next: u32) -> String {
    if to_next == 0 {
        format!("{} · {} points · top tier reached", tier, score)
    } else {
        format!("{} · {} points · {} to next tier", tier, score, to_next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::tier_for_score;
    use crate::types::{MasteryError, SectionType};

    fn section(kind: SectionType, title: &str, content: &str) -> ContentSection {
        ContentSection {
            kind,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_render_section_indents_body() {
        let out = render_section(
            0,
            &section(SectionType::Why, "Why It Matters", "line one\nline two"),
        );
        assert!(out.contains("🎯"));
        assert!(out.contains("1. Why It Matters"));
        assert!(out.contains("   line one\n   line two"));
    }

    #[test]
    fn test_unknown_type_renders_with_default_icon() {
        let out = render_section(
            2,
            &section(SectionType::Other("poem".into()), "Ode to CAC", "..."),
        );
        assert!(out.contains("💡"));
        assert!(out.contains("3. Ode to CAC"));
    }

    #[test]
    fn test_outcome_markdown_fallback() {
        let mut state = ContentState::new();
        state.begin();
        state.push_token("## Just markdown\nNo JSON today.");
        state.complete();
        assert!(render_outcome(&state).contains("## Just markdown"));
    }

    #[test]
    fn test_outcome_failed_mentions_kept_sections() {
        let mut state = ContentState::new();
        state.begin();
        state.push_token(r#"{"sections": [{"type":"concept","title":"T1","content":"C1"},"#);
        state.fail(MasteryError::DataStore("connection reset".into()));
        let out = render_outcome(&state);
        assert!(out.contains("connection reset"));
        assert!(out.contains("1 section(s) shown above"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(render_progress_bar(0, 0, 4), "[    ]");
        assert_eq!(render_progress_bar(2, 4, 4), "[██░░]");
        assert_eq!(render_progress_bar(9, 4, 4), "[████]");
    }

    #[test]
    fn test_render_tier() {
        assert!(render_tier(tier_for_score(144), 144, 0).contains("top tier"));
        assert!(render_tier(tier_for_score(10), 10, 26).contains("26 to next tier"));
    }
}
