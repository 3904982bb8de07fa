use console::{StyledObject, style};

const RULE_WIDTH: usize = 40;

/// Status lines around lesson output. Warnings go to stderr so piped
/// lesson text stays clean.
#[derive(Debug, Default, Clone, Copy)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    fn line(mark: StyledObject<&str>, message: &str) -> String {
        format!("{} {}", mark, message)
    }

    pub fn success(&self, message: &str) {
        println!("{}", Self::line(style("✓").green(), message));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", Self::line(style("⚠").yellow(), message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", Self::line(style("•").blue(), message));
    }

    /// Loading messages and next-step suggestions
    pub fn hint(&self, message: &str) {
        println!("{}", style(message).dim().italic());
    }

    pub fn header(&self, title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    pub fn section(&self, title: &str) {
        println!("\n{}\n{}", style(title).bold(), style("─".repeat(RULE_WIDTH)).dim());
    }
}
