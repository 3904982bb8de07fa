//! Section Extractor
//!
//! Finds the lesson sections that are already complete in a partially
//! streamed `{"sections": [ {...}, {...}, ...` reply.
//!
//! The scanner is a three-state machine over the text after the array's `[`:
//!
//! ```text
//!            '"'                 '\'
//!  Normal ───────▶ InString ───────────▶ Escaped
//!    ▲                │  ▲                  │
//!    └────── '"' ─────┘  └──── any char ────┘
//! ```
//!
//! A `{` seen in `Normal` at depth 0 opens a candidate; the `}` that brings
//! depth back to 0 closes it. Each candidate is parsed on its own and kept
//! only if it has string `type`, `title` and `content` fields. Trailing
//! unclosed text is never parsed.
//!
//! Extraction is pure: the same input always yields the same list, and a
//! longer prefix of the same stream yields a list that starts with the
//! shorter prefix's list. Callers track how many sections they have already
//! consumed.

use tracing::debug;

use crate::types::ContentSection;

const SECTIONS_KEY: &str = "\"sections\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InString,
    Escaped,
}

/// Brace/string tracker for one scan
#[derive(Debug)]
struct Scanner {
    state: ScanState,
    depth: usize,
    start: Option<usize>,
}

/// What a single character did to the scan
enum Step {
    Continue,
    /// A depth-0 object closed; byte range of the candidate
    Closed(usize, usize),
    /// The sections array closed
    EndOfArray,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: ScanState::Normal,
            depth: 0,
            start: None,
        }
    }

    fn step(&mut self, pos: usize, ch: char) -> Step {
        match self.state {
            ScanState::Escaped => self.state = ScanState::InString,
            ScanState::InString => match ch {
                '\\' => self.state = ScanState::Escaped,
                '"' => self.state = ScanState::Normal,
                _ => {}
            },
            ScanState::Normal => match ch {
                '"' => self.state = ScanState::InString,
                '{' => {
                    if self.depth == 0 {
                        self.start = Some(pos);
                    }
                    self.depth += 1;
                }
                '}' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0
                        && let Some(start) = self.start.take()
                    {
                        return Step::Closed(start, pos + ch.len_utf8());
                    }
                }
                ']' if self.depth == 0 => return Step::EndOfArray,
                _ => {}
            },
        }
        Step::Continue
    }
}

/// Byte offset just past the `[` that opens the sections array.
///
/// Prose before the object may quote the key too; the first occurrence
/// followed by `:` and `[` wins.
fn array_start(text: &str) -> Option<usize> {
    text.match_indices(SECTIONS_KEY)
        .find_map(|(key, _)| array_after_key(text, key + SECTIONS_KEY.len()))
}

fn array_after_key(text: &str, mut offset: usize) -> Option<usize> {
    let rest = &text[offset..];
    let trimmed = rest.trim_start();
    offset += rest.len() - trimmed.len();
    let after_colon = trimmed.strip_prefix(':')?;
    offset += 1;

    let trimmed = after_colon.trim_start();
    offset += after_colon.len() - trimmed.len();
    trimmed.strip_prefix('[')?;
    Some(offset + 1)
}

/// Every complete, well-formed section in `text`, in array order
pub fn extract_sections(text: &str) -> Vec<ContentSection> {
    let Some(body_start) = array_start(text) else {
        return Vec::new();
    };
    let body = &text[body_start..];

    let mut scanner = Scanner::new();
    let mut sections = Vec::new();

    for (pos, ch) in body.char_indices() {
        match scanner.step(pos, ch) {
            Step::Continue => {}
            Step::EndOfArray => break,
            Step::Closed(start, end) => {
                let candidate = &body[start..end];
                match serde_json::from_str::<ContentSection>(candidate) {
                    Ok(section) => sections.push(section),
                    Err(e) => debug!("Dropping malformed section: {}", e),
                }
            }
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionType;
    use proptest::prelude::*;

    #[test]
    fn test_no_array_yet() {
        assert!(extract_sections("").is_empty());
        assert!(extract_sections("{\"sect").is_empty());
        assert!(extract_sections("{\"sections\"").is_empty());
        assert!(extract_sections("{\"sections\": ").is_empty());
        assert!(extract_sections("Here is your lesson in markdown.").is_empty());
    }

    #[test]
    fn test_second_section_still_open() {
        let text = r#"{"sections": [{"type":"concept","title":"T1","content":"C1"}, {"type":"why","title":"T2","content":"C2""#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionType::Concept);
        assert_eq!(sections[0].title, "T1");
        assert_eq!(sections[0].content, "C1");
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"{"sections": [{"type":"framework","title":"Set {A}","content":"Use }} and {{ and \"quoted }\" text"}, {"type":"why"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Set {A}");
        assert_eq!(sections[0].content, "Use }} and {{ and \"quoted }\" text");
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        // `\\` is an escaped backslash, so the following quote ends the string
        let text = r#"{"sections": [{"type":"example","title":"Path","content":"C:\\"}]}"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "C:\\");
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let text = r#"{"sections": [
            {"type":"concept","title":"No body"},
            {"type":"why","content":"No title"},
            {"title":"No type","content":"x"},
            {"type":"takeaways","title":"Kept","content":"ok"}
        ]}"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Kept");
    }

    #[test]
    fn test_malformed_candidate_is_dropped() {
        let text = r#"{"sections": [{"type":"concept","title":"Bad",,"content":"x"}, {"type":"why","title":"Good","content":"y"}]}"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Good");
    }

    #[test]
    fn test_nested_objects_and_unknown_type() {
        let text = r#"{"sections": [{"type":"bonus","title":"T","content":"C","meta":{"a":{"b":1}}}]}"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionType::Other("bonus".into()));
    }

    #[test]
    fn test_stops_at_end_of_array() {
        let text = r#"{"sections": [{"type":"why","title":"In","content":"a"}], "extra": {"type":"why","title":"Out","content":"b"}}"#;
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "In");
    }

    #[test]
    fn test_prose_and_fence_before_object() {
        let text = "Sure!\n```json\n{\n  \"sections\" : [\n    {\"type\": \"concept\", \"title\": \"₹ pricing\", \"content\": \"Café\"}";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "₹ pricing");
    }

    #[test]
    fn test_quoted_key_in_preamble_is_skipped() {
        let text = "Here is the lesson as \"sections\":\n{\"sections\": [{\"type\":\"why\",\"title\":\"T1\",\"content\":\"C1\"}]}";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "T1");

        // Key mentioned again after the array does not restart the scan
        let twice = r#"{"sections": [{"type":"why","title":"A","content":"a"}], "note": "\"sections\": [{\"type\":\"why\",\"title\":\"B\",\"content\":\"b\"}]"}"#;
        assert_eq!(extract_sections(twice).len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let text = r#"{"sections": [{"type":"concept","title":"T1","content":"C1"}, {"type":"why""#;
        assert_eq!(extract_sections(text), extract_sections(text));
    }

    fn arb_section() -> impl Strategy<Value = ContentSection> {
        (
            prop::sample::select(vec!["concept", "why", "framework", "takeaways", "bonus"]),
            "[a-zA-Z0-9 {}\\[\\]\"\\\\:,]{0,20}",
            "[a-zA-Z0-9 {}\\[\\]\"\\\\:,\n₹é]{0,40}",
        )
            .prop_map(|(kind, title, content)| ContentSection {
                kind: SectionType::from(kind),
                title,
                content,
            })
    }

    proptest! {
        #[test]
        fn prop_prefixes_grow_monotonically(sections in prop::collection::vec(arb_section(), 0..5)) {
            let full = serde_json::json!({ "sections": sections }).to_string();

            let mut previous: Vec<ContentSection> = Vec::new();
            for (end, _) in full.char_indices().chain(std::iter::once((full.len(), ' '))) {
                let current = extract_sections(&full[..end]);
                prop_assert!(current.len() >= previous.len());
                prop_assert_eq!(&current[..previous.len()], &previous[..]);
                previous = current;
            }
            prop_assert_eq!(previous, sections);
        }

        #[test]
        fn prop_never_panics(text in ".{0,200}") {
            let _ = extract_sections(&text);
        }
    }
}
