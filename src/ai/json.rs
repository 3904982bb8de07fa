//! JSON Extraction from LLM Replies
//!
//! Models often wrap the requested object in prose or markdown fences. The
//! object is taken as the span from the first `{` to the last `}`; anything
//! outside it is ignored.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{MasteryError, Result};

/// Greedy `{ ... }` span of a reply, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Extract and deserialize the reply's JSON object.
///
/// `what` names the feature in the error message ("quiz", "keywords", ...).
pub fn parse_json_object<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    let raw = extract_json_object(text)
        .ok_or_else(|| MasteryError::malformed(what, "no JSON object found"))?;

    serde_json::from_str(raw).map_err(|e| {
        debug!("Failed to parse {} JSON: {}", what, e);
        MasteryError::malformed(what, e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Keywords {
        keywords: Vec<String>,
    }

    #[test]
    fn test_extract_from_fenced_prose() {
        let reply = "Here you go:\n```json\n{\"keywords\": [\"Reach\"]}\n```\nEnjoy!";
        assert_eq!(
            extract_json_object(reply),
            Some("{\"keywords\": [\"Reach\"]}")
        );
    }

    #[test]
    fn test_extract_none_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_json_object() {
        let parsed: Keywords =
            parse_json_object("sure! {\"keywords\": [\"A\", \"B\"]}", "keywords").unwrap();
        assert_eq!(parsed.keywords, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_errors_are_malformed() {
        let missing: Result<Keywords> = parse_json_object("nothing", "keywords");
        assert!(matches!(
            missing,
            Err(MasteryError::MalformedResponse { .. })
        ));

        let wrong_shape: Result<Keywords> = parse_json_object("{\"words\": []}", "keywords");
        assert!(wrong_shape
            .unwrap_err()
            .to_string()
            .starts_with("Failed to parse keywords response"));
    }
}
