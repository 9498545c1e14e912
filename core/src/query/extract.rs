//! Extraction of the trace object from free-form model output
//!
//! Models often wrap the requested JSON in prose or code fences. The scanner
//! returns the first balanced `{...}` span, tracking string literals and
//! escapes so that braces inside strings do not end the object early.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use super::QueryError;
use crate::trace::ProblemTrace;

/// First balanced JSON object span in `text`
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract, decode and validate a trace from raw model text
pub fn parse_trace_response(text: &str) -> Result<ProblemTrace, QueryError> {
    let json = extract_json_object(text).ok_or(QueryError::NoJsonObject)?;
    Ok(ProblemTrace::from_json_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_from_prose() {
        let text = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps {smile}";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"code": "if (x) { return \"}\"; }", "n": 1} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"code": "if (x) { return \"}\"; }", "n": 1}"#)
        );
    }

    #[test]
    fn test_unbalanced_or_missing_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"a\": 1"), None);
    }

    #[test]
    fn test_parse_trace_response_validates() {
        let ok = "Result: {\"title\": \"T\", \"steps\": [{\"visualElements\": []}]} done";
        assert_eq!(parse_trace_response(ok).unwrap().title, "T");

        assert!(matches!(
            parse_trace_response("nothing"),
            Err(QueryError::NoJsonObject)
        ));
        assert!(matches!(
            parse_trace_response("{\"steps\": []}"),
            Err(QueryError::InvalidTrace(_))
        ));
        assert!(matches!(
            parse_trace_response("{\"title\": \"no steps\"}"),
            Err(QueryError::InvalidTrace(_))
        ));
    }
}
