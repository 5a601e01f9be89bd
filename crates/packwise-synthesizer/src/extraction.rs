//! Tolerant JSON extraction from free-form model output

use crate::error::ExtractError;

/// Cuts the JSON payload out of raw model text
///
/// Implementations never parse; they only locate the candidate substring.
pub trait JsonExtractor: Send + Sync {
    /// Return the JSON candidate inside `raw`
    fn extract<'a>(&self, raw: &'a str) -> Result<&'a str, ExtractError>;
}

/// First `{` through last `}`, inclusive
///
/// Tolerates prose before and after the object, including markdown fences.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceSpanExtractor;

impl JsonExtractor for BraceSpanExtractor {
    fn extract<'a>(&self, raw: &'a str) -> Result<&'a str, ExtractError> {
        if raw.trim().is_empty() {
            return Err(ExtractError::Empty);
        }
        let start = raw.find('{').ok_or(ExtractError::NoObject)?;
        let end = raw.rfind('}').ok_or(ExtractError::NoObject)?;
        if end < start {
            return Err(ExtractError::NoObject);
        }
        Ok(&raw[start..=end])
    }
}

/// Prefers the body of a markdown code block, then applies the brace span
///
/// Useful for models that wrap JSON in a fenced block and add commentary
/// containing stray braces after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedBlockExtractor;

impl JsonExtractor for FencedBlockExtractor {
    fn extract<'a>(&self, raw: &'a str) -> Result<&'a str, ExtractError> {
        let fenced = raw.find("```").and_then(|open| {
            let after_open = &raw[open + 3..];
            // Skip the info string (```json)
            let body_start = after_open.find('\n')? + 1;
            let body = &after_open[body_start..];
            let close = body.find("```")?;
            Some(&body[..close])
        });

        match fenced {
            Some(body) if body.contains('{') => BraceSpanExtractor.extract(body),
            _ => BraceSpanExtractor.extract(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let json = r#"{"packing_list": []}"#;
        assert_eq!(BraceSpanExtractor.extract(json).unwrap(), json);
    }

    #[test]
    fn test_surrounding_prose() {
        let raw = "Here is the list:\n{\"packing_list\":[{\"item\":\"Tシャツ\",\"quantity\":\"3\"}]}\nThanks!";
        assert_eq!(
            BraceSpanExtractor.extract(raw).unwrap(),
            "{\"packing_list\":[{\"item\":\"Tシャツ\",\"quantity\":\"3\"}]}"
        );
    }

    #[test]
    fn test_markdown_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(BraceSpanExtractor.extract(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(BraceSpanExtractor.extract(""), Err(ExtractError::Empty));
        assert_eq!(BraceSpanExtractor.extract(" \n\t"), Err(ExtractError::Empty));
    }

    #[test]
    fn test_no_braces() {
        assert_eq!(
            BraceSpanExtractor.extract("I cannot help with that."),
            Err(ExtractError::NoObject)
        );
        assert_eq!(BraceSpanExtractor.extract("only open {"), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_reversed_braces() {
        assert_eq!(BraceSpanExtractor.extract("} oops {"), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_fenced_ignores_trailing_braces() {
        let raw = "```json\n{\"a\": 1}\n```\nNote: {adjust as needed}";
        assert_eq!(FencedBlockExtractor.extract(raw).unwrap(), "{\"a\": 1}");
        // The brace span alone would swallow the note
        assert!(BraceSpanExtractor.extract(raw).unwrap().ends_with("needed}"));
    }

    #[test]
    fn test_fenced_falls_back_without_fence() {
        let raw = "list: {\"a\": 1} done";
        assert_eq!(FencedBlockExtractor.extract(raw).unwrap(), "{\"a\": 1}");
    }
}
