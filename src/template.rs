//! Named-placeholder substitution for agent instructions.
//!
//! Placeholders are written `{name}`. Literal braces are written `{{` and `}}`.
//! Every placeholder must have a value; there is no fallback and no format
//! mini-language.
//!
//! ```rust
//! use agent_switchboard::template::{format, TemplateParams};
//!
//! let mut params = TemplateParams::new();
//! params.insert("language".to_string(), "English".to_string());
//! assert_eq!(format("Hello {language}", &params).unwrap(), "Hello English");
//! ```

use std::collections::BTreeMap;

use crate::error::{Result, SwitchboardError};

/// Placeholder name → replacement text.
pub type TemplateParams = BTreeMap<String, String>;

/// Substitute every `{name}` in `text` with `params[name]`.
pub fn format(text: &str, params: &TemplateParams) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    if n == '{' {
                        return Err(invalid(pos, "nested '{' inside placeholder"));
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(invalid(pos, "unclosed placeholder"));
                }
                if name.is_empty() {
                    return Err(invalid(pos, "empty placeholder"));
                }
                let value = params
                    .get(&name)
                    .ok_or(SwitchboardError::MissingParameter { name })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(invalid(pos, "single '}' outside placeholder"));
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Names of all placeholders referenced by `text`, in order of appearance.
///
/// Escaped braces are skipped. Malformed templates yield the names found
/// before the first error.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(['{', '}']) {
        let tail = &rest[start..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            break;
        }
        match tail[1..].find('}') {
            Some(end) => {
                names.push(tail[1..=end].to_string());
                rest = &tail[end + 2..];
            }
            None => break,
        }
    }
    names
}

fn invalid(position: usize, message: &str) -> SwitchboardError {
    SwitchboardError::InvalidTemplate {
        position,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> TemplateParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_language() {
        let out = format("Hello {language}", &params(&[("language", "English")])).unwrap();
        assert_eq!(out, "Hello English");
    }

    #[test]
    fn missing_parameter_is_reported_by_name() {
        let err = format("Hello {language}", &TemplateParams::new()).unwrap_err();
        match err {
            SwitchboardError::MissingParameter { name } => assert_eq!(name, "language"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn escaped_braces_are_literal() {
        let out = format("{{\"sku\": \"{sku}\"}}", &params(&[("sku", "INET_HOME")])).unwrap();
        assert_eq!(out, "{\"sku\": \"INET_HOME\"}");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let text = "You are a call center operator. Keep answers short.";
        assert_eq!(format(text, &TemplateParams::new()).unwrap(), text);
    }

    #[test]
    fn repeated_and_multiple_placeholders() {
        let out = format(
            "{greeting}, speak {language}. Only {language}.",
            &params(&[("greeting", "Hi"), ("language", "Italian")]),
        )
        .unwrap();
        assert_eq!(out, "Hi, speak Italian. Only Italian.");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for text in ["Hello {language", "Hello }", "Hello {}", "a {b{c}}"] {
            let err = format(text, &params(&[("language", "x"), ("b", "y")])).unwrap_err();
            assert!(
                matches!(err, SwitchboardError::InvalidTemplate { .. }),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn unicode_text_survives() {
        let out = format("Prezzo: €{price}/mese", &params(&[("price", "30")])).unwrap();
        assert_eq!(out, "Prezzo: €30/mese");
    }

    #[test]
    fn lists_placeholders_in_order() {
        assert_eq!(
            placeholders("{a} {{literal}} {b} {a}"),
            vec!["a".to_string(), "b".to_string(), "a".to_string()]
        );
        assert!(placeholders("no braces").is_empty());
    }
}
