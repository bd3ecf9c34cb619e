//! Rendering of token endpoint responses for the terminal.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// What to print from a token response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The whole response, pretty-printed
    #[default]
    Full,
    /// Only the `access_token` member, as a JSON value
    AccessToken,
}

impl OutputMode {
    /// Mode selected by the `--access-token` flag.
    #[must_use]
    pub const fn from_access_token_flag(only_access_token: bool) -> Self {
        if only_access_token {
            Self::AccessToken
        } else {
            Self::Full
        }
    }
}

/// Pretty-print `value` as JSON indented with tabs.
///
/// # Errors
///
/// Fails only if `value` cannot be serialized.
pub fn render_pretty(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The `access_token` member of `value` re-encoded as JSON: `"tok123"` with
/// quotes, or `null` when absent.
///
/// # Errors
///
/// Fails only if the member cannot be serialized.
pub fn render_access_token(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value.get("access_token").unwrap_or(&Value::Null))
}

/// Render `value` according to `mode`.
///
/// # Errors
///
/// See [`render_pretty`] and [`render_access_token`].
pub fn render(value: &Value, mode: OutputMode) -> Result<String, serde_json::Error> {
    match mode {
        OutputMode::Full => render_pretty(value),
        OutputMode::AccessToken => render_access_token(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_pretty_uses_tabs() {
        let rendered = render_pretty(&json!({"access_token": "tok123", "token_type": "Bearer"})).unwrap();
        assert_eq!(
            rendered,
            "{\n\t\"access_token\": \"tok123\",\n\t\"token_type\": \"Bearer\"\n}"
        );
    }

    #[test]
    fn test_render_pretty_nested() {
        let rendered = render_pretty(&json!({"a": {"b": [1]}})).unwrap();
        assert_eq!(rendered, "{\n\t\"a\": {\n\t\t\"b\": [\n\t\t\t1\n\t\t]\n\t}\n}");
    }

    #[test]
    fn test_render_access_token_keeps_quotes() {
        let rendered = render_access_token(&json!({"access_token": "tok123"})).unwrap();
        assert_eq!(rendered, "\"tok123\"");
    }

    #[test]
    fn test_render_access_token_missing_is_null() {
        let rendered = render_access_token(&json!({"error": "invalid_grant"})).unwrap();
        assert_eq!(rendered, "null");
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(OutputMode::from_access_token_flag(true), OutputMode::AccessToken);
        assert_eq!(OutputMode::from_access_token_flag(false), OutputMode::Full);
        assert_eq!(
            render(&json!({"access_token": "x"}), OutputMode::AccessToken).unwrap(),
            "\"x\""
        );
    }
}
