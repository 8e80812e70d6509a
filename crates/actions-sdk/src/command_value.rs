// Value coercion and wire escaping for workflow commands.
// Both the stdout command protocol and the file command protocol reduce
// every payload to a single canonical string before framing it.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// An error raised while coercing a structured value to its command string.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The underlying JSON encoding failed (e.g. unsupported type graph).
    #[error("failed to serialize value to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The canonical string representation of a value carried by a workflow or
/// file command.
///
/// Coercion rules:
/// - absent/empty -> `""`
/// - string -> unchanged (no escaping, no JSON quoting)
/// - bool -> `"true"` / `"false"`
/// - anything else -> compact JSON, via an explicit [`Serialize`] capability
///   supplied by the caller through [`CommandValue::json`]
///
/// There is no reflective fallback: a structured value without a
/// serialization capability simply cannot be constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandValue {
    /// No value; coerces to the empty string.
    #[default]
    Empty,
    /// A string value, passed through verbatim.
    Str(String),
    /// A boolean value, rendered lowercase.
    Bool(bool),
    /// A structured value, already rendered as compact JSON.
    Json(String),
}

impl CommandValue {
    /// Build a `CommandValue` by serializing `value` to compact JSON.
    ///
    /// The `Serialize` bound is the explicit serialization descriptor; field
    /// order follows the type's declaration order and is stable.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ValueError> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }

    /// The coerced string form. Total and deterministic for every variant.
    pub fn coerce(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Str(s) => s,
            Self::Bool(true) => "true",
            Self::Bool(false) => "false",
            Self::Json(s) => s,
        }
    }

    /// Whether this value coerces to the empty string.
    pub fn is_empty(&self) -> bool {
        self.coerce().is_empty()
    }
}

impl fmt::Display for CommandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.coerce())
    }
}

impl From<&str> for CommandValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for CommandValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for CommandValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for CommandValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T> From<Option<T>> for CommandValue
where
    T: Into<CommandValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

// ---------------------------------------------------------------------------
// Escape mappings
// ---------------------------------------------------------------------------

/// Data (message position) escape mappings. `%` MUST come first so the
/// two-character sequences introduced by later replacements are not
/// re-escaped; any other order is a defect.
const ESCAPE_DATA_MAPPINGS: &[(&str, &str)] = &[
    ("%", "%25"),
    ("\r", "%0D"),
    ("\n", "%0A"),
];

/// Property (key=value position) escape mappings. Adds `:` and `,`, which
/// are structurally significant between properties.
const ESCAPE_PROPERTY_MAPPINGS: &[(&str, &str)] = &[
    ("%", "%25"),
    ("\r", "%0D"),
    ("\n", "%0A"),
    (":", "%3A"),
    (",", "%2C"),
];

/// Escape a value for the message (data) position of a workflow command.
pub fn escape_data(value: &str) -> String {
    escape(value, ESCAPE_DATA_MAPPINGS)
}

/// Escape a value for the property position of a workflow command.
pub fn escape_property(value: &str) -> String {
    escape(value, ESCAPE_PROPERTY_MAPPINGS)
}

fn escape(value: &str, mappings: &[(&str, &str)]) -> String {
    if value.is_empty() {
        return String::new();
    }
    let mut escaped = value.to_string();
    for (token, replacement) in mappings {
        escaped = escaped.replace(token, replacement);
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestObj {
        test: String,
        count: i32,
    }

    #[test]
    fn coerce_empty() {
        assert_eq!(CommandValue::Empty.coerce(), "");
        assert_eq!(CommandValue::from(None::<&str>).coerce(), "");
    }

    #[test]
    fn coerce_string_passthrough() {
        assert_eq!(CommandValue::from("hello").coerce(), "hello");
        // Already-string values are never re-encoded
        assert_eq!(CommandValue::from("{\"a\":1}").coerce(), "{\"a\":1}");
    }

    #[test]
    fn coerce_string_is_idempotent() {
        let once = CommandValue::from("some % value").coerce().to_string();
        let twice = CommandValue::from(once.as_str()).coerce().to_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn coerce_bool_lowercase() {
        assert_eq!(CommandValue::from(true).coerce(), "true");
        assert_eq!(CommandValue::from(false).coerce(), "false");
    }

    #[test]
    fn coerce_json_compact() {
        let value = CommandValue::json(&TestObj {
            test: "object".to_string(),
            count: 7,
        })
        .unwrap();
        assert_eq!(value.coerce(), "{\"test\":\"object\",\"count\":7}");
    }

    #[test]
    fn coerce_json_array() {
        let value = CommandValue::json(&["a/b.csproj", "c/d.csproj"]).unwrap();
        assert_eq!(value.coerce(), "[\"a/b.csproj\",\"c/d.csproj\"]");
    }

    #[test]
    fn escape_data_table() {
        assert_eq!(escape_data("percent % cr \r lf \n"), "percent %25 cr %0D lf %0A");
        // colon and comma are not significant in the data position
        assert_eq!(escape_data("a:b,c"), "a:b,c");
    }

    #[test]
    fn escape_property_table() {
        assert_eq!(
            escape_property("% \r \n : ,"),
            "%25 %0D %0A %3A %2C"
        );
    }

    #[test]
    fn escape_percent_first() {
        // Text that already looks escaped is escaped again, because the
        // literal `%` is replaced before `\r`/`\n` introduce new sequences.
        assert_eq!(escape_data("%0A"), "%250A");
        assert_eq!(escape_property("%3A"), "%253A");
    }

    fn unescape(escaped: &str, mappings: &[(&str, &str)]) -> String {
        let mut result = escaped.to_string();
        for (token, replacement) in mappings.iter().rev() {
            result = result.replace(replacement, token);
        }
        result
    }

    #[test]
    fn escape_data_round_trips() {
        for s in ["", "plain", "a%b\rc\nd", "%%0D%0A", "\r\n\r\n", "100%"] {
            let escaped = escape_data(s);
            assert_eq!(unescape(&escaped, ESCAPE_DATA_MAPPINGS), s);
        }
    }

    #[test]
    fn escape_property_round_trips() {
        for s in ["", "k:v,k2:v2", "%3A literal", "multi\nline\rvalue", "%,:"] {
            let escaped = escape_property(s);
            assert_eq!(unescape(&escaped, ESCAPE_PROPERTY_MAPPINGS), s);
        }
    }
}
