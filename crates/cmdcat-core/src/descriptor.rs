//! Command descriptors and the lenient ingestion boundary.
//!
//! Extensions register commands as loosely structured data (typically a
//! YAML mapping). [`CommandDescriptor`] is the typed model, and
//! [`CommandDescriptor::from_value`] / [`ingest_commands`] convert
//! untyped values into it. Ingestion is deliberately forgiving: a field
//! of the wrong shape is treated as absent rather than failing the
//! whole command.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Help text for a single command option.
///
/// Option values come in two shapes in registration data: a plain
/// description string, or a list of accepted choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionHelp {
    /// A plain description.
    Text(String),
    /// A list of accepted values, rendered comma-separated.
    Choices(Vec<String>),
}

impl OptionHelp {
    /// Render the help text as a single line.
    ///
    /// Choices are joined with `", "`, matching the alias rendering.
    pub fn to_line(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Choices(choices) => choices.join(", "),
        }
    }
}

/// Metadata registered for a single command.
///
/// Every field is optional; a bare `{}` descriptor is valid and renders
/// with a derived callback and empty columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    /// Alternative names for the command.
    pub aliases: Vec<String>,
    /// Callback identifier. When absent, `run_<name>` is derived at
    /// projection time (hyphens replaced with underscores).
    pub callback: Option<String>,
    /// One-line description.
    pub description: Option<String>,
    /// Positional arguments: name to description, in declaration order.
    pub arguments: IndexMap<String, String>,
    /// Options: name to help text, in declaration order.
    pub options: IndexMap<String, OptionHelp>,
    /// Example invocations: invocation to explanation, in declaration order.
    pub examples: IndexMap<String, String>,
}

impl CommandDescriptor {
    /// Build a descriptor from an untyped value, degrading gracefully.
    ///
    /// The value is expected to be a mapping; any field with an
    /// unexpected shape is dropped silently. A non-mapping value
    /// produces the default (empty) descriptor.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        Self {
            aliases: map.get("aliases").map_or_else(Vec::new, string_seq),
            callback: map.get("callback").and_then(as_string),
            description: map.get("description").and_then(as_string),
            arguments: map
                .get("arguments")
                .map_or_else(IndexMap::new, string_entries),
            options: map.get("options").map_or_else(IndexMap::new, option_entries),
            examples: map
                .get("examples")
                .map_or_else(IndexMap::new, string_entries),
        }
    }
}

/// Ingest a full command registration value.
///
/// Returns `None` when the top-level value is not a mapping; the caller
/// reports that as a warning. Each entry becomes a `(name, descriptor)`
/// pair in the mapping's insertion order.
pub fn ingest_commands(value: &Value) -> Option<IndexMap<String, CommandDescriptor>> {
    let map = value.as_object()?;

    Some(
        map.iter()
            .map(|(name, entry)| (name.clone(), CommandDescriptor::from_value(entry)))
            .collect(),
    )
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(ToString::to_string)
}

/// A sequence of strings; non-string elements are skipped.
fn string_seq(value: &Value) -> Vec<String> {
    value.as_array().map_or_else(Vec::new, |items| {
        items.iter().filter_map(as_string).collect()
    })
}

/// A mapping of string to string; wrong-typed values are skipped.
fn string_entries(value: &Value) -> IndexMap<String, String> {
    value.as_object().map_or_else(IndexMap::new, |map| {
        map.iter()
            .filter_map(|(key, val)| Some((key.clone(), as_string(val)?)))
            .collect()
    })
}

/// Option help entries: strings and string sequences are accepted,
/// anything else is skipped.
fn option_entries(value: &Value) -> IndexMap<String, OptionHelp> {
    value.as_object().map_or_else(IndexMap::new, |map| {
        map.iter()
            .filter_map(|(key, val)| {
                let help = match val {
                    Value::String(text) => OptionHelp::Text(text.clone()),
                    Value::Array(items) => {
                        OptionHelp::Choices(items.iter().filter_map(as_string).collect())
                    }
                    _ => return None,
                };
                Some((key.clone(), help))
            })
            .collect()
    })
}
