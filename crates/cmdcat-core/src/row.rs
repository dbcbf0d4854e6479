//! Projection of command descriptors into fixed seven-column rows.

use crate::descriptor::CommandDescriptor;
use serde::Serialize;

/// One rendered command: seven ordered string fields.
///
/// The field order is fixed and identical across all sections; it
/// matches [`CommandRow::COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRow {
    /// The command name, unmodified.
    pub name: String,
    /// Aliases joined with `", "`, or empty.
    pub aliases: String,
    /// The registered callback, or the derived `run_*` default.
    pub callback: String,
    /// The description, or empty.
    pub description: String,
    /// One `<name>: <description>` line per argument.
    pub arguments: String,
    /// One `<name>: <help>` line per option.
    pub options: String,
    /// Example invocations, each a heading line followed by its
    /// explanation, separated by blank lines.
    pub examples: String,
}

impl CommandRow {
    /// The fixed column header shared by every rendering of the catalog.
    pub const COLUMNS: [&'static str; 7] = [
        "Command",
        "Aliases",
        "Callback",
        "Description",
        "Arguments",
        "Options",
        "Examples",
    ];

    /// Project a descriptor into its row.
    pub fn project(name: &str, descriptor: &CommandDescriptor) -> Self {
        Self {
            name: name.to_string(),
            aliases: descriptor.aliases.join(", "),
            callback: descriptor
                .callback
                .clone()
                .unwrap_or_else(|| derive_callback(name)),
            description: descriptor.description.clone().unwrap_or_default(),
            arguments: format_detail_lines(
                descriptor.arguments.iter().map(|(k, v)| (k.as_str(), v.clone())),
            ),
            options: format_detail_lines(
                descriptor
                    .options
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.to_line())),
            ),
            examples: format_examples(&descriptor.examples),
        }
    }

    /// The row as an ordered field slice, aligned with [`Self::COLUMNS`].
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.name,
            &self.aliases,
            &self.callback,
            &self.description,
            &self.arguments,
            &self.options,
            &self.examples,
        ]
    }
}

/// Default callback name for a command without an explicit one.
pub fn derive_callback(name: &str) -> String {
    format!("run_{}", name.replace('-', "_"))
}

/// `<key>: <value>` lines, one per entry, in iteration order.
fn format_detail_lines<'a>(entries: impl Iterator<Item = (&'a str, String)>) -> String {
    entries
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Example blocks: the invocation as a heading line, the explanation
/// beneath it, blank line between entries.
fn format_examples(examples: &indexmap::IndexMap<String, String>) -> String {
    examples
        .iter()
        .map(|(invocation, explanation)| format!("{invocation}\n{explanation}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
