//! Catalog renderers.
//!
//! Each renderer consumes a built [`Catalog`] and writes to any
//! `io::Write`. Warnings are part of the JSON output; the other
//! formats leave them to the caller (the CLI prints them to stderr).

use anyhow::Result;
use cmdcat_core::{Catalog, CatalogSection, CommandRow};
use serde::Serialize;
use std::io::Write;

/// Per-cell separator used when flattening multi-line cells for the
/// aligned text format.
const LINE_JOIN: &str = "; ";

/// Write each section as a width-aligned text table.
pub fn write_text<W: Write>(catalog: &Catalog, writer: &mut W) -> Result<()> {
    for (i, section) in catalog.sections.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }

        writeln!(writer, "{} ({})", section.title, section.extension)?;
        writeln!(writer, "{}", "=".repeat(section.title.len() + section.extension.len() + 3))?;

        let cells: Vec<[String; 7]> = section
            .rows
            .iter()
            .map(|row| row.fields().map(flatten_cell))
            .collect();

        // Column widths from the header and every cell
        let mut widths: Vec<usize> = CommandRow::COLUMNS.iter().map(|c| c.len()).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        for (i, col) in CommandRow::COLUMNS.iter().enumerate() {
            if i > 0 {
                write!(writer, "  ")?;
            }
            write!(writer, "{:width$}", col, width = widths[i])?;
        }
        writeln!(writer)?;

        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                write!(writer, "  ")?;
            }
            write!(writer, "{}", "-".repeat(*width))?;
        }
        writeln!(writer)?;

        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(writer, "  ")?;
                }
                write!(writer, "{:width$}", cell, width = widths[i])?;
            }
            writeln!(writer)?;
        }

        writeln!(writer)?;
        writeln!(writer, "{} command(s)", section.rows.len())?;
    }

    Ok(())
}

/// Write the whole catalog as one CSV stream.
///
/// An `Extension` column is prepended so rows from different sections
/// stay distinguishable.
pub fn write_csv<W: Write>(catalog: &Catalog, writer: &mut W) -> Result<()> {
    let mut header = vec!["Extension"];
    header.extend(CommandRow::COLUMNS);
    writeln!(writer, "{}", header.join(","))?;

    for section in &catalog.sections {
        for row in &section.rows {
            let mut values = vec![escape_csv(&section.extension)];
            values.extend(row.fields().iter().map(|f| escape_csv(f)));
            writeln!(writer, "{}", values.join(","))?;
        }
    }

    Ok(())
}

/// JSON output structure for the full catalog.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    /// All catalog sections, in extension order.
    sections: &'a [CatalogSection],
    /// Rendered warning messages.
    warnings: Vec<String>,
}

/// Write the catalog, warnings included, as pretty-printed JSON.
pub fn write_json<W: Write>(catalog: &Catalog, writer: &mut W) -> Result<()> {
    let output = JsonOutput {
        sections: &catalog.sections,
        warnings: catalog.warnings.iter().map(ToString::to_string).collect(),
    };

    writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

/// Write the catalog as an HTML fragment, one `<section>` per
/// extension with a seven-column table.
pub fn write_html<W: Write>(catalog: &Catalog, writer: &mut W) -> Result<()> {
    for section in &catalog.sections {
        writeln!(writer, "<section id=\"{}\">", escape_html(&section.extension))?;
        writeln!(writer, "<h2>{}</h2>", escape_html(&section.title))?;
        writeln!(writer, "<table>")?;

        write!(writer, "<tr>")?;
        for col in CommandRow::COLUMNS {
            write!(writer, "<th>{col}</th>")?;
        }
        writeln!(writer, "</tr>")?;

        for row in &section.rows {
            write!(writer, "<tr>")?;
            write!(writer, "<td>{}</td>", escape_html(&row.name))?;
            write!(writer, "<td>{}</td>", escape_html(&row.aliases))?;
            write!(writer, "<td>{}</td>", escape_html(&row.callback))?;
            write!(writer, "<td>{}</td>", escape_html(&row.description))?;
            write!(writer, "<td>{}</td>", html_detail(&row.arguments))?;
            write!(writer, "<td>{}</td>", html_detail(&row.options))?;
            write!(writer, "<td>{}</td>", html_examples(&row.examples))?;
            writeln!(writer, "</tr>")?;
        }

        writeln!(writer, "</table>")?;
        writeln!(writer, "</section>")?;
    }

    Ok(())
}

fn flatten_cell(cell: &str) -> String {
    cell.split('\n')
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(LINE_JOIN)
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `key: value` lines become `<strong>key</strong>: value` joined by
/// `<br />`.
fn html_detail(cell: &str) -> String {
    cell.lines()
        .map(|line| match line.split_once(": ") {
            Some((key, value)) => {
                format!("<strong>{}</strong>: {}", escape_html(key), escape_html(value))
            }
            None => escape_html(line),
        })
        .collect::<Vec<_>>()
        .join("<br />")
}

/// Example blocks: the invocation as an `<h3><code>` heading, the
/// explanation after it.
fn html_examples(cell: &str) -> String {
    if cell.is_empty() {
        return String::new();
    }

    cell.split("\n\n")
        .map(|block| match block.split_once('\n') {
            Some((invocation, explanation)) => format!(
                "<h3><code>{}</code></h3>{}",
                escape_html(invocation),
                escape_html(explanation)
            ),
            None => format!("<h3><code>{}</code></h3>", escape_html(block)),
        })
        .collect::<Vec<_>>()
        .join("<br />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdcat_core::{CatalogSection, CommandDescriptor, CommandRow, OptionHelp};
    use indexmap::IndexMap;

    fn sample_catalog() -> Catalog {
        let mut options = IndexMap::new();
        options.insert(
            "verbose".to_string(),
            OptionHelp::Choices(vec!["on".to_string(), "off".to_string()]),
        );
        let mut examples = IndexMap::new();
        examples.insert("foo now".to_string(), "Runs foo immediately".to_string());

        let descriptor = CommandDescriptor {
            aliases: vec!["f".to_string()],
            description: Some("Foos things".to_string()),
            options,
            examples,
            ..Default::default()
        };

        Catalog {
            sections: vec![CatalogSection {
                extension: "tools".to_string(),
                title: "Tools".to_string(),
                rows: vec![CommandRow::project("foo", &descriptor)],
            }],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn text_output_has_header_and_row() {
        let mut out = Vec::new();
        write_text(&sample_catalog(), &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("Tools (tools)"));
        assert!(text.contains("Command"));
        assert!(text.contains("run_foo"));
        assert!(text.contains("verbose: on, off"));
        assert!(text.contains("1 command(s)"));
    }

    #[test]
    fn csv_output_prepends_extension_column() {
        let mut out = Vec::new();
        write_csv(&sample_catalog(), &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Extension,Command,Aliases,Callback,Description,Arguments,Options,Examples")
        );
        let row = lines.next().expect("one data row");
        assert!(row.starts_with("tools,foo,f,run_foo,"));
        // The examples cell contains a newline, so it must be quoted.
        assert!(text.contains("\"foo now\nRuns foo immediately\""));
    }

    #[test]
    fn json_output_includes_sections_and_warnings() {
        let mut catalog = sample_catalog();
        catalog.warnings.push(cmdcat_core::BuildWarning::Manifest {
            extension: "ghost".to_string(),
            issue: cmdcat_core::ManifestIssue::Unreadable("gone".to_string()),
        });

        let mut out = Vec::new();
        write_json(&catalog, &mut out).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");

        assert_eq!(value["sections"][0]["extension"], "tools");
        assert_eq!(value["sections"][0]["rows"][0]["name"], "foo");
        let warning = value["warnings"][0].as_str().expect("warning string");
        assert!(warning.contains("ghost"));
    }

    #[test]
    fn html_output_marks_up_details_and_examples() {
        let mut out = Vec::new();
        write_html(&sample_catalog(), &mut out).expect("render");
        let html = String::from_utf8(out).expect("utf8");

        assert!(html.contains("<section id=\"tools\">"));
        assert!(html.contains("<h2>Tools</h2>"));
        assert!(html.contains("<strong>verbose</strong>: on, off"));
        assert!(html.contains("<h3><code>foo now</code></h3>Runs foo immediately"));
    }

    #[test]
    fn html_escapes_interpolated_text() {
        let descriptor = CommandDescriptor {
            description: Some("<script>alert()</script>".to_string()),
            ..Default::default()
        };
        let catalog = Catalog {
            sections: vec![CatalogSection {
                extension: "x".to_string(),
                title: "A & B".to_string(),
                rows: vec![CommandRow::project("x-cmd", &descriptor)],
            }],
            warnings: Vec::new(),
        };

        let mut out = Vec::new();
        write_html(&catalog, &mut out).expect("render");
        let html = String::from_utf8(out).expect("utf8");

        assert!(html.contains("A &amp; B"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_catalog_renders_nothing() {
        let catalog = Catalog::default();

        let mut out = Vec::new();
        write_text(&catalog, &mut out).expect("render");
        assert!(out.is_empty());

        let mut out = Vec::new();
        write_html(&catalog, &mut out).expect("render");
        assert!(out.is_empty());
    }
}
