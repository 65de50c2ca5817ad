use std::io::Write;

use colored::Colorize;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

use crate::format::Cell;

/// Errors returned while writing rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for a lease report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Display,
    Json,
    Csv,
}

/// Writes a header row and data rows in one output format.
pub trait Renderer {
    fn render(
        &self,
        headers: &[&str],
        rows: &[Vec<Cell>],
        out: &mut dyn Write,
    ) -> Result<(), RenderError>;
}

/// Pick the renderer for `format`. `color` only affects [`Format::Display`].
pub fn renderer_for(format: Format, color: bool) -> Box<dyn Renderer> {
    match format {
        Format::Display => Box::new(TableRenderer { color }),
        Format::Json => Box::new(JsonRenderer),
        Format::Csv => Box::new(CsvRenderer),
    }
}

/// Bordered text table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    pub color: bool,
}

impl TableRenderer {
    fn paint_header(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_cell(&self, cell: &Cell) -> String {
        if self.color && cell.is_diagnostic() {
            cell.to_string().yellow().to_string()
        } else {
            cell.to_string()
        }
    }
}

impl Renderer for TableRenderer {
    fn render(
        &self,
        headers: &[&str],
        rows: &[Vec<Cell>],
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let plain: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &plain {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        writeln!(out, "{border}")?;
        let header_line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(&self.paint_header(h), h.chars().count(), *w))
            .collect();
        writeln!(out, "| {} |", header_line.join(" | "))?;
        writeln!(out, "{border}")?;

        if rows.is_empty() {
            return Ok(());
        }
        for (row, plain_row) in rows.iter().zip(&plain) {
            let line: Vec<String> = row
                .iter()
                .zip(plain_row)
                .zip(&widths)
                .map(|((cell, text), w)| pad(&self.paint_cell(cell), text.chars().count(), *w))
                .collect();
            writeln!(out, "| {} |", line.join(" | "))?;
        }
        writeln!(out, "{border}")?;
        Ok(())
    }
}

// `visible` is the printed width of `text`, which may carry color escapes.
fn pad(text: &str, visible: usize, width: usize) -> String {
    format!("{text}{}", " ".repeat(width.saturating_sub(visible)))
}

/// Pretty-printed JSON array of objects keyed by header.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

struct JsonRow<'a> {
    headers: &'a [&'a str],
    cells: &'a [Cell],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

impl Renderer for JsonRenderer {
    fn render(
        &self,
        headers: &[&str],
        rows: &[Vec<Cell>],
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let objects: Vec<JsonRow<'_>> = rows
            .iter()
            .map(|cells| JsonRow { headers, cells })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &objects)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Comma-separated values with a header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn render(
        &self,
        headers: &[&str],
        rows: &[Vec<Cell>],
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row.iter().map(ToString::to_string))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{renderer_for, Format};
    use crate::format::{Cell, Field};
    use pretty_assertions::assert_eq;

    const HEADERS: [&str; 3] = ["ID", "Address", "Host"];

    fn rows() -> Vec<Vec<Cell>> {
        vec![
            vec![
                Cell::Integer(1),
                Cell::Field(Field::Value("10.0.0.1".to_string())),
                Cell::Text("alpha".to_string()),
            ],
            vec![
                Cell::Integer(22),
                Cell::Field(Field::Diagnostic("Invalid IP: -1".to_string())),
                Cell::Text("b, \"quoted\"".to_string()),
            ],
        ]
    }

    fn render(format: Format, rows: &[Vec<Cell>]) -> String {
        let mut out = Vec::new();
        renderer_for(format, false)
            .render(&HEADERS, rows, &mut out)
            .expect("render");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn table_has_borders_and_aligned_columns() {
        let expected = "\
+----+----------------+-------------+
| ID | Address        | Host        |
+----+----------------+-------------+
| 1  | 10.0.0.1       | alpha       |
| 22 | Invalid IP: -1 | b, \"quoted\" |
+----+----------------+-------------+
";
        assert_eq!(render(Format::Display, &rows()), expected);
    }

    #[test]
    fn empty_table_shows_headers_only() {
        let expected = "\
+----+---------+------+
| ID | Address | Host |
+----+---------+------+
";
        assert_eq!(render(Format::Display, &[]), expected);
    }

    #[test]
    fn json_keeps_header_order_and_numbers() {
        let expected = r#"[
  {
    "ID": 1,
    "Address": "10.0.0.1",
    "Host": "alpha"
  },
  {
    "ID": 22,
    "Address": "Invalid IP: -1",
    "Host": "b, \"quoted\""
  }
]
"#;
        assert_eq!(render(Format::Json, &rows()), expected);
    }

    #[test]
    fn empty_json_is_empty_array() {
        assert_eq!(render(Format::Json, &[]), "[]\n");
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        let expected = "ID,Address,Host\n1,10.0.0.1,alpha\n22,Invalid IP: -1,\"b, \"\"quoted\"\"\"\n";
        assert_eq!(render(Format::Csv, &rows()), expected);
    }

    #[test]
    fn empty_csv_is_header_line() {
        assert_eq!(render(Format::Csv, &[]), "ID,Address,Host\n");
    }
}
