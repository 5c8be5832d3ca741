//! Console table for a class.
//!
//! ```text
//! Class: Triangle
//!        Name | First | Second | Third
//! ------------------------------------
//! EQUILATERAL |     6 |      6 |     6
//!       RIGHT |     3 |      4 |     5
//! ```
//!
//! Every cell is right-aligned to the widest header or value in its column, and the
//! dashed line is as long as the header line. A class without fields gets a single
//! `Value` column.

use std::{borrow::Cow, fmt::Write};

use crate::{
    class::NamedEnum,
    exception::EnumResult,
    io::{PrintWriter, StdPrint},
    value::Value,
};

impl NamedEnum {
    /// Prints [`table`](Self::table) to stdout.
    pub fn describe(&self) -> EnumResult<()> {
        self.describe_to(&mut StdPrint)
    }

    /// Prints [`table`](Self::table) to `print`, followed by a newline.
    pub fn describe_to(&self, print: &mut impl PrintWriter) -> EnumResult<()> {
        print.stdout_write(Cow::Owned(self.table()))?;
        print.stdout_push('\n')
    }

    /// Renders the table: the class line, header, dashes and one row per registered name.
    #[must_use]
    pub fn table(&self) -> String {
        let headers: Vec<&str> = if self.has_fields() {
            self.fields().iter().map(String::as_str).collect()
        } else {
            vec!["value"]
        };

        let rows: Vec<(&str, Vec<String>)> = self
            .pairs()
            .map(|(name, value)| (name, row_cells(value, self.has_fields())))
            .collect();

        let mut widths = Vec::with_capacity(headers.len() + 1);
        widths.push(column_width("name", rows.iter().map(|(name, _)| *name)));
        for (col, header) in headers.iter().enumerate() {
            widths.push(column_width(
                header,
                rows.iter().filter_map(|(_, cells)| cells.get(col).map(String::as_str)),
            ));
        }

        let mut header_cells = vec![capitalize("name")];
        header_cells.extend(headers.iter().map(|header| capitalize(header)));
        let header_line = format_row(header_cells.iter().map(String::as_str), &widths);

        let mut output = format!("Class: {}\n", self.name());
        output.push_str(&header_line);
        output.push('\n');
        output.push_str(&"-".repeat(header_line.chars().count()));
        output.push('\n');
        for (name, cells) in &rows {
            let line = format_row(std::iter::once(*name).chain(cells.iter().map(String::as_str)), &widths);
            output.push_str(&line);
            output.push('\n');
        }
        output
    }
}

/// Stringified cells for one row: each record field, or the whole value.
fn row_cells(value: &Value, has_fields: bool) -> Vec<String> {
    match (has_fields, value.sequence_items()) {
        (true, Some(items)) => items.iter().map(ToString::to_string).collect(),
        _ => vec![value.to_string()],
    }
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|cell| cell.chars().count())
        .fold(header.chars().count(), usize::max)
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, (cell, &width)) in cells.zip(widths).enumerate() {
        if idx > 0 {
            line.push_str(" | ");
        }
        // writing into a String cannot fail
        let _ = write!(line, "{cell:>width$}");
    }
    line
}

/// First character uppercased, the rest lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
