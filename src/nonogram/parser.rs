#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A reader and writer for the `.non` text puzzle format.
//!
//! ```text
//! # comments start with a hash
//! title "Cross"
//! width 3
//! height 3
//!
//! rows
//! 1
//! 3
//! 1
//!
//! columns
//! 1
//! 3
//! 1
//! ```
//!
//! Each line inside `rows` or `columns` is one clue, runs separated by commas.
//! A line holding `0`, or a blank line while the section is still short of its
//! dimension, is an empty clue. A section ends at the next keyword. Keywords the
//! reader does not know (`author`, `copyright`, `goal`, ...) are skipped.

use crate::nonogram::error::ParseError;
use crate::nonogram::model::{Clue, PuzzleModel};
use itertools::Itertools;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Rows,
    Columns,
}

/// A clue line as read, remembering whether it was blank.
struct Entry {
    clue: Clue,
    blank: bool,
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

fn parse_dimension(line: usize, key: &str, value: Option<&str>) -> Result<usize, ParseError> {
    let value = value.ok_or_else(|| syntax(line, format!("`{key}` needs a value")))?;
    value
        .parse::<usize>()
        .map_err(|_| syntax(line, format!("`{key}` must be a non-negative integer, got `{value}`")))
}

fn parse_clue(line: usize, text: &str) -> Result<Clue, ParseError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.starts_with('-') {
                return Err(syntax(line, format!("run lengths cannot be negative, got `{t}`")));
            }
            t.parse::<u32>()
                .map_err(|_| syntax(line, format!("`{t}` is not a run length")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Clue::from)
}

/// Drops blank entries past `expected` from the end of a section.
fn finish_section(mut entries: Vec<Entry>, expected: Option<usize>) -> Vec<Clue> {
    while entries.last().is_some_and(|e| e.blank) && expected.is_some_and(|n| entries.len() > n) {
        entries.pop();
    }
    if expected.is_none() {
        while entries.last().is_some_and(|e| e.blank) {
            entries.pop();
        }
    }
    entries.into_iter().map(|e| e.clue).collect()
}

/// Parses a `.non` document.
///
/// When `title` is absent the puzzle is named `default_name`. A missing `width`
/// or `height` is taken from the number of clues in the matching section.
///
/// # Errors
///
/// On malformed lines, negative run lengths, a missing `rows` or `columns`
/// section, or a puzzle that fails validation.
pub fn parse_nonogram(input: &str, default_name: &str) -> Result<PuzzleModel, ParseError> {
    let mut name: Option<String> = None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let mut rows: Option<Vec<Entry>> = None;
    let mut cols: Option<Vec<Entry>> = None;
    let mut section = Section::Header;
    let mut last_line = 0;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();

        if line.starts_with('#') {
            continue;
        }

        let is_clue_line =
            line.is_empty() || line.starts_with(|c: char| c.is_ascii_digit() || c == '-');
        if is_clue_line {
            let target = match section {
                Section::Rows => rows.as_mut(),
                Section::Columns => cols.as_mut(),
                Section::Header => None,
            };
            match target {
                Some(entries) => entries.push(Entry {
                    clue: parse_clue(line_no, line)?,
                    blank: line.is_empty(),
                }),
                None if line.is_empty() => {}
                None => {
                    return Err(syntax(line_no, "clue outside of a `rows` or `columns` section"));
                }
            }
            continue;
        }

        let (key, value) = line
            .split_once(char::is_whitespace)
            .map_or((line, None), |(k, v)| (k, Some(v.trim())));

        section = Section::Header;
        match key {
            "title" => {
                name = value.map(|v| v.trim_matches('"').to_string());
            }
            "width" => width = Some(parse_dimension(line_no, key, value)?),
            "height" => height = Some(parse_dimension(line_no, key, value)?),
            "rows" => {
                if rows.is_some() {
                    return Err(syntax(line_no, "duplicate `rows` section"));
                }
                rows = Some(Vec::new());
                section = Section::Rows;
            }
            "columns" => {
                if cols.is_some() {
                    return Err(syntax(line_no, "duplicate `columns` section"));
                }
                cols = Some(Vec::new());
                section = Section::Columns;
            }
            other => debug!(line = line_no, keyword = other, "skipping unknown keyword"),
        }
    }

    let rows = finish_section(
        rows.ok_or_else(|| syntax(last_line, "missing `rows` section"))?,
        height,
    );
    let cols = finish_section(
        cols.ok_or_else(|| syntax(last_line, "missing `columns` section"))?,
        width,
    );

    Ok(PuzzleModel::new(
        name.unwrap_or_else(|| default_name.to_string()),
        width.unwrap_or(cols.len()),
        height.unwrap_or(rows.len()),
        rows,
        cols,
    )?)
}

/// Reads and parses a `.non` file, naming the puzzle after the file stem when
/// it carries no title.
///
/// # Errors
///
/// See [`parse_nonogram`]; I/O failures are reported as [`ParseError::Io`].
pub fn parse_nonogram_file(path: impl AsRef<Path>) -> Result<PuzzleModel, ParseError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map_or_else(|| "nonogram".to_string(), |s| s.to_string_lossy().into_owned());
    parse_nonogram(&content, &stem)
}

fn write_clue(out: &mut String, clue: &Clue) {
    let _ = writeln!(out, "{}", clue.runs().iter().join(","));
}

/// Renders `model` in the `.non` format. Empty clues are written as `0`.
#[must_use]
pub fn to_non(model: &PuzzleModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title \"{}\"", model.name());
    let _ = writeln!(out, "width {}", model.width());
    let _ = writeln!(out, "height {}", model.height());
    out.push_str("\nrows\n");
    for clue in model.rows() {
        if clue.is_empty() {
            out.push_str("0\n");
        } else {
            write_clue(&mut out, clue);
        }
    }
    out.push_str("\ncolumns\n");
    for clue in model.cols() {
        if clue.is_empty() {
            out.push_str("0\n");
        } else {
            write_clue(&mut out, clue);
        }
    }
    out
}
