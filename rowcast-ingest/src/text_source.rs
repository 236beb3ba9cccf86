//! Delimited text tables headed by a leaf-list descriptor.
//!
//! The first line that is neither blank nor a comment declares the fields as a
//! colon-separated leaf list, e.g. `run/I:th_x/F:th_y/F:valid/O`. Every following line
//! is one row with one cell per field. Cells are separated by whitespace unless a
//! delimiter is configured; with a delimiter, double-quoted cells may contain it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rowcast_column_store::{ScalarKind, ScalarValue};
use rowcast_result::{Error, Result};

use crate::field::FieldDecl;
use crate::source::{DataSource, SourceTable, StagingBuffers};

#[derive(Debug, Clone)]
pub struct TextSourceOptions {
    /// Cell delimiter. `None` splits on runs of whitespace.
    pub delimiter: Option<char>,
    /// Lines starting with this character are skipped.
    pub comment_prefix: char,
    /// Name the single table is exposed under. Defaults to the file stem.
    pub table_name: Option<String>,
}

impl Default for TextSourceOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            comment_prefix: '#',
            table_name: None,
        }
    }
}

/// A text file exposing exactly one table.
#[derive(Debug, Clone)]
pub struct TextSource {
    path: PathBuf,
    options: TextSourceOptions,
    table_name: String,
    fields: Vec<FieldDecl>,
}

impl TextSource {
    /// Open `path` and parse its header.
    ///
    /// Fails with [`Error::SourceOpen`] if the file cannot be read, has no header, or
    /// declares an array-valued leaf.
    pub fn open(path: impl AsRef<Path>, options: TextSourceOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_reader(&path)?;
        let mut buf = String::new();
        let mut line_no = 0usize;
        let header = next_content_line(&mut reader, &mut buf, &mut line_no, options.comment_prefix)
            .map_err(|err| open_error(&path, err))?
            .ok_or_else(|| open_error(&path, "missing leaf-list header"))?;
        let fields = parse_leaf_list(header).map_err(|reason| open_error(&path, reason))?;

        let table_name = match &options.table_name {
            Some(name) => name.clone(),
            None => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        tracing::debug!(
            path = %path.display(),
            table = %table_name,
            fields = fields.len(),
            "opened text source"
        );

        Ok(Self {
            path,
            options,
            table_name,
            fields,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}

impl DataSource for TextSource {
    fn open_table(&self, name: &str) -> Result<Box<dyn SourceTable + '_>> {
        if name != self.table_name {
            return Err(open_error(
                &self.path,
                format!("table '{name}' not found (file holds '{}')", self.table_name),
            ));
        }

        let num_rows = count_rows(&self.path, self.options.comment_prefix)
            .map_err(|err| open_error(&self.path, err))?;

        let mut reader = open_reader(&self.path)?;
        let mut buf = String::new();
        let mut line_no = 0usize;
        // Position the reader after the header.
        next_content_line(&mut reader, &mut buf, &mut line_no, self.options.comment_prefix)
            .map_err(|err| open_error(&self.path, err))?;

        Ok(Box::new(TextTable {
            source: self,
            reader,
            buf,
            line_no,
            next_row: 0,
            num_rows,
        }))
    }
}

struct TextTable<'a> {
    source: &'a TextSource,
    reader: BufReader<File>,
    buf: String,
    line_no: usize,
    next_row: u64,
    num_rows: u64,
}

impl SourceTable for TextTable<'_> {
    fn name(&self) -> &str {
        &self.source.table_name
    }

    fn fields(&self) -> &[FieldDecl] {
        &self.source.fields
    }

    fn num_rows(&self) -> u64 {
        self.num_rows
    }

    fn read_row(&mut self, row: u64, buffers: &mut StagingBuffers) -> Result<()> {
        if row != self.next_row {
            return Err(Error::SourceRead(format!(
                "rows must be read in order: expected row {}, got {row}",
                self.next_row
            )));
        }

        let prefix = self.source.options.comment_prefix;
        let line = next_content_line(&mut self.reader, &mut self.buf, &mut self.line_no, prefix)
            .map_err(Error::source_read)?
            .ok_or_else(|| Error::SourceRead(format!("row {row} is past the end of the file")))?;

        let cells = match self.source.options.delimiter {
            Some(delim) => split_delimited(line, delim),
            None => line.split_whitespace().collect(),
        };
        let fields = &self.source.fields;
        if cells.len() != fields.len() {
            return Err(Error::SourceRead(format!(
                "line {}: expected {} cells, found {}",
                self.line_no,
                fields.len(),
                cells.len()
            )));
        }

        for (field_index, cell) in cells.iter().enumerate() {
            let Some(kind) = buffers.bound_kind(field_index) else {
                continue;
            };
            let value = parse_cell(cell, kind).ok_or_else(|| {
                Error::SourceRead(format!(
                    "line {}, field '{}': cannot parse '{}' as {kind}",
                    self.line_no, fields[field_index].name, cell
                ))
            })?;
            buffers.put(field_index, value)?;
        }

        self.next_row += 1;
        Ok(())
    }
}

fn open_reader(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| open_error(path, err))
}

fn open_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::SourceOpen(format!("{}: {reason}", path.display()))
}

/// Read lines into `buf` until one is neither blank nor a comment.
fn next_content_line<'b>(
    reader: &mut impl BufRead,
    buf: &'b mut String,
    line_no: &mut usize,
    comment_prefix: char,
) -> std::io::Result<Option<&'b str>> {
    loop {
        buf.clear();
        if reader.read_line(buf)? == 0 {
            return Ok(None);
        }
        *line_no += 1;
        let line = buf.trim();
        if !line.is_empty() && !line.starts_with(comment_prefix) {
            break;
        }
    }
    Ok(Some(buf.trim()))
}

fn count_rows(path: &Path, comment_prefix: char) -> std::io::Result<u64> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = String::new();
    let mut line_no = 0usize;
    let mut content_lines = 0u64;
    while next_content_line(&mut reader, &mut buf, &mut line_no, comment_prefix)?.is_some() {
        content_lines += 1;
    }
    // The header is not a row.
    Ok(content_lines.saturating_sub(1))
}

fn parse_leaf_list(header: &str) -> std::result::Result<Vec<FieldDecl>, String> {
    header
        .split(':')
        .map(str::trim)
        .map(|descriptor| {
            if descriptor.is_empty() {
                return Err("empty leaf descriptor".to_string());
            }
            if descriptor.contains('[') {
                return Err(format!("array-valued leaf '{descriptor}' is not supported"));
            }
            let name = descriptor
                .split_once('/')
                .map_or(descriptor, |(name, _)| name);
            Ok(FieldDecl::leaf(name, descriptor))
        })
        .collect()
}

fn parse_cell(cell: &str, kind: ScalarKind) -> Option<ScalarValue> {
    let cell = cell.trim();
    match kind {
        ScalarKind::Int32 => cell.parse().ok().map(ScalarValue::Int32),
        ScalarKind::UInt32 => cell.parse().ok().map(ScalarValue::UInt32),
        ScalarKind::Float32 => cell.parse().ok().map(ScalarValue::Float32),
        ScalarKind::Float64 => cell.parse().ok().map(ScalarValue::Float64),
        ScalarKind::Bool => parse_bool(cell).map(ScalarValue::Bool),
        ScalarKind::Text => Some(ScalarValue::Text(unquote(cell).to_string())),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "1" => Some(true),
        "0" => Some(false),
        _ if cell.eq_ignore_ascii_case("true") => Some(true),
        _ if cell.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn unquote(cell: &str) -> &str {
    if cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"') {
        &cell[1..cell.len() - 1]
    } else {
        cell
    }
}

/// Split `line` on `delim`, ignoring delimiters inside double quotes.
pub(crate) fn split_delimited(line: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek().is_some_and(|&(_, next)| next == '"') {
                chars.next();
                continue;
            }
            in_quotes = !in_quotes;
        } else if c == delim && !in_quotes {
            parts.push(&line[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&line[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_list_names_strip_type_codes() {
        let fields = parse_leaf_list("run/I: th_x/F :flag").unwrap();
        assert_eq!(
            fields,
            vec![
                FieldDecl::leaf("run", "run/I"),
                FieldDecl::leaf("th_x", "th_x/F"),
                FieldDecl::leaf("flag", "flag"),
            ]
        );
        assert!(parse_leaf_list("a/I::b/F").is_err());
        assert!(parse_leaf_list("hits[3]/F").is_err());
    }

    #[test]
    fn split_respects_quotes() {
        assert_eq!(split_delimited("1,\"a,b\",3", ','), vec!["1", "\"a,b\"", "3"]);
        assert_eq!(split_delimited("1,,3", ','), vec!["1", "", "3"]);
        assert_eq!(split_delimited("\"x\"\"y\";2", ';'), vec!["\"x\"\"y\"", "2"]);
    }

    #[test]
    fn cells_parse_per_kind() {
        assert_eq!(parse_cell("-3", ScalarKind::Int32), Some(ScalarValue::Int32(-3)));
        assert_eq!(parse_cell("-3", ScalarKind::UInt32), None);
        assert_eq!(parse_cell("1e-3", ScalarKind::Float64), Some(ScalarValue::Float64(1e-3)));
        assert_eq!(parse_cell("TRUE", ScalarKind::Bool), Some(ScalarValue::Bool(true)));
        assert_eq!(parse_cell("0", ScalarKind::Bool), Some(ScalarValue::Bool(false)));
        assert_eq!(parse_cell("yes", ScalarKind::Bool), None);
        assert_eq!(
            parse_cell("\"hi\"", ScalarKind::Text),
            Some(ScalarValue::Text("hi".into()))
        );
    }
}
