//! Record line codec
//!
//! One record per line, fields joined by [`DELIMITER`]. A line starting with
//! [`TOMBSTONE`] is logically deleted and keeps its original bytes after the
//! marker. Fields are never escaped, so a value containing the delimiter
//! shifts every later column on the next read.
//!
//! Lines and fields are handled as raw bytes. Text is only decoded when a
//! record is handed out, so a line that is not valid UTF-8 survives a
//! rewrite unchanged.

/// Field separator inside a record line
pub const DELIMITER: u8 = b',';

/// Marker prefixed to a deleted record line
pub const TOMBSTONE: u8 = b'#';

/// A record is the ordered list of its field values
pub type Record = Vec<String>;

/// Classification of one physical line of a table file
#[derive(Debug, PartialEq)]
pub enum Line<'a> {
    Blank,
    Tombstone(&'a [u8]),
    Live(&'a [u8]),
}

impl<'a> Line<'a> {
    pub fn classify(line: &'a [u8]) -> Self {
        match line.first() {
            None => Line::Blank,
            Some(&TOMBSTONE) => Line::Tombstone(line),
            Some(_) => Line::Live(line),
        }
    }
}

/// Splits file content into lines the way a line reader sees them: a final
/// newline does not produce a trailing empty line.
pub fn lines(content: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = content.split(|b| *b == b'\n').collect();
    if content.is_empty() || content.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

/// Splits a live line into raw fields.
///
/// A trailing delimiter does not yield a trailing empty field, so `a,b,`
/// reads as two fields.
pub fn split_fields(line: &[u8]) -> Vec<&[u8]> {
    let mut fields: Vec<&[u8]> = line.split(|b| *b == DELIMITER).collect();
    if line.ends_with(&[DELIMITER]) {
        fields.pop();
    }
    fields
}

/// Decodes raw fields into a record. Invalid UTF-8 is replaced with U+FFFD.
pub fn decode(fields: &[&[u8]]) -> Record {
    fields
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

pub fn join_fields<S: AsRef<[u8]>>(fields: &[S]) -> Vec<u8> {
    let mut line = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.extend_from_slice(field.as_ref());
    }
    line
}

/// Prefixes the tombstone marker, keeping the rest of the line verbatim
pub fn tombstone(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.push(TOMBSTONE);
    out.extend_from_slice(line);
    out
}

fn is_space(b: &u8) -> bool {
    matches!(*b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C')
}

/// Trims surrounding whitespace
pub fn trim(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|b| !is_space(b)).unwrap_or(s.len());
    let end = s.iter().rposition(|b| !is_space(b)).map_or(start, |i| i + 1);
    &s[start..end]
}

/// Trims whitespace, then removes one layer of matching surrounding quotes
pub fn unquote(s: &[u8]) -> &[u8] {
    let s = trim(s);
    for quote in [b'"', b'\''] {
        if s.len() >= 2 && s[0] == quote && s[s.len() - 1] == quote {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Whether the field at `index` equals `value` after trimming both sides.
/// A record too short to hold `index` never matches.
pub fn field_matches(fields: &[&[u8]], index: usize, value: &[u8]) -> bool {
    fields
        .get(index)
        .is_some_and(|field| trim(field) == trim(value))
}
