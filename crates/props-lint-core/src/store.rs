//! Profile-aware key/value store for properties-style files.

use crate::profile::Profile;

use miette::{Diagnostic, SourceSpan};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One parsed `key=value` line.
///
/// Multi-line continuations are already joined and a leading
/// `%<profile>.` prefix is already stripped from the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Profile the entry belongs to.
    pub profile: Profile,
    /// Dot-separated key, profile prefix stripped.
    pub key: String,
    /// Raw value, trimmed; placeholder syntax is kept opaque.
    pub value: String,
    /// Physical line number the entry started on (1-indexed).
    pub line: usize,
}

/// A structural error for one malformed line.
///
/// Parse errors accumulate like violations: a malformed line never aborts
/// parsing of the remaining file. They are a distinct failure category
/// from rule [`Violation`](crate::Violation)s.
#[derive(Debug, Clone, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// Physical line number (1-indexed).
    pub line: usize,
    /// The offending logical line, trimmed.
    pub text: String,
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset of the line in the source text.
    pub offset: usize,
    /// Byte length of the line.
    pub length: usize,
}

/// Classification of structural parse errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The line has no unescaped `=` separator.
    #[error("no `=` separator")]
    MissingSeparator,

    /// The key before `=` is empty.
    #[error("empty key")]
    EmptyKey,

    /// A `%profile.` prefix could not be parsed.
    #[error("invalid profile prefix `{prefix}`")]
    InvalidProfilePrefix {
        /// The malformed prefix segment.
        prefix: String,
    },
}

/// Converts a [`ParseError`] to a miette Diagnostic for rich display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ParseDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&ParseError> for ParseDiagnostic {
    fn from(e: &ParseError) -> Self {
        Self {
            message: format!("line {}: {}", e.line, e.kind),
            span: SourceSpan::from((e.offset, e.length)),
            label_message: "malformed line".to_string(),
        }
    }
}

/// Errors that prevent a store from being built at all.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error reading the properties file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// An immutable, profile-aware key/value store.
///
/// Built once from file contents at validation start. Duplicate
/// `(profile, key)` pairs follow properties-file convention: the last
/// occurrence wins. Lookups under a named profile fall back to the base
/// profile; absence is a first-class result.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    entries: Vec<PropertyEntry>,
    resolved: HashMap<(Profile, String), String>,
    parse_errors: Vec<ParseError>,
}

impl PropertyStore {
    /// Parses properties-format text into a store.
    ///
    /// Blank lines and lines whose first non-whitespace character is `#`
    /// are skipped. A line ending in an unescaped backslash is joined
    /// with the following line before key/value splitting. Splitting
    /// occurs at the first unescaped `=`. Malformed lines are recorded in
    /// [`parse_errors`](Self::parse_errors) and parsing continues.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<PropertyEntry> = Vec::new();
        let mut parse_errors = Vec::new();

        // Physical lines with their byte offsets, for diagnostics.
        let mut lines: Vec<(usize, &str)> = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            lines.push((offset, line.strip_suffix('\r').unwrap_or(line)));
            offset += line.len() + 1;
        }

        let mut i = 0;
        while i < lines.len() {
            let (line_offset, first) = lines[i];
            let line_no = i + 1;
            let mut logical = first.to_string();

            // Join continuation lines before splitting.
            while ends_with_unescaped_backslash(&logical) && i + 1 < lines.len() {
                logical.pop();
                i += 1;
                logical.push_str(lines[i].1.trim_start());
            }
            i += 1;

            let trimmed = logical.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match parse_line(trimmed, line_no) {
                Ok(entry) => entries.push(entry),
                Err(kind) => parse_errors.push(ParseError {
                    line: line_no,
                    text: trimmed.to_string(),
                    kind,
                    offset: line_offset,
                    length: first.len(),
                }),
            }
        }

        // Last write wins within one (profile, key) pair.
        let mut resolved = HashMap::new();
        for entry in &entries {
            resolved.insert(
                (entry.profile.clone(), entry.key.clone()),
                entry.value.clone(),
            );
        }

        debug!(
            entries = entries.len(),
            parse_errors = parse_errors.len(),
            "parsed properties text"
        );

        Self {
            entries,
            resolved,
            parse_errors,
        }
    }

    /// Reads and parses a properties file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read. Malformed
    /// lines are not errors here; see [`parse_errors`](Self::parse_errors).
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::parse(&text))
    }

    /// Resolves `key` under `profile`, falling back to the base profile.
    ///
    /// Never fails; `None` means the key is absent under both the active
    /// profile and the base profile.
    #[must_use]
    pub fn resolve(&self, profile: &Profile, key: &str) -> Option<&str> {
        if let Some(value) = self.resolved.get(&(profile.clone(), key.to_string())) {
            return Some(value.as_str());
        }
        if !profile.is_base() {
            return self
                .resolved
                .get(&(Profile::Base, key.to_string()))
                .map(String::as_str);
        }
        None
    }

    /// Returns all parsed entries in file order, duplicates included.
    pub fn entries(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.iter()
    }

    /// Returns the structural errors accumulated while parsing.
    #[must_use]
    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    /// Returns true if any line failed to parse.
    #[must_use]
    pub fn has_parse_errors(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    /// Returns the number of distinct `(profile, key)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Splits one logical line into a [`PropertyEntry`].
fn parse_line(line: &str, line_no: usize) -> Result<PropertyEntry, ParseErrorKind> {
    let sep = find_unescaped_separator(line).ok_or(ParseErrorKind::MissingSeparator)?;

    let raw_key = unescape(line[..sep].trim());
    let value = line[sep + 1..].trim().to_string();

    if raw_key.is_empty() {
        return Err(ParseErrorKind::EmptyKey);
    }

    let (profile, key) = match raw_key.strip_prefix('%') {
        Some(rest) => {
            let dot = rest
                .find('.')
                .ok_or_else(|| ParseErrorKind::InvalidProfilePrefix {
                    prefix: raw_key.clone(),
                })?;
            let profile =
                Profile::named(&rest[..dot]).map_err(|_| ParseErrorKind::InvalidProfilePrefix {
                    prefix: format!("%{}", &rest[..dot]),
                })?;
            (profile, rest[dot + 1..].to_string())
        }
        None => (Profile::Base, raw_key),
    };

    if key.is_empty() {
        return Err(ParseErrorKind::EmptyKey);
    }

    Ok(PropertyEntry {
        profile,
        key,
        value,
        line: line_no,
    })
}

/// Finds the byte index of the first `=` not preceded by a backslash.
fn find_unescaped_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' {
            return Some(i);
        }
    }
    None
}

/// True if the line ends with an odd number of backslashes.
fn ends_with_unescaped_backslash(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Removes `\=` and `\\` escapes from a key segment.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
