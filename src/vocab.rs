//! Vocabulary ingestion
//!
//! Input is tab-delimited text, one `term<TAB>definition` pair per line.
//! Lines are trimmed; blank lines, lines without a tab and lines with an
//! empty side are dropped, as are repeated terms (first one wins).

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while building a vocabulary table
#[derive(Debug, Error)]
pub enum VocabError {
    /// Nothing usable survived parsing; the game must not start
    #[error("no valid term/definition pairs found (expected `term<TAB>definition` per line)")]
    Empty,
    #[error("failed to read vocabulary from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One term and its definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    pub term: String,
    pub definition: String,
}

/// Ordered, immutable term -> definition table
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
    by_term: HashMap<String, usize>,
}

impl Vocabulary {
    /// Parse raw tab-delimited text
    pub fn parse(text: &str) -> Result<Self, VocabError> {
        let mut entries: Vec<VocabEntry> = Vec::new();
        let mut by_term = HashMap::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((term, definition)) = line.split_once('\t') else {
                log::debug!("Skipping line {}: no tab separator", line_no + 1);
                continue;
            };
            let (term, definition) = (term.trim(), definition.trim());
            if term.is_empty() || definition.is_empty() {
                log::debug!("Skipping line {}: empty term or definition", line_no + 1);
                continue;
            }
            if by_term.contains_key(term) {
                log::debug!("Skipping line {}: duplicate term {:?}", line_no + 1, term);
                continue;
            }
            by_term.insert(term.to_string(), entries.len());
            entries.push(VocabEntry {
                term: term.to_string(),
                definition: definition.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(VocabError::Empty);
        }
        log::info!("Parsed vocabulary with {} pairs", entries.len());
        Ok(Self { entries, by_term })
    }

    /// Read and parse a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VocabError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| VocabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Read and parse everything from a reader (stdin)
    pub fn from_reader(mut reader: impl Read) -> Result<Self, VocabError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| VocabError::Io {
                path: PathBuf::from("-"),
                source,
            })?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    /// Term at a spawn cursor position
    pub fn term_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.term.as_str())
    }

    pub fn definition(&self, term: &str) -> Option<&str> {
        self.by_term
            .get(term)
            .map(|&i| self.entries[i].definition.as_str())
    }

    /// True when one text is the other's definition, in either direction
    pub fn is_pair(&self, a: &str, b: &str) -> bool {
        self.definition(a) == Some(b) || self.definition(b) == Some(a)
    }

    /// Human-readable listing shown before a session starts
    pub fn preview(&self) -> String {
        let width = self
            .entries
            .iter()
            .map(|e| e.term.chars().count())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {:<width$}  {}",
                i + 1,
                entry.term,
                entry.definition,
                width = width
            );
        }
        out
    }
}
