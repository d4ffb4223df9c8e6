use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Gender;
use crate::grammar::Category;

/// Entries containing this marker are treated as comments
pub const COMMENT_MARKER: char = '#';

/// Source of literal vocabulary keyed by category, culture and gender.
///
/// Implementations return entries in source order, dropping every entry that
/// contains [`COMMENT_MARKER`] or is blank (see [`is_entry`]), and return an
/// empty list when the source does not exist.
pub trait VocabularyProvider {
    fn list(&self, category: Category, culture: Option<&str>, gender: Gender) -> Vec<String>;
}

/// Whether a raw line should become a vocabulary entry
pub fn is_entry(line: &str) -> bool {
    !line.contains(COMMENT_MARKER) && !line.trim().is_empty()
}

/// Vocabulary stored as newline-delimited text files under a root directory.
///
/// A source lives at `<root>/<dir>/<stem>[-<gender>].txt`; the gender suffix
/// is omitted for neutral sources.
#[derive(Debug, Clone)]
pub struct FileVocabulary {
    root: PathBuf,
}

impl FileVocabulary {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FileVocabulary {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, category: Category, culture: Option<&str>, gender: Gender) -> PathBuf {
        let (dir, default_stem) = match category {
            Category::Positions => ("prefixes", "positions"),
            other => (other.as_str(), other.as_str()),
        };
        let stem = culture.unwrap_or(default_stem);
        let file_name = match gender.suffix() {
            Some(suffix) => format!("{}-{}.txt", stem, suffix),
            None => format!("{}.txt", stem),
        };
        self.root.join(dir).join(file_name)
    }

    /// Read the entries of one file. A line that is not valid UTF-8 is
    /// skipped so the rest of the source survives.
    fn read_entries(path: &Path) -> io::Result<Vec<String>> {
        let file = File::open(path)?;
        let mut reader = io::BufReader::new(file);

        let mut entries = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let Ok(line) = std::str::from_utf8(&buf) else {
                warn!(
                    path = %path.display(),
                    line = line_number,
                    "skipping vocabulary line that is not valid UTF-8"
                );
                continue;
            };
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            if is_entry(line) {
                entries.push(line.to_string());
            }
        }
        Ok(entries)
    }
}

impl VocabularyProvider for FileVocabulary {
    fn list(&self, category: Category, culture: Option<&str>, gender: Gender) -> Vec<String> {
        let path = self.path_for(category, culture, gender);
        match Self::read_entries(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), count = entries.len(), "read vocabulary");
                entries
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "vocabulary file does not exist");
                Vec::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read vocabulary file");
                Vec::new()
            }
        }
    }
}

type VocabularyKey = (Category, Option<String>, Gender);

/// In-memory vocabulary, handy for tests and for embedding word lists
#[derive(Debug, Clone, Default)]
pub struct MemoryVocabulary {
    sources: HashMap<VocabularyKey, Vec<String>>,
}

impl MemoryVocabulary {
    pub fn new() -> Self {
        MemoryVocabulary::default()
    }

    /// Store a source, replacing any previous one under the same key.
    /// Commented and blank entries are dropped.
    pub fn insert(
        &mut self,
        category: Category,
        culture: Option<&str>,
        gender: Gender,
        entries: &[&str],
    ) -> &mut Self {
        let entries = entries
            .iter()
            .filter(|entry| is_entry(entry))
            .map(|entry| entry.to_string())
            .collect();
        self.sources
            .insert((category, culture.map(str::to_string), gender), entries);
        self
    }

    pub fn with(
        mut self,
        category: Category,
        culture: Option<&str>,
        gender: Gender,
        entries: &[&str],
    ) -> Self {
        self.insert(category, culture, gender, entries);
        self
    }
}

impl VocabularyProvider for MemoryVocabulary {
    fn list(&self, category: Category, culture: Option<&str>, gender: Gender) -> Vec<String> {
        self.sources
            .get(&(category, culture.map(str::to_string), gender))
            .cloned()
            .unwrap_or_default()
    }
}
