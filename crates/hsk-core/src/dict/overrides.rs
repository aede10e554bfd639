use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::DictError;

const COL_WORD: &str = "word";
const COL_SOURCE: &str = "source_pinyin_numbered";
const COL_SELECTED: &str = "selected_cedict_pinyin";

/// Manual choices for rows whose pinyin matches several dictionary
/// pronunciations once tones are ignored.
///
/// Keyed by `(word, source_pinyin_numbered)`, where `word` is the row's
/// headword including any disambiguation digit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    map: HashMap<(String, String), String>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a TSV file. A missing file yields an empty table.
    pub fn load(path: &Path) -> Result<Self, DictError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let table = Self::parse(&text);
                debug!(path = %path.display(), overrides = table.len(), "overrides loaded");
                Ok(table)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no override file");
                Ok(Self::empty())
            }
            Err(e) => Err(DictError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Parse TSV text.
    ///
    /// A first line naming the `word`, `source_pinyin_numbered` and
    /// `selected_cedict_pinyin` columns (in any order) is a header; otherwise
    /// every line is read as those three columns in that order. Blank lines,
    /// `#` comments, short lines and lines with an empty cell are skipped.
    /// Later lines win on duplicate keys.
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .peekable();

        let mut columns = (0usize, 1usize, 2usize);
        if let Some(&first) = lines.peek() {
            let header: Vec<&str> = first.split('\t').map(str::trim).collect();
            let find = |name: &str| header.iter().position(|cell| *cell == name);
            if let (Some(w), Some(s), Some(c)) = (find(COL_WORD), find(COL_SOURCE), find(COL_SELECTED)) {
                columns = (w, s, c);
                lines.next();
            }
        }

        let (idx_word, idx_source, idx_selected) = columns;
        let mut map = HashMap::new();
        for line in lines {
            let cells: Vec<&str> = line.split('\t').map(str::trim).collect();
            let (Some(word), Some(source), Some(selected)) =
                (cells.get(idx_word), cells.get(idx_source), cells.get(idx_selected))
            else {
                continue;
            };
            if word.is_empty() || source.is_empty() || selected.is_empty() {
                continue;
            }
            map.insert((word.to_string(), source.to_string()), selected.to_string());
        }
        Self { map }
    }

    pub fn insert(
        &mut self,
        word: impl Into<String>,
        source_pinyin_numbered: impl Into<String>,
        selected: impl Into<String>,
    ) {
        self.map
            .insert((word.into(), source_pinyin_numbered.into()), selected.into());
    }

    pub fn get(&self, word: &str, source_pinyin_numbered: &str) -> Option<&str> {
        self.map
            .get(&(word.to_string(), source_pinyin_numbered.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
