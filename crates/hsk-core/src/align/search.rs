use std::collections::HashSet;

use crate::pinyin::{Decomposed, NumberedSyllable, SyllableInventory, NEUTRAL_TONE};

/// Complete alignments kept per state. Two are enough to tell "unique"
/// from "ambiguous".
const MAX_SOLUTIONS: usize = 2;

type Cell = Vec<Vec<NumberedSyllable>>;

pub(super) struct SearchOutcome {
    pub solutions: Vec<Vec<NumberedSyllable>>,
    /// First syllable rejected for carrying two different tone marks.
    pub conflict: Option<String>,
}

/// Joint segmentation of pinyin tokens against a Hanzi sequence.
///
/// State is (token, byte offset in that token, character cursor). The table
/// is filled from the last token backwards, so every transition reads cells
/// that are already final.
pub(super) struct Search<'a> {
    inventory: &'a SyllableInventory,
    tokens: &'a [Decomposed],
    hanzi: &'a [char],
    allowed: Vec<HashSet<&'a str>>,
    /// Set when the erhua suffix character accepts `r5`.
    erhua: Option<char>,
}

impl<'a> Search<'a> {
    pub fn new(
        inventory: &'a SyllableInventory,
        tokens: &'a [Decomposed],
        hanzi: &'a [char],
        allowed: Vec<HashSet<&'a str>>,
        erhua: Option<char>,
    ) -> Self {
        Self {
            inventory,
            tokens,
            hanzi,
            allowed,
            erhua,
        }
    }

    pub fn run(&self) -> SearchOutcome {
        let n = self.hanzi.len();
        let token_count = self.tokens.len();
        let mut conflict: Option<String> = None;

        // tables[t][p][c]
        let mut tables: Vec<Vec<Vec<Cell>>> = self
            .tokens
            .iter()
            .map(|token| vec![vec![Cell::new(); n + 1]; token.base.len() + 1])
            .collect();

        for t in (0..token_count).rev() {
            let len = self.tokens[t].base.len();
            for c in 0..=n {
                let carried = if t + 1 == token_count {
                    if c == n {
                        vec![Vec::new()]
                    } else {
                        Cell::new()
                    }
                } else {
                    tables[t + 1][0][c].clone()
                };
                tables[t][len][c] = carried;
            }
            for p in (0..len).rev() {
                if !self.tokens[t].base.is_char_boundary(p) {
                    continue;
                }
                for c in 0..n {
                    let cell = self.expand(t, p, c, &tables[t], &mut conflict);
                    tables[t][p][c] = cell;
                }
            }
        }

        let solutions = tables
            .first()
            .and_then(|table| table.first())
            .map(|row| row[0].clone())
            .unwrap_or_default();
        SearchOutcome {
            solutions,
            conflict,
        }
    }

    /// Solutions for state (t, p, c), given the already-filled rows of
    /// token `t` beyond `p`.
    fn expand(
        &self,
        t: usize,
        p: usize,
        c: usize,
        table: &[Vec<Cell>],
        conflict: &mut Option<String>,
    ) -> Cell {
        let token = &self.tokens[t];
        let mut solutions = Cell::new();

        for syllable in self.inventory.prefixes_of(&token.base[p..]) {
            let end = p + syllable.len();
            let Some(tone) = token.tone_of(p, end) else {
                if conflict.is_none() {
                    *conflict = Some(syllable.to_string());
                }
                continue;
            };

            // Split erhua wins outright when it completes.
            if let Some(stem) = self.erhua_stem(syllable, c) {
                let rest = &table[end][c + 2];
                let head = NumberedSyllable::new(stem, tone);
                let suffix = NumberedSyllable::new("r", NEUTRAL_TONE);
                if let (Some(head), Some(suffix), false) = (head, suffix, rest.is_empty()) {
                    for tail in rest {
                        let mut seq = vec![head.clone(), suffix.clone()];
                        seq.extend(tail.iter().cloned());
                        solutions.push(seq);
                        if solutions.len() >= MAX_SOLUTIONS {
                            break;
                        }
                    }
                    return solutions;
                }
            }

            if !self.accepts(syllable, c) {
                continue;
            }
            let Some(numbered) = NumberedSyllable::new(syllable, tone) else {
                continue;
            };
            for tail in &table[end][c + 1] {
                let mut seq = Vec::with_capacity(tail.len() + 1);
                seq.push(numbered.clone());
                seq.extend(tail.iter().cloned());
                solutions.push(seq);
                if solutions.len() >= MAX_SOLUTIONS {
                    return solutions;
                }
            }
        }
        solutions
    }

    /// Stem of an erhua syllable (`wanr` → `wan`) when the next character is
    /// the suffix and the stem fits the current character.
    fn erhua_stem<'s>(&self, syllable: &'s str, c: usize) -> Option<&'s str> {
        let suffix = self.erhua?;
        let stem = syllable.strip_suffix('r')?;
        let next = *self.hanzi.get(c + 1)?;
        (next == suffix && !stem.is_empty() && self.allowed[c].contains(stem)).then_some(stem)
    }

    /// Interjections and single-character words skip the per-character
    /// candidate filter.
    fn accepts(&self, syllable: &str, c: usize) -> bool {
        self.inventory.is_interjection(syllable)
            || self.hanzi.len() == 1
            || self.allowed[c].contains(syllable)
    }
}

/// Longest-first segmentation of tone-free letters with no Hanzi
/// constraint, backtracking when a longer syllable leaves an
/// unsegmentable tail.
pub(super) fn segment_free<'a>(inventory: &'a SyllableInventory, letters: &'a str) -> Option<Vec<&'a str>> {
    let len = letters.len();
    let mut choice: Vec<Option<&str>> = vec![None; len + 1];
    let mut reachable = vec![false; len + 1];
    reachable[len] = true;

    for p in (0..len).rev() {
        if !letters.is_char_boundary(p) {
            continue;
        }
        for syllable in inventory.prefixes_of(&letters[p..]) {
            if reachable[p + syllable.len()] {
                choice[p] = Some(syllable);
                reachable[p] = true;
                break;
            }
        }
    }

    if !reachable[0] {
        return None;
    }
    let mut pieces = Vec::new();
    let mut p = 0;
    while p < len {
        let syllable = choice[p]?;
        pieces.push(syllable);
        p += syllable.len();
    }
    Some(pieces)
}
