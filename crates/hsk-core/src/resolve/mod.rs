//! CC-CEDICT resolution of numbered rows.
//!
//! Per row, in order: exact pronunciation match in the primary dictionary,
//! a unique tone-insensitive match, several tone-insensitive matches settled
//! by an override, then the same strategy against the patch dictionary when
//! the primary has no usable entry.

mod report;

pub use report::{
    NoMatchItem, NoMatchReason, PatchedMatch, ResolutionReport, ToneInsensitiveMultiMatch,
    ToneInsensitiveUniqueMatch,
};

use tracing::{debug, debug_span};

use crate::dict::{
    exact_match, group_candidates, split_numbered_variants, tone_insensitive_matches,
    CandidateGroup, CedictRepository, OverrideTable,
};
use crate::rows::{EnrichedRow, NumberedRow};
use crate::settings::Settings;
use crate::unicode::lookup_key;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "{total} unresolved CC-CEDICT enrichment rows; add disambiguation/patch entries or allow unresolved rows\n{preview}"
    )]
    Unresolved {
        total: usize,
        preview: String,
        report: Box<ResolutionReport>,
    },
}

/// How a row's pronunciation was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact(CandidateGroup),
    ToneInsensitiveUnique(CandidateGroup),
    ToneInsensitiveMulti {
        selected: CandidateGroup,
        candidates: Vec<CandidateGroup>,
    },
    Unresolved(NoMatchReason),
}

impl Resolution {
    pub fn selected(&self) -> Option<&CandidateGroup> {
        match self {
            Self::Exact(group) | Self::ToneInsensitiveUnique(group) => Some(group),
            Self::ToneInsensitiveMulti { selected, .. } => Some(selected),
            Self::Unresolved(_) => None,
        }
    }
}

/// Resolution of one row plus whether the patch dictionary supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub resolution: Resolution,
    pub patched: bool,
}

/// Enriched rows and the diagnostics gathered while producing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRows {
    pub rows: Vec<EnrichedRow>,
    pub report: ResolutionReport,
}

pub struct Resolver<'a> {
    primary: &'a CedictRepository,
    patch: &'a CedictRepository,
    overrides: &'a OverrideTable,
    settings: &'a Settings,
}

impl<'a> Resolver<'a> {
    pub fn new(
        primary: &'a CedictRepository,
        patch: &'a CedictRepository,
        overrides: &'a OverrideTable,
        settings: &'a Settings,
    ) -> Self {
        Self {
            primary,
            patch,
            overrides,
            settings,
        }
    }

    pub fn resolve_row(&self, row: &NumberedRow) -> RowOutcome {
        let primary = self.resolve_in(self.primary, row);
        let reason = match primary {
            Resolution::Unresolved(reason) if reason.allows_patch() => reason,
            resolution => {
                return RowOutcome {
                    resolution,
                    patched: false,
                }
            }
        };

        match self.resolve_in(self.patch, row) {
            Resolution::Unresolved(patch_reason) => {
                let reason = if patch_reason.allows_patch() {
                    reason
                } else {
                    NoMatchReason::Patch(Box::new(patch_reason))
                };
                RowOutcome {
                    resolution: Resolution::Unresolved(reason),
                    patched: false,
                }
            }
            resolution => RowOutcome {
                resolution,
                patched: true,
            },
        }
    }

    /// Resolve every row. Unresolved rows are an error unless
    /// `allow_unresolved`, in which case they are kept with empty
    /// enrichment. The report is built either way.
    pub fn resolve_rows(
        &self,
        rows: &[NumberedRow],
        allow_unresolved: bool,
    ) -> Result<ResolvedRows, ResolveError> {
        let _span = debug_span!("resolve_rows", count = rows.len(), allow_unresolved).entered();
        let mut report = ResolutionReport::default();
        let mut enriched = Vec::with_capacity(rows.len());

        for row in rows {
            let outcome = self.resolve_row(row);
            if outcome.patched {
                if let Some(selected) = outcome.resolution.selected() {
                    report.patched.push(PatchedMatch {
                        word_index: row.word_index().to_string(),
                        word: row.word().to_string(),
                        source_pinyin_numbered: row.pinyin_numbered().to_string(),
                        selected_cedict_pinyin: selected.pinyin_numbered(),
                    });
                }
            }

            match outcome.resolution {
                Resolution::Exact(group) => enriched.push(enrich(row, &group)),
                Resolution::ToneInsensitiveUnique(group) => {
                    report.tone_insensitive_unique.push(ToneInsensitiveUniqueMatch {
                        word_index: row.word_index().to_string(),
                        word: row.word().to_string(),
                        source_pinyin: row.pinyin().to_string(),
                        source_pinyin_numbered: row.pinyin_numbered().to_string(),
                        selected_cedict_pinyin: group.pinyin_numbered(),
                    });
                    enriched.push(enrich(row, &group));
                }
                Resolution::ToneInsensitiveMulti {
                    selected,
                    candidates,
                } => {
                    let mut candidate_cedict_pinyin: Vec<String> =
                        candidates.iter().map(CandidateGroup::pinyin_numbered).collect();
                    candidate_cedict_pinyin.sort();
                    report.tone_insensitive_multi.push(ToneInsensitiveMultiMatch {
                        word_index: row.word_index().to_string(),
                        word: row.word().to_string(),
                        source_pinyin: row.pinyin().to_string(),
                        source_pinyin_numbered: row.pinyin_numbered().to_string(),
                        candidate_cedict_pinyin,
                        selected_cedict_pinyin: selected.pinyin_numbered(),
                    });
                    enriched.push(enrich(row, &selected));
                }
                Resolution::Unresolved(reason) => {
                    debug!(word_index = row.word_index(), word = row.word(), %reason, "unresolved");
                    report.no_match.push(NoMatchItem {
                        word_index: row.word_index().to_string(),
                        word: row.word().to_string(),
                        source_pinyin: row.pinyin().to_string(),
                        source_pinyin_numbered: row.pinyin_numbered().to_string(),
                        reason,
                    });
                    if allow_unresolved {
                        enriched.push(EnrichedRow::unresolved(row.clone()));
                    }
                }
            }
        }

        report.sort();
        debug!(
            tone_insensitive_unique = report.tone_insensitive_unique.len(),
            tone_insensitive_multi = report.tone_insensitive_multi.len(),
            patched = report.patched.len(),
            no_match = report.no_match.len(),
            "resolution finished"
        );

        if !report.no_match.is_empty() && !allow_unresolved {
            return Err(ResolveError::Unresolved {
                total: report.no_match.len(),
                preview: report.no_match_preview(self.settings.resolution.error_preview_limit),
                report: Box::new(report),
            });
        }

        Ok(ResolvedRows {
            rows: enriched,
            report,
        })
    }

    fn resolve_in(&self, repo: &CedictRepository, row: &NumberedRow) -> Resolution {
        let variants = split_numbered_variants(row.pinyin_numbered());
        if variants.is_empty() {
            return Resolution::Unresolved(NoMatchReason::EmptySource);
        }

        let groups = group_candidates(repo.entries_for_word(&lookup_key(row.word())));
        if groups.is_empty() {
            return Resolution::Unresolved(NoMatchReason::NoWordEntry);
        }

        if let Some(group) = exact_match(&groups, &variants) {
            return Resolution::Exact(group.clone());
        }

        match tone_insensitive_matches(&groups, &variants).as_slice() {
            [] => Resolution::Unresolved(NoMatchReason::NoPinyinMatch),
            [only] => Resolution::ToneInsensitiveUnique((*only).clone()),
            several => {
                let candidates: Vec<CandidateGroup> = several.iter().map(|&g| g.clone()).collect();
                match self.overrides.get(row.word(), row.pinyin_numbered()) {
                    Some(choice) => match candidates.iter().find(|g| g.pinyin_numbered() == choice) {
                        Some(selected) => Resolution::ToneInsensitiveMulti {
                            selected: selected.clone(),
                            candidates,
                        },
                        None => Resolution::Unresolved(NoMatchReason::OverrideNotCandidate(
                            choice.to_string(),
                        )),
                    },
                    None => Resolution::Unresolved(NoMatchReason::MultipleCandidates(
                        candidates.iter().map(CandidateGroup::pinyin_numbered).collect(),
                    )),
                }
            }
        }
    }
}

fn enrich(row: &NumberedRow, group: &CandidateGroup) -> EnrichedRow {
    EnrichedRow::resolved(
        row.clone(),
        group.pinyin_numbered(),
        group.traditional(),
        group.definition(),
    )
}
