//! Batch pipeline: raw rows in, enriched rows plus diagnostics out.
//!
//! Every collaborator is built once in [`Pipeline::load`] and only borrowed
//! while a batch runs.

use std::fs;
use std::path::{Path, PathBuf};

use hsk_core::align::{Aligner, RowError};
use hsk_core::dict::{CedictRepository, DictError, OverrideTable};
use hsk_core::pinyin::SyllableInventory;
use hsk_core::resolve::{ResolutionReport, ResolveError, ResolvedRows, Resolver};
use hsk_core::rows::{EnrichedRow, RawRow};
use hsk_core::settings::{parse_settings_toml, Settings, SettingsError};
use hsk_core::validate::{
    missing_word_indexes, validate_enriched_rows, validate_numbered_rows, validate_raw_rows,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid pipeline config: {0}")]
    Config(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Dict(#[from] DictError),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Unresolved(#[from] ResolveError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// File locations and tolerance for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    pub cedict_path: PathBuf,
    pub patch_path: PathBuf,
    pub overrides_path: PathBuf,
    #[serde(default)]
    pub allow_unresolved: bool,
    /// Custom domain settings; the embedded defaults when absent.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Read a config file. Relative paths inside it are taken relative to
    /// the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            for p in [
                &mut config.cedict_path,
                &mut config.patch_path,
                &mut config.overrides_path,
            ]
            .into_iter()
            .chain(config.settings_path.as_mut())
            {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    pub fn load_settings(&self) -> Result<Settings, PipelineError> {
        let Some(path) = &self.settings_path else {
            return Ok(Settings::default());
        };
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        Ok(parse_settings_toml(&text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub rows: Vec<EnrichedRow>,
    pub report: ResolutionReport,
    pub missing_indexes: Vec<u64>,
}

pub struct Pipeline {
    settings: Settings,
    inventory: SyllableInventory,
    primary: CedictRepository,
    patch: CedictRepository,
    overrides: OverrideTable,
    allow_unresolved: bool,
}

impl Pipeline {
    /// Open both dictionaries and the override table. Either dictionary
    /// missing is fatal; a missing override table is empty.
    pub fn load(config: &PipelineConfig, settings: Settings) -> Result<Self, PipelineError> {
        let _span = debug_span!("pipeline_load").entered();
        let primary = CedictRepository::open(&config.cedict_path, &settings)?;
        let patch = CedictRepository::open(&config.patch_path, &settings)?;
        let overrides = OverrideTable::load(&config.overrides_path)?;
        let inventory = SyllableInventory::standard(&settings);
        debug!(
            primary_entries = primary.entries().len(),
            patch_entries = patch.entries().len(),
            overrides = overrides.len(),
            syllables = inventory.len(),
            "pipeline loaded"
        );
        Ok(Self::from_parts(
            settings,
            inventory,
            primary,
            patch,
            overrides,
            config.allow_unresolved,
        ))
    }

    /// [`Pipeline::load`] with the settings the config names.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Self::load(config, config.load_settings()?)
    }

    pub fn from_parts(
        settings: Settings,
        inventory: SyllableInventory,
        primary: CedictRepository,
        patch: CedictRepository,
        overrides: OverrideTable,
        allow_unresolved: bool,
    ) -> Self {
        Self {
            settings,
            inventory,
            primary,
            patch,
            overrides,
            allow_unresolved,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(&self, rows: &[RawRow]) -> Result<PipelineResult, PipelineError> {
        let _span = debug_span!("pipeline_run", rows = rows.len()).entered();

        validate_raw_rows(rows, &self.settings)?;

        let aligner = Aligner::new(&self.inventory, &self.primary, &self.settings);
        let numbered = aligner.number_rows(rows)?;
        validate_numbered_rows(&numbered)?;

        let resolver = Resolver::new(&self.primary, &self.patch, &self.overrides, &self.settings);
        let ResolvedRows { rows: enriched, report } =
            resolver.resolve_rows(&numbered, self.allow_unresolved)?;
        validate_enriched_rows(&enriched, self.allow_unresolved)?;

        let missing_indexes = missing_word_indexes(&enriched);
        debug!(
            enriched = enriched.len(),
            missing = missing_indexes.len(),
            clean = report.is_clean(),
            "pipeline finished"
        );
        Ok(PipelineResult {
            rows: enriched,
            report,
            missing_indexes,
        })
    }
}
