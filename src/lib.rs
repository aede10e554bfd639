//! HSK syllabus enrichment: numbered pinyin aligned to Hanzi, resolved
//! against CC-CEDICT.
//!
//! The domain logic lives in `hsk_core`; this crate wires it into a batch
//! pipeline and owns tracing setup.

pub mod pipeline;
mod trace_init;

pub use hsk_core;
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineResult};
pub use trace_init::{init_tracing, TraceGuard};
