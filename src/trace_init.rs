#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

/// Flushes buffered trace lines when dropped.
#[cfg(feature = "trace")]
pub type TraceGuard = tracing_appender::non_blocking::WorkerGuard;

/// Placeholder guard for builds without the `trace` feature.
#[cfg(not(feature = "trace"))]
#[derive(Debug)]
pub struct TraceGuard(());

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

/// Install a JSON-lines subscriber writing to `<log_dir>/hsk-trace.jsonl`.
///
/// Filtering follows `RUST_LOG`, falling back to debug for both crates.
/// Only the first call installs anything and returns a guard; hold it until
/// the batch finishes.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> Option<TraceGuard> {
    let mut installed = None;
    INIT.call_once(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, "hsk-trace.jsonl");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("hsk_engine=debug,hsk_core=debug")
                }),
            )
            .init();
        installed = Some(guard);
    });
    installed
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) -> Option<TraceGuard> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_call_returns_a_guard() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init_tracing(dir.path());
        assert_eq!(guard.is_some(), cfg!(feature = "trace"));
        assert!(init_tracing(dir.path()).is_none());

        #[cfg(feature = "trace")]
        {
            tracing::debug!(target: "hsk_engine", "flushed on drop");
            drop(guard);
            // a caller-supplied RUST_LOG may filter the event out
            if std::env::var_os("RUST_LOG").is_none() {
                let written =
                    std::fs::read_to_string(dir.path().join("hsk-trace.jsonl")).unwrap();
                assert!(written.contains("flushed on drop"));
            }
        }
    }
}
