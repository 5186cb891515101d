//! Trace file loading.
//!
//! Opens a trace on disk and parses the requested window into a
//! [`TraceSource`]. Path context is attached to open failures here, since the
//! parser itself only sees a reader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::common::error::TraceError;
use crate::config::TraceConfig;
use crate::sim::source::TraceSource;

/// Loads instructions `start..start + count` (1-based) of the trace at `path`.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened, otherwise the
/// errors of [`TraceSource::from_reader`].
pub fn load_trace(
    path: impl AsRef<Path>,
    start: usize,
    count: usize,
) -> Result<TraceSource, TraceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), start, count, "loading trace");
    TraceSource::from_reader(BufReader::new(file), start, count)
}

/// Loads the window described by `trace` from the file at `path`.
///
/// # Errors
///
/// See [`load_trace`].
pub fn load_trace_window(
    path: impl AsRef<Path>,
    trace: &TraceConfig,
) -> Result<TraceSource, TraceError> {
    load_trace(path, trace.start, trace.count)
}
