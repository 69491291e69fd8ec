//! Session history persistence
//!
//! The CLI keeps the last few run summaries (never full texts) in the user
//! cache directory. History is owned entirely by this layer; the core never
//! sees it.

use crate::models::{SessionEntry, SessionHistory};
use std::path::PathBuf;
use tracing::debug;

pub(crate) fn history_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("proseshift").join("history.json"))
}

/// Append an entry to the persisted history. Best-effort: a read-only cache
/// dir must not fail the run.
pub(crate) fn record(entry: SessionEntry) {
    let Some(path) = history_path() else {
        return;
    };
    let mut history = SessionHistory::load(&path);
    history.push(entry);
    if let Err(err) = history.save(&path) {
        debug!("could not persist session history: {err}");
    }
}

pub(crate) fn load() -> SessionHistory {
    history_path()
        .map(|path| SessionHistory::load(&path))
        .unwrap_or_default()
}
