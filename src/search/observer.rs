//! Post-search notification.
//!
//! After the root search returns, the engine hands a [`SearchReport`] to the
//! configured [`SearchObserver`] on a detached thread. The search result is
//! already on its way back to the caller by then; whatever the observer does,
//! including failing, cannot change or delay it.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Everything a dashboard needs about one finished search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub fen: String,
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<String>,
    pub stats: SearchStats,
    pub tree: Option<SearchNode>,
}

pub trait SearchObserver: Send + Sync + Debug {
    fn on_search_complete(&self, report: &SearchReport) -> miette::Result<()>;
}

/// Writes each report as pretty-printed JSON, replacing the previous one
#[derive(Debug, Clone)]
pub struct JsonFileObserver {
    path: PathBuf,
}

impl JsonFileObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SearchObserver for JsonFileObserver {
    fn on_search_complete(&self, report: &SearchReport) -> miette::Result<()> {
        let json = serde_json::to_string_pretty(report)
            .into_diagnostic()
            .context("Serializing search report")?;
        fs::write(&self.path, json)
            .into_diagnostic()
            .with_context(|| format!("Writing search report to {}", self.path.display()))?;
        debug!("Search report written to {}", self.path.display());
        Ok(())
    }
}

/// Runs the observer on its own thread and returns immediately.
/// Failures are logged and otherwise ignored.
pub(crate) fn notify_detached(observer: Arc<dyn SearchObserver>, report: SearchReport) {
    let spawned = thread::Builder::new()
        .name("search-observer".to_string())
        .spawn(move || {
            if let Err(e) = observer.on_search_complete(&report) {
                warn!("Search observer failed: {e:?}");
            }
        });

    if let Err(e) = spawned {
        warn!("Could not start search observer thread: {e}");
    }
}
