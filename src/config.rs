//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! eval_params = "params.toml"
//! tree_export = "/tmp/search_tree.json"
//!
//! [search]
//! max_depth = 4
//! build_tree = true
//!
//! [log]
//! level = "debug"
//! file = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`
    pub level: String,
    /// Also write debug logs to the log directory
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}

impl LogConfig {
    pub fn level(&self) -> EngineResult<Level> {
        Level::from_str(&self.level)
            .map_err(|_| EngineError::Config(format!("unknown log level '{}'", self.level)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub search: SearchConfig,
    /// [`EvalParams`] file replacing the built-in material values and tables
    pub eval_params: Option<PathBuf>,
    /// Where the search tree report is written after every search
    pub tree_export: Option<PathBuf>,
    pub log: LogConfig,
}

impl EngineConfig {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let toml_string =
            toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))?;
        fs::write(path.as_ref(), toml_string).map_err(|e| {
            EngineError::Config(format!("writing {}: {e}", path.as_ref().display()))
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Config(format!("reading {}: {e}", path.as_ref().display()))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))?;
        config.log.level()?;
        Ok(config)
    }

    /// Built-in tables unless `eval_params` points somewhere
    pub fn evaluator(&self) -> EngineResult<PieceSquareEvaluator> {
        match &self.eval_params {
            Some(path) => {
                let params = EvalParams::load_from_file(path)?;
                debug!("Using evaluation parameters from {}", path.display());
                Ok(PieceSquareEvaluator::from_params(&params))
            }
            None => Ok(PieceSquareEvaluator::default()),
        }
    }

    pub fn observer(&self) -> Option<Arc<dyn SearchObserver>> {
        self.tree_export
            .as_ref()
            .map(|path| Arc::new(JsonFileObserver::new(path)) as Arc<dyn SearchObserver>)
    }

    /// Engine with this config's evaluator, search settings and observer
    pub fn build_engine(&self) -> EngineResult<AlphaBetaSearch> {
        let engine = AlphaBetaSearch::new(Box::new(self.evaluator()?), Box::new(StandardMoveGen))
            .with_config(self.search);
        Ok(match self.observer() {
            Some(observer) => engine.with_observer(observer),
            None => engine,
        })
    }
}
