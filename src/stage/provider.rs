//! Stage data providers.
//!
//! The core never parses assets itself; it asks an injected provider for a
//! `StageConfig`. Hosts wire up whichever implementation fits their pipeline.

use bevy::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::config::StageConfig;

#[derive(Debug, Error)]
pub enum StageLoadError {
    #[error("unknown stage {0}")]
    UnknownStage(u32),
    #[error("stage {number}: {reason}")]
    InvalidConfig { number: u32, reason: String },
    #[error("no stage data provider registered")]
    ProviderMissing,
    #[error("failed to read stage data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stage data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of stage configurations, injected per `App`.
pub trait StageDataProvider: Send + Sync + 'static {
    fn load_stage(&self, number: u32) -> Result<StageConfig, StageLoadError>;
    fn stage_count(&self) -> u32;
}

/// Resource wrapper around the host-chosen provider.
#[derive(Resource, Clone)]
pub struct StageProvider(pub Arc<dyn StageDataProvider>);

impl StageProvider {
    pub fn new(provider: impl StageDataProvider) -> Self {
        Self(Arc::new(provider))
    }
}

/// In-memory provider for tests, demos and hosts that build stages in code.
pub struct StaticStageProvider {
    stages: Vec<StageConfig>,
}

impl StaticStageProvider {
    pub fn new(stages: Vec<StageConfig>) -> Self {
        Self { stages }
    }
}

impl StageDataProvider for StaticStageProvider {
    fn load_stage(&self, number: u32) -> Result<StageConfig, StageLoadError> {
        self.stages
            .iter()
            .find(|s| s.number == number)
            .cloned()
            .ok_or(StageLoadError::UnknownStage(number))
    }

    fn stage_count(&self) -> u32 {
        self.stages.len() as u32
    }
}

/// File-backed provider reading `stage_<n>.json` from a directory.
pub struct JsonStageProvider {
    root: PathBuf,
}

impl JsonStageProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stage_path(&self, number: u32) -> PathBuf {
        self.root.join(format!("stage_{}.json", number))
    }
}

impl StageDataProvider for JsonStageProvider {
    fn load_stage(&self, number: u32) -> Result<StageConfig, StageLoadError> {
        let path = self.stage_path(number);
        if !path.exists() {
            return Err(StageLoadError::UnknownStage(number));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: StageConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    fn stage_count(&self) -> u32 {
        let mut count = 0;
        while self.stage_path(count + 1).exists() {
            count += 1;
        }
        count
    }
}
