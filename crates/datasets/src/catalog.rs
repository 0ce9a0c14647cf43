use crate::error::DatasetError;
use crate::loader::read_csv_path;
use configuration::{Config, ModelSource};
use core_types::RawRecord;
use std::path::{Path, PathBuf};

/// The set of business models whose history can be loaded, keyed by identifier.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    directory: PathBuf,
    models: Vec<ModelSource>,
}

impl DatasetCatalog {
    pub fn new(directory: impl Into<PathBuf>, models: Vec<ModelSource>) -> Self {
        Self {
            directory: directory.into(),
            models,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data.directory.clone(), config.models.clone())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn models(&self) -> &[ModelSource] {
        &self.models
    }

    pub fn resolve(&self, id: &str) -> Result<&ModelSource, DatasetError> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| DatasetError::UnknownDataset(id.to_string()))
    }

    /// The file backing a model. Absolute model paths are used as they are.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, DatasetError> {
        let model = self.resolve(id)?;
        Ok(self.directory.join(&model.file))
    }

    /// Loads the raw records of a model.
    pub fn load(&self, id: &str) -> Result<Vec<RawRecord>, DatasetError> {
        let path = self.path_for(id)?;
        tracing::debug!(model = id, path = %path.display(), "Loading dataset.");
        read_csv_path(&path)
    }

    /// Loads the raw records of a model, treating any failure as "no data".
    ///
    /// The failure is logged so it is not silently lost.
    pub fn load_or_empty(&self, id: &str) -> Vec<RawRecord> {
        match self.load(id) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(model = id, error = %e, "Dataset unavailable, continuing with no data.");
                Vec::new()
            }
        }
    }
}
