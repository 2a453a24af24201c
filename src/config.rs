use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    specs::{LayerSpec, OptimizationSpec},
    validation,
};

/// A model's layer stack together with its optimization recipe.
///
/// This is the JSON document a training harness consumes:
/// `{"layers": [...], "optimization": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub layers: Vec<LayerSpec>,
    pub optimization: OptimizationSpec,
}

impl ModelConfig {
    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config from a JSON file.
    ///
    /// # Arguments
    /// * `path` - The file to read.
    ///
    /// # Returns
    /// The config, or an io, json or validation error.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading model config from {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the config as pretty-printed JSON, replacing any existing file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        log::info!("saved model config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate(&self.layers, &self.optimization)
    }

    pub fn into_parts(self) -> (Vec<LayerSpec>, OptimizationSpec) {
        (self.layers, self.optimization)
    }
}

impl From<(Vec<LayerSpec>, OptimizationSpec)> for ModelConfig {
    fn from((layers, optimization): (Vec<LayerSpec>, OptimizationSpec)) -> Self {
        Self {
            layers,
            optimization,
        }
    }
}
