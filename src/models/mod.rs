pub mod cnn_2_50_invariant;

use crate::{
    config::ModelConfig,
    error::{Result, ZooErr},
    specs::{LayerSpec, OptimizationSpec, Shape},
};

/// A configuration-producing model function.
pub type ModelFn = fn(&Shape, &Shape) -> Result<(Vec<LayerSpec>, OptimizationSpec)>;

const REGISTRY: &[(&str, ModelFn)] = &[("cnn_2_50_invariant", cnn_2_50_invariant::model)];

/// Lists the names of every registered model.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Looks up a model function by name.
pub fn get(name: &str) -> Option<ModelFn> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, model)| *model)
}

/// Builds the config of a registered model.
///
/// # Arguments
/// * `name` - The model's registered name.
/// * `input_shape` - The shape of the input sequences.
/// * `output_shape` - The shape of the targets.
///
/// # Returns
/// The model's config or an error if the name is unknown or the model rejects the shapes.
pub fn build(name: &str, input_shape: &Shape, output_shape: &Shape) -> Result<ModelConfig> {
    let model = get(name).ok_or_else(|| ZooErr::UnknownModel(name.to_string()))?;

    log::debug!("building {name} for input {input_shape} and output {output_shape}");
    let config = ModelConfig::from(model(input_shape, output_shape)?);
    log::info!("built {name} with {} layers", config.layers.len());

    Ok(config)
}
