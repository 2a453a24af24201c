use std::num::NonZeroUsize;

use crate::{
    error::{Result, ZooErr},
    specs::{
        Activation, Conv1dSpec, DenseSpec, InputSpec, LayerSpec, Norm, Objective,
        OptimizationSpec, Optimizer, Padding, Shape,
    },
};

/// Compile-time only: call it inside `const {}` so a zero literal fails the build.
const fn nz(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("zero count literal"),
    }
}

/// Two convolutional blocks with wide max pooling followed by a dense head.
///
/// # Arguments
/// * `input_shape` - The `[batch, length, channels]` shape of the sequences.
/// * `output_shape` - The `[batch, num_labels]` shape of the targets.
///
/// # Returns
/// The ordered layer stack and the optimization recipe, or `MissingDimension`
/// if `output_shape` has no usable label count.
pub fn model(
    input_shape: &Shape,
    output_shape: &Shape,
) -> Result<(Vec<LayerSpec>, OptimizationSpec)> {
    let num_labels = output_shape
        .dim(1)
        .and_then(NonZeroUsize::new)
        .ok_or(ZooErr::MissingDimension {
            shape: "output_shape",
            axis: 1,
        })?;

    let layer1 = LayerSpec::Input(InputSpec {
        input_shape: input_shape.clone(),
    });

    let layer2 = LayerSpec::Conv1d(Conv1dSpec {
        num_filters: const { nz(24) },
        filter_size: const { nz(19) },
        padding: Padding::Same,
        norm: Some(Norm::Batch),
        activation: Some(Activation::Relu),
        max_pool: Some(const { nz(50) }),
        max_pool_strides: Some(const { nz(2) }),
        dropout: Some(0.1),
    });

    let layer3 = LayerSpec::Conv1d(Conv1dSpec {
        num_filters: const { nz(64) },
        filter_size: const { nz(5) },
        padding: Padding::Same,
        norm: Some(Norm::Batch),
        activation: Some(Activation::Relu),
        max_pool: Some(const { nz(50) }),
        max_pool_strides: None,
        dropout: Some(0.1),
    });

    let layer4 = LayerSpec::Dense(DenseSpec {
        num_units: const { nz(96) },
        norm: Some(Norm::Batch),
        activation: Some(Activation::Relu),
        dropout: Some(0.5),
    });

    let layer5 = LayerSpec::Dense(DenseSpec {
        num_units: num_labels,
        norm: None,
        activation: Some(Activation::Sigmoid),
        dropout: None,
    });

    let optimization = OptimizationSpec {
        objective: Objective::Binary,
        optimizer: Optimizer::Adam,
        learning_rate: 0.0003,
        l2: 1e-6,
    };

    Ok((vec![layer1, layer2, layer3, layer4, layer5], optimization))
}
