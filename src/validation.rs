use crate::{
    error::{Result, ZooErr},
    specs::{LayerSpec, OptimizationSpec, Shape},
    summary,
};

/// Checks that a layer stack and its optimization recipe can be handed to a trainer.
///
/// # Arguments
/// * `layers` - The layer stack.
/// * `optimization` - The optimization recipe.
///
/// # Returns
/// An `InvalidConfig` error describing the first violation, or the shape
/// inference error if the layers don't fit together.
pub fn validate(layers: &[LayerSpec], optimization: &OptimizationSpec) -> Result<()> {
    validate_layers(layers)?;
    validate_optimization(optimization)?;
    summary::summarize(layers)?;
    Ok(())
}

/// Checks that the stack ends in a dense layer with one unit per label.
pub fn validate_output(layers: &[LayerSpec], output_shape: &Shape) -> Result<()> {
    let expected = output_shape.require("output_shape", 1)?;

    match layers.last() {
        Some(LayerSpec::Dense(dense)) if dense.num_units.get() == expected => Ok(()),
        Some(LayerSpec::Dense(dense)) => Err(invalid(format!(
            "last layer has {} units but output_shape expects {expected}",
            dense.num_units
        ))),
        Some(layer) => Err(invalid(format!(
            "last layer must be dense, got {}",
            layer.kind()
        ))),
        None => Err(invalid("model must have at least one layer")),
    }
}

fn validate_layers(layers: &[LayerSpec]) -> Result<()> {
    let Some(first) = layers.first() else {
        return Err(invalid("model must have at least one layer"));
    };

    if !matches!(first, LayerSpec::Input(_)) {
        return Err(invalid(format!(
            "layer 0: first layer must be input, got {}",
            first.kind()
        )));
    }

    for (i, layer) in layers.iter().enumerate().skip(1) {
        if let LayerSpec::Input(_) = layer {
            return Err(invalid(format!("layer {i}: only the first layer may be input")));
        }

        if let Some(rate) = layer.dropout() {
            if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
                return Err(invalid(format!(
                    "layer {i}: dropout ({rate}) must be in [0, 1)"
                )));
            }
        }

        if let LayerSpec::Conv1d(conv) = layer {
            if conv.max_pool_strides.is_some() && conv.max_pool.is_none() {
                return Err(invalid(format!(
                    "layer {i}: max_pool_strides requires max_pool"
                )));
            }
        }
    }

    Ok(())
}

fn validate_optimization(optimization: &OptimizationSpec) -> Result<()> {
    let OptimizationSpec {
        learning_rate, l2, ..
    } = *optimization;

    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(invalid(format!(
            "learning_rate ({learning_rate}) must be greater than 0"
        )));
    }
    if !l2.is_finite() || l2 < 0.0 {
        return Err(invalid(format!("l2 ({l2}) must not be negative")));
    }

    Ok(())
}

fn invalid(msg: impl Into<String>) -> ZooErr {
    ZooErr::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{
        models::cnn_2_50_invariant,
        specs::{Conv1dSpec, DenseSpec, InputSpec, Padding},
    };

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn recipe() -> (Vec<LayerSpec>, OptimizationSpec) {
        cnn_2_50_invariant::model(&Shape::sequence(1000, 4), &Shape::labels(12)).unwrap()
    }

    fn assert_invalid(res: Result<()>) {
        assert!(matches!(res, Err(ZooErr::InvalidConfig(_))), "{res:?}");
    }

    #[test]
    fn cnn_2_50_invariant_is_valid() {
        let (layers, optimization) = recipe();

        validate(&layers, &optimization).unwrap();
        validate_output(&layers, &Shape::labels(12)).unwrap();
    }

    #[test]
    fn empty_stack_is_invalid() {
        let (_, optimization) = recipe();
        assert_invalid(validate(&[], &optimization));
    }

    #[test]
    fn input_must_be_first_and_only_first() {
        let (mut layers, optimization) = recipe();

        let input = layers.remove(0);
        assert_invalid(validate(&layers, &optimization));

        layers.insert(0, input.clone());
        layers.insert(2, input);
        assert_invalid(validate(&layers, &optimization));
    }

    #[test]
    fn dropout_out_of_range_is_invalid() {
        let (mut layers, optimization) = recipe();

        for rate in [1.0, -0.1, f32::NAN] {
            if let LayerSpec::Dense(dense) = &mut layers[3] {
                dense.dropout = Some(rate);
            }
            assert_invalid(validate(&layers, &optimization));
        }
    }

    #[test]
    fn pool_stride_without_window_is_invalid() {
        let (_, optimization) = recipe();

        let mut conv = Conv1dSpec::new(nz(4), nz(3), Padding::Same);
        conv.max_pool_strides = Some(nz(2));
        let layers = [
            LayerSpec::Input(InputSpec {
                input_shape: Shape::sequence(100, 4),
            }),
            LayerSpec::Conv1d(conv),
        ];

        assert_invalid(validate(&layers, &optimization));
    }

    #[test]
    fn bad_hyperparameters_are_invalid() {
        let (layers, optimization) = recipe();

        let mut zero_lr = optimization;
        zero_lr.learning_rate = 0.0;
        assert_invalid(validate(&layers, &zero_lr));

        let mut negative_l2 = optimization;
        negative_l2.l2 = -1e-6;
        assert_invalid(validate(&layers, &negative_l2));

        let mut no_l2 = optimization;
        no_l2.l2 = 0.0;
        validate(&layers, &no_l2).unwrap();
    }

    #[test]
    fn incompatible_shapes_surface_as_mismatch() {
        let (_, optimization) = recipe();
        let layers = [
            LayerSpec::Input(InputSpec {
                input_shape: Shape::sequence(30, 4),
            }),
            LayerSpec::Conv1d(Conv1dSpec::new(nz(4), nz(40), Padding::Valid)),
        ];

        assert!(matches!(
            validate(&layers, &optimization),
            Err(ZooErr::ShapeMismatch { layer: 1, .. })
        ));
    }

    #[test]
    fn output_mismatch_is_invalid() {
        let (layers, _) = recipe();
        assert_invalid(validate_output(&layers, &Shape::labels(7)));

        let conv_last = [
            LayerSpec::Input(InputSpec {
                input_shape: Shape::sequence(30, 4),
            }),
            LayerSpec::Conv1d(Conv1dSpec::new(nz(4), nz(3), Padding::Same)),
        ];
        assert_invalid(validate_output(&conv_last, &Shape::labels(4)));

        let dense_only = [LayerSpec::Dense(DenseSpec::new(nz(4)))];
        validate_output(&dense_only, &Shape::labels(4)).unwrap();
    }
}
