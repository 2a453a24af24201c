use std::fmt;

use crate::{
    error::{Result, ZooErr},
    specs::{Conv1dSpec, DenseSpec, InputSpec, LayerSpec, Norm, Padding},
};

/// The shape of the activations flowing out of a layer, batch axis excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorShape {
    Sequence { length: usize, channels: usize },
    Flat { units: usize },
}

impl TensorShape {
    /// The number of values per sample, `None` if it doesn't fit in a `usize`.
    pub fn size(&self) -> Option<usize> {
        match *self {
            TensorShape::Sequence { length, channels } => length.checked_mul(channels),
            TensorShape::Flat { units } => Some(units),
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorShape::Sequence { length, channels } => write!(f, "[{length}, {channels}]"),
            TensorShape::Flat { units } => write!(f, "[{units}]"),
        }
    }
}

/// A single row of a [`ModelSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub index: usize,
    pub kind: &'static str,
    pub output: TensorShape,
    pub trainable: usize,
    pub non_trainable: usize,
}

/// Output shapes and parameter counts of every layer in a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub layers: Vec<LayerSummary>,
}

impl ModelSummary {
    pub fn trainable(&self) -> usize {
        self.layers.iter().map(|l| l.trainable).sum()
    }

    pub fn non_trainable(&self) -> usize {
        self.layers.iter().map(|l| l.non_trainable).sum()
    }

    /// The shape produced by the last layer.
    pub fn output(&self) -> Option<TensorShape> {
        self.layers.last().map(|l| l.output)
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<3} {:<8} {:<12} {:>10} {:>14}",
            "#", "layer", "output", "trainable", "non-trainable"
        )?;
        for l in &self.layers {
            writeln!(
                f,
                "{:<3} {:<8} {:<12} {:>10} {:>14}",
                l.index,
                l.kind,
                l.output.to_string(),
                l.trainable,
                l.non_trainable
            )?;
        }
        write!(
            f,
            "total trainable: {}, non-trainable: {}",
            self.trainable(),
            self.non_trainable()
        )
    }
}

/// Infers every layer's output shape and counts its parameters.
///
/// # Arguments
/// * `layers` - The layer stack, starting with its input layer.
///
/// # Returns
/// The summary or a `ShapeMismatch` error naming the first layer that can't be placed.
pub fn summarize(layers: &[LayerSpec]) -> Result<ModelSummary> {
    let mut current: Option<TensorShape> = None;
    let mut rows = Vec::with_capacity(layers.len());
    let (mut total_trainable, mut total_fixed) = (0usize, 0usize);

    for (index, layer) in layers.iter().enumerate() {
        let (output, trainable, non_trainable) = match (layer, current) {
            (LayerSpec::Input(input), None) => (input_shape(index, input)?, 0, 0),
            (LayerSpec::Input(_), Some(_)) => {
                return Err(mismatch(index, "input layer must come first"));
            }
            (_, None) => return Err(mismatch(index, "no input layer precedes it")),
            (LayerSpec::Conv1d(conv), Some(prev)) => conv1d(index, conv, prev)?,
            (LayerSpec::Dense(dense), Some(prev)) => dense_layer(index, dense, prev)?,
        };

        total_trainable = total_trainable
            .checked_add(trainable)
            .ok_or_else(|| overflow(index))?;
        total_fixed = total_fixed
            .checked_add(non_trainable)
            .ok_or_else(|| overflow(index))?;

        log::debug!("layer {index} ({layer}) -> {output}");
        current = Some(output);
        rows.push(LayerSummary {
            index,
            kind: layer.kind(),
            output,
            trainable,
            non_trainable,
        });
    }

    Ok(ModelSummary { layers: rows })
}

fn input_shape(index: usize, input: &InputSpec) -> Result<TensorShape> {
    let shape = &input.input_shape;
    match shape.len() {
        3 => Ok(TensorShape::Sequence {
            length: shape.require("input_shape", 1)?,
            channels: shape.require("input_shape", 2)?,
        }),
        2 => Ok(TensorShape::Flat {
            units: shape.require("input_shape", 1)?,
        }),
        _ => Err(mismatch(index, format!("unsupported input shape {shape}"))),
    }
}

fn conv1d(
    index: usize,
    conv: &Conv1dSpec,
    prev: TensorShape,
) -> Result<(TensorShape, usize, usize)> {
    let TensorShape::Sequence { length, channels } = prev else {
        return Err(mismatch(index, format!("conv1d expects a sequence, got {prev}")));
    };

    let filters = conv.num_filters.get();
    let filter_size = conv.filter_size.get();

    let mut length = match conv.padding {
        Padding::Same => length,
        Padding::Valid if filter_size > length => {
            return Err(mismatch(
                index,
                format!("filter size ({filter_size}) exceeds sequence length ({length})"),
            ));
        }
        Padding::Valid => length - filter_size + 1,
    };

    if let Some(window) = conv.max_pool {
        let window = window.get();
        let stride = conv.max_pool_strides.map_or(window, |s| s.get());
        if window > length {
            return Err(mismatch(
                index,
                format!("pool window ({window}) exceeds sequence length ({length})"),
            ));
        }
        length = (length - window) / stride + 1;
    }

    let (norm_trainable, norm_fixed) = norm_params(index, conv.norm, filters)?;
    let trainable = filter_size
        .checked_mul(channels)
        .and_then(|n| n.checked_mul(filters))
        .and_then(|n| n.checked_add(filters))
        .and_then(|n| n.checked_add(norm_trainable))
        .ok_or_else(|| overflow(index))?;

    Ok((
        TensorShape::Sequence {
            length,
            channels: filters,
        },
        trainable,
        norm_fixed,
    ))
}

fn dense_layer(
    index: usize,
    dense: &DenseSpec,
    prev: TensorShape,
) -> Result<(TensorShape, usize, usize)> {
    let units = dense.num_units.get();
    let (norm_trainable, norm_fixed) = norm_params(index, dense.norm, units)?;
    let trainable = prev
        .size()
        .and_then(|n| n.checked_mul(units))
        .and_then(|n| n.checked_add(units))
        .and_then(|n| n.checked_add(norm_trainable))
        .ok_or_else(|| overflow(index))?;

    Ok((TensorShape::Flat { units }, trainable, norm_fixed))
}

/// Batch norm learns a scale and shift per channel and tracks a running mean and variance.
fn norm_params(index: usize, norm: Option<Norm>, channels: usize) -> Result<(usize, usize)> {
    match norm {
        Some(Norm::Batch) => {
            let n = channels.checked_mul(2).ok_or_else(|| overflow(index))?;
            Ok((n, n))
        }
        None => Ok((0, 0)),
    }
}

fn overflow(layer: usize) -> ZooErr {
    mismatch(layer, "parameter count overflows")
}

fn mismatch(layer: usize, msg: impl Into<String>) -> ZooErr {
    ZooErr::ShapeMismatch {
        layer,
        msg: msg.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{
        models::cnn_2_50_invariant,
        specs::{InputSpec, Shape},
    };

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn input(length: usize, channels: usize) -> LayerSpec {
        LayerSpec::Input(InputSpec {
            input_shape: Shape::sequence(length, channels),
        })
    }

    #[test]
    fn cnn_2_50_invariant_shapes_and_params() {
        let (layers, _) =
            cnn_2_50_invariant::model(&Shape::sequence(1000, 4), &Shape::labels(12)).unwrap();
        let summary = summarize(&layers).unwrap();

        let shapes: Vec<_> = summary.layers.iter().map(|l| l.output).collect();
        assert_eq!(
            shapes,
            [
                TensorShape::Sequence { length: 1000, channels: 4 },
                TensorShape::Sequence { length: 476, channels: 24 },
                TensorShape::Sequence { length: 9, channels: 64 },
                TensorShape::Flat { units: 96 },
                TensorShape::Flat { units: 12 },
            ]
        );

        let trainable: Vec<_> = summary.layers.iter().map(|l| l.trainable).collect();
        assert_eq!(trainable, [0, 1848 + 48, 7744 + 128, 55392 + 192, 1164]);
        assert_eq!(summary.trainable(), 66516);
        assert_eq!(summary.non_trainable(), 48 + 128 + 192);
        assert_eq!(summary.output(), Some(TensorShape::Flat { units: 12 }));
    }

    #[test]
    fn valid_padding_shrinks_the_sequence() {
        let layers = [
            input(10, 4),
            LayerSpec::Conv1d(Conv1dSpec::new(nz(2), nz(3), Padding::Valid)),
        ];

        let summary = summarize(&layers).unwrap();
        assert_eq!(
            summary.output(),
            Some(TensorShape::Sequence { length: 8, channels: 2 })
        );
    }

    #[test]
    fn oversized_filter_and_pool_are_rejected() {
        let filter = [
            input(4, 4),
            LayerSpec::Conv1d(Conv1dSpec::new(nz(2), nz(5), Padding::Valid)),
        ];
        assert!(matches!(
            summarize(&filter),
            Err(ZooErr::ShapeMismatch { layer: 1, .. })
        ));

        let mut conv = Conv1dSpec::new(nz(2), nz(3), Padding::Same);
        conv.max_pool = Some(nz(8));
        let pool = [input(4, 4), LayerSpec::Conv1d(conv)];
        assert!(matches!(
            summarize(&pool),
            Err(ZooErr::ShapeMismatch { layer: 1, .. })
        ));
    }

    #[test]
    fn conv_after_dense_is_rejected() {
        let layers = [
            input(10, 4),
            LayerSpec::Dense(DenseSpec::new(nz(3))),
            LayerSpec::Conv1d(Conv1dSpec::new(nz(2), nz(3), Padding::Same)),
        ];
        assert!(matches!(
            summarize(&layers),
            Err(ZooErr::ShapeMismatch { layer: 2, .. })
        ));
    }

    #[test]
    fn stack_without_leading_input_is_rejected() {
        let layers = [LayerSpec::Dense(DenseSpec::new(nz(3)))];
        assert!(matches!(
            summarize(&layers),
            Err(ZooErr::ShapeMismatch { layer: 0, .. })
        ));
    }

    #[test]
    fn flat_input_feeds_dense_directly() {
        let layers = [
            LayerSpec::Input(InputSpec {
                input_shape: Shape::labels(20),
            }),
            LayerSpec::Dense(DenseSpec::new(nz(5))),
        ];

        let summary = summarize(&layers).unwrap();
        assert_eq!(summary.layers[1].trainable, 20 * 5 + 5);
    }

    #[test]
    fn huge_dense_fan_in_is_a_mismatch_not_a_panic() {
        let layers = [
            input(1 << 32, 1 << 32),
            LayerSpec::Dense(DenseSpec::new(nz(2))),
        ];

        assert!(matches!(
            summarize(&layers),
            Err(ZooErr::ShapeMismatch { layer: 1, msg }) if msg == "parameter count overflows"
        ));
    }

    #[test]
    fn huge_conv_kernel_is_a_mismatch_not_a_panic() {
        let mut conv = Conv1dSpec::new(nz(usize::MAX / 2), nz(3), Padding::Same);
        conv.norm = Some(Norm::Batch);
        let layers = [input(10, 4), LayerSpec::Conv1d(conv)];

        assert!(matches!(
            summarize(&layers),
            Err(ZooErr::ShapeMismatch { layer: 1, .. })
        ));
    }

    #[test]
    fn table_lists_every_layer_and_totals() {
        let (layers, _) =
            cnn_2_50_invariant::model(&Shape::sequence(1000, 4), &Shape::labels(12)).unwrap();
        let table = summarize(&layers).unwrap().to_string();

        assert_eq!(table.lines().count(), 1 + 5 + 1);
        assert!(table.contains("[476, 24]"));
        assert!(table.ends_with("total trainable: 66516, non-trainable: 368"));
    }
}
