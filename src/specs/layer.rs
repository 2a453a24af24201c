use std::{fmt, num::NonZeroUsize};

use serde::{Deserialize, Serialize};

use super::Shape;

/// Convolution padding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Padding {
    /// Output length equals input length.
    Same,
    /// No padding, the kernel only visits full windows.
    Valid,
}

/// Normalization applied after the linear part of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    Batch,
}

/// Activation function applied after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
    Softmax,
    Tanh,
    Linear,
}

/// The specification for the network's input stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub input_shape: Shape,
}

/// The specification for a 1D convolution, optionally followed by max pooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conv1dSpec {
    pub num_filters: NonZeroUsize,
    pub filter_size: NonZeroUsize,
    pub padding: Padding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norm: Option<Norm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    /// Pooling window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pool: Option<NonZeroUsize>,
    /// Pooling stride, the window size when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pool_strides: Option<NonZeroUsize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f32>,
}

impl Conv1dSpec {
    /// Creates a bare convolution with no norm, activation, pooling or dropout.
    pub fn new(num_filters: NonZeroUsize, filter_size: NonZeroUsize, padding: Padding) -> Self {
        Self {
            num_filters,
            filter_size,
            padding,
            norm: None,
            activation: None,
            max_pool: None,
            max_pool_strides: None,
            dropout: None,
        }
    }
}

/// The specification for a fully connected layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSpec {
    pub num_units: NonZeroUsize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norm: Option<Norm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f32>,
}

impl DenseSpec {
    /// Creates a bare dense layer with no norm, activation or dropout.
    pub fn new(num_units: NonZeroUsize) -> Self {
        Self {
            num_units,
            norm: None,
            activation: None,
            dropout: None,
        }
    }
}

/// One stage of a network, discriminated by the `layer` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum LayerSpec {
    Input(InputSpec),
    Conv1d(Conv1dSpec),
    Dense(DenseSpec),
}

impl LayerSpec {
    /// The value of this layer's `layer` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSpec::Input(_) => "input",
            LayerSpec::Conv1d(_) => "conv1d",
            LayerSpec::Dense(_) => "dense",
        }
    }

    pub fn dropout(&self) -> Option<f32> {
        match self {
            LayerSpec::Input(_) => None,
            LayerSpec::Conv1d(l) => l.dropout,
            LayerSpec::Dense(l) => l.dropout,
        }
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSpec::Input(l) => write!(f, "input {}", l.input_shape),
            LayerSpec::Conv1d(l) => write!(
                f,
                "conv1d {}x{} {:?}",
                l.num_filters, l.filter_size, l.padding
            ),
            LayerSpec::Dense(l) => write!(f, "dense {}", l.num_units),
        }
    }
}
