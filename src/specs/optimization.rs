use serde::{Deserialize, Serialize};

/// The training objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Independent sigmoid outputs with binary cross-entropy.
    Binary,
    /// Softmax outputs with categorical cross-entropy.
    Categorical,
    SquaredError,
}

/// The optimizer the training harness should instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimizer {
    Adam,
    Sgd,
    Rmsprop,
}

/// Training-time hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSpec {
    pub objective: Objective,
    pub optimizer: Optimizer,
    pub learning_rate: f32,
    /// L2 regularization strength.
    pub l2: f32,
}
