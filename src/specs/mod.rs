mod layer;
mod optimization;
mod shape;

pub use layer::{Activation, Conv1dSpec, DenseSpec, InputSpec, LayerSpec, Norm, Padding};
pub use optimization::{Objective, OptimizationSpec, Optimizer};
pub use shape::Shape;
