//! Declarative model recipes for 1D sequence classifiers.
//!
//! Each model in [`models`] turns an input and an output shape into a layer
//! stack plus an optimization recipe that an external training harness
//! builds and trains. Nothing here runs a network.

pub mod config;
pub mod error;
pub mod models;
pub mod specs;
pub mod summary;
pub mod validation;

pub use config::ModelConfig;
pub use error::{Result, ZooErr};
pub use summary::{ModelSummary, summarize};
