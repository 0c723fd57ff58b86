//! Machine Learning Module
//!
//! Inference-side support for the pre-trained demand model:
//! - Affine feature/target scalers fit during training
//! - The linear load model and its on-disk record
//!
//! Training happens offline; this crate only loads and evaluates.

use std::path::PathBuf;

use thiserror::Error;

pub mod linear;
pub mod scaler;

pub use linear::{LinearLoadModel, ModelRecord};
pub use scaler::AffineScaler;

/// Errors raised while loading or validating a trained model.
///
/// All of them are fatal at startup: a process must never serve with a
/// malformed model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode JSON model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode bincode model: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("unsupported model file extension for {0} (expected .json or .bin)")]
    UnsupportedFormat(PathBuf),

    #[error("{component} has dimension {actual}, expected {expected}")]
    Dimension {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{component} is not invertible: scale[{index}] = {value}")]
    NonInvertible {
        component: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{component} contains a non-finite value at index {index}")]
    NonFinite {
        component: &'static str,
        index: usize,
    },
}
