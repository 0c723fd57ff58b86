//! Linear demand model: scaler -> dot product + bias -> inverse scaler.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AffineScaler, ModelError};
use crate::forecast::features::{FEATURE_COUNT, FEATURE_NAMES};

/// On-disk model record. Exactly the four trained components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub input_scaler: AffineScaler,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub output_scaler: AffineScaler,
}

/// JSON exports from the training notebook store `w` as a 6x1 column and `b`
/// as a one-element array. Only JSON is self-describing enough to accept both.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonModelRecord {
    #[serde(alias = "scaler_X", alias = "scaler_x")]
    input_scaler: AffineScaler,
    #[serde(alias = "w")]
    weights: Coefficients,
    #[serde(alias = "b")]
    bias: Scalar,
    #[serde(alias = "scaler_y")]
    output_scaler: AffineScaler,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coefficients {
    Flat(Vec<f64>),
    Column(Vec<[f64; 1]>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Value(f64),
    Wrapped([f64; 1]),
}

impl From<JsonModelRecord> for ModelRecord {
    fn from(raw: JsonModelRecord) -> Self {
        let weights = match raw.weights {
            Coefficients::Flat(w) => w,
            Coefficients::Column(rows) => rows.into_iter().map(|[w]| w).collect(),
        };
        let bias = match raw.bias {
            Scalar::Value(b) | Scalar::Wrapped([b]) => b,
        };
        Self {
            input_scaler: raw.input_scaler,
            weights,
            bias,
            output_scaler: raw.output_scaler,
        }
    }
}

/// A validated, immutable trained model.
///
/// Construction is the only place that can fail; `predict` is total.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLoadModel {
    input_scaler: AffineScaler,
    weights: [f64; FEATURE_COUNT],
    bias: f64,
    output_scaler: AffineScaler,
}

impl LinearLoadModel {
    pub fn from_record(record: ModelRecord) -> Result<Self, ModelError> {
        record.input_scaler.validate("input_scaler", FEATURE_COUNT)?;
        record.output_scaler.validate("output_scaler", 1)?;

        let weights: [f64; FEATURE_COUNT] = record.weights.as_slice().try_into().map_err(|_| {
            ModelError::Dimension {
                component: "weights",
                expected: FEATURE_COUNT,
                actual: record.weights.len(),
            }
        })?;
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite {
                component: "weights",
                index,
            });
        }
        if !record.bias.is_finite() {
            return Err(ModelError::NonFinite {
                component: "bias",
                index: 0,
            });
        }

        Ok(Self {
            input_scaler: record.input_scaler,
            weights,
            bias: record.bias,
            output_scaler: record.output_scaler,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let raw: JsonModelRecord = serde_json::from_str(json)?;
        Self::from_record(raw.into())
    }

    /// Invalid UTF-8 is a parse error, not something to repair.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let raw: JsonModelRecord = serde_json::from_slice(bytes)?;
        Self::from_record(raw.into())
    }

    pub fn from_bincode(bytes: &[u8]) -> Result<Self, ModelError> {
        let record: ModelRecord = bincode::deserialize(bytes)?;
        Self::from_record(record)
    }

    /// Load a model file; the format is chosen by extension (`.json`, `.bin`).
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_slice(&bytes)?,
            Some("bin") => Self::from_bincode(&bytes)?,
            _ => return Err(ModelError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            path = %path.display(),
            features = ?FEATURE_NAMES,
            "demand model loaded"
        );
        Ok(model)
    }

    pub fn to_record(&self) -> ModelRecord {
        ModelRecord {
            input_scaler: self.input_scaler.clone(),
            weights: self.weights.to_vec(),
            bias: self.bias,
            output_scaler: self.output_scaler.clone(),
        }
    }

    /// Run one inference on a raw (unnormalized) feature vector and return
    /// the load in physical units.
    pub fn predict(&self, raw: &[f64; FEATURE_COUNT]) -> f64 {
        let normalized = self.input_scaler.transform(raw);
        let y_norm = normalized
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias;
        self.output_scaler.inverse_scalar(y_norm)
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }
}
