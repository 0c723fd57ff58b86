//! Affine feature scaling (z-score style) as fit during training.

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Per-dimension affine transform `x_norm = (x - mean) / scale`.
///
/// Field aliases accept the attribute names used by the training export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineScaler {
    #[serde(alias = "mean_", alias = "center", alias = "centers")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_", alias = "scales")]
    pub scale: Vec<f64>,
}

impl AffineScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Identity transform over `dim` dimensions.
    pub fn identity(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            scale: vec![1.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Check dimensionality, finiteness and invertibility.
    pub fn validate(&self, component: &'static str, expected: usize) -> Result<(), ModelError> {
        for actual in [self.mean.len(), self.scale.len()] {
            if actual != expected {
                return Err(ModelError::Dimension {
                    component,
                    expected,
                    actual,
                });
            }
        }
        if let Some(index) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(ModelError::NonFinite { component, index });
        }
        if let Some((index, &value)) = self
            .scale
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s == 0.0)
        {
            return Err(ModelError::NonInvertible {
                component,
                index,
                value,
            });
        }
        Ok(())
    }

    /// Map raw values into normalized space.
    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        debug_assert_eq!(raw.len(), self.dim());
        raw.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    /// Map normalized values back to physical units.
    pub fn inverse_transform(&self, normalized: &[f64]) -> Vec<f64> {
        debug_assert_eq!(normalized.len(), self.dim());
        normalized
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(y, (mean, scale))| y * scale + mean)
            .collect()
    }

    /// Inverse transform of a single target value (first dimension).
    pub fn inverse_scalar(&self, normalized: f64) -> f64 {
        normalized * self.scale[0] + self.mean[0]
    }
}
