use serde::ser::{Serialize, SerializeMap, Serializer};

pub const MIN_HORIZON_HOURS: u32 = 1;
pub const MAX_HORIZON_HOURS: u32 = 24;

/// Bound a caller-supplied horizon to the supported range.
pub fn clamp_horizon(requested: i64) -> u32 {
    requested.clamp(i64::from(MIN_HORIZON_HOURS), i64::from(MAX_HORIZON_HOURS)) as u32
}

/// Round to one decimal place for presentation.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Ordered step -> load mapping produced by one forecast run.
///
/// Steps are numbered from 1. Values are already rounded to one decimal and
/// the result is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadForecast {
    loads_mw: Vec<f64>,
}

impl LoadForecast {
    pub(crate) fn from_steps(loads_mw: Vec<f64>) -> Self {
        Self { loads_mw }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> u32 {
        self.loads_mw.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.loads_mw.is_empty()
    }

    /// Load at `step` (1-based).
    pub fn get(&self, step: u32) -> Option<f64> {
        let index = usize::try_from(step).ok()?.checked_sub(1)?;
        self.loads_mw.get(index).copied()
    }

    /// `(step, load)` pairs in increasing step order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.loads_mw
            .iter()
            .enumerate()
            .map(|(i, load)| (i as u32 + 1, *load))
    }

    pub fn values(&self) -> &[f64] {
        &self.loads_mw
    }

    /// Highest predicted step.
    pub fn peak(&self) -> Option<f64> {
        self.loads_mw.iter().copied().reduce(f64::max)
    }

    /// Peak-alert check: strictly above `threshold_mw`.
    pub fn peak_exceeds(&self, threshold_mw: f64) -> bool {
        self.peak().is_some_and(|peak| peak > threshold_mw)
    }

    /// Wire key for a step.
    pub fn step_key(step: u32) -> String {
        format!("load_lag_t+{step}")
    }
}

impl Serialize for LoadForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.loads_mw.len()))?;
        for (step, load) in self.iter() {
            map.serialize_entry(&Self::step_key(step), &load)?;
        }
        map.end()
    }
}
