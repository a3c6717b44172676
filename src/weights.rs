use crate::models::CRITERIA_COUNT;

/// Weight applied to the margin axis. Not exposed to the operator.
pub const MARGIN_WEIGHT: f64 = 1.0;

/// Bounds for operator-supplied weights, enforced by the argument parser.
pub const MIN_WEIGHT: i64 = -100;
pub const MAX_WEIGHT: i64 = 100;

/// Criteria in the order their weights are collected.
pub const CRITERIA_LABELS: [&str; CRITERIA_COUNT] = [
    "Acquirer flag",
    "Noise index",
    "Expiration proximity",
    "Failed contact",
    "Explicit refusal",
    "Special requests",
    "Routed orders",
    "Pending review",
];

/// Zero-based positions whose weight lowers priority when raised.
const INVERTED: [usize; 2] = [3, 4];

#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    values: Vec<f64>,
}

impl WeightVector {
    /// Builds the combination vector from operator weights, negating the
    /// failed-contact and explicit-refusal entries.
    pub fn from_operator(weights: [i64; CRITERIA_COUNT]) -> Self {
        let values = weights
            .iter()
            .enumerate()
            .map(|(index, weight)| {
                let value = *weight as f64;
                if INVERTED.contains(&index) {
                    -value
                } else {
                    value
                }
            })
            .collect();

        Self { values }
    }

    /// Wraps an already-signed vector as-is.
    #[cfg(test)]
    pub fn from_raw(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            values: self.values.iter().map(|value| value * factor).collect(),
        }
    }
}
