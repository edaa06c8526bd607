use crate::error::HarnessError;

pub const HISTOGRAM_BINS: usize = 20;

/// Ordered confidence cutoffs for the accuracy/coverage curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSweep {
    pub thresholds: Vec<f64>,
}

impl ThresholdSweep {
    /// 0.50, 0.55, ..., 0.95.
    pub fn default_v1() -> Self {
        Self {
            thresholds: (0..10).map(|i| (50 + 5 * i) as f64 / 100.0).collect(),
        }
    }

    pub fn from_values(thresholds: Vec<f64>) -> Result<Self, HarnessError> {
        let sweep = Self { thresholds };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.thresholds.is_empty() {
            return Err(HarnessError::Config(
                "threshold list must not be empty".to_string(),
            ));
        }
        for &t in &self.thresholds {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(HarnessError::Config(format!(
                    "threshold {t} is outside [0, 1]"
                )));
            }
        }
        for pair in self.thresholds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(HarnessError::Config(format!(
                    "thresholds must be strictly ascending ({} then {})",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self::default_v1()
    }
}
