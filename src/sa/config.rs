//! SA configuration.

use crate::error::{Result, TspError};

/// Configuration for [`SimulatedAnnealing`](super::SimulatedAnnealing).
///
/// The cooling schedule and the neighborhood are strategy objects injected
/// into the solver, not part of this struct.
///
/// # Examples
///
/// ```
/// use u_tsp::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_epoch_size(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The run ends once the temperature is no longer above this value. An
    /// `initial_temperature` at or below it is valid: the run then keeps the
    /// identity tour.
    pub min_temperature: f64,

    /// Neighbor evaluations performed at each temperature level.
    pub epoch_size: usize,

    /// Random seed for reproducibility. `None` draws one at construction.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 0.1,
            epoch_size: 100,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_epoch_size(mut self, n: usize) -> Self {
        self.epoch_size = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0) {
            return Err(TspError::InvalidConfig(
                "initial_temperature must be positive".into(),
            ));
        }
        if !(self.min_temperature > 0.0) {
            return Err(TspError::InvalidConfig(
                "min_temperature must be positive".into(),
            ));
        }
        if self.epoch_size == 0 {
            return Err(TspError::InvalidConfig(
                "epoch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
