//! Annealing configuration.

use crate::error::{BetweennessError, Result};

/// Configuration for the annealing engine and its retry policy.
///
/// Cooling is geometric: `T_{k+1} = alpha * T_k`, one level every
/// `iterations_per_temperature` neighbor evaluations.
///
/// # Examples
///
/// ```
/// use u_betweenness::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(2.0)
///     .with_min_temperature(1e-4)
///     .with_alpha(0.999)
///     .with_iterations_per_temperature(200)
///     .with_max_repeats(3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealConfig {
    /// Starting temperature of a pass.
    pub initial_temperature: f64,

    /// A pass stops once the temperature is no longer above this floor.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1). Higher = slower cooling.
    pub alpha: f64,

    /// Neighbor evaluations per temperature level.
    pub iterations_per_temperature: usize,

    /// Extra passes after an exhausted one, each starting from the best
    /// ordering found so far.
    pub max_repeats: usize,

    /// Starting temperature of retry passes. `None` reuses
    /// `initial_temperature`.
    pub retry_temperature: Option<f64>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            min_temperature: 1e-5,
            alpha: 0.9999,
            iterations_per_temperature: 100,
            max_repeats: 1,
            retry_temperature: None,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_repeats(mut self, n: usize) -> Self {
        self.max_repeats = n;
        self
    }

    pub fn with_retry_temperature(mut self, t: f64) -> Self {
        self.retry_temperature = Some(t);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Temperature at which retry passes start.
    pub fn restart_temperature(&self) -> f64 {
        self.retry_temperature.unwrap_or(self.initial_temperature)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(invalid("initial_temperature must be positive and finite"));
        }
        if self.min_temperature.is_nan() || self.min_temperature <= 0.0 {
            return Err(invalid("min_temperature must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(invalid(
                "min_temperature must be less than initial_temperature",
            ));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(invalid(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(invalid("iterations_per_temperature must be at least 1"));
        }
        if let Some(t) = self.retry_temperature {
            if !t.is_finite() || t <= self.min_temperature {
                return Err(invalid(
                    "retry_temperature must be greater than min_temperature",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl AnnealConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```
    /// use u_betweenness::AnnealConfig;
    ///
    /// let config = AnnealConfig::from_toml_str("alpha = 0.99\nseed = 7").unwrap();
    /// assert_eq!(config.alpha, 0.99);
    /// assert_eq!(config.seed, Some(7));
    /// assert_eq!(config.iterations_per_temperature, 100);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| BetweennessError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }
}

fn invalid(msg: impl Into<String>) -> BetweennessError {
    BetweennessError::InvalidConfig(msg.into())
}
