//! Configuration types for agent creation.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters for a Q-learning agent.
///
/// Builder-style setters keep call sites readable; every field also has a
/// serde default so a JSON file only needs to name what it overrides.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_alpha(0.5)
///     .with_epsilon(0.1)
///     .with_seed(42);
/// config.validate()?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Floor for the exploration rate
    pub epsilon_min: f64,
    /// Multiplicative decay applied once per episode
    pub epsilon_decay: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub const DEFAULT_ALPHA: f64 = 0.25;
    pub const DEFAULT_GAMMA: f64 = 0.95;
    pub const DEFAULT_EPSILON: f64 = 0.20;
    pub const DEFAULT_EPSILON_MIN: f64 = 0.02;
    pub const DEFAULT_EPSILON_DECAY: f64 = 0.9995;

    /// Set the learning rate.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the discount factor.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the exploration floor.
    pub fn with_epsilon_min(mut self, epsilon_min: f64) -> Self {
        self.epsilon_min = epsilon_min;
        self
    }

    /// Set the per-episode decay factor.
    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every scalar against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check("alpha", self.alpha, |v| v > 0.0 && v <= 1.0, "(0, 1]")?;
        check("gamma", self.gamma, |v| (0.0..=1.0).contains(&v), "[0, 1]")?;
        check("epsilon", self.epsilon, |v| (0.0..=1.0).contains(&v), "[0, 1]")?;
        check(
            "epsilon_min",
            self.epsilon_min,
            |v| (0.0..=1.0).contains(&v),
            "[0, 1]",
        )?;
        check(
            "epsilon_decay",
            self.epsilon_decay,
            |v| v > 0.0 && v <= 1.0,
            "(0, 1]",
        )?;
        Ok(())
    }

    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {path:?}"),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

fn check(name: &str, value: f64, admissible: impl Fn(f64) -> bool, range: &str) -> Result<()> {
    if value.is_finite() && admissible(value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("{name} must be in {range}, got {value}"),
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            gamma: Self::DEFAULT_GAMMA,
            epsilon: Self::DEFAULT_EPSILON,
            epsilon_min: Self::DEFAULT_EPSILON_MIN,
            epsilon_decay: Self::DEFAULT_EPSILON_DECAY,
            seed: None,
        }
    }
}
