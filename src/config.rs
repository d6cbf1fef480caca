//! Training configuration, loadable from JSON.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::trainer::{LearningMode, Logging, StopCondition, Trainer};

use rand::Rng;
use std::path::Path;

/// Everything needed to build a network and train it.
///
/// Missing fields take their value from `Default`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Width of the input vector.
    pub input_len: usize,
    /// Number of nodes per layer, output layer last.
    pub layer_sizes: Vec<usize>,
    /// Per layer, the width of the interval initial weights are drawn from.
    pub weight_ranges: Vec<f64>,
    /// Per layer, the width of the interval initial biases are drawn from.
    pub bias_ranges: Vec<f64>,
    pub epochs: usize,
    /// Number of synthetic examples generated per run.
    pub examples: usize,
    pub batch_size: usize,
    pub bias_learning_rate: f64,
    pub weight_learning_rate: f64,
    /// Log every this many epochs; 0 only logs on completion.
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            input_len: 2,
            layer_sizes: vec![2, 2, 2],
            weight_ranges: vec![1.0, 1.0, 1.0],
            bias_ranges: vec![3.0, 3.0, 3.0],
            epochs: 100,
            examples: 1000,
            batch_size: 10,
            bias_learning_rate: 0.5,
            weight_learning_rate: 0.5,
            log_every: 1,
        }
    }
}

impl TrainingConfig {
    /// Reads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds a freshly initialized network of the configured shape.
    pub fn build_network<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        Network::initialize_with_rng(
            self.input_len,
            &self.layer_sizes,
            &self.weight_ranges,
            &self.bias_ranges,
            rng,
        )
    }

    /// Wraps `network` in a trainer using the configured batching, rates and
    /// epoch count.
    pub fn trainer(&self, network: Network) -> Result<Trainer> {
        if self.epochs == 0 {
            return Err(Error::InvalidTraining("epochs must be at least 1".into()));
        }
        let logging = if self.log_every == 0 {
            Logging::Completion
        } else {
            Logging::Epochs(self.log_every)
        };
        Ok(Trainer::new(network)
            .learning_mode(LearningMode::Batch(self.batch_size))
            .learning_rates(self.bias_learning_rate, self.weight_learning_rate)
            .logging(logging)
            .stop_condition(StopCondition::Epochs(self.epochs)))
    }
}

/// Failure to read a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn partial_json_uses_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"epochs": 5, "layer_sizes": [3, 1]}"#).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.layer_sizes, vec![3, 1]);
        assert_eq!(config.batch_size, TrainingConfig::default().batch_size);
    }

    #[test]
    fn default_builds_original_topology() {
        let mut rng = StdRng::seed_from_u64(5);
        let network = TrainingConfig::default().build_network(&mut rng).unwrap();
        assert_eq!(network.input_len(), 2);
        assert_eq!(network.layers().len(), 3);
        assert_eq!(network.output_len(), 2);
    }

    #[test]
    fn inconsistent_ranges_are_rejected() {
        let config = TrainingConfig {
            weight_ranges: vec![1.0],
            ..TrainingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!(config.build_network(&mut rng).is_err());
    }

    #[test]
    fn zero_epochs_is_rejected() {
        let config = TrainingConfig {
            epochs: 0,
            ..TrainingConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let network = config.build_network(&mut rng).unwrap();
        assert!(config.trainer(network).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            TrainingConfig::from_file("/nonexistent/gradnet.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
