//! Utilities for training neural networks.

use crate::accumulator::GradientAccumulator;
use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::gradient::Backpropagation;

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Makes a model trainable using gradient descent.
pub trait Trainable {
    /// A container for training updates.
    type Update;

    /// Returns a new, empty model update.
    fn new_update(&self) -> Self::Update;

    /// Using the provided training example, accumulate model updates into
    /// `update`. Returns the total cost of the example prediction.
    fn compute_update(
        &self,
        input: &[f64],
        expected: &[f64],
        update: &mut Self::Update,
    ) -> Result<f64>;

    /// Applies and resets the provided `update`, scaling biases by
    /// `bias_rate` and weights by `weight_rate`.
    fn apply_update(
        &mut self,
        bias_rate: f64,
        weight_rate: f64,
        update: &mut Self::Update,
    ) -> Result<()>;
}

impl Trainable for Network {
    type Update = GradientAccumulator;

    fn new_update(&self) -> GradientAccumulator {
        GradientAccumulator::new(self)
    }

    fn compute_update(
        &self,
        input: &[f64],
        expected: &[f64],
        update: &mut GradientAccumulator,
    ) -> Result<f64> {
        let pass = self.calculate(input)?;
        let backprop = Backpropagation::new(self, &pass, expected)?;
        backprop.execute(update)?;
        Ok(backprop.total_cost())
    }

    fn apply_update(
        &mut self,
        bias_rate: f64,
        weight_rate: f64,
        update: &mut GradientAccumulator,
    ) -> Result<()> {
        update.apply(self, bias_rate, weight_rate)?;
        update.reset();
        Ok(())
    }
}

/// A builder for training networks.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    learning_mode: LearningMode,
    bias_learning_rate: f64,
    weight_learning_rate: f64,
    logging: Logging,
    stop_condition: StopCondition,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Batches of 10 examples.
    /// * A learning rate of 0.5 for both weights and biases.
    /// * Stops after 100 epochs.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            learning_mode: LearningMode::Batch(10),
            bias_learning_rate: 0.5,
            weight_learning_rate: 0.5,
            logging: Logging::Completion,
            stop_condition: StopCondition::Epochs(100),
        }
    }

    /// Sets the `LearningMode` to use for training.
    pub fn learning_mode(mut self, mode: LearningMode) -> Self {
        self.learning_mode = mode;
        self
    }

    /// Sets the learning rate used for both weights and biases.
    pub fn learning_rate(self, rate: f64) -> Self {
        self.learning_rates(rate, rate)
    }

    /// Sets separate learning rates for biases and weights.
    pub fn learning_rates(mut self, bias_rate: f64, weight_rate: f64) -> Self {
        self.bias_learning_rate = bias_rate;
        self.weight_learning_rate = weight_rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Gives back the network being trained.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    ///
    /// Returns:
    ///   The trained network, or an error if invalid training parameters were
    ///   provided.
    pub fn train<I, O>(mut self, examples: &[(I, O)]) -> Result<Network>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut epoch = 0;
        let mut training_cost;
        loop {
            training_cost = self.run_epoch(examples)?;
            epoch += 1;

            self.logging.epoch(epoch, training_cost);
            if self.stop_condition.should_stop(epoch, training_cost, start_time) {
                break;
            }
        }
        self.logging.completion(epoch, training_cost, start_time);
        Ok(self.network)
    }

    /// Runs every example through the network once, applying one update per
    /// batch. Returns the summed cost of all examples.
    pub fn train_epoch<I, O>(&mut self, examples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;
        self.run_epoch(examples)
    }

    fn run_epoch<I, O>(&mut self, examples: &[(I, O)]) -> Result<f64>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        let batch_size = self.learning_mode.batch_size();
        let mut updates = self.network.new_update();
        let mut epoch_cost = 0.0;
        for (b, batch) in examples.chunks(batch_size).enumerate() {
            let mut batch_cost = 0.0;
            for (input, expected) in batch {
                batch_cost +=
                    self.network
                        .compute_update(input.as_ref(), expected.as_ref(), &mut updates)?;
            }
            self.network.apply_update(
                self.bias_learning_rate,
                self.weight_learning_rate,
                &mut updates,
            )?;
            debug!(batch = b, examples = batch.len(), cost = batch_cost, "applied batch");
            epoch_cost += batch_cost;
        }
        Ok(epoch_cost)
    }

    /// Verifies that all provided inputs to the `Trainer` are valid, returning
    /// an error if something is wrong.
    fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if examples.is_empty() {
            return Err(Error::InvalidTraining("no training examples".into()));
        }
        if let LearningMode::Batch(batch_size) = self.learning_mode {
            if batch_size == 0 || batch_size > examples.len() {
                return Err(Error::InvalidTraining(format!(
                    "batch size must be from 1 to {}, but got {}",
                    examples.len(),
                    batch_size
                )));
            }
        }
        let (inputs, outputs) = (self.network.input_len(), self.network.output_len());
        for (i, (input, expected)) in examples.iter().enumerate() {
            if input.as_ref().len() != inputs {
                return Err(Error::InvalidTraining(format!(
                    "expected {} inputs, but example {} has {}",
                    inputs,
                    i,
                    input.as_ref().len()
                )));
            }
            if expected.as_ref().len() != outputs {
                return Err(Error::InvalidTraining(format!(
                    "expected {} outputs, but example {} has {}",
                    outputs,
                    i,
                    expected.as_ref().len()
                )));
            }
        }
        Ok(())
    }
}

/// The learning mode to use for training
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LearningMode {
    /// Apply weight updates after every training example
    Stochastic,
    /// Apply weights updates in batches of the provided size
    ///
    /// Must not exceed the total number of training instances.
    Batch(usize),
}

impl LearningMode {
    fn batch_size(&self) -> usize {
        match *self {
            LearningMode::Stochastic => 1,
            LearningMode::Batch(size) => size,
        }
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// A summary will be emitted after every `n` epochs
    Epochs(usize),
}

impl Logging {
    /// Performs logging at the current `epoch` of training.
    fn epoch(&self, epoch: usize, training_cost: f64) {
        if let Logging::Epochs(freq) = *self {
            if freq > 0 && epoch % freq == 0 {
                info!(epoch, cost = training_cost, "completed epoch");
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, epochs: usize, training_cost: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            epochs,
            seconds = start_time.elapsed().as_secs_f64(),
            cost = training_cost,
            "training completed"
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Epochs(usize),
    /// Stops when the epoch cost drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, epoch: usize, training_cost: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Epochs(epochs) => epoch >= epochs,
            StopCondition::ErrorThreshold(threshold) => training_cost < threshold,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
