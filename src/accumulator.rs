//! Batch gradient accumulation.

use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::utils::ZeroOut;

use itertools::izip;

/// Summed gradients for one node's parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeGradient {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl ZeroOut for NodeGradient {
    fn zero_out(&mut self) {
        self.bias.zero_out();
        self.weights.zero_out();
    }
}

/// Sums the gradient of the cost over every example of a batch, then
/// updates the network once.
///
/// Contributions must be added for every example before `apply` is
/// called; applying part way through a batch silently gives a partial
/// step.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientAccumulator {
    layers: Vec<Vec<NodeGradient>>,
    examples: usize,
}

impl GradientAccumulator {
    /// Creates a zeroed accumulator shaped like `network`.
    pub fn new(network: &Network) -> Self {
        let layers = network
            .layers()
            .iter()
            .map(|layer| {
                layer
                    .nodes()
                    .iter()
                    .map(|node| NodeGradient {
                        bias: 0.0,
                        weights: vec![0.0; node.input_len()],
                    })
                    .collect()
            })
            .collect();
        GradientAccumulator {
            layers,
            examples: 0,
        }
    }

    fn node_mut(&mut self, layer: usize, node: usize) -> Result<&mut NodeGradient> {
        self.layers
            .get_mut(layer)
            .and_then(|l| l.get_mut(node))
            .ok_or(Error::NodeOutOfRange { layer, node })
    }

    fn node(&self, layer: usize, node: usize) -> Option<&NodeGradient> {
        self.layers.get(layer)?.get(node)
    }

    /// Adds `value` to the bias gradient of `(layer, node)`.
    pub fn add_bias(&mut self, value: f64, layer: usize, node: usize) -> Result<()> {
        self.node_mut(layer, node)?.bias += value;
        Ok(())
    }

    /// Adds `value` to the gradient of weight `weight` of `(layer, node)`.
    ///
    /// A weight index past the end of the node's gradient vector is treated
    /// as an untouched zero.
    pub fn add_weight(&mut self, value: f64, layer: usize, node: usize, weight: usize) -> Result<()> {
        let gradient = self.node_mut(layer, node)?;
        if weight >= gradient.weights.len() {
            gradient.weights.resize(weight + 1, 0.0);
        }
        gradient.weights[weight] += value;
        Ok(())
    }

    /// Records that one more example has been accumulated.
    pub(crate) fn count_example(&mut self) {
        self.examples += 1;
    }

    /// Returns the number of examples accumulated since the last reset.
    pub fn examples(&self) -> usize {
        self.examples
    }

    /// The accumulated bias gradient of `(layer, node)`, zero if unknown.
    pub fn bias(&self, layer: usize, node: usize) -> f64 {
        self.node(layer, node).map_or(0.0, |g| g.bias)
    }

    /// The accumulated weight gradients of `(layer, node)`.
    pub fn weights(&self, layer: usize, node: usize) -> &[f64] {
        match self.node(layer, node) {
            Some(g) => &g.weights,
            None => &[],
        }
    }

    pub fn layers(&self) -> &[Vec<NodeGradient>] {
        &self.layers
    }

    /// Zeroes every gradient, ready for the next batch.
    pub fn reset(&mut self) {
        self.layers.zero_out();
        self.examples = 0;
    }

    /// Adds the sums held by `other`, e.g. from a worker that processed a
    /// different slice of the same batch.
    pub fn merge(&mut self, other: &GradientAccumulator) -> Result<()> {
        if self.layers.len() != other.layers.len() {
            return Err(Error::AccumulatorMismatch {
                layer: self.layers.len().min(other.layers.len()),
            });
        }
        for (i, (mine, theirs)) in self.layers.iter().zip(&other.layers).enumerate() {
            if mine.len() != theirs.len() {
                return Err(Error::AccumulatorMismatch { layer: i });
            }
        }
        for (mine, theirs) in self.layers.iter_mut().zip(&other.layers) {
            for (m, t) in mine.iter_mut().zip(theirs) {
                m.bias += t.bias;
                if t.weights.len() > m.weights.len() {
                    m.weights.resize(t.weights.len(), 0.0);
                }
                for (mw, tw) in m.weights.iter_mut().zip(&t.weights) {
                    *mw += tw;
                }
            }
        }
        self.examples += other.examples;
        Ok(())
    }

    /// Subtracts `gradient × rate` from every parameter of `network`.
    ///
    /// Biases move by `bias_rate`, weights by `weight_rate`. The network is
    /// left untouched if its shape doesn't match the accumulator.
    pub fn apply(&self, network: &mut Network, bias_rate: f64, weight_rate: f64) -> Result<()> {
        self.check_shape(network)?;
        for (layer, gradients) in network.layers_mut().iter_mut().zip(&self.layers) {
            for (node, gradient) in layer.nodes_mut().iter_mut().zip(gradients) {
                for (w, g) in izip!(node.weights.iter_mut(), &gradient.weights) {
                    *w -= g * weight_rate;
                }
                node.bias -= gradient.bias * bias_rate;
            }
        }
        Ok(())
    }

    /// Checks that every gradient of the accumulator has a parameter to
    /// land on in `network`.
    pub(crate) fn check_shape(&self, network: &Network) -> Result<()> {
        if network.layers().len() != self.layers.len() {
            return Err(Error::AccumulatorMismatch {
                layer: network.layers().len().min(self.layers.len()),
            });
        }
        for (i, (layer, gradients)) in network.layers().iter().zip(&self.layers).enumerate() {
            let fits = layer.nodes().len() == gradients.len()
                && layer
                    .nodes()
                    .iter()
                    .zip(gradients)
                    .all(|(n, g)| g.weights.len() <= n.weights.len());
            if !fits {
                return Err(Error::AccumulatorMismatch { layer: i });
            }
        }
        Ok(())
    }
}
