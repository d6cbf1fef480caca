//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network).
//!
//! # Example
//!
//! Evaluate a hand-built network, then compute the gradient of its cost:
//!
//! ```
//! # use gradnet::feed_forward::*;
//! # use gradnet::gradient::Backpropagation;
//! let network = Network::load(NetworkData {
//!     layers: vec![
//!         LayerData { nodes: vec![Node::new(vec![0.5], 0.0)] },
//!         LayerData { nodes: vec![Node::new(vec![1.0], 0.0)] },
//!     ],
//! })
//! .unwrap();
//!
//! let pass = network.calculate(&[1.0]).unwrap();
//! let backprop = Backpropagation::new(&network, &pass, &[1.0]).unwrap();
//! assert!((backprop.total_cost() - 0.06102).abs() < 1e-4);
//!
//! let gradients = backprop.gradients().unwrap();
//! assert!(gradients.bias(1, 0) < 0.0);
//! ```

pub use crate::layer::{Layer, LayerData};
pub use crate::node::Node;

use crate::error::{Error, Result};
use crate::forward::{ForwardPass, LayerTrace};
use crate::utils::{Back, Front};

use itertools::izip;
use rand::Rng;
use std::convert::TryFrom;

/// The plain nested-record form of a network, used for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub layers: Vec<LayerData>,
}

/// A Feedforward neural network of sigmoid units.
///
/// The network only holds parameters. Evaluating it produces a
/// `ForwardPass`, which is what the backward pass reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkData", into = "NetworkData")]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a new, untrained neural network.
    ///
    /// Arguments:
    ///  * `input_len` - the width of the input vector.
    ///  * `layer_sizes` - the number of nodes in each layer, the last one
    ///                    being the output layer.
    ///  * `weight_ranges` - per layer, the width of the interval weights are
    ///                      drawn from, centered on zero.
    ///  * `bias_ranges` - per layer, the same for biases.
    pub fn initialize(
        input_len: usize,
        layer_sizes: &[usize],
        weight_ranges: &[f64],
        bias_ranges: &[f64],
    ) -> Result<Self> {
        Network::initialize_with_rng(
            input_len,
            layer_sizes,
            weight_ranges,
            bias_ranges,
            &mut rand::thread_rng(),
        )
    }

    /// Same as `initialize`, drawing parameters from `rng`.
    pub fn initialize_with_rng<R: Rng + ?Sized>(
        input_len: usize,
        layer_sizes: &[usize],
        weight_ranges: &[f64],
        bias_ranges: &[f64],
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() != weight_ranges.len() || layer_sizes.len() != bias_ranges.len() {
            return Err(Error::LayerConfigMismatch {
                nodes: layer_sizes.len(),
                weight_ranges: weight_ranges.len(),
                bias_ranges: bias_ranges.len(),
            });
        }
        if input_len == 0 {
            return Err(Error::EmptyTopology("the network has no inputs"));
        }
        if layer_sizes.is_empty() {
            return Err(Error::EmptyTopology("the network has no layers"));
        }

        let mut layers = Vec::with_capacity(layer_sizes.len());
        let mut inputs = input_len;
        for (i, (&breadth, &weight_range, &bias_range)) in
            izip!(layer_sizes, weight_ranges, bias_ranges).enumerate()
        {
            if breadth == 0 {
                return Err(Error::EmptyTopology("a layer has no nodes"));
            }
            for &range in &[weight_range, bias_range] {
                if !range.is_finite() || range < 0.0 {
                    return Err(Error::InvalidRange { layer: i, range });
                }
            }
            layers.push(Layer::random(breadth, inputs, weight_range, bias_range, rng));
            inputs = breadth;
        }
        Ok(Network { layers })
    }

    /// Rebuilds a network from its stored representation, rejecting any
    /// layer whose weight counts don't line up with the layer before it.
    pub fn load(data: NetworkData) -> Result<Self> {
        let mut layer_data = data.layers.into_iter();
        let first = layer_data
            .next()
            .ok_or(Error::EmptyTopology("the network has no layers"))?;
        let input_len = first.nodes.first().map_or(0, Node::input_len);
        if input_len == 0 {
            return Err(Error::EmptyTopology("the network has no inputs"));
        }

        let mut layers = vec![Layer::load(0, input_len, first)?];
        for (i, data) in layer_data.enumerate() {
            let inputs = layers[i].output_len();
            layers.push(Layer::load(i + 1, inputs, data)?);
        }
        Ok(Network { layers })
    }

    /// Exports the network's parameters as plain nested records.
    pub fn export(&self) -> NetworkData {
        NetworkData {
            layers: self.layers.iter().map(Layer::export).collect(),
        }
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        self.layers.front().map_or(0, Layer::input_len)
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        self.layers.back().map_or(0, Layer::output_len)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Feeds the provided `input` through the network, returning the
    /// recorded state of every layer.
    pub fn calculate(&self, input: &[f64]) -> Result<ForwardPass> {
        let mut traces: Vec<LayerTrace> = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let trace = match traces.last() {
                Some(prev) => layer.forward(i, &prev.activity)?,
                None => layer.forward(i, input)?,
            };
            traces.push(trace);
        }
        Ok(ForwardPass {
            input: input.to_vec(),
            layers: traces,
        })
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    pub fn run(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(self.calculate(input)?.into_output())
    }

    /// Checks that `pass` was recorded on a network shaped like this one.
    pub(crate) fn check_snapshot(&self, pass: &ForwardPass) -> Result<()> {
        if pass.layers.len() != self.layers.len() {
            return Err(Error::SnapshotMismatch {
                layer: pass.layers.len().min(self.layers.len()),
            });
        }
        if pass.input.len() != self.input_len() {
            return Err(Error::SnapshotMismatch { layer: 0 });
        }
        for (i, (layer, trace)) in self.layers.iter().zip(&pass.layers).enumerate() {
            if trace.z.len() != layer.output_len() || trace.activity.len() != layer.output_len() {
                return Err(Error::SnapshotMismatch { layer: i });
            }
        }
        Ok(())
    }
}

impl TryFrom<NetworkData> for Network {
    type Error = Error;

    fn try_from(data: NetworkData) -> Result<Self> {
        Network::load(data)
    }
}

impl From<Network> for NetworkData {
    fn from(network: Network) -> NetworkData {
        network.export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chain() -> Network {
        Network::load(NetworkData {
            layers: vec![
                LayerData {
                    nodes: vec![Node::new(vec![0.5], 0.0)],
                },
                LayerData {
                    nodes: vec![Node::new(vec![1.0], 0.0)],
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn initialize_builds_requested_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let network =
            Network::initialize_with_rng(2, &[3, 4, 1], &[1.0, 1.0, 1.0], &[3.0, 3.0, 3.0], &mut rng)
                .unwrap();
        assert_eq!(network.input_len(), 2);
        assert_eq!(network.output_len(), 1);
        let widths: Vec<_> = network.layers().iter().map(|l| (l.input_len(), l.output_len())).collect();
        assert_eq!(widths, vec![(2, 3), (3, 4), (4, 1)]);
        for node in network.layers().iter().flat_map(|l| l.nodes()) {
            assert!(node.weights.iter().all(|w| w.abs() <= 0.5));
            assert!(node.bias.abs() <= 1.5);
        }
    }

    #[test]
    fn mismatched_config_lengths() {
        assert_eq!(
            Network::initialize(2, &[2, 2], &[1.0], &[1.0, 1.0]),
            Err(Error::LayerConfigMismatch {
                nodes: 2,
                weight_ranges: 1,
                bias_ranges: 2
            })
        );
    }

    #[test]
    fn empty_topologies() {
        assert!(Network::initialize(0, &[1], &[1.0], &[1.0]).is_err());
        assert!(Network::initialize(1, &[], &[], &[]).is_err());
        assert!(Network::initialize(1, &[2, 0, 1], &[1.0; 3], &[1.0; 3]).is_err());
    }

    #[test]
    fn negative_range_is_rejected() {
        assert_eq!(
            Network::initialize(1, &[1], &[-1.0], &[1.0]),
            Err(Error::InvalidRange {
                layer: 0,
                range: -1.0
            })
        );
    }

    #[test]
    fn calculate_records_every_layer() {
        let pass = chain().calculate(&[1.0]).unwrap();
        assert_eq!(pass.input(), &[1.0]);
        assert_abs_diff_eq!(pass.z(0, 0), 0.5);
        assert_abs_diff_eq!(pass.activity(0, 0), 0.622_459, epsilon = 1e-6);
        assert_abs_diff_eq!(pass.z(1, 0), pass.activity(0, 0));
        assert_abs_diff_eq!(pass.output()[0], 0.650_777_678, epsilon = 1e-9);
    }

    #[test]
    fn wrong_input_size() {
        assert_eq!(
            chain().run(&[1.0, 2.0]),
            Err(Error::InputMismatch {
                layer: 0,
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn load_rejects_mismatched_layers() {
        let data = NetworkData {
            layers: vec![
                LayerData {
                    nodes: vec![Node::new(vec![0.5], 0.0), Node::new(vec![0.5], 0.0)],
                },
                LayerData {
                    nodes: vec![Node::new(vec![1.0], 0.0)],
                },
            ],
        };
        assert_eq!(
            Network::load(data),
            Err(Error::WeightCountMismatch {
                layer: 1,
                node: 0,
                expected: 2,
                got: 1
            })
        );
        assert!(Network::load(NetworkData { layers: vec![] }).is_err());
    }

    #[test]
    fn export_then_load_is_identical() {
        let network = Network::initialize(3, &[2, 2], &[1.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(Network::load(network.export()).unwrap(), network);
    }

    #[test]
    fn json_round_trip_validates_shape() {
        let network = chain();
        let json = serde_json::to_string(&network).unwrap();
        let restored: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, network);

        let broken = r#"{"layers":[{"nodes":[{"weights":[1.0],"bias":0.0}]},
                                   {"nodes":[{"weights":[1.0,2.0],"bias":0.0}]}]}"#;
        assert!(serde_json::from_str::<Network>(broken).is_err());
    }
}
