use crate::activator::Activator;
use crate::error::{Error, Result};
use crate::forward::LayerTrace;
use crate::node::Node;

use rand::Rng;

/// The activation applied by every layer, and differentiated by the
/// backward pass.
pub(crate) const ACTIVATOR: Activator = Activator::Sigmoid;

/// A fully connected layer: an ordered list of nodes sharing one input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    pub nodes: Vec<Node>,
}

/// A validated layer of the network.
///
/// Every node in a layer has the same number of weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    nodes: Vec<Node>,
}

impl Layer {
    /// Initializes a new, untrained layer of `breadth` nodes, each taking
    /// `inputs` inputs.
    pub fn random<R: Rng + ?Sized>(
        breadth: usize,
        inputs: usize,
        weight_range: f64,
        bias_range: f64,
        rng: &mut R,
    ) -> Self {
        let nodes = (0..breadth)
            .map(|_| Node::random(inputs, weight_range, bias_range, rng))
            .collect();
        Layer { nodes }
    }

    /// Builds a layer from stored nodes, checking that each one expects
    /// `inputs` weights.
    ///
    /// `index` is only used to report errors.
    pub fn load(index: usize, inputs: usize, data: LayerData) -> Result<Self> {
        if data.nodes.is_empty() {
            return Err(Error::EmptyTopology("a layer has no nodes"));
        }
        for (node, n) in data.nodes.iter().enumerate() {
            if n.input_len() != inputs {
                return Err(Error::WeightCountMismatch {
                    layer: index,
                    node,
                    expected: inputs,
                    got: n.input_len(),
                });
            }
        }
        Ok(Layer { nodes: data.nodes })
    }

    pub fn export(&self) -> LayerData {
        LayerData {
            nodes: self.nodes.clone(),
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.nodes.first().map_or(0, Node::input_len)
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Feeds the provided `inputs` forward through the layer, recording
    /// each node's pre-activation and activation.
    pub fn forward(&self, index: usize, inputs: &[f64]) -> Result<LayerTrace> {
        if inputs.len() != self.input_len() {
            return Err(Error::InputMismatch {
                layer: index,
                expected: self.input_len(),
                got: inputs.len(),
            });
        }
        let z: Vec<f64> = self.nodes.iter().map(|n| n.pre_activation(inputs)).collect();
        let activity = z.iter().map(|&z| ACTIVATOR.f(z)).collect();
        Ok(LayerTrace { z, activity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn layer() -> Layer {
        Layer::load(
            0,
            2,
            LayerData {
                nodes: vec![Node::new(vec![1.0, 1.0], 0.0), Node::new(vec![0.0, -1.0], 0.5)],
            },
        )
        .unwrap()
    }

    #[test]
    fn forward_records_z_and_activity() {
        let trace = layer().forward(0, &[0.25, 0.5]).unwrap();
        assert_abs_diff_eq!(trace.z[0], 0.75);
        assert_abs_diff_eq!(trace.z[1], 0.0);
        assert_abs_diff_eq!(trace.activity[0], ACTIVATOR.f(0.75));
        assert_abs_diff_eq!(trace.activity[1], 0.5);
    }

    #[test]
    fn wrong_input_size() {
        assert_eq!(
            layer().forward(3, &[1.0]),
            Err(Error::InputMismatch {
                layer: 3,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn ragged_layer_is_rejected() {
        let data = LayerData {
            nodes: vec![Node::new(vec![1.0, 1.0], 0.0), Node::new(vec![1.0], 0.0)],
        };
        assert_eq!(
            Layer::load(1, 2, data),
            Err(Error::WeightCountMismatch {
                layer: 1,
                node: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn empty_layer_is_rejected() {
        assert!(Layer::load(0, 2, LayerData { nodes: vec![] }).is_err());
    }
}
