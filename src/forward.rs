//! Snapshots of a single forward evaluation.
//!
//! A `ForwardPass` is everything the backward pass needs to know about one
//! evaluation: the raw input, and every node's pre-activation `z` and
//! activation. It is produced by `Network::calculate` and consumed by
//! `Backpropagation`, so the two can never disagree about which input they
//! are looking at.

use crate::utils::Back;

/// Per-node values recorded for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerTrace {
    /// Weighted input sum plus bias, one per node.
    pub z: Vec<f64>,
    /// Activation of `z`, one per node.
    pub activity: Vec<f64>,
}

/// The recorded state of a network after evaluating one input.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardPass {
    pub(crate) input: Vec<f64>,
    pub(crate) layers: Vec<LayerTrace>,
}

impl ForwardPass {
    /// The input vector that was presented to the network.
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Activations of the output layer.
    pub fn output(&self) -> &[f64] {
        match self.layers.back() {
            Some(last) => &last.activity,
            None => &[],
        }
    }

    pub(crate) fn z(&self, layer: usize, node: usize) -> f64 {
        self.layers[layer].z[node]
    }

    pub(crate) fn activity(&self, layer: usize, node: usize) -> f64 {
        self.layers[layer].activity[node]
    }

    /// The values feeding into `layer`: the raw input for the first layer,
    /// the previous layer's activations otherwise.
    ///
    /// `layer` must be below the snapshot's layer count; callers check the
    /// snapshot against the network first.
    pub(crate) fn inputs_to(&self, layer: usize) -> &[f64] {
        if layer == 0 {
            &self.input
        } else {
            &self.layers[layer - 1].activity
        }
    }

    /// Consumes the snapshot, returning the output activations.
    pub fn into_output(mut self) -> Vec<f64> {
        self.layers.pop().map(|l| l.activity).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass() -> ForwardPass {
        ForwardPass {
            input: vec![1.0, 2.0],
            layers: vec![
                LayerTrace {
                    z: vec![0.5, -0.5, 0.0],
                    activity: vec![0.6, 0.4, 0.5],
                },
                LayerTrace {
                    z: vec![1.5],
                    activity: vec![0.8],
                },
            ],
        }
    }

    #[test]
    fn inputs_follow_the_layer_chain() {
        let pass = pass();
        assert_eq!(pass.inputs_to(0), &[1.0, 2.0]);
        assert_eq!(pass.inputs_to(1), &[0.6, 0.4, 0.5]);
        assert_eq!(pass.z(0, 1), -0.5);
        assert_eq!(pass.activity(1, 0), 0.8);
    }

    #[test]
    fn output_is_last_activity() {
        let pass = pass();
        assert_eq!(pass.input(), &[1.0, 2.0]);
        assert_eq!(pass.output(), &[0.8]);
        assert_eq!(pass.into_output(), vec![0.8]);
    }

    #[test]
    fn empty_snapshot_has_no_output() {
        let pass = ForwardPass {
            input: vec![1.0],
            layers: Vec::new(),
        };
        assert!(pass.output().is_empty());
        assert!(pass.into_output().is_empty());
    }
}
