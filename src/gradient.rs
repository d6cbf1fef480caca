//! Reverse-mode differentiation of the squared-error cost.
//!
//! The backward pass runs in two phases. First every output node's memo
//! entry is seeded with `∂cost/∂activity = activity − expected`. Then the
//! layers are walked from the output towards the input. Each node reads its
//! fully accumulated `∂cost/∂activity`, multiplies by the local sigmoid
//! derivative to get `∂cost/∂z`, and from that produces
//!
//!  * its bias gradient, `∂cost/∂z` (since `∂z/∂bias = 1`),
//!  * one weight gradient per input, `input · ∂cost/∂z`,
//!  * a contribution `weight · ∂cost/∂z` to each predecessor's memo entry.
//!
//! Because a layer is only visited once the layer after it is complete, a
//! predecessor's entry always holds the sum over all of its successors by
//! the time it is read.

use crate::accumulator::GradientAccumulator;
use crate::error::{Error, Result};
use crate::feed_forward::Network;
use crate::forward::ForwardPass;
use crate::layer::ACTIVATOR;
use crate::memo::DerivativeMemo;

use itertools::izip;
use tracing::trace;

/// Backpropagation of one example through a network.
///
/// Borrows the network immutably, so every example of a batch sees the
/// same parameters.
#[derive(Debug)]
pub struct Backpropagation<'a> {
    network: &'a Network,
    pass: &'a ForwardPass,
    expected: &'a [f64],
}

impl<'a> Backpropagation<'a> {
    /// Prepares the backward pass for `pass`, which must have been produced
    /// by `network.calculate`.
    pub fn new(network: &'a Network, pass: &'a ForwardPass, expected: &'a [f64]) -> Result<Self> {
        network.check_snapshot(pass)?;
        let output = pass.output();
        if output.len() != expected.len() {
            return Err(Error::OutputMismatch {
                output: output.len(),
                expected: expected.len(),
            });
        }
        Ok(Backpropagation {
            network,
            pass,
            expected,
        })
    }

    /// The per-output cost terms `(output − expected)² / 2`.
    pub fn cost_vector(&self) -> Vec<f64> {
        squared_errors(self.pass.output(), self.expected)
    }

    /// The sum of `cost_vector`.
    pub fn total_cost(&self) -> f64 {
        self.cost_vector().iter().sum()
    }

    /// Computes this example's gradients into a fresh accumulator.
    pub fn gradients(&self) -> Result<GradientAccumulator> {
        let mut gradients = GradientAccumulator::new(self.network);
        self.execute(&mut gradients)?;
        Ok(gradients)
    }

    /// Adds the gradient of this example's cost, with respect to every
    /// weight and bias, into `gradients`.
    ///
    /// Nothing is written if `gradients` is shaped for another network.
    pub fn execute(&self, gradients: &mut GradientAccumulator) -> Result<()> {
        let mut memo = DerivativeMemo::new(self.network.layers().len());
        self.execute_with_memo(&mut memo, gradients)?;
        gradients.count_example();
        Ok(())
    }

    /// Runs the backward pass using a caller supplied memo, which is reset
    /// first and holds every node's `∂cost/∂activity` afterwards.
    pub fn execute_with_memo(
        &self,
        memo: &mut DerivativeMemo,
        gradients: &mut GradientAccumulator,
    ) -> Result<()> {
        gradients.check_shape(self.network)?;
        let layers = self.network.layers();
        if memo.layer_count() != layers.len() {
            *memo = DerivativeMemo::new(layers.len());
        } else {
            memo.reset();
        }

        let last = layers.len() - 1;
        for (node, (&activity, &expected)) in
            self.pass.output().iter().zip(self.expected).enumerate()
        {
            memo.accumulate(activity - expected, last, node)?;
        }

        for (l, layer) in layers.iter().enumerate().rev() {
            let inputs = self.pass.inputs_to(l);
            for (n, node) in layer.nodes().iter().enumerate() {
                let d_act = memo.read(l, n)?;
                let d_z = ACTIVATOR.fprime(self.pass.z(l, n));
                let d_cost = d_z * d_act;

                trace!(layer = l, node = n, gradient = d_cost, "bias");
                gradients.add_bias(d_cost, l, n)?;

                for (w, (&input, &weight)) in izip!(inputs, &node.weights).enumerate() {
                    let weight_gradient = input * d_cost;
                    trace!(layer = l, node = n, weight = w, gradient = weight_gradient, "weight");
                    gradients.add_weight(weight_gradient, l, n, w)?;

                    if l > 0 {
                        memo.accumulate(weight * d_cost, l - 1, w)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn squared_errors(output: &[f64], expected: &[f64]) -> Vec<f64> {
    output
        .iter()
        .zip(expected)
        .map(|(o, e)| (o - e) * (o - e) / 2.0)
        .collect()
}

/// Computes the per-output cost terms `(output − expected)² / 2`, failing
/// if the lengths differ.
pub fn cost_vector(output: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
    if output.len() != expected.len() {
        return Err(Error::OutputMismatch {
            output: output.len(),
            expected: expected.len(),
        });
    }
    Ok(squared_errors(output, expected))
}

/// Computes the total squared-error cost `Σ (oᵢ − eᵢ)² / 2`, failing if the
/// lengths differ.
pub fn total_cost(output: &[f64], expected: &[f64]) -> Result<f64> {
    Ok(cost_vector(output, expected)?.iter().sum())
}
