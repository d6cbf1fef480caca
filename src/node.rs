use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// A single neuron: one weight per input plus a bias.
///
/// This is also the record written by `Network::export`, so it carries no
/// per-evaluation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Node {
    /// Creates a node from explicit parameters.
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Node { weights, bias }
    }

    /// Creates a node with `inputs` weights, drawing every weight uniformly
    /// from `[-weight_range/2, weight_range/2]` and the bias from
    /// `[-bias_range/2, bias_range/2]`.
    pub fn random<R: Rng + ?Sized>(
        inputs: usize,
        weight_range: f64,
        bias_range: f64,
        rng: &mut R,
    ) -> Self {
        let weights_between = symmetric(weight_range);
        let weights = weights_between.sample_iter(&mut *rng).take(inputs).collect();
        let bias = symmetric(bias_range).sample(rng);
        Node { weights, bias }
    }

    /// Returns the number of inputs this node expects.
    pub fn input_len(&self) -> usize {
        self.weights.len()
    }

    /// Computes the pre-activation sum `weights . inputs + bias`.
    ///
    /// Callers must check `inputs.len() == self.input_len()` first.
    pub fn pre_activation(&self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len(), self.weights.len());
        self.weights
            .iter()
            .zip(inputs)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

fn symmetric(range: f64) -> Uniform<f64> {
    let half = range / 2.0;
    Uniform::new_inclusive(-half, half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pre_activation_is_weighted_sum_plus_bias() {
        let node = Node::new(vec![0.5, -2.0], 0.25);
        assert_abs_diff_eq!(node.pre_activation(&[2.0, 1.0]), -0.75);
    }

    #[test]
    fn random_parameters_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let node = Node::random(4, 1.0, 3.0, &mut rng);
            assert_eq!(node.input_len(), 4);
            assert!(node.weights.iter().all(|w| w.abs() <= 0.5));
            assert!(node.bias.abs() <= 1.5);
        }
    }

    #[test]
    fn zero_range_gives_zero_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let node = Node::random(3, 0.0, 0.0, &mut rng);
        assert_eq!(node.weights, vec![0.0; 3]);
        assert_eq!(node.bias, 0.0);
    }
}
