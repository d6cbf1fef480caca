//! Memo of `∂cost/∂activation` for every node visited by the backward pass.

use crate::error::{Error, Result};

/// Partial derivatives of the total cost with respect to each node's
/// activation, indexed by `(layer, node)`.
///
/// Entries are only ever added to. Reading an entry that was never
/// accumulated is an error rather than a zero: it means the node has no
/// path to the cost.
#[derive(Clone, Debug, Default)]
pub struct DerivativeMemo {
    layers: Vec<Vec<Option<f64>>>,
}

impl DerivativeMemo {
    /// Creates an empty memo for a network of `layer_count` layers.
    pub fn new(layer_count: usize) -> Self {
        DerivativeMemo {
            layers: vec![Vec::new(); layer_count],
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Forgets every entry, keeping the layer count.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// Adds `value` to the entry for `(layer, node)`, creating it if absent.
    pub fn accumulate(&mut self, value: f64, layer: usize, node: usize) -> Result<()> {
        let layers = self.layers.len();
        let entries = self
            .layers
            .get_mut(layer)
            .ok_or(Error::LayerOutOfRange { layer, layers })?;
        if node >= entries.len() {
            entries.resize(node + 1, None);
        }
        let entry = &mut entries[node];
        *entry = Some(entry.unwrap_or(0.0) + value);
        Ok(())
    }

    pub fn contains(&self, layer: usize, node: usize) -> bool {
        self.get(layer, node).is_some()
    }

    /// Returns the accumulated derivative for `(layer, node)`.
    pub fn read(&self, layer: usize, node: usize) -> Result<f64> {
        self.get(layer, node)
            .ok_or(Error::MissingDerivative { layer, node })
    }

    fn get(&self, layer: usize, node: usize) -> Option<f64> {
        self.layers.get(layer)?.get(node).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_adds() {
        let mut memo = DerivativeMemo::new(2);
        memo.accumulate(0.25, 0, 1).unwrap();
        memo.accumulate(-1.0, 0, 1).unwrap();
        assert_eq!(memo.read(0, 1), Ok(-0.75));
    }

    #[test]
    fn unset_entry_is_an_error() {
        let mut memo = DerivativeMemo::new(2);
        memo.accumulate(1.0, 1, 2).unwrap();
        assert!(memo.contains(1, 2));
        // Growing the layer for node 2 does not create nodes 0 and 1.
        assert_eq!(memo.read(1, 0), Err(Error::MissingDerivative { layer: 1, node: 0 }));
        assert_eq!(memo.read(0, 0), Err(Error::MissingDerivative { layer: 0, node: 0 }));
        assert_eq!(memo.read(5, 0), Err(Error::MissingDerivative { layer: 5, node: 0 }));
    }

    #[test]
    fn zero_is_a_real_value() {
        let mut memo = DerivativeMemo::new(1);
        memo.accumulate(0.0, 0, 0).unwrap();
        assert_eq!(memo.read(0, 0), Ok(0.0));
    }

    #[test]
    fn out_of_range_layer() {
        let mut memo = DerivativeMemo::new(1);
        assert_eq!(
            memo.accumulate(1.0, 1, 0),
            Err(Error::LayerOutOfRange { layer: 1, layers: 1 })
        );
    }

    #[test]
    fn reset_forgets_entries() {
        let mut memo = DerivativeMemo::new(1);
        memo.accumulate(1.0, 0, 0).unwrap();
        memo.reset();
        assert!(!memo.contains(0, 0));
        assert_eq!(memo.layer_count(), 1);
    }
}
