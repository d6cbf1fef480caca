//! Error types shared by every part of the network.

use thiserror::Error;

/// Everything that can go wrong while building, evaluating or training a
/// network.
///
/// None of these are recoverable: a shape error means the caller wired up
/// incompatible topologies, and a missing derivative means the network
/// graph itself is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The per-layer configuration arrays passed to `Network::initialize`
    /// have different lengths.
    #[error(
        "layer configuration arrays differ in length: {nodes} node counts, \
         {weight_ranges} weight ranges, {bias_ranges} bias ranges"
    )]
    LayerConfigMismatch {
        nodes: usize,
        weight_ranges: usize,
        bias_ranges: usize,
    },

    /// An initialization range that is negative or not finite.
    #[error("layer {layer} has an unusable initialization range {range}")]
    InvalidRange { layer: usize, range: f64 },

    /// A network with no layers, no inputs, or an empty layer.
    #[error("network topology is empty: {0}")]
    EmptyTopology(&'static str),

    /// A node's weight count disagrees with the width of its input.
    #[error(
        "layer {layer} node {node} has {got} weights, expected {expected}"
    )]
    WeightCountMismatch {
        layer: usize,
        node: usize,
        expected: usize,
        got: usize,
    },

    /// A layer received an input vector of the wrong length.
    #[error("layer {layer} expected {expected} inputs, but got {got}")]
    InputMismatch {
        layer: usize,
        expected: usize,
        got: usize,
    },

    /// The network output and the expected output have different lengths.
    #[error("output length ({output}) and expected length ({expected}) don't match")]
    OutputMismatch { output: usize, expected: usize },

    /// A forward pass snapshot was recorded on a differently shaped network.
    #[error("forward pass does not match the network shape at layer {layer}")]
    SnapshotMismatch { layer: usize },

    /// A derivative was read before anything was accumulated into it.
    #[error("no derivative recorded for layer {layer} node {node}")]
    MissingDerivative { layer: usize, node: usize },

    /// A derivative was accumulated for a layer the memo does not track.
    #[error("layer {layer} is out of range for a memo of {layers} layers")]
    LayerOutOfRange { layer: usize, layers: usize },

    /// A gradient was added for a node the accumulator does not track.
    #[error("no accumulator for layer {layer} node {node}")]
    NodeOutOfRange { layer: usize, node: usize },

    /// An accumulator was applied to, or merged with, something of a
    /// different shape.
    #[error("gradient accumulator does not match the shape at layer {layer}")]
    AccumulatorMismatch { layer: usize },

    /// Training was started with unusable parameters.
    #[error("invalid training setup: {0}")]
    InvalidTraining(String),
}

pub type Result<T> = std::result::Result<T, Error>;
