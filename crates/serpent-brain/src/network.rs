//! Fixed-topology feed-forward network inherited through a genetic
//! lineage instead of being trained.

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Matrix;

/// Errors raised when constructing or recombining genomes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrainError {
    #[error("network dimensions must be non-zero")]
    ZeroDimension,
    #[error("crossover requires identical topologies")]
    TopologyMismatch,
    #[error("{rows}x{cols} matrix cannot hold {len} values")]
    BadShape { rows: usize, cols: usize, len: usize },
}

/// Layer sizing for a [`Network`]. Fixed at construction and preserved
/// through clone, crossover, and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTopology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
    pub hidden_layers: usize,
}

impl NetworkTopology {
    pub fn validate(&self) -> Result<(), BrainError> {
        if self.inputs == 0 || self.hidden == 0 || self.outputs == 0 || self.hidden_layers == 0 {
            return Err(BrainError::ZeroDimension);
        }
        Ok(())
    }

    /// Shape of the weight matrix at `index`; the extra column is the
    /// bias weight.
    fn layer_shape(&self, index: usize) -> (usize, usize) {
        if index == 0 {
            (self.hidden, self.inputs + 1)
        } else if index == self.hidden_layers {
            (self.outputs, self.hidden + 1)
        } else {
            (self.hidden, self.hidden + 1)
        }
    }
}

/// A stack of weight matrices: `hidden_layers` ReLU layers followed by a
/// softmax output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    topology: NetworkTopology,
    layers: Vec<Matrix>,
    highest_fitness: f64,
}

impl Network {
    /// Freshly randomized network with uniform [-1, 1] weights.
    pub fn random(topology: NetworkTopology, rng: &mut SmallRng) -> Result<Self, BrainError> {
        topology.validate()?;
        let mut layers = Vec::with_capacity(topology.hidden_layers + 1);
        for index in 0..=topology.hidden_layers {
            let (rows, cols) = topology.layer_shape(index);
            let mut layer = Matrix::new(rows, cols);
            layer.randomize(rng);
            layers.push(layer);
        }
        Ok(Self {
            topology,
            layers,
            highest_fitness: 0.0,
        })
    }

    /// Rebuild a network from serialized layers, validating shapes.
    pub fn from_layers(
        topology: NetworkTopology,
        layers: Vec<Matrix>,
    ) -> Result<Self, BrainError> {
        topology.validate()?;
        if layers.len() != topology.hidden_layers + 1 {
            return Err(BrainError::TopologyMismatch);
        }
        for (index, layer) in layers.iter().enumerate() {
            let (rows, cols) = topology.layer_shape(index);
            if layer.rows() != rows || layer.cols() != cols {
                return Err(BrainError::TopologyMismatch);
            }
        }
        Ok(Self {
            topology,
            layers,
            highest_fitness: 0.0,
        })
    }

    #[must_use]
    pub const fn topology(&self) -> NetworkTopology {
        self.topology
    }

    #[must_use]
    pub fn layers(&self) -> &[Matrix] {
        &self.layers
    }

    /// Monotonic high-water mark of fitness seen along this lineage.
    /// Display bookkeeping only; never consulted by selection.
    #[must_use]
    pub const fn highest_fitness(&self) -> f64 {
        self.highest_fitness
    }

    pub fn record_fitness(&mut self, fitness: f64) {
        if fitness > self.highest_fitness {
            self.highest_fitness = fitness;
        }
    }

    /// Forward inference: bias-extended input through ReLU hidden layers,
    /// softmax over the output layer.
    #[must_use]
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.topology.inputs,
            "forward: input length does not match topology"
        );
        let mut current = Matrix::from_column(input).add_bias();
        for layer in &self.layers[..self.topology.hidden_layers] {
            current = layer.dot(&current).activate_relu().add_bias();
        }
        let output = self.layers[self.topology.hidden_layers].dot(&current);
        output.softmax().to_vec()
    }

    /// Mutate every layer independently at the given per-cell rate.
    pub fn mutate(&mut self, rate: f64, rng: &mut SmallRng) {
        for layer in &mut self.layers {
            layer.mutate(rate, rng);
        }
    }

    /// Per-layer single-point crossover. The child owns freshly
    /// allocated storage; nothing aliases the parents.
    pub fn crossover(&self, partner: &Network, rng: &mut SmallRng) -> Result<Network, BrainError> {
        if self.topology != partner.topology {
            return Err(BrainError::TopologyMismatch);
        }
        let layers = self
            .layers
            .iter()
            .zip(&partner.layers)
            .map(|(a, b)| a.crossover(b, rng))
            .collect();
        Ok(Network {
            topology: self.topology,
            layers,
            highest_fitness: 0.0,
        })
    }
}

/// Index of the maximum value; ties resolve to the lowest index so that
/// replays are deterministic.
#[must_use]
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}
