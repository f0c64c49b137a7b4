//! Numeric substrate for evolved snake brains.
//!
//! `Matrix` is a small dense 2-D buffer with just enough algebra for
//! feed-forward inference, and `Network` stacks matrices into a
//! fixed-topology net that is inherited through clone/crossover/mutate
//! rather than trained.

mod matrix;
mod network;

pub use matrix::Matrix;
pub use network::{argmax, BrainError, Network, NetworkTopology};
