//! Feed-forward policy network evolved by the genetic algorithm.
//!
//! ```text
//! observation (3) ─× input_scale→ hidden (H, tanh) → output (1, sigmoid) → decision
//! ```
//!
//! All parameters live in one flat weight vector so the genetic operators in
//! [`weights`](crate::weights) can treat it as a plain genome. Layout, hidden unit by
//! hidden unit:
//!
//! ```text
//! [w(h0,i0), w(h0,i1), w(h0,i2), b(h0), ..., w(o,h0), ..., w(o,hH-1), b(o)]
//! ```

use flapevo_evaluator::policy::{Decision, OBSERVATION_LEN, Observation, Policy, PolicyDescription};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("expected {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[display("weight #{index} is not finite: {value}")]
    NonFiniteWeight { index: usize, value: f64 },
    #[display("input scale must be finite and positive, got {value}")]
    InvalidInputScale { value: f64 },
}

/// Shape of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub hidden_units: usize,
}

impl NetworkLayout {
    #[must_use]
    pub const fn new(hidden_units: usize) -> Self {
        Self { hidden_units }
    }

    /// Length of the flat weight vector, biases included.
    #[must_use]
    pub const fn weight_count(&self) -> usize {
        self.hidden_units * (OBSERVATION_LEN + 1) + self.hidden_units + 1
    }
}

/// A materialized network, ready to make decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForwardNetwork {
    layout: NetworkLayout,
    weights: Vec<f64>,
    input_scale: f64,
}

impl FeedForwardNetwork {
    pub fn new(
        layout: NetworkLayout,
        weights: Vec<f64>,
        input_scale: f64,
    ) -> Result<Self, NetworkError> {
        if weights.len() != layout.weight_count() {
            return Err(NetworkError::WeightCountMismatch {
                expected: layout.weight_count(),
                actual: weights.len(),
            });
        }
        if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(NetworkError::NonFiniteWeight { index, value });
        }
        if !(input_scale.is_finite() && input_scale > 0.0) {
            return Err(NetworkError::InvalidInputScale { value: input_scale });
        }
        Ok(Self {
            layout,
            weights,
            input_scale,
        })
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        self.layout
    }

    /// Raw network output in `(0, 1)`.
    #[must_use]
    pub fn forward(&self, input: &[f64; OBSERVATION_LEN]) -> f64 {
        let hidden_len = self.layout.hidden_units * (OBSERVATION_LEN + 1);
        let (hidden, output) = self.weights.split_at(hidden_len);
        let (output_weights, output_bias) = output.split_at(self.layout.hidden_units);

        let activation = hidden
            .chunks_exact(OBSERVATION_LEN + 1)
            .zip(output_weights)
            .map(|(unit, w_out)| {
                let (w_in, bias) = unit.split_at(OBSERVATION_LEN);
                let z = w_in
                    .iter()
                    .zip(input)
                    .map(|(w, x)| w * x * self.input_scale)
                    .sum::<f64>()
                    + bias[0];
                w_out * z.tanh()
            })
            .sum::<f64>()
            + output_bias[0];
        sigmoid(activation)
    }
}

impl Policy for FeedForwardNetwork {
    fn activate(&self, observation: &Observation) -> Decision {
        Decision::from(self.forward(observation.as_array()))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Flat genome plus what is needed to rebuild the network from it.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGenome {
    layout: NetworkLayout,
    input_scale: f64,
    weights: Vec<f64>,
}

impl NetworkGenome {
    #[must_use]
    pub fn new(layout: NetworkLayout, input_scale: f64, weights: Vec<f64>) -> Self {
        Self {
            layout,
            input_scale,
            weights,
        }
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        self.layout
    }

    #[must_use]
    pub fn input_scale(&self) -> f64 {
        self.input_scale
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl PolicyDescription for NetworkGenome {
    type Policy = FeedForwardNetwork;
    type Error = NetworkError;

    fn build_policy(&self) -> Result<Self::Policy, Self::Error> {
        FeedForwardNetwork::new(self.layout, self.weights.clone(), self.input_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_count() {
        assert_eq!(NetworkLayout::new(0).weight_count(), 1);
        assert_eq!(NetworkLayout::new(1).weight_count(), 6);
        assert_eq!(NetworkLayout::new(8).weight_count(), 41);
    }

    #[test]
    fn test_zero_weights_output_half() {
        let layout = NetworkLayout::new(4);
        let network = FeedForwardNetwork::new(layout, vec![0.0; layout.weight_count()], 1.0)
            .unwrap();
        assert_eq!(network.forward(&[100.0, 200.0, 150.0]), 0.5);
    }

    #[test]
    fn test_single_unit_forward() {
        let layout = NetworkLayout::new(1);
        // hidden = tanh(1.0 * x0 * 0.5), output = sigmoid(2.0 * hidden + 0.0)
        let weights = vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        let network = FeedForwardNetwork::new(layout, weights, 0.5).unwrap();
        let expected = sigmoid(2.0 * f64::tanh(1.0));
        assert!((network.forward(&[2.0, 7.0, -3.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_output_bias_drives_decision() {
        let layout = NetworkLayout::new(2);
        let mut weights = vec![0.0; layout.weight_count()];
        *weights.last_mut().unwrap() = 10.0;
        let network = FeedForwardNetwork::new(layout, weights, 1.0).unwrap();
        let decision = network.activate(&Observation::new(0.0, 0.0, 0.0));
        assert!(decision.value() > 0.99);
    }

    #[test]
    fn test_invalid_networks() {
        let layout = NetworkLayout::new(2);
        assert_eq!(
            FeedForwardNetwork::new(layout, vec![0.0; 3], 1.0),
            Err(NetworkError::WeightCountMismatch {
                expected: 11,
                actual: 3
            })
        );

        let mut weights = vec![0.0; layout.weight_count()];
        weights[4] = f64::INFINITY;
        assert_eq!(
            FeedForwardNetwork::new(layout, weights, 1.0),
            Err(NetworkError::NonFiniteWeight {
                index: 4,
                value: f64::INFINITY
            })
        );

        assert!(FeedForwardNetwork::new(layout, vec![0.0; 11], 0.0).is_err());
    }

    #[test]
    fn test_genome_builds_network() {
        let layout = NetworkLayout::new(3);
        let genome = NetworkGenome::new(layout, 1.0 / 512.0, vec![0.25; layout.weight_count()]);
        let network = genome.build_policy().unwrap();
        assert_eq!(network.layout(), layout);

        let broken = NetworkGenome::new(layout, 1.0 / 512.0, vec![]);
        assert!(broken.build_policy().is_err());
    }
}
