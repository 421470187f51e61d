use anyhow::ensure;
use chrono::{DateTime, Utc};
use flapevo_training::network::{NetworkGenome, NetworkLayout};
use serde::{Deserialize, Serialize};

/// A trained policy network as written by `train` and read by `evaluate`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f64,
    pub hidden_units: usize,
    pub input_scale: f64,
    pub weights: Vec<f64>,
}

impl PolicyModel {
    pub(crate) fn to_genome(&self) -> anyhow::Result<NetworkGenome> {
        let layout = NetworkLayout::new(self.hidden_units);
        ensure!(
            self.weights.len() == layout.weight_count(),
            "model `{}` has {} weights, but {} hidden units need {}",
            self.name,
            self.weights.len(),
            self.hidden_units,
            layout.weight_count()
        );
        Ok(NetworkGenome::new(
            layout,
            self.input_scale,
            self.weights.clone(),
        ))
    }
}
