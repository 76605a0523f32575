//! The weight table combining sub-scores into a total.

use serde::{Deserialize, Serialize};

use crate::types::Priority;

/// Weights for the three sub-scores. Expected to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub price: f64,
    pub condition: f64,
    pub completeness: f64,
}

impl Weights {
    /// Combine sub-scores into a total in [0, 1].
    pub fn combine(&self, price: f64, condition: f64, completeness: f64) -> f64 {
        self.price * price + self.condition * condition + self.completeness * completeness
    }
}

/// Per-priority weight table.
///
/// The defaults are documented policy constants, not a hard contract;
/// deployments may tune them (e.g. via config) without touching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub price_priority: Weights,
    pub condition_priority: Weights,
    pub balanced: Weights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            price_priority: Weights {
                price: 0.7,
                condition: 0.2,
                completeness: 0.1,
            },
            condition_priority: Weights {
                price: 0.2,
                condition: 0.7,
                completeness: 0.1,
            },
            balanced: Weights {
                price: 0.4,
                condition: 0.4,
                completeness: 0.2,
            },
        }
    }
}

impl WeightTable {
    /// The weights for a given priority mode.
    pub fn for_priority(&self, priority: Priority) -> Weights {
        match priority {
            Priority::Price => self.price_priority,
            Priority::Condition => self.condition_priority,
            Priority::Balanced => self.balanced,
        }
    }
}
