//! Compute host model.

use serde::{Deserialize, Serialize};

/// A compute host the workflow may run on.
///
/// Speeds are in bits per second, processing capacity in flops. Energy
/// costs are per-second rates: `energy_cost` while a task occupies the
/// host, `energy_cost_stand_by` for the rest of the makespan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Unique host name.
    pub name: String,
    /// Processing capacity in flops.
    pub flops: u64,
    /// Local disk bandwidth in bits per second.
    pub disk_speed: u64,
    /// Network bandwidth in bits per second.
    pub network_speed: u64,
    /// Energy cost per second while computing.
    pub energy_cost: f64,
    /// Energy cost per second while idle.
    pub energy_cost_stand_by: f64,
}

impl Host {
    /// Creates a host.
    pub fn new(
        name: impl Into<String>,
        flops: u64,
        disk_speed: u64,
        network_speed: u64,
        energy_cost: f64,
        energy_cost_stand_by: f64,
    ) -> Self {
        Self {
            name: name.into(),
            flops,
            disk_speed,
            network_speed,
            energy_cost,
            energy_cost_stand_by,
        }
    }
}
