//! Energy minimization bounded by the running makespan.

use std::sync::Arc;

use crate::fitness::heft_energy::{run_energy_strategy, SchedulingMode};
use crate::fitness::{CostModel, FitnessCalculator, FitnessError};
use crate::models::{FitnessInfo, InstanceData, ScheduleSolution};

/// Under-makespan energy minimizer: candidates are ordered by
/// (energy, finish time) and the first one that finishes before the
/// current running makespan wins. When no host can, the cheapest overall
/// is taken, extending the makespan as little as the ordering allows.
/// Compared with [`HeftEnergy`](crate::fitness::HeftEnergy), this lets
/// free energy savings ride inside the span already paid for.
pub struct MinEnergyUm {
    cost: CostModel,
    mode: SchedulingMode,
}

impl MinEnergyUm {
    /// Builds the strategy for an instance under the given mode.
    pub fn new(instance: Arc<InstanceData>, mode: SchedulingMode) -> Self {
        Self {
            cost: CostModel::new(instance),
            mode,
        }
    }
}

impl FitnessCalculator for MinEnergyUm {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        run_energy_strategy(
            &self.cost,
            self.mode,
            self.fitness_name(),
            solution,
            |_, scores, makespan| {
                scores.sort_by(|a, b| a.by_energy(b));
                scores
                    .iter()
                    .find(|s| s.eft < makespan)
                    .copied()
                    .unwrap_or(scores[0])
            },
        )
    }

    fn fitness_name(&self) -> &'static str {
        "min-energy-UM"
    }
}
