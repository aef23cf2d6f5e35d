//! HEFT-ordered plan rewrite over semi-active scheduling.

use std::sync::Arc;

use crate::fitness::{FitnessCalculator, FitnessError, Simple};
use crate::models::{FitnessInfo, InstanceData, PlanPair, ScheduleSolution};

/// Replaces the plan's task order with the HEFT ranking, keeping the host
/// column by position, then schedules the result like
/// [`Simple`](crate::fitness::Simple). Isolates the value of ordering
/// alone: the genetic search keeps full control of the host column. The
/// rewritten plan stays on the solution.
pub struct Rank {
    simple: Simple,
}

impl Rank {
    /// Builds the strategy for an instance.
    pub fn new(instance: Arc<InstanceData>) -> Self {
        Self {
            simple: Simple::new(instance),
        }
    }
}

impl FitnessCalculator for Rank {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        solution.plan = self
            .simple
            .cost()
            .ranking()
            .iter()
            .zip(&solution.plan)
            .map(|(&task, pair)| PlanPair::new(task, pair.host))
            .collect();
        self.simple.run(solution, self.fitness_name())
    }

    fn fitness_name(&self) -> &'static str {
        "rank"
    }
}
