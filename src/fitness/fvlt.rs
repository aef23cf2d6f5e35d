//! Fast virtual machines for large tasks.

use std::sync::Arc;

use crate::fitness::heft_energy::{run_energy_strategy, SchedulingMode};
use crate::fitness::{CostModel, FitnessCalculator, FitnessError};
use crate::models::{FitnessInfo, InstanceData, ScheduleSolution};

/// Splits the workflow by HEFT rank: tasks ranked strictly above the mean
/// are on the critical path's heavy side and get the fastest finish
/// (ties by energy); the rest get the cheapest placement (ties by finish).
/// The split is fixed at construction since ranks only depend on the
/// instance.
pub struct Fvlt {
    cost: CostModel,
    mode: SchedulingMode,
    priority: Vec<bool>,
}

impl Fvlt {
    /// Builds the strategy for an instance under the given mode.
    pub fn new(instance: Arc<InstanceData>, mode: SchedulingMode) -> Self {
        let cost = CostModel::new(instance);
        let ranks = cost.ranks();
        let mean = ranks.iter().sum::<f64>() / ranks.len() as f64;
        let priority = ranks.iter().map(|&r| r > mean).collect();
        Self {
            cost,
            mode,
            priority,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_priority(&self, task: usize) -> bool {
        self.priority[task]
    }
}

impl FitnessCalculator for Fvlt {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        run_energy_strategy(
            &self.cost,
            self.mode,
            self.fitness_name(),
            solution,
            |task, scores, _| {
                if self.priority[task] {
                    scores.sort_by(|a, b| a.by_eft(b));
                } else {
                    scores.sort_by(|a, b| a.by_energy(b));
                }
                scores[0]
            },
        )
    }

    fn fitness_name(&self) -> &'static str {
        "fvlt-me"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{five_task_baseline_plan, five_task_shared};
    use crate::models::Objective;

    #[test]
    fn test_priority_split_by_mean_rank() {
        let calc = Fvlt::new(five_task_shared(), SchedulingMode::Active);
        // Mean rank falls between task04 and task02: only the root and
        // the heaviest fork branch are priority tasks.
        assert!(calc.is_priority(0));
        assert!(calc.is_priority(3));
        assert!(!calc.is_priority(1));
        assert!(!calc.is_priority(2));
        assert!(!calc.is_priority(4));
    }

    #[test]
    fn test_priority_tasks_finish_no_later_than_energy_pick() {
        let instance = five_task_shared();
        let fvlt = Fvlt::new(instance.clone(), SchedulingMode::Active);
        let mut s = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let info = fvlt.calculate_fitness(&mut s).unwrap();
        assert_eq!(info.schedule.len(), 5);
        assert_eq!(info.fitness_function, "fvlt-me");
        // The root is a priority task: it lands on the fastest host.
        let root = info.schedule.iter().find(|e| e.task == 0).unwrap();
        assert_eq!(root.host, 2);
    }
}
