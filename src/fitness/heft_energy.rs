//! Energy-aware host selection.
//!
//! The three energy strategies (`heft-energy`, `min-energy-UM`, `fvlt-me`)
//! score every host for every task with the same per-placement energy
//! estimate and differ only in how they rank the candidates. The shared
//! loop lives here; the siblings pass in their pick rule.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::fitness::{collect_fitness, CostModel, FitnessCalculator, FitnessError, GapTimeline};
use crate::models::{FitnessInfo, HostId, InstanceData, ScheduleSolution, TaskId, TaskSchedule};

/// How placements reserve host time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingMode {
    /// Scalar available-from per host; tasks only ever append.
    SemiActive,
    /// Idle-gap insertion per host timeline.
    Active,
}

/// One host's scored candidacy for the task under consideration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HostScore {
    pub host: HostId,
    pub ast: f64,
    pub eft: f64,
    /// Estimated active plus standby energy of this placement.
    pub energy: f64,
}

impl HostScore {
    /// Lexicographic (energy, eft) comparison.
    pub fn by_energy(&self, other: &HostScore) -> Ordering {
        self.energy
            .total_cmp(&other.energy)
            .then(self.eft.total_cmp(&other.eft))
    }

    /// Lexicographic (eft, energy) comparison.
    pub fn by_eft(&self, other: &HostScore) -> Ordering {
        self.eft
            .total_cmp(&other.eft)
            .then(self.energy.total_cmp(&other.energy))
    }
}

/// Shared loop of the energy strategies. `pick` chooses among the scored
/// hosts; it also sees the running makespan for rules that compare
/// against it.
pub(crate) fn run_energy_strategy<F>(
    cost: &CostModel,
    mode: SchedulingMode,
    name: &str,
    solution: &ScheduleSolution,
    mut pick: F,
) -> Result<FitnessInfo, FitnessError>
where
    F: FnMut(TaskId, &mut Vec<HostScore>, f64) -> HostScore,
{
    let instance = cost.instance();
    if instance.host_count() == 0 {
        return Err(FitnessError::NoHosts);
    }
    let mut available = vec![0.0f64; instance.host_count()];
    let mut timelines: Vec<GapTimeline> =
        (0..instance.host_count()).map(|_| GapTimeline::new()).collect();
    let mut schedule: Vec<Option<TaskSchedule>> = vec![None; instance.task_count()];
    let mut makespan = 0.0f64;
    let mut energy_active = 0.0;

    for pair in &solution.plan {
        let mut scores = Vec::with_capacity(instance.host_count());
        for host in 0..instance.host_count() {
            let costs = match mode {
                SchedulingMode::SemiActive => {
                    cost.task_costs_semi_active(pair.task, host, &schedule, &available)?
                }
                SchedulingMode::Active => {
                    cost.task_costs_active(pair.task, host, &schedule, &timelines[host])?
                }
            };
            let rates = &instance.hosts[host];
            // Reconstructed start used for the energy estimate; equals the
            // policy's ast up to rounding.
            let recomputed_ast = costs.eft - costs.task_time();
            let active = (costs.eft - recomputed_ast) * rates.energy_cost;
            let host_ready = match mode {
                SchedulingMode::SemiActive => available[host],
                SchedulingMode::Active => timelines[host].host_ready(),
            };
            let mut standby = (costs.eft - host_ready) * rates.energy_cost_stand_by;
            if mode == SchedulingMode::Active {
                standby = standby.max(0.0);
            }
            let ast = match mode {
                SchedulingMode::SemiActive => recomputed_ast,
                SchedulingMode::Active => costs.ast,
            };
            scores.push(HostScore {
                host,
                ast,
                eft: costs.eft,
                energy: active + standby,
            });
        }
        let chosen = pick(pair.task, &mut scores, makespan);
        match mode {
            SchedulingMode::SemiActive => available[chosen.host] = chosen.eft,
            SchedulingMode::Active => {
                if !timelines[chosen.host].commit(chosen.ast, chosen.eft) {
                    return Err(FitnessError::NoSuitableGap {
                        task: instance.tasks[pair.task].name.clone(),
                        host: instance.hosts[chosen.host].name.clone(),
                    });
                }
            }
        }
        energy_active += (chosen.eft - chosen.ast) * instance.hosts[pair.host].energy_cost;
        makespan = makespan.max(chosen.eft);
        schedule[pair.task] =
            Some(TaskSchedule::new(pair.task, chosen.ast, chosen.eft, chosen.host));
    }

    let entries = schedule.into_iter().flatten().collect();
    Ok(collect_fitness(instance, name, makespan, energy_active, entries))
}

/// Greedy per-task energy minimizer: every host is scored and the
/// (energy, finish-time) minimum wins.
pub struct HeftEnergy {
    cost: CostModel,
    mode: SchedulingMode,
}

impl HeftEnergy {
    /// Builds the strategy for an instance under the given mode.
    pub fn new(instance: Arc<InstanceData>, mode: SchedulingMode) -> Self {
        Self {
            cost: CostModel::new(instance),
            mode,
        }
    }
}

impl FitnessCalculator for HeftEnergy {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        run_energy_strategy(
            &self.cost,
            self.mode,
            self.fitness_name(),
            solution,
            |_, scores, _| {
                let mut best = scores[0];
                for score in &scores[1..] {
                    if score.by_energy(&best) == Ordering::Less {
                        best = *score;
                    }
                }
                best
            },
        )
    }

    fn fitness_name(&self) -> &'static str {
        "heft-energy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{energy_tradeoff_instance, five_task_baseline_plan, five_task_shared};
    use crate::fitness::Heft;
    use crate::models::{Objective, PlanPair};

    #[test]
    fn test_prefers_cheap_host_where_heft_prefers_fast() {
        let instance = Arc::new(energy_tradeoff_instance());
        let plan = vec![PlanPair::new(0, 0)];

        let heft = Heft::new(instance.clone());
        let mut s = ScheduleSolution::new(plan.clone(), Objective::Makespan);
        let fast = heft.calculate_fitness(&mut s).unwrap();
        assert_eq!(fast.schedule[0].host, 1);

        for mode in [SchedulingMode::Active, SchedulingMode::SemiActive] {
            let energy = HeftEnergy::new(instance.clone(), mode);
            let mut s = ScheduleSolution::new(plan.clone(), Objective::Energy);
            let cheap = energy.calculate_fitness(&mut s).unwrap();
            assert_eq!(cheap.schedule[0].host, 0, "mode {mode:?}");
            assert!(cheap.makespan().unwrap() > fast.makespan().unwrap());
        }
    }

    #[test]
    fn test_modes_agree_on_fork_free_prefix() {
        // With an empty timeline both policies start tasks at the parents'
        // finish, so the whole five-task run matches.
        let instance = five_task_shared();
        let active = HeftEnergy::new(instance.clone(), SchedulingMode::Active);
        let semi = HeftEnergy::new(instance, SchedulingMode::SemiActive);
        let mut a = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let mut b = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let active_info = active.calculate_fitness(&mut a).unwrap();
        let semi_info = semi.calculate_fitness(&mut b).unwrap();
        assert!(active_info.makespan().unwrap() <= semi_info.makespan().unwrap());
    }

    #[test]
    fn test_reports_family_name() {
        let calc = HeftEnergy::new(five_task_shared(), SchedulingMode::Active);
        assert_eq!(calc.fitness_name(), "heft-energy");
    }
}
