//! HEFT: earliest-finish-time host selection with insertion scheduling.

use std::sync::Arc;

use crate::fitness::{
    collect_fitness, CostModel, FitnessCalculator, FitnessError, GapTimeline, TaskCosts,
};
use crate::models::{FitnessInfo, HostId, InstanceData, PlanPair, ScheduleSolution, TaskSchedule};

/// For each task in plan order, evaluates every host under the active
/// (insertion) policy and takes the one with the smallest finish time,
/// first host winning ties. The plan's host column is ignored for
/// placement but still drives the active-energy accounting, keeping the
/// figures comparable with [`Simple`](crate::fitness::Simple) on the same
/// plan.
pub struct Heft {
    cost: CostModel,
}

impl Heft {
    /// Builds the strategy for an instance.
    pub fn new(instance: Arc<InstanceData>) -> Self {
        Self {
            cost: CostModel::new(instance),
        }
    }

    pub(crate) fn cost(&self) -> &CostModel {
        &self.cost
    }

    pub(crate) fn run(
        &self,
        solution: &ScheduleSolution,
        name: &str,
    ) -> Result<FitnessInfo, FitnessError> {
        let instance = self.cost.instance();
        if instance.host_count() == 0 {
            return Err(FitnessError::NoHosts);
        }
        let mut timelines: Vec<GapTimeline> =
            (0..instance.host_count()).map(|_| GapTimeline::new()).collect();
        let mut schedule: Vec<Option<TaskSchedule>> = vec![None; instance.task_count()];
        let mut makespan = 0.0f64;
        let mut energy_active = 0.0;

        for pair in &solution.plan {
            let mut best: Option<(HostId, TaskCosts)> = None;
            for host in 0..instance.host_count() {
                let costs =
                    self.cost
                        .task_costs_active(pair.task, host, &schedule, &timelines[host])?;
                match &best {
                    Some((_, current)) if costs.eft >= current.eft => {}
                    _ => best = Some((host, costs)),
                }
            }
            let (host, costs) = best.ok_or(FitnessError::NoHosts)?;
            if !timelines[host].commit(costs.ast, costs.eft) {
                return Err(FitnessError::NoSuitableGap {
                    task: instance.tasks[pair.task].name.clone(),
                    host: instance.hosts[host].name.clone(),
                });
            }
            energy_active += (costs.eft - costs.ast) * instance.hosts[pair.host].energy_cost;
            makespan = makespan.max(costs.eft);
            schedule[pair.task] = Some(TaskSchedule::new(pair.task, costs.ast, costs.eft, host));
        }

        let entries = schedule.into_iter().flatten().collect();
        Ok(collect_fitness(instance, name, makespan, energy_active, entries))
    }
}

impl FitnessCalculator for Heft {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        self.run(solution, self.fitness_name())
    }

    fn fitness_name(&self) -> &'static str {
        "heft"
    }
}

/// Rewrites the plan into HEFT rank order (keeping the host column by
/// position), then schedules it like [`Heft`]. The rewritten plan stays on
/// the solution so genetic operators work on the order actually scheduled.
pub struct Heuristic {
    inner: Heft,
}

impl Heuristic {
    /// Builds the strategy for an instance.
    pub fn new(instance: Arc<InstanceData>) -> Self {
        Self {
            inner: Heft::new(instance),
        }
    }
}

impl FitnessCalculator for Heuristic {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        solution.plan = self
            .inner
            .cost()
            .ranking()
            .iter()
            .zip(&solution.plan)
            .map(|(&task, pair)| PlanPair::new(task, pair.host))
            .collect();
        self.inner.run(solution, self.fitness_name())
    }

    fn fitness_name(&self) -> &'static str {
        "heuristic"
    }
}
