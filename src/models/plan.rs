//! Plans (genomes) and candidate solutions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FitnessInfo, HostId, InstanceData, Objective, TaskId};

/// One gene: a task assigned to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPair {
    /// The task to run.
    pub task: TaskId,
    /// The host it is assigned to.
    pub host: HostId,
}

impl PlanPair {
    /// Creates an assignment pair.
    pub fn new(task: TaskId, host: HostId) -> Self {
        Self { task, host }
    }
}

/// An ordered sequence of task-host assignments.
///
/// A plan is valid when it is a permutation of all tasks in an order that
/// respects the DAG: every task appears after all of its parents.
pub type Plan = Vec<PlanPair>;

/// Checks that a plan is a topologically ordered permutation of the
/// instance's tasks with all host indices in range.
pub fn is_valid_plan(plan: &Plan, instance: &InstanceData) -> bool {
    if plan.len() != instance.task_count() {
        return false;
    }
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(plan.len());
    for pair in plan {
        if pair.task >= instance.task_count() || pair.host >= instance.host_count() {
            return false;
        }
        let task = &instance.tasks[pair.task];
        if !task.parents.iter().all(|p| seen.contains(p)) {
            return false;
        }
        if !seen.insert(pair.task) {
            return false;
        }
    }
    true
}

/// A candidate solution flowing through the optimizer.
///
/// Carries the plan, the arbiter objective the solution is being selected
/// on, and the evaluation result once a fitness calculator has scored it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSolution {
    /// The task-host assignment sequence.
    pub plan: Plan,
    /// Objective this solution competes on.
    pub arbiter: Objective,
    /// Evaluation result, `None` until scored.
    pub fitness_info: Option<FitnessInfo>,
}

impl ScheduleSolution {
    /// Creates an unevaluated solution.
    pub fn new(plan: Plan, arbiter: Objective) -> Self {
        Self {
            plan,
            arbiter,
            fitness_info: None,
        }
    }

    /// The value of the arbiter objective, if evaluated.
    pub fn fitness_value(&self) -> Option<f64> {
        self.fitness_info
            .as_ref()
            .and_then(|info| info.objectives.get(self.arbiter.as_str()).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileList, Host, Task};

    fn chain_instance() -> InstanceData {
        let mut t1 = Task::new("t1", 1.0, FileList::default(), FileList::default());
        let mut t2 = Task::new("t2", 1.0, FileList::default(), FileList::default());
        t1.children.push(1);
        t2.parents.push(0);
        let hosts = vec![Host::new("h", 1_000, 100, 100, 1.0, 0.1)];
        InstanceData::new(vec![t1, t2], hosts, 1_000)
    }

    #[test]
    fn test_valid_plan() {
        let data = chain_instance();
        let plan = vec![PlanPair::new(0, 0), PlanPair::new(1, 0)];
        assert!(is_valid_plan(&plan, &data));
    }

    #[test]
    fn test_rejects_order_violation() {
        let data = chain_instance();
        let plan = vec![PlanPair::new(1, 0), PlanPair::new(0, 0)];
        assert!(!is_valid_plan(&plan, &data));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_indices() {
        let data = chain_instance();
        assert!(!is_valid_plan(
            &vec![PlanPair::new(0, 0), PlanPair::new(0, 0)],
            &data
        ));
        assert!(!is_valid_plan(
            &vec![PlanPair::new(0, 5), PlanPair::new(1, 0)],
            &data
        ));
        assert!(!is_valid_plan(&vec![PlanPair::new(0, 0)], &data));
    }
}
