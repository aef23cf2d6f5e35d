//! Random topological plan generation.

use rand::Rng;

use crate::models::{InstanceData, Plan, PlanPair, TaskId};

/// Draws uniformly random valid plans: a Kahn traversal that pulls a
/// uniformly random task from the ready frontier at each step and assigns
/// it a uniformly random host. Every topological order has non-zero
/// probability.
pub struct PlanGenerator<'a> {
    instance: &'a InstanceData,
}

impl<'a> PlanGenerator<'a> {
    /// Creates a generator over an instance.
    pub fn new(instance: &'a InstanceData) -> Self {
        Self { instance }
    }

    /// Generates one random valid plan.
    pub fn generate(&self, rng: &mut impl Rng) -> Plan {
        let tasks = &self.instance.tasks;
        let mut remaining: Vec<usize> = tasks.iter().map(|t| t.parents.len()).collect();
        let mut frontier: Vec<TaskId> = remaining
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(id, _)| id)
            .collect();
        let mut plan = Plan::with_capacity(tasks.len());
        while !frontier.is_empty() {
            let pick = rng.random_range(0..frontier.len());
            let task = frontier.swap_remove(pick);
            let host = rng.random_range(0..self.instance.host_count());
            plan.push(PlanPair::new(task, host));
            for &child in &tasks[task].children {
                remaining[child] -= 1;
                if remaining[child] == 0 {
                    frontier.push(child);
                }
            }
        }
        plan
    }
}
