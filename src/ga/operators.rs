//! Topology-preserving genetic operators.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{InstanceData, Objective, Plan, PlanPair, ScheduleSolution, TaskId};

/// Crossover and mutation over valid plans. Both operators only produce
/// plans that remain topologically ordered permutations.
pub struct Operators<'a> {
    instance: &'a InstanceData,
}

impl<'a> Operators<'a> {
    /// Creates the operators for an instance.
    pub fn new(instance: &'a InstanceData) -> Self {
        Self { instance }
    }

    /// Cut-and-fill crossover. A random cut point splits the first
    /// parent; the prefix is copied as-is and the remainder is filled
    /// with the second parent's missing pairs in the second parent's
    /// order, hosts included. The second child swaps the parents' roles
    /// at the same cut.
    ///
    /// Both donors contribute a subsequence of a topological order, so
    /// the children are topological orders too.
    pub fn crossover(
        &self,
        first: &Plan,
        second: &Plan,
        rng: &mut impl Rng,
    ) -> (Plan, Plan) {
        let cut = rng.random_range(0..first.len());
        (cut_and_fill(first, second, cut), cut_and_fill(second, first, cut))
    }

    /// Moves one random pair to a new position bounded by its nearest
    /// direct parent on the left and nearest direct child on the right,
    /// and re-rolls its host. The bounds keep the order topological.
    pub fn mutate(&self, plan: &Plan, rng: &mut impl Rng) -> Plan {
        let len = plan.len();
        let position = rng.random_range(0..len);
        let task = plan[position].task;
        let relations = &self.instance.tasks[task];

        let mut lower = 0;
        for i in (0..position).rev() {
            if relations.parents.contains(&plan[i].task) {
                lower = i + 1;
                break;
            }
        }
        let mut upper = position + 1;
        while upper < len - 1 {
            if relations.children.contains(&plan[upper].task) {
                break;
            }
            upper += 1;
        }

        let new_position = rng.random_range(lower..upper);
        let host = rng.random_range(0..self.instance.host_count());
        let mut child = plan.clone();
        child.remove(position);
        child.insert(new_position, PlanPair::new(task, host));
        child
    }
}

fn cut_and_fill(prefix_donor: &Plan, filler: &Plan, cut: usize) -> Plan {
    let mut child: Plan = prefix_donor[..cut].to_vec();
    let mut present: HashSet<TaskId> = child.iter().map(|p| p.task).collect();
    for pair in filler {
        if child.len() == prefix_donor.len() {
            break;
        }
        if present.insert(pair.task) {
            child.push(*pair);
        }
    }
    child
}

/// Mating selection: a uniform shuffle of the population, pairing
/// neighbors for crossover.
pub fn shuffle_selection(population: &mut [ScheduleSolution], rng: &mut impl Rng) {
    population.shuffle(rng);
}

/// Elitist replacement in groups of four: each parent pair competes with
/// its child pair on `objective`, the two best survive. Solutions with
/// exactly equal objective values are collapsed to one before picking, so
/// a clone cannot occupy both slots unless the whole group tied.
/// Unevaluated solutions rank last.
pub fn tournament_replacement(
    parents: &[ScheduleSolution],
    children: &[ScheduleSolution],
    objective: Objective,
) -> Vec<ScheduleSolution> {
    let value = |s: &ScheduleSolution| {
        s.fitness_info
            .as_ref()
            .and_then(|info| info.objectives.get(objective.as_str()).copied())
            .unwrap_or(f64::INFINITY)
    };

    let mut next = Vec::with_capacity(parents.len());
    for (parent_pair, child_pair) in parents.chunks(2).zip(children.chunks(2)) {
        let mut group: Vec<&ScheduleSolution> =
            parent_pair.iter().chain(child_pair.iter()).collect();
        group.sort_by(|a, b| value(a).total_cmp(&value(b)));
        group.dedup_by(|a, b| value(*a) == value(*b));
        next.push(group[0].clone());
        next.push(group.get(1).copied().unwrap_or(group[0]).clone());
    }
    next
}
