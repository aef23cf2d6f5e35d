//! Precomputed cost matrices and the shared placement arithmetic.
//!
//! A `CostModel` is built once per strategy from the immutable instance.
//! It holds the task-host computation matrix, the parent-transfer matrix
//! (including each task's self entry for staged inputs), the reference
//! transfer speeds for HEFT ranking, and the ranking itself.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::fitness::{FitnessError, GapTimeline};
use crate::models::{HostId, InstanceData, TaskId, TaskSchedule};

/// Constraints imposed on a task by its already-scheduled parents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentsInfo {
    /// Latest parent finish time; the task cannot start earlier.
    pub max_est: f64,
    /// Total transfer time from all parents onto the candidate host.
    pub communications: f64,
}

/// The full placement arithmetic for one task on one candidate host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskCosts {
    /// Time to stage non-parent inputs from the candidate host's disk.
    pub disk_read_staging: f64,
    /// Time to write the task's outputs to the candidate host's disk.
    pub disk_write: f64,
    /// Pure computation time on the candidate host.
    pub computation: f64,
    /// Transfer time from all parents.
    pub communications: f64,
    /// Actual start time under the policy that produced these costs.
    pub ast: f64,
    /// Resulting finish time.
    pub eft: f64,
}

impl TaskCosts {
    /// Total host occupation: everything except the wait until `ast`.
    pub fn task_time(&self) -> f64 {
        self.disk_read_staging + self.disk_write + self.computation + self.communications
    }
}

/// Precomputed per-instance cost data.
#[derive(Debug)]
pub struct CostModel {
    instance: Arc<InstanceData>,
    /// `computation[task][host]`, seconds.
    computation: Vec<Vec<f64>>,
    /// `network[task]`: bits received from each parent, plus a self entry
    /// for input bits no parent produces (staged data).
    network: Vec<HashMap<TaskId, u64>>,
    /// HEFT upward ranks by task.
    ranks: Vec<f64>,
    /// Task ids ordered by descending rank, ties by index.
    ranking: Vec<TaskId>,
}

impl CostModel {
    /// Builds the matrices and the HEFT ranking for an instance.
    pub fn new(instance: Arc<InstanceData>) -> Self {
        let computation = Self::computation_matrix(&instance);
        let network = Self::network_matrix(&instance);
        let (ranks, ranking) = Self::heft_ranks(&instance, &computation);
        Self {
            instance,
            computation,
            network,
            ranks,
            ranking,
        }
    }

    fn computation_matrix(instance: &InstanceData) -> Vec<Vec<f64>> {
        instance
            .tasks
            .iter()
            .map(|task| {
                instance
                    .hosts
                    .iter()
                    .map(|host| task.runtime * (instance.reference_flops as f64 / host.flops as f64))
                    .collect()
            })
            .collect()
    }

    fn network_matrix(instance: &InstanceData) -> Vec<HashMap<TaskId, u64>> {
        instance
            .tasks
            .iter()
            .enumerate()
            .map(|(id, task)| {
                let mut row = HashMap::with_capacity(task.parents.len() + 1);
                let mut from_parents = 0u64;
                for &parent in &task.parents {
                    let bits: u64 = instance.tasks[parent]
                        .output
                        .files
                        .iter()
                        .filter(|f| task.input.files.iter().any(|i| i.name == f.name))
                        .map(|f| f.size)
                        .sum();
                    from_parents += bits;
                    row.insert(parent, bits);
                }
                // Inputs no parent produces must be staged from disk.
                row.insert(id, task.input.size_in_bits.saturating_sub(from_parents));
                row
            })
            .collect()
    }

    /// Upward ranks, bottom-up from the sinks. The rank of a task is its
    /// average computation time plus reference-speed transfer estimates
    /// plus the largest child rank.
    fn heft_ranks(instance: &InstanceData, computation: &[Vec<f64>]) -> (Vec<f64>, Vec<TaskId>) {
        let hosts = instance.host_count() as f64;
        let reference_read = instance
            .hosts
            .iter()
            .map(|h| h.network_speed.min(h.disk_speed) as f64)
            .sum::<f64>()
            / hosts;
        let reference_write =
            instance.hosts.iter().map(|h| h.disk_speed as f64).sum::<f64>() / hosts;

        let n = instance.task_count();
        let mut ranks = vec![0.0; n];
        let mut remaining: Vec<usize> =
            instance.tasks.iter().map(|t| t.children.len()).collect();
        let mut queue: VecDeque<TaskId> = remaining
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(id, _)| id)
            .collect();
        while let Some(id) = queue.pop_front() {
            let task = &instance.tasks[id];
            let avg_computation = computation[id].iter().sum::<f64>() / hosts;
            let child_rank = task
                .children
                .iter()
                .map(|&c| ranks[c])
                .fold(0.0, f64::max);
            ranks[id] = avg_computation
                + task.input.size_in_bits as f64 / reference_read
                + task.output.size_in_bits as f64 / reference_write
                + child_rank;
            for &parent in &task.parents {
                remaining[parent] -= 1;
                if remaining[parent] == 0 {
                    queue.push_back(parent);
                }
            }
        }

        let mut ranking: Vec<TaskId> = (0..n).collect();
        ranking.sort_by(|&a, &b| ranks[b].total_cmp(&ranks[a]));
        (ranks, ranking)
    }

    /// The instance this model was built from.
    pub fn instance(&self) -> &Arc<InstanceData> {
        &self.instance
    }

    /// Computation time of `task` on `host`, seconds.
    pub fn computation(&self, task: TaskId, host: HostId) -> f64 {
        self.computation[task][host]
    }

    /// Bits `task` receives from `source` (a parent, or itself for staged
    /// inputs).
    pub fn network_bits(&self, task: TaskId, source: TaskId) -> u64 {
        self.network[task].get(&source).copied().unwrap_or(0)
    }

    /// HEFT upward rank of each task.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Task ids by descending HEFT rank.
    pub fn ranking(&self) -> &[TaskId] {
        &self.ranking
    }

    /// Effective transfer speed from a parent's host onto `host`:
    /// co-located tasks move data over the disk, remote transfers are
    /// capped by the slowest involved link.
    pub fn link_speed(&self, host: HostId, parent_host: HostId) -> f64 {
        let h = &self.instance.hosts[host];
        if host == parent_host {
            h.disk_speed as f64
        } else {
            let p = &self.instance.hosts[parent_host];
            h.network_speed.min(p.network_speed).min(p.disk_speed) as f64
        }
    }

    /// Aggregates the already-scheduled parents of `task` for a candidate
    /// placement on `host`. Fails if a parent has not been placed yet.
    pub fn parents_info(
        &self,
        task: TaskId,
        host: HostId,
        schedule: &[Option<TaskSchedule>],
    ) -> Result<ParentsInfo, FitnessError> {
        let mut max_est = 0.0f64;
        let mut communications = 0.0;
        for &parent in &self.instance.tasks[task].parents {
            let placed = schedule[parent].as_ref().ok_or_else(|| {
                FitnessError::UnscheduledParent {
                    task: self.instance.tasks[task].name.clone(),
                    parent: self.instance.tasks[parent].name.clone(),
                }
            })?;
            max_est = max_est.max(placed.eft);
            communications +=
                self.network_bits(task, parent) as f64 / self.link_speed(host, placed.host);
        }
        Ok(ParentsInfo {
            max_est,
            communications,
        })
    }

    fn base_costs(
        &self,
        task: TaskId,
        host: HostId,
        schedule: &[Option<TaskSchedule>],
    ) -> Result<TaskCosts, FitnessError> {
        let parents = self.parents_info(task, host, schedule)?;
        let disk = self.instance.hosts[host].disk_speed as f64;
        Ok(TaskCosts {
            disk_read_staging: self.network_bits(task, task) as f64 / disk,
            disk_write: self.instance.tasks[task].output.size_in_bits as f64 / disk,
            computation: self.computation(task, host),
            communications: parents.communications,
            ast: parents.max_est,
            eft: 0.0,
        })
    }

    /// Placement under the semi-active policy: the task starts as soon as
    /// both the host and all parents are done.
    pub fn task_costs_semi_active(
        &self,
        task: TaskId,
        host: HostId,
        schedule: &[Option<TaskSchedule>],
        available: &[f64],
    ) -> Result<TaskCosts, FitnessError> {
        let mut costs = self.base_costs(task, host, schedule)?;
        costs.ast = available[host].max(costs.ast);
        costs.eft = costs.ast + costs.task_time();
        Ok(costs)
    }

    /// Placement under the active (insertion) policy: the earliest idle
    /// gap at or after the parents' finish that can hold the whole task,
    /// falling back to the parents' finish itself when no gap qualifies.
    pub fn task_costs_active(
        &self,
        task: TaskId,
        host: HostId,
        schedule: &[Option<TaskSchedule>],
        timeline: &GapTimeline,
    ) -> Result<TaskCosts, FitnessError> {
        let mut costs = self.base_costs(task, host, schedule)?;
        let max_est = costs.ast;
        costs.ast = timeline
            .earliest_fit(max_est, costs.task_time())
            .unwrap_or(max_est);
        costs.eft = costs.ast + costs.task_time();
        Ok(costs)
    }
}
