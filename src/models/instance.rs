//! Immutable scheduling instance shared across evaluations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Host, Task};

/// Index of a task in the instance arena.
pub type TaskId = usize;

/// Index of a host in the instance arena.
pub type HostId = usize;

/// A complete scheduling instance: the workflow, the host pool, and the
/// reference CPU speed that task runtimes were measured against.
///
/// Built once, then shared read-only (typically behind an `Arc`) by every
/// fitness calculator and worker thread. Tasks and hosts are stored in
/// arenas and addressed by [`TaskId`] / [`HostId`] so the DAG relations
/// carry no owning cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    /// Workflow tasks; `parents`/`children` index into this arena.
    pub tasks: Vec<Task>,
    /// Available compute hosts.
    pub hosts: Vec<Host>,
    /// Flops of the reference CPU the runtimes were measured on.
    pub reference_flops: u64,
    /// Task name to arena index.
    task_index: HashMap<String, TaskId>,
    /// Host name to arena index.
    host_index: HashMap<String, HostId>,
}

impl InstanceData {
    /// Creates an instance, building the name lookup maps.
    ///
    /// Task relations are taken as given; run
    /// [`validation::validate_instance`](crate::validation::validate_instance)
    /// before handing the instance to the engine.
    pub fn new(tasks: Vec<Task>, hosts: Vec<Host>, reference_flops: u64) -> Self {
        let task_index = tasks
            .iter()
            .enumerate()
            .map(|(id, t)| (t.name.clone(), id))
            .collect();
        let host_index = hosts
            .iter()
            .enumerate()
            .map(|(id, h)| (h.name.clone(), id))
            .collect();
        Self {
            tasks,
            hosts,
            reference_flops,
            task_index,
            host_index,
        }
    }

    /// Number of tasks in the workflow.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of hosts in the pool.
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Looks up a task by name.
    pub fn task_by_name(&self, name: &str) -> Option<TaskId> {
        self.task_index.get(name).copied()
    }

    /// Looks up a host by name.
    pub fn host_by_name(&self, name: &str) -> Option<HostId> {
        self.host_index.get(name).copied()
    }
}
