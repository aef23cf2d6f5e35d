//! Task (workflow node) model.
//!
//! A task is one node of the workflow DAG: a reference runtime measured on
//! a reference CPU, the data files it consumes and produces, and its direct
//! parents and children. Relations are [`TaskId`] indices into the owning
//! [`InstanceData`](super::InstanceData) arena.

use serde::{Deserialize, Serialize};

use super::TaskId;

/// Whether a file is consumed or produced by its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileDirection {
    /// Needed before the task can start.
    Input,
    /// Generated when the task finishes.
    Output,
}

/// A data file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    /// File name, used to match producer outputs to consumer inputs.
    pub name: String,
    /// Input or output relative to the owning task.
    pub direction: FileDirection,
    /// File size in bits.
    pub size: u64,
}

impl TaskFile {
    /// Creates a new file entry.
    pub fn new(name: impl Into<String>, direction: FileDirection, size: u64) -> Self {
        Self {
            name: name.into(),
            direction,
            size,
        }
    }
}

/// A file list with its total size precomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    /// The files.
    pub files: Vec<TaskFile>,
    /// Sum of all file sizes in bits.
    pub size_in_bits: u64,
}

impl FileList {
    /// Creates a file list, computing the total size.
    pub fn new(files: Vec<TaskFile>) -> Self {
        let size_in_bits = files.iter().map(|f| f.size).sum();
        Self {
            files,
            size_in_bits,
        }
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A workflow task.
///
/// The runtime is in seconds as recorded on the reference CPU; scheduling
/// rescales it to each host through the computation matrix. Parent and
/// child lists must be mutual inverses and the overall graph a DAG —
/// enforced by [`validation`](crate::validation), assumed everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task name.
    pub name: String,
    /// Reference runtime in seconds.
    pub runtime: f64,
    /// Direct predecessors in the DAG.
    pub parents: Vec<TaskId>,
    /// Direct successors in the DAG.
    pub children: Vec<TaskId>,
    /// Files required before the task can run.
    pub input: FileList,
    /// Files produced by the task.
    pub output: FileList,
}

impl Task {
    /// Creates a task with no relations yet.
    pub fn new(name: impl Into<String>, runtime: f64, input: FileList, output: FileList) -> Self {
        Self {
            name: name.into(),
            runtime,
            parents: Vec::new(),
            children: Vec::new(),
            input,
            output,
        }
    }

    /// Whether the task has no parents (workflow entry point).
    pub fn is_source(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether the task has no children (workflow exit point).
    pub fn is_sink(&self) -> bool {
        self.children.is_empty()
    }
}
