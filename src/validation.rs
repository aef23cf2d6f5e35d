//! Instance integrity checks.
//!
//! The fitness engine assumes its [`InstanceData`] is well formed: the
//! task graph is a DAG, parent/child lists agree, names are unique, and
//! host speeds are non-zero (they appear as divisors throughout the cost
//! model). [`validate_instance`] checks all of that up front so the
//! engine itself never has to.

use std::collections::{HashSet, VecDeque};

use crate::models::InstanceData;

/// Category of an instance validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance has no hosts or no tasks.
    EmptyInstance,
    /// Two tasks or two hosts share a name.
    DuplicateName,
    /// A parent/child index is out of range.
    IndexOutOfRange,
    /// Parent and child lists are not mutual inverses.
    InconsistentRelation,
    /// The task graph contains a cycle.
    CyclicGraph,
    /// A host speed or the reference flops is zero.
    ZeroSpeed,
}

/// A failed instance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// What went wrong.
    pub kind: ValidationErrorKind,
    /// Human-readable detail naming the offending task or host.
    pub message: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates an instance, returning the first problem found.
pub fn validate_instance(instance: &InstanceData) -> Result<(), ValidationError> {
    if instance.hosts.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "instance has no hosts",
        ));
    }
    if instance.tasks.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "instance has no tasks",
        ));
    }
    if instance.reference_flops == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::ZeroSpeed,
            "reference flops is zero",
        ));
    }

    let mut names = HashSet::new();
    for task in &instance.tasks {
        if !names.insert(task.name.as_str()) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("duplicate task name '{}'", task.name),
            ));
        }
    }
    names.clear();
    for host in &instance.hosts {
        if !names.insert(host.name.as_str()) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("duplicate host name '{}'", host.name),
            ));
        }
        if host.flops == 0 || host.disk_speed == 0 || host.network_speed == 0 {
            return Err(ValidationError::new(
                ValidationErrorKind::ZeroSpeed,
                format!("host '{}' has a zero speed", host.name),
            ));
        }
    }

    let n = instance.task_count();
    for (id, task) in instance.tasks.iter().enumerate() {
        for &parent in &task.parents {
            if parent >= n {
                return Err(ValidationError::new(
                    ValidationErrorKind::IndexOutOfRange,
                    format!("task '{}' references parent {parent}", task.name),
                ));
            }
            if !instance.tasks[parent].children.contains(&id) {
                return Err(ValidationError::new(
                    ValidationErrorKind::InconsistentRelation,
                    format!(
                        "task '{}' lists '{}' as parent but is not its child",
                        task.name, instance.tasks[parent].name
                    ),
                ));
            }
        }
        for &child in &task.children {
            if child >= n {
                return Err(ValidationError::new(
                    ValidationErrorKind::IndexOutOfRange,
                    format!("task '{}' references child {child}", task.name),
                ));
            }
            if !instance.tasks[child].parents.contains(&id) {
                return Err(ValidationError::new(
                    ValidationErrorKind::InconsistentRelation,
                    format!(
                        "task '{}' lists '{}' as child but is not its parent",
                        task.name, instance.tasks[child].name
                    ),
                ));
            }
        }
    }

    // Kahn's algorithm; any task left unvisited sits on a cycle.
    let mut remaining: Vec<usize> = instance.tasks.iter().map(|t| t.parents.len()).collect();
    let mut queue: VecDeque<usize> = remaining
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(id, _)| id)
        .collect();
    let mut visited = 0;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        for &child in &instance.tasks[id].children {
            remaining[child] -= 1;
            if remaining[child] == 0 {
                queue.push_back(child);
            }
        }
    }
    if visited != n {
        return Err(ValidationError::new(
            ValidationErrorKind::CyclicGraph,
            "task graph contains a cycle",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::five_task_instance;
    use crate::models::{FileList, Host, InstanceData, Task};

    fn host() -> Host {
        Host::new("h", 1_000, 100, 100, 1.0, 0.1)
    }

    #[test]
    fn test_accepts_reference_instance() {
        assert!(validate_instance(&five_task_instance()).is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        let data = InstanceData::new(Vec::new(), vec![host()], 1_000);
        assert_eq!(
            validate_instance(&data).unwrap_err().kind,
            ValidationErrorKind::EmptyInstance
        );
    }

    #[test]
    fn test_rejects_zero_speed_host() {
        let tasks = vec![Task::new("t", 1.0, FileList::default(), FileList::default())];
        let bad = Host::new("h", 1_000, 0, 100, 1.0, 0.1);
        let data = InstanceData::new(tasks, vec![bad], 1_000);
        assert_eq!(
            validate_instance(&data).unwrap_err().kind,
            ValidationErrorKind::ZeroSpeed
        );
    }

    #[test]
    fn test_rejects_one_sided_relation() {
        let mut t1 = Task::new("t1", 1.0, FileList::default(), FileList::default());
        let t2 = Task::new("t2", 1.0, FileList::default(), FileList::default());
        t1.children.push(1);
        let data = InstanceData::new(vec![t1, t2], vec![host()], 1_000);
        assert_eq!(
            validate_instance(&data).unwrap_err().kind,
            ValidationErrorKind::InconsistentRelation
        );
    }

    #[test]
    fn test_rejects_cycle() {
        let mut t1 = Task::new("t1", 1.0, FileList::default(), FileList::default());
        let mut t2 = Task::new("t2", 1.0, FileList::default(), FileList::default());
        t1.children.push(1);
        t1.parents.push(1);
        t2.parents.push(0);
        t2.children.push(0);
        let data = InstanceData::new(vec![t1, t2], vec![host()], 1_000);
        assert_eq!(
            validate_instance(&data).unwrap_err().kind,
            ValidationErrorKind::CyclicGraph
        );
    }

    #[test]
    fn test_rejects_duplicate_task_name() {
        let tasks = vec![
            Task::new("t", 1.0, FileList::default(), FileList::default()),
            Task::new("t", 1.0, FileList::default(), FileList::default()),
        ];
        let data = InstanceData::new(tasks, vec![host()], 1_000);
        assert_eq!(
            validate_instance(&data).unwrap_err().kind,
            ValidationErrorKind::DuplicateName
        );
    }
}
