//! Realized schedules and evaluation results.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{HostId, TaskId};

/// The objective a solution is ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Total completion time of the workflow.
    Makespan,
    /// Total energy (active plus standby) consumed over the makespan.
    Energy,
}

impl Objective {
    /// The key this objective uses in [`FitnessInfo::objectives`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Makespan => "makespan",
            Objective::Energy => "energy",
        }
    }

    /// The other objective.
    pub fn alternative(&self) -> Objective {
        match self {
            Objective::Makespan => Objective::Energy,
            Objective::Energy => Objective::Makespan,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "makespan" => Ok(Objective::Makespan),
            "energy" => Ok(Objective::Energy),
            other => Err(format!("unknown objective '{other}'")),
        }
    }
}

/// One task's placement in a realized schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSchedule {
    /// The scheduled task.
    pub task: TaskId,
    /// Actual start time in seconds.
    pub ast: f64,
    /// Actual finish time in seconds.
    pub eft: f64,
    /// Host the task actually runs on.
    pub host: HostId,
}

impl TaskSchedule {
    /// Creates a schedule entry.
    pub fn new(task: TaskId, ast: f64, eft: f64, host: HostId) -> Self {
        Self {
            task,
            ast,
            eft,
            host,
        }
    }
}

/// The result of evaluating one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessInfo {
    /// Objective values keyed by [`Objective::as_str`] names.
    pub objectives: HashMap<String, f64>,
    /// Per-task realized schedule, ordered by start time.
    pub schedule: Vec<TaskSchedule>,
    /// Name of the strategy that produced this result.
    pub fitness_function: String,
}

impl FitnessInfo {
    /// Creates an evaluation result.
    pub fn new(
        objectives: HashMap<String, f64>,
        schedule: Vec<TaskSchedule>,
        fitness_function: impl Into<String>,
    ) -> Self {
        Self {
            objectives,
            schedule,
            fitness_function: fitness_function.into(),
        }
    }

    /// The makespan objective value.
    pub fn makespan(&self) -> Option<f64> {
        self.objectives.get(Objective::Makespan.as_str()).copied()
    }

    /// The energy objective value.
    pub fn energy(&self) -> Option<f64> {
        self.objectives.get(Objective::Energy.as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_parse_roundtrip() {
        assert_eq!("makespan".parse::<Objective>(), Ok(Objective::Makespan));
        assert_eq!("energy".parse::<Objective>(), Ok(Objective::Energy));
        assert!("time".parse::<Objective>().is_err());
        assert_eq!(Objective::Makespan.alternative(), Objective::Energy);
        assert_eq!(Objective::Energy.to_string(), "energy");
    }

    #[test]
    fn test_fitness_info_accessors() {
        let mut objectives = HashMap::new();
        objectives.insert("makespan".to_string(), 42.0);
        objectives.insert("energy".to_string(), 120.5);
        let info = FitnessInfo::new(objectives, Vec::new(), "simple");
        assert_eq!(info.makespan(), Some(42.0));
        assert_eq!(info.energy(), Some(120.5));
        assert_eq!(info.fitness_function, "simple");
    }
}
