//! Workflow scheduling domain models.
//!
//! Provides the core data types for representing a workflow scheduling
//! instance and its candidate solutions. Tasks and hosts live in arenas
//! owned by [`InstanceData`]; all relationships are index-based
//! ([`TaskId`] / [`HostId`]), so the task graph carries no owning cycles
//! even though parents and children reference each other.
//!
//! | Type | Role |
//! |------|------|
//! | `Task` | Workflow node: runtime, data files, DAG relations |
//! | `Host` | Compute host: flops, disk/network speed, energy costs |
//! | `InstanceData` | Immutable instance shared across evaluations |
//! | `Plan` / `PlanPair` | Genome: ordered task→host assignments |
//! | `ScheduleSolution` | Plan plus arbiter tag and evaluation result |
//! | `TaskSchedule` / `FitnessInfo` | Realized timed schedule and objectives |

mod host;
mod instance;
mod plan;
mod schedule;
mod task;

pub use host::Host;
pub use instance::{HostId, InstanceData, TaskId};
pub use plan::{is_valid_plan, Plan, PlanPair, ScheduleSolution};
pub use schedule::{FitnessInfo, Objective, TaskSchedule};
pub use task::{FileDirection, FileList, Task, TaskFile};
