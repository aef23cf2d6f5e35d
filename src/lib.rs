//! Scheduling fitness engine for scientific workflows.
//!
//! Given a workflow (a DAG of tasks with data dependencies) and a fixed set
//! of compute hosts, this crate scores candidate task-to-host plans against
//! makespan and energy objectives. It is the inner engine of an evolutionary
//! scheduler: the outer optimizer (population loop, termination, observers)
//! is a consumer of this crate, not part of it.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Host`, `InstanceData`, `Plan`,
//!   `ScheduleSolution`, `TaskSchedule`, `FitnessInfo`
//! - **`validation`**: Instance integrity checks (DAG cycles, dangling
//!   relations, host sanity)
//! - **`fitness`**: Cost matrices, HEFT ranking, gap-based insertion
//!   scheduling, and the family of fitness strategies selectable by name
//! - **`ga`**: Topology-aware plan generation and topology-preserving
//!   genetic operators
//! - **`evaluation`**: Bounded worker pool for parallel population scoring
//!
//! # Data Flow
//!
//! An immutable [`models::InstanceData`] is built once and shared read-only
//! across threads. A [`fitness::FitnessCalculator`] is constructed from it,
//! precomputing the computation/communication matrices. The optimizer
//! repeatedly asks the calculator to score a plan; the calculator runs its
//! scheduling policy and returns a [`models::FitnessInfo`] with the
//! objective values and the realized per-task schedule.
//!
//! # References
//!
//! - Topcuoglu et al. (2002), "Performance-Effective and Low-Complexity
//!   Task Scheduling for Heterogeneous Computing" (HEFT)
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod evaluation;
pub mod fitness;
pub mod ga;
pub mod models;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;
