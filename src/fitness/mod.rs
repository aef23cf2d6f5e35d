//! Fitness strategies.
//!
//! Every strategy shares the same shape: walk the plan, place each task on
//! a host under a scheduling policy (semi-active or active), then fold the
//! realized schedule into makespan and energy objectives. Strategies differ
//! only in which host they pick for a task and how they order candidates.
//!
//! Strategies are data-carrying values behind the [`FitnessCalculator`]
//! trait and are selected by name through [`fitness_for`]:
//!
//! | Name | Strategy |
//! |------|----------|
//! | `simple` | Plan hosts, semi-active ([`Simple`]) |
//! | `heft` | Min-EFT host, insertion scheduling ([`Heft`]) |
//! | `heft-energy-{active,semi-active}` | Min (energy, EFT) host ([`HeftEnergy`]) |
//! | `min-energy-UM-{active,semi-active}` | Cheapest host under the running makespan ([`MinEnergyUm`]) |
//! | `fvlt-me-{active,semi-active}` | Fast hosts for large tasks ([`Fvlt`]) |
//! | `rank` | HEFT-ordered plan, then `simple` ([`Rank`]) |
//! | `heuristic` | HEFT-ordered plan, then `heft` ([`Heuristic`]) |
//! | `multi`, `multi-makespan`, `multi-energy`, `multi-energy-no-fvlt` | Best of a per-objective family ([`Multi`]) |
//!
//! Each name also accepts its historical spellings: the `-mono` variants
//! (`simple-makespan-mono`, `multi-energy-mono-no-fvlt`, ...) and the
//! `heft-spea2`/`heft-pesa2` aliases for `heft`.

mod cost;
mod fvlt;
mod gaps;
mod heft;
mod heft_energy;
mod min_energy;
mod multi;
mod rank;
mod simple;

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::models::{FitnessInfo, InstanceData, Objective, ScheduleSolution, TaskSchedule};

pub use cost::{CostModel, ParentsInfo, TaskCosts};
pub use fvlt::Fvlt;
pub use gaps::{GapTimeline, ScheduleGap};
pub use heft::{Heft, Heuristic};
pub use heft_energy::{HeftEnergy, SchedulingMode};
pub use min_energy::MinEnergyUm;
pub use multi::{Multi, StrategyUsage, UsageStats};
pub use rank::Rank;
pub use simple::Simple;

/// A fitness evaluation failure. All variants are fatal; the engine never
/// silently repairs an inconsistent evaluation.
#[derive(Debug, Error)]
pub enum FitnessError {
    /// [`fitness_for`] was given a name outside the strategy table.
    #[error("unknown fitness strategy '{0}'")]
    UnknownStrategy(String),
    /// The instance has no hosts to place tasks on.
    #[error("instance has no hosts")]
    NoHosts,
    /// A strategy family for the requested objective is empty.
    #[error("no fitness calculator available for objective '{0}'")]
    NoCalculator(Objective),
    /// A committed placement found no gap containing it.
    #[error("no gap can hold task '{task}' on host '{host}'")]
    NoSuitableGap {
        /// Name of the task being placed.
        task: String,
        /// Name of the host whose timeline rejected it.
        host: String,
    },
    /// A task was evaluated before one of its parents, so the plan is not
    /// topologically ordered.
    #[error("task '{task}' scheduled before its parent '{parent}'")]
    UnscheduledParent {
        /// The out-of-order task.
        task: String,
        /// The parent missing from the schedule.
        parent: String,
    },
    /// A sub-strategy result lacks the objective being compared.
    #[error("result of '{strategy}' is missing objective '{objective}'")]
    MissingObjective {
        /// The strategy whose result was incomplete.
        strategy: String,
        /// The objective that was absent.
        objective: Objective,
    },
}

/// A fitness strategy: scores one plan into a [`FitnessInfo`].
///
/// Implementations are immutable after construction and safe to share
/// across evaluation threads. The solution is mutable because the
/// plan-rewriting strategies (`rank`, `heuristic`) replace the plan before
/// delegating.
pub trait FitnessCalculator: Send + Sync {
    /// Evaluates the solution's plan.
    fn calculate_fitness(&self, solution: &mut ScheduleSolution)
        -> Result<FitnessInfo, FitnessError>;

    /// Stable name of this strategy, as reported in
    /// [`FitnessInfo::fitness_function`].
    fn fitness_name(&self) -> &'static str;
}

/// Builds the strategy registered under `name`.
pub fn fitness_for(
    name: &str,
    instance: Arc<InstanceData>,
) -> Result<Box<dyn FitnessCalculator>, FitnessError> {
    fitness_for_with_stats(name, instance, None)
}

/// Like [`fitness_for`], additionally wiring a usage counter into the
/// `multi` strategies. Non-`multi` strategies ignore the counter.
pub fn fitness_for_with_stats(
    name: &str,
    instance: Arc<InstanceData>,
    stats: Option<Arc<UsageStats>>,
) -> Result<Box<dyn FitnessCalculator>, FitnessError> {
    let calculator: Box<dyn FitnessCalculator> = match name {
        "simple" | "simple-mono" | "simple-makespan" | "simple-makespan-mono" | "simple-energy"
        | "simple-energy-mono" => Box::new(Simple::new(instance)),
        "heft" | "heft-makespan-mono" | "heft-spea2" | "heft-pesa2" => {
            Box::new(Heft::new(instance))
        }
        "heft-energy-active" | "heft-energy-mono-active" => {
            Box::new(HeftEnergy::new(instance, SchedulingMode::Active))
        }
        "heft-energy-semi-active" | "heft-energy-mono-semi-active" => {
            Box::new(HeftEnergy::new(instance, SchedulingMode::SemiActive))
        }
        "min-energy-UM-active" | "min-energy-UM-mono-active" => {
            Box::new(MinEnergyUm::new(instance, SchedulingMode::Active))
        }
        "min-energy-UM-semi-active" | "min-energy-UM-mono-semi-active" => {
            Box::new(MinEnergyUm::new(instance, SchedulingMode::SemiActive))
        }
        "fvlt-me-active" | "fvlt-me-mono-active" => {
            Box::new(Fvlt::new(instance, SchedulingMode::Active))
        }
        "fvlt-me-semi-active" | "fvlt-me-mono-semi-active" => {
            Box::new(Fvlt::new(instance, SchedulingMode::SemiActive))
        }
        "rank" | "rank-makespan" | "rank-makespan-mono" => Box::new(Rank::new(instance)),
        "heuristic" => Box::new(Heuristic::new(instance)),
        "multi" => Box::new(Multi::new(instance, None, stats)),
        "multi-makespan" | "multi-makespan-mono" => {
            Box::new(Multi::makespan_only(instance, stats))
        }
        "multi-energy" | "multi-energy-mono" => Box::new(Multi::energy_only(instance, stats)),
        "multi-energy-no-fvlt" | "multi-energy-mono-no-fvlt" => {
            Box::new(Multi::without_fvlt(instance, stats))
        }
        other => return Err(FitnessError::UnknownStrategy(other.to_string())),
    };
    Ok(calculator)
}

/// Folds a realized schedule into the final [`FitnessInfo`]: standby
/// energy over the whole makespan for every host, schedule ordered by
/// start time.
pub(crate) fn collect_fitness(
    instance: &InstanceData,
    name: &str,
    makespan: f64,
    energy_active: f64,
    mut schedule: Vec<TaskSchedule>,
) -> FitnessInfo {
    let standby_rate: f64 = instance
        .hosts
        .iter()
        .map(|h| h.energy_cost_stand_by)
        .sum();
    let energy = energy_active + standby_rate * makespan;
    schedule.sort_by(|a, b| a.ast.total_cmp(&b.ast));
    let mut objectives = HashMap::new();
    objectives.insert(Objective::Makespan.as_str().to_string(), makespan);
    objectives.insert(Objective::Energy.as_str().to_string(), energy);
    FitnessInfo::new(objectives, schedule, name)
}
