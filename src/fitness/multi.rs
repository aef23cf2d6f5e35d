//! Best-of-family meta strategy.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::fitness::heft_energy::SchedulingMode;
use crate::fitness::{
    FitnessCalculator, FitnessError, Fvlt, Heft, HeftEnergy, MinEnergyUm, Rank, Simple,
};
use crate::models::{FitnessInfo, InstanceData, Objective, ScheduleSolution};

/// Aggregated record of how often a sub-strategy won and what makespans
/// it delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrategyUsage {
    /// Number of evaluations this strategy won.
    pub selections: u64,
    /// Sum of the winning makespans, for averaging offline.
    pub total_makespan: f64,
}

/// Thread-safe winner counter shared by [`Multi`] instances.
///
/// Purely observational: nothing in the engine reads it back. Callers
/// inject one handle into
/// [`fitness_for_with_stats`](crate::fitness::fitness_for_with_stats) and
/// inspect the snapshot when the run is over.
#[derive(Debug, Default)]
pub struct UsageStats {
    inner: RwLock<HashMap<String, StrategyUsage>>,
}

impl UsageStats {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one win for `strategy`.
    pub fn record(&self, strategy: &str, makespan: f64) {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(strategy.to_string()).or_default();
        entry.selections += 1;
        entry.total_makespan += makespan;
    }

    /// A copy of the current aggregate.
    pub fn snapshot(&self) -> HashMap<String, StrategyUsage> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Runs every strategy of the family matching the active objective and
/// keeps the best result.
///
/// The active objective is the solution's arbiter unless the constructor
/// pinned an override. The standard makespan family is
/// `[simple, heft, rank]` and the standard energy family
/// `[simple, min-energy-UM-active, fvlt-me-active]`; `rank` runs last in
/// its family because it rewrites the plan in place and later members
/// would otherwise score the rewritten order. The objective-pinned
/// constructors carry only their own family, so selecting the missing one
/// is fatal rather than a silent fallback.
pub struct Multi {
    makespan_family: Vec<Box<dyn FitnessCalculator>>,
    energy_family: Vec<Box<dyn FitnessCalculator>>,
    override_objective: Option<Objective>,
    stats: Option<Arc<UsageStats>>,
}

impl Multi {
    fn standard_makespan_family(instance: &Arc<InstanceData>) -> Vec<Box<dyn FitnessCalculator>> {
        vec![
            Box::new(Simple::new(instance.clone())),
            Box::new(Heft::new(instance.clone())),
            Box::new(Rank::new(instance.clone())),
        ]
    }

    fn standard_energy_family(instance: &Arc<InstanceData>) -> Vec<Box<dyn FitnessCalculator>> {
        vec![
            Box::new(Simple::new(instance.clone())),
            Box::new(MinEnergyUm::new(instance.clone(), SchedulingMode::Active)),
            Box::new(Fvlt::new(instance.clone(), SchedulingMode::Active)),
        ]
    }

    /// Both standard families, optionally pinned to one objective.
    pub fn new(
        instance: Arc<InstanceData>,
        override_objective: Option<Objective>,
        stats: Option<Arc<UsageStats>>,
    ) -> Self {
        Self {
            makespan_family: Self::standard_makespan_family(&instance),
            energy_family: Self::standard_energy_family(&instance),
            override_objective,
            stats,
        }
    }

    /// The makespan family alone, pinned to makespan. An energy-arbiter
    /// solution still evaluates on makespan through the override.
    pub fn makespan_only(instance: Arc<InstanceData>, stats: Option<Arc<UsageStats>>) -> Self {
        Self {
            makespan_family: Self::standard_makespan_family(&instance),
            energy_family: Vec::new(),
            override_objective: Some(Objective::Makespan),
            stats,
        }
    }

    /// The energy family alone, pinned to energy.
    pub fn energy_only(instance: Arc<InstanceData>, stats: Option<Arc<UsageStats>>) -> Self {
        Self {
            makespan_family: Vec::new(),
            energy_family: Self::standard_energy_family(&instance),
            override_objective: Some(Objective::Energy),
            stats,
        }
    }

    /// An energy family without the Fvlt member
    /// (`[simple, heft-energy-active, min-energy-UM-active]`) and no
    /// makespan family at all: with no override, a makespan-arbiter
    /// solution fails fast with
    /// [`FitnessError::NoCalculator`](crate::fitness::FitnessError).
    pub fn without_fvlt(instance: Arc<InstanceData>, stats: Option<Arc<UsageStats>>) -> Self {
        let energy_family: Vec<Box<dyn FitnessCalculator>> = vec![
            Box::new(Simple::new(instance.clone())),
            Box::new(HeftEnergy::new(instance.clone(), SchedulingMode::Active)),
            Box::new(MinEnergyUm::new(instance, SchedulingMode::Active)),
        ];
        Self {
            makespan_family: Vec::new(),
            energy_family,
            override_objective: None,
            stats,
        }
    }

    fn family(&self, objective: Objective) -> &[Box<dyn FitnessCalculator>] {
        match objective {
            Objective::Makespan => &self.makespan_family,
            Objective::Energy => &self.energy_family,
        }
    }
}

impl FitnessCalculator for Multi {
    fn calculate_fitness(
        &self,
        solution: &mut ScheduleSolution,
    ) -> Result<FitnessInfo, FitnessError> {
        let objective = self.override_objective.unwrap_or(solution.arbiter);
        let family = self.family(objective);
        if family.is_empty() {
            return Err(FitnessError::NoCalculator(objective));
        }

        let mut best: Option<(f64, FitnessInfo)> = None;
        for calculator in family {
            let info = calculator.calculate_fitness(solution)?;
            let value = info
                .objectives
                .get(objective.as_str())
                .copied()
                .ok_or_else(|| FitnessError::MissingObjective {
                    strategy: info.fitness_function.clone(),
                    objective,
                })?;
            match &best {
                Some((current, _)) if value >= *current => {}
                _ => best = Some((value, info)),
            }
        }
        let (value, winner) = best.ok_or(FitnessError::NoCalculator(objective))?;

        if let Some(stats) = &self.stats {
            let makespan = winner.makespan().ok_or(FitnessError::MissingObjective {
                strategy: winner.fitness_function.clone(),
                objective: Objective::Makespan,
            })?;
            stats.record(&winner.fitness_function, makespan);
            debug!(
                "multi: '{}' won {} = {:.6}",
                winner.fitness_function, objective, value
            );
        }
        Ok(winner)
    }

    fn fitness_name(&self) -> &'static str {
        "multi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{five_task_baseline_plan, five_task_shared};
    use crate::fitness::fitness_for_with_stats;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_makespan_family_winner() {
        let calc = Multi::new(five_task_shared(), None, None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Makespan);
        let info = calc.calculate_fitness(&mut solution).unwrap();
        // simple 50.4, heft 40.5, rank 40.4: rank wins.
        assert_eq!(info.fitness_function, "rank");
        assert!((info.makespan().unwrap() - 40.4).abs() < EPS);
    }

    #[test]
    fn test_override_beats_arbiter() {
        let calc = Multi::new(five_task_shared(), Some(Objective::Makespan), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let info = calc.calculate_fitness(&mut solution).unwrap();
        assert_eq!(info.fitness_function, "rank");
    }

    #[test]
    fn test_energy_family_beats_simple_on_energy() {
        let calc = Multi::new(five_task_shared(), Some(Objective::Energy), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let info = calc.calculate_fitness(&mut solution).unwrap();
        assert!(info.energy().unwrap() <= 116.06 + EPS);
    }

    #[test]
    fn test_no_fvlt_rejects_makespan_arbiter() {
        // The no-fvlt variant carries no makespan family and no override,
        // so a makespan-arbiter solution must fail fast.
        let calc = Multi::without_fvlt(five_task_shared(), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Makespan);
        let err = calc.calculate_fitness(&mut solution).err().unwrap();
        assert!(matches!(err, FitnessError::NoCalculator(Objective::Makespan)));
    }

    #[test]
    fn test_no_fvlt_evaluates_energy_arbiter() {
        let calc = Multi::without_fvlt(five_task_shared(), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let info = calc.calculate_fitness(&mut solution).unwrap();
        assert!(info.energy().unwrap() <= 116.06 + EPS);
    }

    #[test]
    fn test_objective_pinned_variants_carry_one_family() {
        // multi-makespan never touches an energy family; the override
        // routes an energy-arbiter solution onto the makespan one.
        let makespan = Multi::makespan_only(five_task_shared(), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Energy);
        let info = makespan.calculate_fitness(&mut solution).unwrap();
        assert_eq!(info.fitness_function, "rank");

        let energy = Multi::energy_only(five_task_shared(), None);
        let mut solution = ScheduleSolution::new(five_task_baseline_plan(), Objective::Makespan);
        let info = energy.calculate_fitness(&mut solution).unwrap();
        assert!(info.energy().is_some());
    }

    #[test]
    fn test_usage_stats_record_winners() {
        let stats = Arc::new(UsageStats::new());
        let calc = fitness_for_with_stats(
            "multi-makespan",
            five_task_shared(),
            Some(stats.clone()),
        )
        .unwrap();
        for _ in 0..3 {
            let mut solution =
                ScheduleSolution::new(five_task_baseline_plan(), Objective::Makespan);
            calc.calculate_fitness(&mut solution).unwrap();
        }
        let snapshot = stats.snapshot();
        let usage = snapshot.get("rank").unwrap();
        assert_eq!(usage.selections, 3);
        assert!((usage.total_makespan - 3.0 * 40.4).abs() < 1e-6);
    }
}
