//! Parallel population evaluation.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::fitness::{FitnessCalculator, FitnessError};
use crate::models::ScheduleSolution;

/// Scores populations on a bounded thread pool.
///
/// The calculator is shared read-only across workers; every evaluation
/// allocates its own scratch state, so solutions never contend. A failed
/// evaluation fails the whole batch.
pub struct ParallelEvaluator {
    calculator: Arc<dyn FitnessCalculator>,
    pool: ThreadPool,
}

impl ParallelEvaluator {
    /// Creates an evaluator over `num_threads` workers; `0` means one per
    /// core.
    pub fn new(
        calculator: Arc<dyn FitnessCalculator>,
        num_threads: usize,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        Ok(Self { calculator, pool })
    }

    /// Evaluates every solution in place, storing each result on its
    /// solution.
    pub fn evaluate(&self, population: &mut [ScheduleSolution]) -> Result<(), FitnessError> {
        use rayon::prelude::*;

        let calculator = &self.calculator;
        self.pool.install(|| {
            population.par_iter_mut().try_for_each(|solution| {
                let info = calculator.calculate_fitness(solution)?;
                solution.fitness_info = Some(info);
                Ok(())
            })
        })
    }

    /// Duplicates every solution under the alternative arbiter (result
    /// cleared), then evaluates the doubled population. Gives a
    /// single-objective search a view of both fronts at once.
    pub fn evaluate_tagged(
        &self,
        population: Vec<ScheduleSolution>,
    ) -> Result<Vec<ScheduleSolution>, FitnessError> {
        let mut doubled = Vec::with_capacity(population.len() * 2);
        for solution in population {
            let mut twin = solution.clone();
            twin.arbiter = twin.arbiter.alternative();
            twin.fitness_info = None;
            doubled.push(solution);
            doubled.push(twin);
        }
        self.evaluate(&mut doubled)?;
        Ok(doubled)
    }
}
