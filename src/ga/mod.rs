//! Genetic search building blocks.
//!
//! The outer optimizer owns the population loop; this module supplies the
//! pieces that must understand the workflow topology: random plan
//! generation, crossover and mutation that keep plans topologically valid,
//! and the selection/replacement steps.

mod generator;
mod operators;

pub use generator::PlanGenerator;
pub use operators::{shuffle_selection, tournament_replacement, Operators};
