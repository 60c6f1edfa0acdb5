//! Experiment selection and execution: a declarative scenario catalog
//! consumed by one generic runner.

pub mod catalog;
pub mod runner;
