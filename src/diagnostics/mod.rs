//! Rule-based diagnostic engine
//!
//! Checks are declared per exercise in a [`Registry`], evaluated in order
//! by [`engine::run`] and rendered by a [`Reporter`].

pub mod check;
pub mod engine;
pub mod registry;
pub mod report;

pub use check::{Check, HoverExpectation, Outcome, Quantifier, Strategy, StyleProbe};
pub use engine::{run, Accessors, EngineOptions};
pub use registry::Registry;
pub use report::{Band, EvaluationResult, Fraction, Reporter, RunReport, TierMessages};
