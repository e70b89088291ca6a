//! Exercise definitions
//!
//! Each exercise ships a document with seeded defects and a fixed,
//! ordered list of checks that detect them.

mod sass;
mod tailwind;
mod vanilla_css;

use std::fmt;

use crate::diagnostics::{Registry, Reporter, TierMessages};

/// Supported exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exercise {
    VanillaCss,
    Tailwind,
    Sass,
}

impl Exercise {
    pub const ALL: [Exercise; 3] = [Exercise::VanillaCss, Exercise::Tailwind, Exercise::Sass];

    /// Build the exercise's registry and report texts
    pub fn definition(self) -> ExerciseDefinition {
        match self {
            Exercise::VanillaCss => vanilla_css::definition(),
            Exercise::Tailwind => tailwind::definition(),
            Exercise::Sass => sass::definition(),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exercise::VanillaCss => write!(f, "vanilla-css"),
            Exercise::Tailwind => write!(f, "tailwind"),
            Exercise::Sass => write!(f, "sass"),
        }
    }
}

/// Everything needed to run and report one exercise
#[derive(Debug, Clone)]
pub struct ExerciseDefinition {
    pub exercise: Exercise,
    pub banner: &'static str,
    pub label: &'static str,
    /// Document to render, relative to the exercise root
    pub document: &'static str,
    pub registry: Registry,
    pub tiers: TierMessages,
}

impl ExerciseDefinition {
    pub fn reporter(&self) -> Reporter<'_> {
        Reporter {
            banner: self.banner,
            label: self.label,
            registry: &self.registry,
            tiers: &self.tiers,
        }
    }
}
