//! CLI command definitions
//!
//! One subcommand per exercise, each taking the exercise root.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::exercises::Exercise;

#[derive(Subcommand)]
pub enum Commands {
    /// Plain CSS exercise
    #[command(name = "vanilla-css", alias = "css")]
    VanillaCss {
        /// Exercise directory containing index.html
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Tailwind exercise
    Tailwind {
        /// Exercise directory containing index.html
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Sass exercise
    #[command(alias = "scss")]
    Sass {
        /// Exercise directory containing index.html
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

impl Commands {
    pub fn exercise(&self) -> Exercise {
        match self {
            Commands::VanillaCss { .. } => Exercise::VanillaCss,
            Commands::Tailwind { .. } => Exercise::Tailwind,
            Commands::Sass { .. } => Exercise::Sass,
        }
    }

    pub fn dir(&self) -> &Path {
        match self {
            Commands::VanillaCss { dir } | Commands::Tailwind { dir } | Commands::Sass { dir } => {
                dir
            }
        }
    }
}
