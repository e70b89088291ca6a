//! CLI command handling
//!
//! Runs one exercise session end to end and prints the report.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::diagnostics::{self, Accessors, EngineOptions, RunReport};
use crate::exercises::{Exercise, ExerciseDefinition};
use crate::render;
use crate::source::FsSourceInspector;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let config = Config::load()?;
    let exercise = command.exercise();
    let definition = exercise.definition();

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    let report = run_session(&definition, command.dir(), &config, &mut io::stdout()).await?;

    tracing::info!(
        exercise = %exercise,
        passed = report.passed,
        total = report.total,
        "Diagnostic run finished"
    );
    Ok(())
}

/// Acquire a renderer for the exercise document, evaluate every check,
/// write the report and release the renderer
///
/// Only acquiring the renderer or writing the report can fail; check
/// failures are part of the report.
pub async fn run_session<W: Write>(
    definition: &ExerciseDefinition,
    dir: &Path,
    config: &Config,
    out: &mut W,
) -> Result<RunReport> {
    let root = exercise_root(definition.exercise, dir)?;

    let mut renderer = render::open(config, &root, definition.document).await?;
    let sources = FsSourceInspector::new(&root);
    let options = EngineOptions {
        hover_settle: config.hover.settle(),
    };

    let report = {
        let mut accessors = Accessors {
            renderer: renderer.as_mut(),
            sources: &sources,
        };
        diagnostics::run(&definition.registry, &mut accessors, &options).await
    };
    let written = definition.reporter().write(&report, out);

    if let Err(e) = renderer.release().await {
        tracing::warn!(error = %e, "Failed to release renderer");
    }

    written?;
    Ok(report)
}

fn exercise_root(exercise: Exercise, dir: &Path) -> Result<PathBuf> {
    let root = dir.canonicalize().map_err(|e| Error::FileRead {
        path: dir.display().to_string(),
        error: e.to_string(),
    })?;
    if !root.is_dir() {
        return Err(Error::Config(format!(
            "{} is not a {} exercise directory",
            root.display(),
            exercise
        )));
    }
    tracing::debug!(exercise = %exercise, root = %root.display(), "Exercise root");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::snapshot::RenderSnapshot;

    #[tokio::test]
    async fn test_session_with_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = serde_json::to_string(&RenderSnapshot::new("index.html")).unwrap();
        std::fs::write(dir.path().join("snapshot.json"), snapshot).unwrap();

        let mut config = Config::default();
        config.renderer.snapshot = Some(PathBuf::from("snapshot.json"));

        let definition = Exercise::Sass.definition();
        let mut out = Vec::new();
        let report = run_session(&definition, dir.path(), &config, &mut out)
            .await
            .unwrap();

        assert_eq!(report.total, 9);
        assert_eq!(report.passed, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SASS RESULTS: 0/9 tests passing"));
    }

    #[tokio::test]
    async fn test_session_rejects_snapshot_of_other_document() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = serde_json::to_string(&RenderSnapshot::new("about.html")).unwrap();
        std::fs::write(dir.path().join("snapshot.json"), snapshot).unwrap();

        let mut config = Config::default();
        config.renderer.snapshot = Some(PathBuf::from("snapshot.json"));

        let definition = Exercise::VanillaCss.definition();
        let mut out = Vec::new();
        let result = run_session(&definition, dir.path(), &config, &mut out).await;

        assert!(matches!(result, Err(Error::DocumentLoad { .. })));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_session_missing_directory() {
        let config = Config::default();
        let definition = Exercise::Tailwind.definition();
        let result = run_session(
            &definition,
            Path::new("/nonexistent/exercise"),
            &config,
            &mut Vec::new(),
        )
        .await;

        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
