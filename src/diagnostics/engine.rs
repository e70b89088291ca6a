//! Evaluation engine
//!
//! Runs every check of a registry in order against the accessors and
//! produces exactly one result per check. A check that errors or panics
//! is recorded as failed and the run moves on.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::common::Result;
use crate::render::{ElementHandle, RenderingAccessor};
use crate::source::manifest::read_manifest;
use crate::source::{FieldAssertion, ManifestFormat, SourceInspector, TextPattern};

use super::check::{
    distinguishable, side_by_side, width_ratio_exceeds, Check, HoverExpectation, Outcome,
    Quantifier, Strategy, StyleProbe,
};
use super::registry::Registry;
use super::report::{EvaluationResult, RunReport};

/// Everything a check may read
pub struct Accessors<'a> {
    pub renderer: &'a mut dyn RenderingAccessor,
    pub sources: &'a dyn SourceInspector,
}

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Fixed wait between hover and re-reading styles
    pub hover_settle: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hover_settle: Duration::from_millis(200),
        }
    }
}

/// Evaluate every check in registry order
pub async fn run(
    registry: &Registry,
    accessors: &mut Accessors<'_>,
    options: &EngineOptions,
) -> RunReport {
    let mut results = Vec::with_capacity(registry.len());

    for check in registry.iter() {
        let outcome = evaluate_isolated(check, accessors, options).await;
        tracing::debug!(
            ordinal = check.ordinal,
            title = check.title,
            outcome = ?outcome,
            "Check evaluated"
        );
        results.push(EvaluationResult::new(check, outcome));
    }

    RunReport::from_results(results)
}

/// Evaluate one check, converting errors and panics into a fault outcome
async fn evaluate_isolated(
    check: &Check,
    accessors: &mut Accessors<'_>,
    options: &EngineOptions,
) -> Outcome {
    let evaluation = AssertUnwindSafe(evaluate(check, accessors, options))
        .catch_unwind()
        .await;

    let outcome = match evaluation {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::warn!(ordinal = check.ordinal, error = %e, "Check faulted");
            Outcome::Fault(e.to_string())
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            tracing::warn!(ordinal = check.ordinal, panic = %message, "Check panicked");
            Outcome::Fault(message)
        }
    };

    // A fault can land between hover and clear; later checks need the resting state
    if matches!(outcome, Outcome::Fault(_)) && hovers(&check.strategy) {
        if let Err(e) = accessors.renderer.clear_hover().await {
            tracing::debug!(ordinal = check.ordinal, error = %e, "Clearing hover after fault failed");
        }
    }
    outcome
}

fn hovers(strategy: &Strategy) -> bool {
    fn probe_hovers(probe: &StyleProbe) -> bool {
        match probe {
            StyleProbe::Hover { .. } => true,
            StyleProbe::AllOf(probes) => probes.iter().any(probe_hovers),
            _ => false,
        }
    }
    matches!(strategy, Strategy::ComputedStyle(probe) if probe_hovers(probe))
}

async fn evaluate(
    check: &Check,
    accessors: &mut Accessors<'_>,
    options: &EngineOptions,
) -> Result<Outcome> {
    match &check.strategy {
        Strategy::ComputedStyle(probe) => {
            probe_style(probe, &mut *accessors.renderer, options.hover_settle).await
        }
        Strategy::SourceText { path, pattern } => {
            source_text(accessors.sources, path, pattern)
        }
        Strategy::StructuredArtifact {
            path,
            format,
            assertion,
        } => structured_artifact(accessors.sources, path, *format, assertion),
    }
}

fn source_text(sources: &dyn SourceInspector, path: &str, pattern: &TextPattern) -> Result<Outcome> {
    let Some(text) = sources.read_text(path)? else {
        return Ok(Outcome::fail(format!("{} missing", path)));
    };
    Ok(match pattern.first_violation(&text) {
        None => Outcome::Pass,
        Some(violated) => Outcome::fail(format!("{}: expected text that {}", path, violated)),
    })
}

fn structured_artifact(
    sources: &dyn SourceInspector,
    path: &str,
    format: ManifestFormat,
    assertion: &FieldAssertion,
) -> Result<Outcome> {
    let passed = match read_manifest(sources, path, format)? {
        Some(manifest) => assertion.holds(&manifest),
        None => false,
    };
    Ok(Outcome::from_bool(passed, || {
        format!("{} `{}` missing or incorrect", path, assertion)
    }))
}

fn probe_style<'a>(
    probe: &'a StyleProbe,
    renderer: &'a mut dyn RenderingAccessor,
    settle: Duration,
) -> BoxFuture<'a, Result<Outcome>> {
    async move {
        match probe {
            StyleProbe::ColorPresent { selector, property } => {
                let Some(element) = renderer.query_one(selector).await? else {
                    return Ok(no_match(selector));
                };
                let colors = renderer
                    .computed_style(&element, &[*property])
                    .await?
                    .colors(property)?;
                let visible = colors.iter().any(|c| !c.is_transparent());
                Ok(Outcome::from_bool(visible, || {
                    describe_colors(property, &colors)
                }))
            }

            StyleProbe::ColorNear {
                selector,
                property,
                expected,
                tolerance,
            } => {
                let Some(element) = renderer.query_one(selector).await? else {
                    return Ok(no_match(selector));
                };
                let color = renderer
                    .computed_style(&element, &[*property])
                    .await?
                    .color(property)?;
                Ok(Outcome::from_bool(color.approx_eq(expected, *tolerance), || {
                    format!("{} is {}, expected near {}", property, color, expected)
                }))
            }

            StyleProbe::KeywordNotIn {
                selector,
                property,
                rejected,
            } => {
                let Some(element) = renderer.query_one(selector).await? else {
                    return Ok(no_match(selector));
                };
                let style = renderer.computed_style(&element, &[*property]).await?;
                let value = style.get(property)?.trim();
                let allowed = !rejected.iter().any(|r| *r == value);
                Ok(Outcome::from_bool(allowed, || {
                    format!("{} is {}", property, value)
                }))
            }

            StyleProbe::LengthsPositive {
                selector,
                properties,
                require,
            } => {
                let Some(element) = renderer.query_one(selector).await? else {
                    return Ok(no_match(selector));
                };
                let style = renderer.computed_style(&element, properties).await?;
                let mut positive = Vec::with_capacity(properties.len());
                for property in properties.iter() {
                    positive.push(style.length(property)?.is_some_and(|v| v > 0.0));
                }
                let passed = match require {
                    Quantifier::All => positive.iter().all(|p| *p),
                    Quantifier::Any => positive.iter().any(|p| *p),
                };
                Ok(Outcome::from_bool(passed, || {
                    properties
                        .iter()
                        .map(|p| format!("{} = {}", p, style.get(p).unwrap_or("?")))
                        .collect::<Vec<_>>()
                        .join(", ")
                }))
            }

            StyleProbe::SideBySide {
                selector,
                overlap_px,
            } => {
                let elements = renderer.query(selector).await?;
                if elements.len() < 2 {
                    return Ok(Outcome::fail(format!(
                        "{} matched {} element(s), need 2",
                        selector,
                        elements.len()
                    )));
                }
                let first = renderer.bounding_rect(&elements[0]).await?;
                let second = renderer.bounding_rect(&elements[1]).await?;
                Ok(Outcome::from_bool(side_by_side(&first, &second, *overlap_px), || {
                    format!(
                        "second starts at x={} but first ends at x={}",
                        second.left, first.right
                    )
                }))
            }

            StyleProbe::WidthRatio {
                selector,
                container,
                min_ratio,
            } => {
                let element = renderer.query_one(selector).await?;
                let parent = renderer.query_one(container).await?;
                let (Some(element), Some(parent)) = (element, parent) else {
                    return Ok(Outcome::fail(format!("{} or {} not found", selector, container)));
                };
                let inner = renderer.bounding_rect(&element).await?;
                let outer = renderer.bounding_rect(&parent).await?;
                Ok(Outcome::from_bool(
                    width_ratio_exceeds(&inner, &outer, *min_ratio),
                    || format!("width {} of {}", inner.width, outer.width),
                ))
            }

            StyleProbe::Hover {
                selector,
                property,
                expect,
            } => {
                let Some(element) = renderer.query_one(selector).await? else {
                    return Ok(no_match(selector));
                };
                hover(renderer, &element, property, expect, settle).await
            }

            StyleProbe::Contrast {
                text,
                background,
                invisible,
            } => {
                let Some(text_element) = renderer.query_one(text).await? else {
                    // nothing rendered, nothing unreadable
                    return Ok(Outcome::Pass);
                };
                let Some(background_element) = renderer.query_one(background).await? else {
                    return Ok(no_match(background));
                };
                let color = renderer
                    .computed_style(&text_element, &["color"])
                    .await?
                    .color("color")?;
                let behind = renderer
                    .computed_style(&background_element, &["background-color"])
                    .await?
                    .color("background-color")?;
                Ok(Outcome::from_bool(
                    distinguishable(&color, &behind, invisible),
                    || format!("text {} on {}", color, behind),
                ))
            }

            StyleProbe::ClassAttribute { selector, pattern } => {
                for element in renderer.query(selector).await? {
                    let classes = renderer.attribute(&element, "class").await?.unwrap_or_default();
                    if let Some(violated) = pattern.first_violation(&classes) {
                        return Ok(Outcome::fail(format!(
                            "class=\"{}\": expected classes that {}",
                            classes, violated
                        )));
                    }
                }
                Ok(Outcome::Pass)
            }

            StyleProbe::AllOf(probes) => {
                for inner in probes {
                    let outcome = probe_style(inner, &mut *renderer, settle).await?;
                    if !outcome.is_pass() {
                        return Ok(outcome);
                    }
                }
                Ok(Outcome::Pass)
            }
        }
    }
    .boxed()
}

/// Read, hover, settle, re-read, then put the pointer back
async fn hover(
    renderer: &mut dyn RenderingAccessor,
    element: &ElementHandle,
    property: &str,
    expect: &HoverExpectation,
    settle: Duration,
) -> Result<Outcome> {
    let before = renderer
        .computed_style(element, &[property])
        .await?
        .color(property)?;

    renderer.hover(element).await?;
    renderer.wait(settle).await;
    let after = renderer.computed_style(element, &[property]).await;
    let cleared = renderer.clear_hover().await;

    let after = after?.color(property)?;
    cleared?;

    Ok(Outcome::from_bool(expect.holds(&before, &after), || {
        format!("{} {} before hover, {} after", property, before, after)
    }))
}

fn no_match(selector: &str) -> Outcome {
    Outcome::fail(format!("no element matches {}", selector))
}

fn describe_colors(property: &str, colors: &[crate::render::Rgba]) -> String {
    let values: Vec<String> = colors.iter().map(|c| c.to_string()).collect();
    format!("{} is {}", property, values.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::render::snapshot::{RenderSnapshot, SnapshotElement};
    use crate::render::types::{ComputedStyle, Rect};
    use crate::render::SnapshotRenderer;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory artifacts
    struct MemorySources(HashMap<&'static str, &'static str>);

    impl SourceInspector for MemorySources {
        fn read_text(&self, path: &str) -> Result<Option<String>> {
            Ok(self.0.get(path).map(|s| s.to_string()))
        }
    }

    async fn evaluate_all(checks: Vec<Check>, snapshot: RenderSnapshot) -> RunReport {
        let registry = Registry::new(checks);
        let mut renderer = SnapshotRenderer::new(snapshot);
        let sources = MemorySources(HashMap::from([("styles.scss", "$a: 1;")]));
        let mut accessors = Accessors {
            renderer: &mut renderer,
            sources: &sources,
        };
        let options = EngineOptions {
            hover_settle: Duration::ZERO,
        };
        run(&registry, &mut accessors, &options).await
    }

    fn style_check(probe: StyleProbe) -> Check {
        Check::new("probe", Strategy::ComputedStyle(probe), "hint", "ok")
    }

    #[tokio::test]
    async fn test_source_text_missing_and_present() {
        let report = evaluate_all(
            vec![
                Check::new(
                    "present",
                    Strategy::SourceText {
                        path: "styles.scss",
                        pattern: TextPattern::Contains("$a:"),
                    },
                    "hint",
                    "ok",
                ),
                Check::new(
                    "missing",
                    Strategy::SourceText {
                        path: "other.scss",
                        pattern: TextPattern::Exists,
                    },
                    "hint",
                    "ok",
                ),
            ],
            RenderSnapshot::new("index.html"),
        )
        .await;

        assert_eq!(report.pattern(), vec![true, false]);
        assert_eq!(report.results[1].observed.as_deref(), Some("other.scss missing"));
    }

    #[tokio::test]
    async fn test_unparseable_color_is_a_fault() {
        let snapshot = RenderSnapshot::new("index.html")
            .element(SnapshotElement::matching(&["h1"]).style("color", "currentcolor-ish"));
        let report = evaluate_all(
            vec![style_check(StyleProbe::ColorPresent {
                selector: "h1",
                property: "color",
            })],
            snapshot,
        )
        .await;

        assert_eq!(report.results[0].fault.as_deref(), Some("error checking probe"));
    }

    #[tokio::test]
    async fn test_all_of_stops_at_first_failure() {
        let snapshot = RenderSnapshot::new("index.html").element(
            SnapshotElement::matching(&["header"]).style("background-color", "transparent"),
        );
        // the second probe would fault on the missing property
        let report = evaluate_all(
            vec![style_check(StyleProbe::AllOf(vec![
                StyleProbe::ColorPresent {
                    selector: "header",
                    property: "background-color",
                },
                StyleProbe::LengthsPositive {
                    selector: "header",
                    properties: &["padding-top"],
                    require: Quantifier::All,
                },
            ]))],
            snapshot,
        )
        .await;

        let result = &report.results[0];
        assert!(!result.passed);
        assert!(result.fault.is_none());
        assert_eq!(
            result.observed.as_deref(),
            Some("background-color is rgba(0, 0, 0, 0)")
        );
    }

    #[tokio::test]
    async fn test_side_by_side_needs_two_elements() {
        let snapshot = RenderSnapshot::new("index.html")
            .element(SnapshotElement::matching(&[".card"]).rect(0.0, 0.0, 100.0, 100.0));
        let report = evaluate_all(
            vec![style_check(StyleProbe::SideBySide {
                selector: ".card",
                overlap_px: 10.0,
            })],
            snapshot,
        )
        .await;

        assert_eq!(
            report.results[0].observed.as_deref(),
            Some(".card matched 1 element(s), need 2")
        );
    }

    #[tokio::test]
    async fn test_class_attribute_vacuous_without_matches() {
        let report = evaluate_all(
            vec![style_check(StyleProbe::ClassAttribute {
                selector: "input",
                pattern: TextPattern::Contains("focus:ring"),
            })],
            RenderSnapshot::new("index.html"),
        )
        .await;

        assert!(report.results[0].passed);
    }

    /// Snapshot renderer that breaks once the pointer is already over the element
    struct BrokenAfterHover {
        inner: SnapshotRenderer,
        panic_on_wait: bool,
    }

    #[async_trait]
    impl RenderingAccessor for BrokenAfterHover {
        async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>> {
            self.inner.query(selector).await
        }

        async fn computed_style(
            &mut self,
            element: &ElementHandle,
            properties: &[&str],
        ) -> Result<ComputedStyle> {
            self.inner.computed_style(element, properties).await
        }

        async fn bounding_rect(&mut self, element: &ElementHandle) -> Result<Rect> {
            self.inner.bounding_rect(element).await
        }

        async fn attribute(&mut self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
            self.inner.attribute(element, name).await
        }

        async fn hover(&mut self, element: &ElementHandle) -> Result<()> {
            self.inner.hover(element).await?;
            if self.panic_on_wait {
                return Ok(());
            }
            Err(Error::RendererTimeout {
                command: "hover".to_string(),
                secs: 30,
            })
        }

        async fn clear_hover(&mut self) -> Result<()> {
            self.inner.clear_hover().await
        }

        async fn wait(&mut self, _duration: Duration) {
            if self.panic_on_wait {
                panic!("renderer went away mid-transition");
            }
        }

        async fn release(&mut self) -> Result<()> {
            self.inner.release().await
        }
    }

    /// Run a hover check then a plain colour check on the same link
    async fn hover_fault_then_resting_color(panic_on_wait: bool) -> RunReport {
        let snapshot = RenderSnapshot::new("index.html").element(
            SnapshotElement::matching(&["a"])
                .style("color", "rgb(0, 0, 255)")
                .hover_style("color", "rgba(0, 0, 0, 0)"),
        );
        let mut renderer = BrokenAfterHover {
            inner: SnapshotRenderer::new(snapshot),
            panic_on_wait,
        };
        let sources = MemorySources(HashMap::new());
        let registry = Registry::new(vec![
            style_check(StyleProbe::AllOf(vec![StyleProbe::Hover {
                selector: "a",
                property: "color",
                expect: HoverExpectation {
                    changes: true,
                    not_equal: None,
                },
            }])),
            style_check(StyleProbe::ColorPresent {
                selector: "a",
                property: "color",
            }),
        ]);
        let mut accessors = Accessors {
            renderer: &mut renderer,
            sources: &sources,
        };
        let options = EngineOptions {
            hover_settle: Duration::ZERO,
        };
        run(&registry, &mut accessors, &options).await
    }

    #[tokio::test]
    async fn test_hover_cleared_when_check_errors_after_hover() {
        let report = hover_fault_then_resting_color(false).await;

        assert!(report.results[0].fault.is_some());
        assert!(report.results[1].passed, "{:?}", report.results[1]);
    }

    #[tokio::test]
    async fn test_hover_cleared_when_check_panics_after_hover() {
        let report = hover_fault_then_resting_color(true).await;

        assert!(report.results[0].fault.is_some());
        assert!(report.results[1].passed, "{:?}", report.results[1]);
    }
}
