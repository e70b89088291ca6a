//! Run results and report rendering
//!
//! The report is a pure fold over the ordered results. Rendering turns it
//! into numbered lines, the score and one tier message; it never affects
//! the process exit status.

use std::fmt;
use std::io::{self, Write};

use colored::Colorize;

use super::check::{Check, Outcome};
use super::registry::Registry;

/// Result of one check in one run
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub ordinal: usize,
    pub passed: bool,
    /// Set when the check could not be evaluated
    pub fault: Option<String>,
    /// What the predicate saw when it failed
    pub observed: Option<String>,
}

impl EvaluationResult {
    pub fn new(check: &Check, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => Self {
                ordinal: check.ordinal,
                passed: true,
                fault: None,
                observed: None,
            },
            Outcome::Fail { observed } => Self {
                ordinal: check.ordinal,
                passed: false,
                fault: None,
                observed,
            },
            Outcome::Fault(_) => Self {
                ordinal: check.ordinal,
                passed: false,
                fault: Some(format!("error checking {}", check.title)),
                observed: None,
            },
        }
    }
}

/// All results of one run, in registry order
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub results: Vec<EvaluationResult>,
    pub total: usize,
    pub passed: usize,
}

impl RunReport {
    pub fn from_results(results: Vec<EvaluationResult>) -> Self {
        let passed = results.iter().fold(0, |n, r| n + usize::from(r.passed));
        Self {
            total: results.len(),
            passed,
            results,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// Pass/fail pattern, useful for comparing runs
    pub fn pattern(&self) -> Vec<bool> {
        self.results.iter().map(|r| r.passed).collect()
    }
}

/// An exact pass ratio, compared without floating point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub num: usize,
    pub den: usize,
}

impl Fraction {
    pub const fn new(num: usize, den: usize) -> Self {
        Self { num, den }
    }

    /// `passed / total >= num / den`
    pub fn reached_by(&self, passed: usize, total: usize) -> bool {
        passed * self.den >= self.num * total
    }
}

/// Lines shown when the pass ratio falls in a band
#[derive(Debug, Clone)]
pub struct Band {
    pub from: Fraction,
    pub lines: &'static [&'static str],
}

/// Closing messages of one exercise
#[derive(Debug, Clone)]
pub struct TierMessages {
    /// Every check passed
    pub complete: &'static [&'static str],
    pub near: Option<Band>,
    pub partial: Option<Band>,
    /// Extra line after "issues remaining" when the ratio is below `below`
    pub low_tip: Option<(Fraction, &'static str)>,
}

impl TierMessages {
    /// Exactly one tier's lines for a report
    pub fn select(&self, report: &RunReport) -> Vec<String> {
        let (passed, total) = (report.passed, report.total);

        if passed == total {
            return self.complete.iter().map(|s| s.to_string()).collect();
        }
        for band in [&self.near, &self.partial].into_iter().flatten() {
            if band.from.reached_by(passed, total) {
                return band.lines.iter().map(|s| s.to_string()).collect();
            }
        }

        let mut lines = vec![format!(
            "🔧 {} issues remaining. Keep debugging!",
            report.failed()
        )];
        if let Some((below, tip)) = &self.low_tip {
            if !below.reached_by(passed, total) {
                lines.push(tip.to_string());
            }
        }
        lines
    }
}

/// One line of rendered output
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Banner(String),
    Rule(String),
    Blank,
    Result { passed: bool, text: String },
    Score(String),
    Tier(String),
}

impl ReportLine {
    fn styled(&self) -> String {
        match self {
            ReportLine::Banner(s) | ReportLine::Score(s) => s.bold().to_string(),
            ReportLine::Result { passed: false, text } => {
                format!("{} {}", "❌", text.red())
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Banner(s) | ReportLine::Rule(s) | ReportLine::Score(s) | ReportLine::Tier(s) => {
                write!(f, "{}", s)
            }
            ReportLine::Blank => Ok(()),
            ReportLine::Result { passed, text } => {
                write!(f, "{} {}", if *passed { "✅" } else { "❌" }, text)
            }
        }
    }
}

/// Renders a report for one exercise
pub struct Reporter<'a> {
    pub banner: &'a str,
    /// Prefix of the score line, e.g. `SASS`
    pub label: &'a str,
    pub registry: &'a Registry,
    pub tiers: &'a TierMessages,
}

impl Reporter<'_> {
    pub fn lines(&self, report: &RunReport) -> Vec<ReportLine> {
        let mut lines = vec![
            ReportLine::Banner(self.banner.to_string()),
            ReportLine::Rule("=".repeat(self.banner.chars().count())),
            ReportLine::Blank,
        ];

        for result in &report.results {
            let Some(check) = self.registry.get(result.ordinal) else {
                continue;
            };
            let message = match (&result.fault, result.passed) {
                (Some(fault), _) => fault.as_str(),
                (None, true) => check.success,
                (None, false) => check.hint,
            };
            lines.push(ReportLine::Result {
                passed: result.passed,
                text: format!("Test {}: {}", result.ordinal, message),
            });
        }

        lines.push(ReportLine::Blank);
        lines.push(ReportLine::Rule("=".repeat(40)));
        lines.push(ReportLine::Score(format!(
            "{} RESULTS: {}/{} tests passing",
            self.label, report.passed, report.total
        )));
        lines.extend(self.tiers.select(report).into_iter().map(ReportLine::Tier));
        lines
    }

    pub fn write<W: Write>(&self, report: &RunReport, out: &mut W) -> io::Result<()> {
        for line in self.lines(report) {
            writeln!(out, "{}", line.styled())?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::check::Strategy;
    use crate::source::TextPattern;

    const TIERS: TierMessages = TierMessages {
        complete: &["🎉 done"],
        near: Some(Band {
            from: Fraction::new(8, 9),
            lines: &["🌊 close"],
        }),
        partial: Some(Band {
            from: Fraction::new(5, 9),
            lines: &["⚡ halfway", "💡 tip"],
        }),
        low_tip: Some((Fraction::new(1, 1), "💡 build first")),
    };

    fn report(pattern: &[bool]) -> RunReport {
        RunReport::from_results(
            pattern
                .iter()
                .enumerate()
                .map(|(i, &passed)| EvaluationResult {
                    ordinal: i + 1,
                    passed,
                    fault: None,
                    observed: None,
                })
                .collect(),
        )
    }

    fn nine(passed: usize) -> RunReport {
        report(&(0..9).map(|i| i < passed).collect::<Vec<_>>())
    }

    #[test]
    fn test_counts_always_add_up() {
        for passed in 0..=9 {
            let r = nine(passed);
            assert_eq!(r.passed, passed);
            assert_eq!(r.passed + r.failed(), r.total);
        }
    }

    #[test]
    fn test_band_boundaries_are_exact() {
        assert_eq!(TIERS.select(&nine(9)), vec!["🎉 done"]);
        assert_eq!(TIERS.select(&nine(8)), vec!["🌊 close"]);
        assert_eq!(TIERS.select(&nine(5)), vec!["⚡ halfway", "💡 tip"]);
        assert_eq!(
            TIERS.select(&nine(4)),
            vec!["🔧 5 issues remaining. Keep debugging!", "💡 build first"]
        );
    }

    #[test]
    fn test_low_tip_only_below_threshold() {
        let tiers = TierMessages {
            complete: &["ready"],
            near: None,
            partial: None,
            low_tip: Some((Fraction::new(7, 9), "💡 setup")),
        };
        assert_eq!(tiers.select(&nine(7)).len(), 1);
        assert_eq!(tiers.select(&nine(6)).len(), 2);
    }

    #[test]
    fn test_lines_show_hint_only_on_failure() {
        let check = |title| {
            Check::new(
                title,
                Strategy::SourceText {
                    path: "scss/styles.scss",
                    pattern: TextPattern::Exists,
                },
                "hint text",
                "success text",
            )
        };
        let registry = Registry::new(vec![check("one"), check("two"), check("three")]);
        let mut run = report(&[true, false, false]);
        run.results[2].fault = Some("error checking three".to_string());

        let reporter = Reporter {
            banner: "🟡 SASS DIAGNOSTIC TESTS",
            label: "SASS",
            registry: &registry,
            tiers: &TIERS,
        };
        let text: Vec<String> = reporter.lines(&run).iter().map(|l| l.to_string()).collect();

        assert_eq!(text[3], "✅ Test 1: success text");
        assert_eq!(text[4], "❌ Test 2: hint text");
        assert_eq!(text[5], "❌ Test 3: error checking three");
        assert!(text.contains(&"SASS RESULTS: 1/3 tests passing".to_string()));
        assert_eq!(text[7], "=".repeat(40));
    }
}
