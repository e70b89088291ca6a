//! Tailwind exercise: a clock repair shop page

use crate::diagnostics::{Check, Fraction, Registry, Strategy, StyleProbe, TierMessages};
use crate::render::Rgba;
use crate::source::{FieldAssertion, ManifestFormat, TextPattern};

use super::{Exercise, ExerciseDefinition};

/// amber-900
const HEADER_BACKGROUND: Rgba = Rgba::rgb(120, 53, 15);

pub(super) fn definition() -> ExerciseDefinition {
    ExerciseDefinition {
        exercise: Exercise::Tailwind,
        banner: "🕰️ TAILWIND CSS DIAGNOSTIC TESTS",
        label: "TAILWIND",
        document: "index.html",
        registry: Registry::new(checks()),
        tiers: TierMessages {
            complete: &[
                "🎉 Excellent! Tailwind is fully set up and all issues are fixed!",
                "🕰️ The Clockwork Repairs website is ready for customers!",
            ],
            near: None,
            partial: None,
            low_tip: Some((
                Fraction::new(7, 9),
                "💡 Tip: Make sure you completed the SETUP section first",
            )),
        },
    }
}

fn checks() -> Vec<Check> {
    use TextPattern::*;

    vec![
        Check::new(
            "Tailwind CSS loading",
            Strategy::ComputedStyle(StyleProbe::ColorNear {
                selector: "header",
                property: "background-color",
                expected: HEADER_BACKGROUND,
                tolerance: 16,
            }),
            "Tailwind CSS not loaded properly (hint: check your CSS link and build process)",
            "Tailwind CSS is loaded and working",
        ),
        Check::new(
            "shadow classes",
            Strategy::ComputedStyle(StyleProbe::ClassAttribute {
                selector: ".bg-amber-50",
                pattern: AllOf(vec![Absent("shadow-medium"), Absent("shadow-large")]),
            }),
            "Invalid shadow classes found (hint: Tailwind uses standard sizes like sm, md, lg, xl)",
            "All shadow classes are valid",
        ),
        Check::new(
            "class spelling",
            Strategy::SourceText {
                path: "index.html",
                pattern: Absent("items-centre"),
            },
            "Found British spelling in class names (hint: Tailwind uses American spelling)",
            "All class names use correct spelling",
        ),
        Check::new(
            "responsive syntax",
            Strategy::SourceText {
                path: "index.html",
                pattern: Absent("sm-flex-row"),
            },
            "Incorrect responsive class syntax (hint: use colons like sm:flex-row)",
            "Responsive classes use correct syntax",
        ),
        Check::new(
            "broken classes",
            Strategy::SourceText {
                path: "index.html",
                pattern: AllOf(vec![
                    Absent("shadow-medium"),
                    Absent("shadow-large"),
                    Absent("items-centre"),
                    Absent("sm-flex-row"),
                ]),
            },
            "Found broken Tailwind classes in HTML (hint: check for typos and invalid class names)",
            "No broken Tailwind classes found",
        ),
        Check::new(
            "focus states",
            Strategy::ComputedStyle(StyleProbe::ClassAttribute {
                selector: "input, select, textarea",
                pattern: AllOf(vec![Contains("focus:ring"), Contains("focus:border")]),
            }),
            "Form elements missing consistent focus states (hint: add focus:ring and focus:border classes)",
            "All form elements have proper focus states",
        ),
        Check::new(
            "config file",
            Strategy::StructuredArtifact {
                path: "tailwind.config.js",
                format: ManifestFormat::ConfigModule,
                assertion: FieldAssertion::ListIncludes {
                    path: &["content"],
                    suffix: ".html",
                },
            },
            "Tailwind config missing or incorrectly configured (hint: check content array)",
            "Tailwind config file properly set up",
        ),
        Check::new(
            "CSS output file",
            Strategy::SourceText {
                path: "dist/output.css",
                pattern: AllOf(vec![LongerThan(10_000), Contains(".bg-amber")]),
            },
            "CSS output file missing or empty (hint: run npm run build:css)",
            "CSS file properly generated",
        ),
        Check::new(
            "package.json",
            Strategy::StructuredArtifact {
                path: "package.json",
                format: ManifestFormat::Json,
                assertion: FieldAssertion::Contains {
                    path: &["scripts", "build:css"],
                    needle: "tailwindcss",
                },
            },
            "Package.json missing or build script incorrect (hint: check build:css script)",
            "Package.json properly configured",
        ),
    ]
}
