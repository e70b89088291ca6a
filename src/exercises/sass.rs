//! Sass exercise: a submarine-themed page compiled from SCSS

use crate::diagnostics::{
    Band, Check, Fraction, Quantifier, Registry, Strategy, StyleProbe, TierMessages,
};
use crate::source::TextPattern;

use super::{Exercise, ExerciseDefinition};

const SCSS: &str = "scss/styles.scss";

/// Nesting chain seeded in the fixture; four levels below `.hero`
const OVER_NESTED: &str = "& + p.subtitle {\n        & + div {\n            & span {";

pub(super) fn definition() -> ExerciseDefinition {
    ExerciseDefinition {
        exercise: Exercise::Sass,
        banner: "🟡 SASS DIAGNOSTIC TESTS",
        label: "SASS",
        document: "index.html",
        registry: Registry::new(checks()),
        tiers: TierMessages {
            complete: &[
                "🎉 Excellent! All SASS issues are fixed!",
                "🟡 The Yellow Submarine website is ready to dive!",
            ],
            near: Some(Band {
                from: Fraction::new(8, 9),
                lines: &[
                    "🌊 Great progress! Just a few more issues to fix.",
                    "💡 Focus on the diagnostic fixes first, then the qualitative improvements.",
                ],
            }),
            partial: Some(Band {
                from: Fraction::new(5, 9),
                lines: &[
                    "⚡ Good start! Keep working on those SASS syntax issues.",
                    "💡 Remember: variables start with $, use @include for mixins, and @function for functions.",
                ],
            }),
            low_tip: Some((
                Fraction::new(1, 1),
                "💡 Tip: Make sure you run npm run build:sass to compile your changes.",
            )),
        },
    }
}

fn checks() -> Vec<Check> {
    use TextPattern::*;

    let scss = |pattern| Strategy::SourceText { path: SCSS, pattern };

    vec![
        Check::new(
            "CSS compilation",
            Strategy::SourceText {
                path: "css/styles.css",
                pattern: Exists,
            },
            "CSS file not generated (hint: run npm run build:sass from main directory)",
            "SASS compiled successfully",
        ),
        Check::new(
            "variable syntax",
            scss(AllOf(vec![Absent("-primary-yellow:"), Contains("$primary-yellow:")])),
            "Invalid variable syntax found (hint: SASS variables start with $)",
            "Variable syntax is correct",
        ),
        Check::new(
            "mixin syntax",
            scss(AllOf(vec![
                Contains("border-radius: 8px;"),
                Absent("border-radius: 8px\n"),
            ])),
            "Missing semicolon in mixin (hint: SASS properties need semicolons)",
            "Mixin syntax is correct",
        ),
        Check::new(
            "@include usage",
            scss(AllOf(vec![Absent("@mixin card-style;"), Contains("@include")])),
            "Incorrect mixin usage (hint: use @include to call mixins, not @mixin)",
            "Mixin usage is correct",
        ),
        Check::new(
            "variable definitions",
            scss(AllOf(vec![Absent("$underfined-color"), Absent("$undefined-color")])),
            "Using undefined variable (hint: check variable names for typos)",
            "All variables are properly defined",
        ),
        Check::new(
            "pseudo-class syntax",
            scss(AllOf(vec![Absent("&-hover"), Contains("&:hover")])),
            "Incorrect pseudo-class syntax (hint: use &:hover not &-hover)",
            "Pseudo-class syntax is correct",
        ),
        Check::new(
            "nesting structure",
            scss(Absent(OVER_NESTED)),
            "Overly complex nesting found (hint: simplify nested selectors)",
            "Nesting is properly structured",
        ),
        Check::new(
            "function syntax",
            scss(AllOf(vec![
                Contains("@function calculate-spacing"),
                Absent("@mixin calculate-spacing"),
            ])),
            "Incorrect function syntax (hint: use @function for functions, not @mixin)",
            "Function syntax is correct",
        ),
        Check::new(
            "applied styles",
            Strategy::ComputedStyle(StyleProbe::AllOf(vec![
                StyleProbe::ColorPresent {
                    selector: ".main-header",
                    property: "background-color",
                },
                StyleProbe::LengthsPositive {
                    selector: ".main-header",
                    properties: &["padding-top"],
                    require: Quantifier::All,
                },
            ])),
            "Styles not being applied to page (hint: check CSS file is linked and compiling)",
            "Styles are being applied to the page",
        ),
    ]
}
