//! Plain CSS exercise: a community garden page

use crate::diagnostics::check::ADJACENCY_OVERLAP_PX;
use crate::diagnostics::{
    Check, HoverExpectation, Quantifier, Registry, Strategy, StyleProbe, TierMessages,
};
use crate::render::Rgba;

use super::{Exercise, ExerciseDefinition};

pub(super) fn definition() -> ExerciseDefinition {
    ExerciseDefinition {
        exercise: Exercise::VanillaCss,
        banner: "🌱 VANILLA CSS DIAGNOSTIC TESTS",
        label: "DIAGNOSTIC",
        document: "index.html",
        registry: Registry::new(checks()),
        tiers: TierMessages {
            complete: &["🎉 All diagnostic issues fixed! Move on to the qualitative section."],
            near: None,
            partial: None,
            low_tip: None,
        },
    }
}

fn checks() -> Vec<Check> {
    vec![
        Check::new(
            "header background",
            Strategy::ComputedStyle(StyleProbe::ColorPresent {
                selector: ".main-header",
                property: "background-color",
            }),
            "Header should have green background color (hint: check CSS property spelling)",
            "Header background color is applied",
        ),
        Check::new(
            "navigation alignment",
            // justify-content, not justify-items
            Strategy::ComputedStyle(StyleProbe::KeywordNotIn {
                selector: ".main-nav",
                property: "justify-content",
                rejected: &["normal", "flex-start"],
            }),
            "Navigation links should align horizontally (hint: check your flexbox justify properties)",
            "Navigation links are horizontally aligned",
        ),
        Check::new(
            "navigation padding",
            Strategy::ComputedStyle(StyleProbe::LengthsPositive {
                selector: ".main-nav a",
                properties: &["padding-top", "padding-left"],
                require: Quantifier::All,
            }),
            "Navigation links need padding for better usability (hint: add space around the text)",
            "Navigation links have adequate padding",
        ),
        Check::new(
            "crop cards layout",
            Strategy::ComputedStyle(StyleProbe::SideBySide {
                selector: ".crop-card",
                overlap_px: ADJACENCY_OVERLAP_PX,
            }),
            "Crop cards should display in a row layout (hint: missing a display property)",
            "Crop cards are arranged horizontally",
        ),
        Check::new(
            "card margins",
            // `margin: 15` is dropped by the parser and computes to 0px
            Strategy::ComputedStyle(StyleProbe::LengthsPositive {
                selector: ".crop-card",
                properties: &["margin-top", "margin-right", "margin-bottom", "margin-left"],
                require: Quantifier::Any,
            }),
            "Card spacing looks broken (hint: CSS units are required for measurements)",
            "Card margins have proper units",
        ),
        Check::new(
            "button background",
            Strategy::ComputedStyle(StyleProbe::ColorNear {
                selector: ".harvest-btn",
                property: "background-color",
                expected: Rgba::rgb(0x68, 0xd3, 0x91),
                tolerance: 16,
            }),
            "Harvest buttons need proper background color (hint: check CSS property spelling)",
            "Harvest buttons have background color",
        ),
        Check::new(
            "button hover effect",
            Strategy::ComputedStyle(StyleProbe::Hover {
                selector: ".harvest-btn",
                property: "background-color",
                expect: HoverExpectation {
                    changes: true,
                    not_equal: Some(Rgba::rgb(219, 112, 147)),
                },
            }),
            "Button hover effect not working correctly (hint: check CSS specificity rules)",
            "Button hover effects are working",
        ),
        Check::new(
            "text visibility",
            Strategy::ComputedStyle(StyleProbe::Contrast {
                text: ".harvest-section p",
                background: "body",
                invisible: Rgba::rgb(247, 250, 252),
            }),
            "Some text is too light and hard to read (hint: check color values)",
            "Text colors have good visibility",
        ),
        Check::new(
            "fieldset border",
            Strategy::ComputedStyle(StyleProbe::ColorPresent {
                selector: ".volunteer-form fieldset",
                property: "border-color",
            }),
            "Form fieldset border should be visible (hint: check border color value)",
            "Form fieldset has visible border",
        ),
        Check::new(
            "button width",
            Strategy::ComputedStyle(StyleProbe::WidthRatio {
                selector: ".submit-btn",
                container: ".volunteer-form",
                min_ratio: 0.8,
            }),
            "Submit button should span full width of form (hint: add a width property)",
            "Submit button spans full width",
        ),
    ]
}
