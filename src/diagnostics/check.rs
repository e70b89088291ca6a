//! Check definitions
//!
//! A check is immutable data: a title, one evaluation strategy carrying a
//! typed predicate, and the two feedback strings. The pure parts of each
//! predicate live here so they can be tested without a renderer.

use crate::render::{Rect, Rgba};
use crate::source::{FieldAssertion, ManifestFormat, TextPattern};

/// Colours closer than this per channel count as the same colour
pub const COLOR_EQUALITY_TOLERANCE: u8 = 1;

/// Default allowed overlap for elements laid out in sequence
pub const ADJACENCY_OVERLAP_PX: f64 = 10.0;

/// One registered diagnostic check
#[derive(Debug, Clone)]
pub struct Check {
    /// 1-based position in the registry
    pub ordinal: usize,
    pub title: &'static str,
    pub strategy: Strategy,
    /// Shown on failure: the likely defect class, not the fix
    pub hint: &'static str,
    /// Shown on success
    pub success: &'static str,
}

impl Check {
    /// A check whose ordinal is assigned when it is registered
    pub fn new(
        title: &'static str,
        strategy: Strategy,
        hint: &'static str,
        success: &'static str,
    ) -> Self {
        Self {
            ordinal: 0,
            title,
            strategy,
            hint,
            success,
        }
    }
}

/// How a check obtains the state its predicate looks at
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Query the rendered document
    ComputedStyle(StyleProbe),
    /// Match raw artifact text
    SourceText {
        path: &'static str,
        pattern: TextPattern,
    },
    /// Parse a manifest and assert on a field
    StructuredArtifact {
        path: &'static str,
        format: ManifestFormat,
        assertion: FieldAssertion,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Any,
}

/// A predicate over computed presentation state
#[derive(Debug, Clone)]
pub enum StyleProbe {
    /// Colour property of the first match is not fully transparent
    ColorPresent {
        selector: &'static str,
        property: &'static str,
    },
    /// Colour property is within `tolerance` of `expected` on every channel
    ColorNear {
        selector: &'static str,
        property: &'static str,
        expected: Rgba,
        tolerance: u8,
    },
    /// Keyword property is none of the rejected values
    KeywordNotIn {
        selector: &'static str,
        property: &'static str,
        rejected: &'static [&'static str],
    },
    /// Length properties are positive. Unit-less lengths compute to zero.
    LengthsPositive {
        selector: &'static str,
        properties: &'static [&'static str],
        require: Quantifier,
    },
    /// The second match begins after the first ends, give or take `overlap_px`
    SideBySide {
        selector: &'static str,
        overlap_px: f64,
    },
    /// Element width relative to its container exceeds `min_ratio`
    WidthRatio {
        selector: &'static str,
        container: &'static str,
        min_ratio: f64,
    },
    /// Colour property read before and after a simulated hover
    Hover {
        selector: &'static str,
        property: &'static str,
        expect: HoverExpectation,
    },
    /// Text colour is distinguishable from its background
    Contrast {
        text: &'static str,
        background: &'static str,
        invisible: Rgba,
    },
    /// `class` attribute of every match satisfies a pattern
    ClassAttribute {
        selector: &'static str,
        pattern: TextPattern,
    },
    AllOf(Vec<StyleProbe>),
}

/// What a hover check requires of the post-hover value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverExpectation {
    /// The value must differ from the pre-hover value
    pub changes: bool,
    /// The value must not be this colour
    pub not_equal: Option<Rgba>,
}

impl HoverExpectation {
    pub fn holds(&self, before: &Rgba, after: &Rgba) -> bool {
        let changed = !before.approx_eq(after, COLOR_EQUALITY_TOLERANCE);
        let rejected = self
            .not_equal
            .is_some_and(|wrong| after.approx_eq(&wrong, COLOR_EQUALITY_TOLERANCE));
        (changed || !self.changes) && !rejected
    }
}

/// Sequence check on two bounding boxes
pub fn side_by_side(first: &Rect, second: &Rect, overlap_px: f64) -> bool {
    second.left > first.right - overlap_px
}

/// Width ratio check; a zero-width container never passes
pub fn width_ratio_exceeds(element: &Rect, container: &Rect, min_ratio: f64) -> bool {
    container.width > 0.0 && element.width / container.width > min_ratio
}

/// Text is visible against its background and not a known near-invisible tint
pub fn distinguishable(text: &Rgba, background: &Rgba, invisible: &Rgba) -> bool {
    !text.approx_eq(background, COLOR_EQUALITY_TOLERANCE)
        && !text.approx_eq(invisible, COLOR_EQUALITY_TOLERANCE)
}

/// Evaluation outcome of one predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass,
    /// The predicate did not hold; `observed` describes what was seen
    Fail { observed: Option<String> },
    /// The predicate could not be evaluated
    Fault(String),
}

impl Outcome {
    pub fn fail(observed: impl Into<String>) -> Self {
        Outcome::Fail {
            observed: Some(observed.into()),
        }
    }

    pub fn from_bool(passed: bool, observed: impl FnOnce() -> String) -> Self {
        if passed {
            Outcome::Pass
        } else {
            Outcome::fail(observed())
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}
