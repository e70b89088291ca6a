//! Declarative text predicates

use std::fmt;

/// A pure predicate over artifact text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPattern {
    /// The artifact exists, whatever its content
    Exists,
    Contains(&'static str),
    Absent(&'static str),
    /// Byte length strictly above a minimum
    LongerThan(usize),
    AllOf(Vec<TextPattern>),
    AnyOf(Vec<TextPattern>),
}

impl TextPattern {
    pub fn holds(&self, text: &str) -> bool {
        match self {
            TextPattern::Exists => true,
            TextPattern::Contains(needle) => text.contains(needle),
            TextPattern::Absent(needle) => !text.contains(needle),
            TextPattern::LongerThan(min) => text.len() > *min,
            TextPattern::AllOf(patterns) => patterns.iter().all(|p| p.holds(text)),
            TextPattern::AnyOf(patterns) => patterns.iter().any(|p| p.holds(text)),
        }
    }

    /// First leaf condition that fails, for reporting
    pub fn first_violation(&self, text: &str) -> Option<TextPattern> {
        match self {
            TextPattern::AllOf(patterns) => patterns.iter().find_map(|p| p.first_violation(text)),
            _ if self.holds(text) => None,
            _ => Some(self.clone()),
        }
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextPattern::Exists => write!(f, "exists"),
            TextPattern::Contains(s) => write!(f, "contains {:?}", s),
            TextPattern::Absent(s) => write!(f, "does not contain {:?}", s),
            TextPattern::LongerThan(n) => write!(f, "longer than {} bytes", n),
            TextPattern::AllOf(ps) => write_joined(f, ps, " and "),
            TextPattern::AnyOf(ps) => write_joined(f, ps, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, patterns: &[TextPattern], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, p) in patterns.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, ")")
}
